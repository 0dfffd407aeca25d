use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".clinic-records-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "clinic.sqlite";

/// Ensure the database file exists, apply the schema, and return a live
/// connection. Note that `PRAGMA foreign_keys` stays at SQLite's default
/// (off): the references in the appointments table are declarative only, and
/// other tools reading the same file expect that.
pub fn ensure_schema() -> Result<Connection> {
    let db_path = db_path()?;

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
    apply_schema(&conn)?;

    Ok(conn)
}

/// Create the three tables if absent. Idempotent: running this against an
/// already-initialized database leaves the column sets and the stored rows
/// untouched. The column names, types, and defaults are the on-disk contract
/// and must not drift.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    // Keep references declarative only, as documented on `ensure_schema`. The
    // bundled SQLite is compiled with SQLITE_DEFAULT_FOREIGN_KEYS=1, so the
    // default must be turned back off explicitly to honor the on-disk contract.
    conn.pragma_update(None, "foreign_keys", false)
        .context("failed to disable foreign key enforcement")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS patients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            age INTEGER,
            gender TEXT,
            diagnosis TEXT,
            emergency_contact TEXT,
            insurance_provider TEXT,
            insurance_number TEXT
        )",
        [],
    )
    .context("failed to create patients table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS doctors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            specialization TEXT,
            experience INTEGER
        )",
        [],
    )
    .context("failed to create doctors table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS appointments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_id INTEGER,
            doctor_id INTEGER,
            appointment_date TEXT,
            status TEXT DEFAULT 'Scheduled',
            FOREIGN KEY (patient_id) REFERENCES patients(id),
            FOREIGN KEY (doctor_id) REFERENCES doctors(id)
        )",
        [],
    )
    .context("failed to create appointments table")?;

    Ok(())
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::apply_schema;
    use rusqlite::Connection;

    fn column_names(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        names
    }

    #[test]
    fn creates_three_tables() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(tables, vec!["appointments", "doctors", "patients"]);
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        conn.execute("INSERT INTO doctors (name, specialization, experience) VALUES ('Dr. Smith', 'Cardiology', 12)", [])
            .unwrap();
        let patients_before = column_names(&conn, "patients");

        apply_schema(&conn).unwrap();

        assert_eq!(column_names(&conn, "patients"), patients_before);
        assert_eq!(
            column_names(&conn, "appointments"),
            vec!["id", "patient_id", "doctor_id", "appointment_date", "status"]
        );
        let survivors: i64 = conn
            .query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))
            .unwrap();
        assert_eq!(survivors, 1);
    }
}
