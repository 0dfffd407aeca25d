use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::{Doctor, DoctorDraft};

/// Insert one doctor row. Same contract as patient creation: no validation,
/// always succeeds if storage is reachable.
pub fn create_doctor(conn: &Connection, draft: &DoctorDraft) -> Result<Doctor> {
    conn.execute(
        "INSERT INTO doctors (name, specialization, experience) VALUES (?1, ?2, ?3)",
        params![draft.name, draft.specialization, draft.experience],
    )
    .context("failed to insert doctor")?;

    let id = conn.last_insert_rowid();
    Ok(Doctor {
        id,
        name: draft.name.clone(),
        specialization: draft.specialization.clone(),
        experience: draft.experience,
    })
}

/// Retrieve every doctor, all columns, in storage natural order.
pub fn fetch_doctors(conn: &Connection) -> Result<Vec<Doctor>> {
    let mut stmt = conn
        .prepare("SELECT id, name, specialization, experience FROM doctors")
        .context("failed to prepare doctor query")?;

    let doctors = stmt
        .query_map([], |row| {
            Ok(Doctor {
                id: row.get(0)?,
                name: row.get(1)?,
                specialization: row.get(2)?,
                experience: row.get(3)?,
            })
        })
        .context("failed to load doctors")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect doctors")?;

    Ok(doctors)
}

/// Total number of registered doctors, for the Reports screen.
pub fn count_doctors(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM doctors", [], |row| row.get(0))
        .context("failed to count doctors")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::apply_schema;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_then_list_preserves_fields() {
        let conn = test_conn();
        let draft = DoctorDraft {
            name: "Dr. Smith".to_string(),
            specialization: "Cardiology".to_string(),
            experience: 12,
        };

        let created = create_doctor(&conn, &draft).unwrap();
        assert!(created.id > 0);

        let doctors = fetch_doctors(&conn).unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].name, "Dr. Smith");
        assert_eq!(doctors[0].specialization, "Cardiology");
        assert_eq!(doctors[0].experience, 12);
    }

    #[test]
    fn count_tracks_inserts() {
        let conn = test_conn();
        assert_eq!(count_doctors(&conn).unwrap(), 0);
        for _ in 0..3 {
            create_doctor(&conn, &DoctorDraft::default()).unwrap();
        }
        assert_eq!(count_doctors(&conn).unwrap(), 3);
    }
}
