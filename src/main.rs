//! Binary entry point that glues the SQLite-backed records to the TUI: bring
//! up the database, hydrate the initial roster, and drive the Ratatui event
//! loop until the user exits.

use clinic_records_manager::{ensure_schema, fetch_patients, run_app, App};

/// Initialize persistence, load the patient roster, and launch the event
/// loop. Returning a `Result` bubbles fatal initialization problems (an
/// unwritable home directory, a corrupt database file) to the terminal
/// instead of failing silently.
fn main() -> anyhow::Result<()> {
    let conn = ensure_schema()?;
    let patients = fetch_patients(&conn)?;

    let mut app = App::new(conn, patients);
    run_app(&mut app)
}
