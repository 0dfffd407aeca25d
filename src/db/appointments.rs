use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::{Appointment, AppointmentRecord};

/// Insert one appointment referencing a patient and a doctor by identity.
/// The references are not checked against the other tables: the picker that
/// produced the ids read a fresh roster, and a row deleted between that read
/// and this insert simply leaves an orphaned appointment behind. `status`
/// takes the column default.
pub fn schedule_appointment(
    conn: &Connection,
    patient_id: i64,
    doctor_id: i64,
    date: &str,
) -> Result<Appointment> {
    conn.execute(
        "INSERT INTO appointments (patient_id, doctor_id, appointment_date) VALUES (?1, ?2, ?3)",
        params![patient_id, doctor_id, date],
    )
    .context("failed to insert appointment")?;

    let id = conn.last_insert_rowid();
    Ok(Appointment {
        id,
        patient_id,
        doctor_id,
        date: date.to_string(),
        // Supplied by the column default, not by the INSERT.
        status: "Scheduled".to_string(),
    })
}

/// The joined listing: appointment id, patient name, doctor name, date.
/// Inner-join semantics are intentional. An appointment whose patient or
/// doctor row is gone is excluded here while remaining in raw storage.
pub fn fetch_appointments(conn: &Connection) -> Result<Vec<AppointmentRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT a.id, p.name, d.name, a.appointment_date
             FROM appointments a
             JOIN patients p ON a.patient_id = p.id
             JOIN doctors d ON a.doctor_id = d.id",
        )
        .context("failed to prepare appointment listing query")?;

    let records = stmt
        .query_map([], |row| {
            Ok(AppointmentRecord {
                id: row.get(0)?,
                patient: row.get(1)?,
                doctor: row.get(2)?,
                date: row.get(3)?,
            })
        })
        .context("failed to load appointments")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect appointments")?;

    Ok(records)
}

/// Every appointment row without the join, orphans included. Backs the raw
/// toggle on the Appointments screen and the storage-side assertions in the
/// tests.
pub fn fetch_raw_appointments(conn: &Connection) -> Result<Vec<Appointment>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, patient_id, doctor_id, appointment_date, status
             FROM appointments",
        )
        .context("failed to prepare raw appointment query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(Appointment {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                doctor_id: row.get(2)?,
                date: row.get(3)?,
                status: row.get(4)?,
            })
        })
        .context("failed to load raw appointments")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect raw appointments")?;

    Ok(rows)
}

/// Total number of appointments, for the Reports screen.
pub fn count_appointments(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))
        .context("failed to count appointments")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{apply_schema, create_doctor, create_patient};
    use crate::models::{DoctorDraft, PatientDraft};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn
    }

    fn register_pair(conn: &Connection) -> (i64, i64) {
        let patient = create_patient(
            conn,
            &PatientDraft {
                name: "Jane Doe".to_string(),
                age: 34,
                gender: "Female".to_string(),
                ..PatientDraft::default()
            },
        )
        .unwrap();
        let doctor = create_doctor(
            conn,
            &DoctorDraft {
                name: "Dr. Smith".to_string(),
                specialization: "Cardiology".to_string(),
                experience: 12,
            },
        )
        .unwrap();
        (patient.id, doctor.id)
    }

    #[test]
    fn schedule_then_list_joins_names() {
        let conn = test_conn();
        let (patient_id, doctor_id) = register_pair(&conn);

        schedule_appointment(&conn, patient_id, doctor_id, "2024-06-01").unwrap();

        let records = fetch_appointments(&conn).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].patient, "Jane Doe");
        assert_eq!(records[0].doctor, "Dr. Smith");
        assert_eq!(records[0].date, "2024-06-01");
    }

    #[test]
    fn default_status_is_scheduled() {
        let conn = test_conn();
        let (patient_id, doctor_id) = register_pair(&conn);

        schedule_appointment(&conn, patient_id, doctor_id, "2024-06-01").unwrap();

        let rows = fetch_raw_appointments(&conn).unwrap();
        assert_eq!(rows[0].status, "Scheduled");
    }

    #[test]
    fn orphaned_row_hidden_from_join_but_kept_in_storage() {
        let conn = test_conn();
        let (patient_id, doctor_id) = register_pair(&conn);
        schedule_appointment(&conn, patient_id, doctor_id, "2024-06-01").unwrap();

        // No deletion path exists in the application, so remove the patient
        // the way an external tool sharing the file would.
        conn.execute("DELETE FROM patients WHERE id = ?1", [patient_id])
            .unwrap();

        assert!(fetch_appointments(&conn).unwrap().is_empty());
        let raw = fetch_raw_appointments(&conn).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].patient_id, patient_id);
    }

    #[test]
    fn counts_match_inserted_rows() {
        let conn = test_conn();
        let (patient_id, doctor_id) = register_pair(&conn);

        for date in ["2024-06-01", "2024-06-02", "2024-06-03"] {
            schedule_appointment(&conn, patient_id, doctor_id, date).unwrap();
        }

        assert_eq!(crate::db::count_patients(&conn).unwrap(), 1);
        assert_eq!(crate::db::count_doctors(&conn).unwrap(), 1);
        assert_eq!(count_appointments(&conn).unwrap(), 3);
    }

    #[test]
    fn dangling_references_are_accepted_at_insert() {
        let conn = test_conn();

        // Foreign keys are declared but not enforced; an insert referencing
        // rows that never existed still lands.
        schedule_appointment(&conn, 41, 42, "2024-07-15").unwrap();

        assert_eq!(count_appointments(&conn).unwrap(), 1);
        assert!(fetch_appointments(&conn).unwrap().is_empty());
    }
}
