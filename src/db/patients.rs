use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::{Patient, PatientDraft};

/// Insert one patient row exactly as drafted. No field is validated here: an
/// empty name or an out-of-range age goes straight into storage. The hydrated
/// struct is returned so the caller can refresh UI state without re-querying.
pub fn create_patient(conn: &Connection, draft: &PatientDraft) -> Result<Patient> {
    conn.execute(
        "INSERT INTO patients (name, age, gender, diagnosis, emergency_contact, insurance_provider, insurance_number)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            draft.name,
            draft.age,
            draft.gender,
            draft.diagnosis,
            draft.emergency_contact,
            draft.insurance_provider,
            draft.insurance_number,
        ],
    )
    .context("failed to insert patient")?;

    let id = conn.last_insert_rowid();
    Ok(Patient {
        id,
        name: draft.name.clone(),
        age: draft.age,
        gender: draft.gender.clone(),
        diagnosis: draft.diagnosis.clone(),
        emergency_contact: draft.emergency_contact.clone(),
        insurance_provider: draft.insurance_provider.clone(),
        insurance_number: draft.insurance_number.clone(),
    })
}

/// Retrieve every patient, all columns, in storage natural order. The roster
/// view and the scheduling picker both read from this single query.
pub fn fetch_patients(conn: &Connection) -> Result<Vec<Patient>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, age, gender, diagnosis, emergency_contact,
                    insurance_provider, insurance_number
             FROM patients",
        )
        .context("failed to prepare patient query")?;

    let patients = stmt
        .query_map([], |row| {
            Ok(Patient {
                id: row.get(0)?,
                name: row.get(1)?,
                age: row.get(2)?,
                gender: row.get(3)?,
                diagnosis: row.get(4)?,
                emergency_contact: row.get(5)?,
                insurance_provider: row.get(6)?,
                insurance_number: row.get(7)?,
            })
        })
        .context("failed to load patients")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect patients")?;

    Ok(patients)
}

/// Total number of registered patients, for the Reports screen.
pub fn count_patients(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
        .context("failed to count patients")
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

    fn jane() -> PatientDraft {
        PatientDraft {
            name: "Jane Doe".to_string(),
            age: 34,
            gender: "Female".to_string(),
            diagnosis: "Hypertension".to_string(),
            emergency_contact: "555-0100".to_string(),
            insurance_provider: Some("Acme Health".to_string()),
            insurance_number: Some("AH-2291".to_string()),
        }
    }

    #[test]
    fn insert_then_list_preserves_fields() {
        let conn = test_conn();
        let before = fetch_patients(&conn).unwrap().len();

        create_patient(&conn, &jane()).unwrap();

        let patients = fetch_patients(&conn).unwrap();
        assert_eq!(patients.len(), before + 1);
        let row = patients.last().unwrap();
        assert_eq!(row.name, "Jane Doe");
        assert_eq!(row.age, 34);
        assert_eq!(row.gender, "Female");
        assert_eq!(row.diagnosis, "Hypertension");
        assert_eq!(row.emergency_contact, "555-0100");
        assert_eq!(row.insurance_provider.as_deref(), Some("Acme Health"));
        assert_eq!(row.insurance_number.as_deref(), Some("AH-2291"));
    }

    #[test]
    fn empty_name_is_accepted() {
        let conn = test_conn();
        let draft = PatientDraft {
            name: String::new(),
            ..jane()
        };

        create_patient(&conn, &draft).unwrap();

        let patients = fetch_patients(&conn).unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].name, "");
        assert_eq!(patients[0].display_name(), "(unnamed)");
    }

    #[test]
    fn blank_insurance_persists_as_null() {
        let conn = test_conn();
        let draft = PatientDraft {
            insurance_provider: None,
            insurance_number: None,
            ..jane()
        };

        create_patient(&conn, &draft).unwrap();

        let row = fetch_patients(&conn).unwrap().pop().unwrap();
        assert_eq!(row.insurance_provider, None);
        assert_eq!(row.insurance_number, None);
        let provider_is_null: bool = conn
            .query_row(
                "SELECT insurance_provider IS NULL FROM patients WHERE id = ?1",
                [row.id],
                |r| r.get(0),
            )
            .unwrap();
        assert!(provider_is_null);
    }

    #[test]
    fn listing_follows_insertion_order() {
        let conn = test_conn();
        for name in ["first", "second", "third"] {
            let draft = PatientDraft {
                name: name.to_string(),
                ..PatientDraft::default()
            };
            create_patient(&conn, &draft).unwrap();
        }

        let names: Vec<String> = fetch_patients(&conn)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn count_tracks_inserts() {
        let conn = test_conn();
        assert_eq!(count_patients(&conn).unwrap(), 0);
        create_patient(&conn, &jane()).unwrap();
        create_patient(&conn, &jane()).unwrap();
        assert_eq!(count_patients(&conn).unwrap(), 2);
    }
}
