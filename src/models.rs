//! Domain models that mirror the SQLite schema and travel between the
//! persistence layer and the TUI. These stay plain data holders; queries live
//! in `db` and presentation decisions live in `ui`.

use std::fmt;

#[derive(Debug, Clone)]
/// One row of the `patients` table. Every field arrives straight from a form
/// submission; nothing is validated on the way in, so `name` may legitimately
/// be empty and `age` is whatever the form widget allowed.
pub struct Patient {
    /// Primary key from the database, kept around because the scheduling
    /// picker submits identities rather than names.
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub diagnosis: String,
    pub emergency_contact: String,
    /// Optional form fields persist as NULL when left blank.
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
}

impl Patient {
    /// Name suitable for lists and picker labels. Registration accepts an
    /// empty name, so views need a stand-in to stay legible.
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            "(unnamed)"
        } else {
            trimmed
        }
    }

    /// One-line insurance summary for the roster cards.
    pub fn insurance_line(&self) -> String {
        match (&self.insurance_provider, &self.insurance_number) {
            (Some(provider), Some(number)) => format!("{provider} / {number}"),
            (Some(provider), None) => provider.clone(),
            (None, Some(number)) => number.clone(),
            (None, None) => "No insurance on file".to_string(),
        }
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Field values gathered by the patient form, ready for insertion. The insert
/// contract applies no validation; this struct just keeps the seven columns
/// from degenerating into a positional argument list.
#[derive(Debug, Clone, Default)]
pub struct PatientDraft {
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub diagnosis: String,
    pub emergency_contact: String,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
}

#[derive(Debug, Clone)]
/// One row of the `doctors` table. Immutable after registration.
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    /// Years of experience. The form widget bounds this at entry time; the
    /// column itself accepts any integer.
    pub experience: i64,
}

impl Doctor {
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            "(unnamed)"
        } else {
            trimmed
        }
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Field values gathered by the doctor form.
#[derive(Debug, Clone, Default)]
pub struct DoctorDraft {
    pub name: String,
    pub specialization: String,
    pub experience: i64,
}

#[derive(Debug, Clone)]
/// One raw row of the `appointments` table, references and all. The foreign
/// keys are declarative only, so `patient_id`/`doctor_id` may point at rows
/// that no longer exist.
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    /// Calendar date stored as `YYYY-MM-DD` text.
    pub date: String,
    /// Takes the column default `Scheduled` at insert time and is never
    /// changed by any code path afterward.
    pub status: String,
}

#[derive(Debug, Clone)]
/// The joined listing view: appointment id plus resolved names. Built with an
/// inner join, so an appointment whose patient or doctor row is missing does
/// not appear here even though the raw row still exists.
pub struct AppointmentRecord {
    pub id: i64,
    pub patient: String,
    pub doctor: String,
    pub date: String,
}

/// Aggregate counts shown side by side on the Reports screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct Totals {
    pub patients: i64,
    pub doctors: i64,
    pub appointments: i64,
}
