use chrono::NaiveDate;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use thiserror::Error;

use crate::models::{Doctor, DoctorDraft, Patient, PatientDraft};

/// Choices offered by the gender selector. The column stores free text, so
/// this list is a form affordance, not a constraint.
pub(crate) const GENDER_OPTIONS: &[&str] = &["Male", "Female", "Other"];

/// Upper bound the age widget enforces. Storage itself accepts any integer.
const AGE_WIDGET_MAX: i64 = 120;
/// Upper bound the experience widget enforces.
const EXPERIENCE_WIDGET_MAX: i64 = 40;

/// Failures produced while turning form text into typed values. These are
/// widget-level rejections; the storage contract underneath validates
/// nothing.
#[derive(Debug, Error)]
pub(crate) enum FormError {
    #[error("Age must be a whole number between 0 and 120.")]
    AgeOutOfRange,
    #[error("Experience must be a whole number between 0 and 40.")]
    ExperienceOutOfRange,
    #[error("Date must be a calendar date like 2024-06-01.")]
    InvalidDate,
    #[error("No patient selected.")]
    NoPatientSelected,
    #[error("No doctor selected.")]
    NoDoctorSelected,
}

/// Render one form row: a label prefix plus the current value or a dimmed
/// placeholder, highlighted when the field has focus.
fn field_line(label: &str, value: &str, placeholder: &str, active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };

    let style = if active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(display, style),
    ])
}

/// Render a selector row. The angle brackets signal that Up/Down cycles the
/// value instead of typing into it.
fn picker_line(label: &str, value: &str, active: bool) -> Line<'static> {
    let style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let display = if active {
        format!("< {value} >")
    } else {
        value.to_string()
    };

    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(display, style),
    ])
}

/// Fields of the patient registration form, in traversal order.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum PatientField {
    #[default]
    Name,
    Age,
    Gender,
    Diagnosis,
    EmergencyContact,
    InsuranceProvider,
    InsuranceNumber,
}

impl PatientField {
    const ORDER: &'static [PatientField] = &[
        PatientField::Name,
        PatientField::Age,
        PatientField::Gender,
        PatientField::Diagnosis,
        PatientField::EmergencyContact,
        PatientField::InsuranceProvider,
        PatientField::InsuranceNumber,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            PatientField::Name => "Name",
            PatientField::Age => "Age",
            PatientField::Gender => "Gender",
            PatientField::Diagnosis => "Diagnosis",
            PatientField::EmergencyContact => "Emergency Contact",
            PatientField::InsuranceProvider => "Insurance Provider",
            PatientField::InsuranceNumber => "Insurance Number",
        }
    }

    /// Row index inside the modal, used for cursor placement.
    pub(crate) fn row(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn neighbor(self, offset: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let current = self.row() as isize;
        let next = (current + offset).rem_euclid(len) as usize;
        Self::ORDER[next]
    }
}

/// State machine behind the "Add Patient" modal. Text fields append and
/// backspace only; the gender row is a cycling selector.
#[derive(Default, Clone)]
pub(crate) struct PatientForm {
    pub(crate) name: String,
    pub(crate) age: String,
    pub(crate) gender: usize,
    pub(crate) diagnosis: String,
    pub(crate) emergency_contact: String,
    pub(crate) insurance_provider: String,
    pub(crate) insurance_number: String,
    pub(crate) active: PatientField,
    pub(crate) error: Option<String>,
}

impl PatientForm {
    /// Move focus to the next field in traversal order.
    pub(crate) fn next_field(&mut self) {
        self.active = self.active.neighbor(1);
    }

    /// Move focus to the previous field.
    pub(crate) fn prev_field(&mut self) {
        self.active = self.active.neighbor(-1);
    }

    /// Append a character to the focused field. The age row only takes
    /// digits; the gender row takes no typed input at all.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            PatientField::Name => self.name.push(ch),
            PatientField::Age => {
                if !ch.is_ascii_digit() {
                    return false;
                }
                self.age.push(ch);
            }
            PatientField::Gender => return false,
            PatientField::Diagnosis => self.diagnosis.push(ch),
            PatientField::EmergencyContact => self.emergency_contact.push(ch),
            PatientField::InsuranceProvider => self.insurance_provider.push(ch),
            PatientField::InsuranceNumber => self.insurance_number.push(ch),
        }
        true
    }

    /// Remove the last character from the focused field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            PatientField::Name => {
                self.name.pop();
            }
            PatientField::Age => {
                self.age.pop();
            }
            PatientField::Gender => {}
            PatientField::Diagnosis => {
                self.diagnosis.pop();
            }
            PatientField::EmergencyContact => {
                self.emergency_contact.pop();
            }
            PatientField::InsuranceProvider => {
                self.insurance_provider.pop();
            }
            PatientField::InsuranceNumber => {
                self.insurance_number.pop();
            }
        }
    }

    /// Cycle the gender selector. No-op while a text field has focus.
    pub(crate) fn cycle_option(&mut self, offset: isize) {
        if self.active == PatientField::Gender {
            let len = GENDER_OPTIONS.len() as isize;
            self.gender = ((self.gender as isize + offset).rem_euclid(len)) as usize;
        }
    }

    /// Turn the form text into an insertable draft. The only rejections here
    /// are the widgets' own bounds; an empty name sails through because
    /// registration never required one.
    pub(crate) fn parse_inputs(&self) -> Result<PatientDraft, FormError> {
        let age_raw = self.age.trim();
        let age = if age_raw.is_empty() {
            0
        } else {
            age_raw.parse::<i64>().map_err(|_| FormError::AgeOutOfRange)?
        };
        if age > AGE_WIDGET_MAX {
            return Err(FormError::AgeOutOfRange);
        }

        let optional = |value: &str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        Ok(PatientDraft {
            name: self.name.trim().to_string(),
            age,
            gender: GENDER_OPTIONS[self.gender].to_string(),
            diagnosis: self.diagnosis.trim().to_string(),
            emergency_contact: self.emergency_contact.trim().to_string(),
            insurance_provider: optional(&self.insurance_provider),
            insurance_number: optional(&self.insurance_number),
        })
    }

    /// Render the modal body, one row per field.
    pub(crate) fn build_lines(&self) -> Vec<Line<'static>> {
        PatientField::ORDER
            .iter()
            .map(|field| {
                let active = self.active == *field;
                match field {
                    PatientField::Gender => {
                        picker_line(field.label(), GENDER_OPTIONS[self.gender], active)
                    }
                    PatientField::InsuranceProvider | PatientField::InsuranceNumber => {
                        field_line(field.label(), self.value_of(*field), "<optional>", active)
                    }
                    _ => field_line(field.label(), self.value_of(*field), "<blank>", active),
                }
            })
            .collect()
    }

    fn value_of(&self, field: PatientField) -> &str {
        match field {
            PatientField::Name => &self.name,
            PatientField::Age => &self.age,
            PatientField::Gender => GENDER_OPTIONS[self.gender],
            PatientField::Diagnosis => &self.diagnosis,
            PatientField::EmergencyContact => &self.emergency_contact,
            PatientField::InsuranceProvider => &self.insurance_provider,
            PatientField::InsuranceNumber => &self.insurance_number,
        }
    }

    /// Cursor position within the modal, or None while the selector row has
    /// focus (nothing to type there).
    pub(crate) fn cursor(&self) -> Option<(u16, u16)> {
        if self.active == PatientField::Gender {
            return None;
        }
        let prefix = self.active.label().chars().count() + 2;
        let len = self.value_of(self.active).chars().count();
        Some(((prefix + len) as u16, self.active.row() as u16))
    }
}

/// Fields of the doctor registration form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum DoctorField {
    #[default]
    Name,
    Specialization,
    Experience,
}

impl DoctorField {
    const ORDER: &'static [DoctorField] = &[
        DoctorField::Name,
        DoctorField::Specialization,
        DoctorField::Experience,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            DoctorField::Name => "Doctor Name",
            DoctorField::Specialization => "Specialization",
            DoctorField::Experience => "Experience (Years)",
        }
    }

    pub(crate) fn row(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn neighbor(self, offset: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let next = (self.row() as isize + offset).rem_euclid(len) as usize;
        Self::ORDER[next]
    }
}

/// State machine behind the "Register Doctor" modal.
#[derive(Clone)]
pub(crate) struct DoctorForm {
    pub(crate) name: String,
    pub(crate) specialization: String,
    pub(crate) experience: String,
    pub(crate) active: DoctorField,
    pub(crate) error: Option<String>,
}

impl DoctorForm {
    /// Fresh form with the experience field pre-seeded to a middling value so
    /// a quick Enter still records something plausible.
    pub(crate) fn new() -> Self {
        Self {
            name: String::new(),
            specialization: String::new(),
            experience: "5".to_string(),
            active: DoctorField::Name,
            error: None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.neighbor(1);
    }

    pub(crate) fn prev_field(&mut self) {
        self.active = self.active.neighbor(-1);
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            DoctorField::Name => self.name.push(ch),
            DoctorField::Specialization => self.specialization.push(ch),
            DoctorField::Experience => {
                if !ch.is_ascii_digit() {
                    return false;
                }
                self.experience.push(ch);
            }
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            DoctorField::Name => {
                self.name.pop();
            }
            DoctorField::Specialization => {
                self.specialization.pop();
            }
            DoctorField::Experience => {
                self.experience.pop();
            }
        }
    }

    pub(crate) fn parse_inputs(&self) -> Result<DoctorDraft, FormError> {
        let experience_raw = self.experience.trim();
        let experience = if experience_raw.is_empty() {
            0
        } else {
            experience_raw
                .parse::<i64>()
                .map_err(|_| FormError::ExperienceOutOfRange)?
        };
        if experience > EXPERIENCE_WIDGET_MAX {
            return Err(FormError::ExperienceOutOfRange);
        }

        Ok(DoctorDraft {
            name: self.name.trim().to_string(),
            specialization: self.specialization.trim().to_string(),
            experience,
        })
    }

    pub(crate) fn build_lines(&self) -> Vec<Line<'static>> {
        DoctorField::ORDER
            .iter()
            .map(|field| field_line(field.label(), self.value_of(*field), "<blank>", self.active == *field))
            .collect()
    }

    fn value_of(&self, field: DoctorField) -> &str {
        match field {
            DoctorField::Name => &self.name,
            DoctorField::Specialization => &self.specialization,
            DoctorField::Experience => &self.experience,
        }
    }

    pub(crate) fn cursor(&self) -> Option<(u16, u16)> {
        let prefix = self.active.label().chars().count() + 2;
        let len = self.value_of(self.active).chars().count();
        Some(((prefix + len) as u16, self.active.row() as u16))
    }
}

/// Fields of the scheduling form: two identity pickers and a typed date.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum AppointmentField {
    #[default]
    Patient,
    Doctor,
    Date,
}

impl AppointmentField {
    const ORDER: &'static [AppointmentField] = &[
        AppointmentField::Patient,
        AppointmentField::Doctor,
        AppointmentField::Date,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            AppointmentField::Patient => "Patient",
            AppointmentField::Doctor => "Doctor",
            AppointmentField::Date => "Date (YYYY-MM-DD)",
        }
    }

    pub(crate) fn row(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn neighbor(self, offset: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let next = (self.row() as isize + offset).rem_euclid(len) as usize;
        Self::ORDER[next]
    }
}

/// State machine behind the "Schedule Appointment" modal. The pickers carry
/// `(id, label)` pairs captured from a fresh roster read when the form
/// opened; submitting sends identities, so two patients sharing a name stay
/// distinguishable.
#[derive(Clone)]
pub(crate) struct AppointmentForm {
    patients: Vec<(i64, String)>,
    doctors: Vec<(i64, String)>,
    patient_idx: usize,
    doctor_idx: usize,
    pub(crate) date: String,
    pub(crate) active: AppointmentField,
    pub(crate) error: Option<String>,
}

impl AppointmentForm {
    /// Build the pickers from roster snapshots. Callers guard against empty
    /// rosters before opening the form; the parse step re-checks anyway.
    pub(crate) fn new(patients: &[Patient], doctors: &[Doctor]) -> Self {
        Self {
            patients: patients
                .iter()
                .map(|p| (p.id, format!("#{} {}", p.id, p.display_name())))
                .collect(),
            doctors: doctors
                .iter()
                .map(|d| (d.id, format!("#{} {}", d.id, d.display_name())))
                .collect(),
            patient_idx: 0,
            doctor_idx: 0,
            date: String::new(),
            active: AppointmentField::Patient,
            error: None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.neighbor(1);
    }

    pub(crate) fn prev_field(&mut self) {
        self.active = self.active.neighbor(-1);
    }

    /// Cycle the focused picker. No-op while the date field has focus.
    pub(crate) fn cycle_option(&mut self, offset: isize) {
        match self.active {
            AppointmentField::Patient => {
                if !self.patients.is_empty() {
                    let len = self.patients.len() as isize;
                    self.patient_idx =
                        ((self.patient_idx as isize + offset).rem_euclid(len)) as usize;
                }
            }
            AppointmentField::Doctor => {
                if !self.doctors.is_empty() {
                    let len = self.doctors.len() as isize;
                    self.doctor_idx =
                        ((self.doctor_idx as isize + offset).rem_euclid(len)) as usize;
                }
            }
            AppointmentField::Date => {}
        }
    }

    /// The date field takes digits and dashes only.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if self.active != AppointmentField::Date {
            return false;
        }
        if ch.is_ascii_digit() || ch == '-' {
            self.date.push(ch);
            true
        } else {
            false
        }
    }

    pub(crate) fn backspace(&mut self) {
        if self.active == AppointmentField::Date {
            self.date.pop();
        }
    }

    /// Resolve the picked identities and check the date is a real calendar
    /// date in `YYYY-MM-DD` form before it is stored as text.
    pub(crate) fn parse_inputs(&self) -> Result<(i64, i64, String), FormError> {
        let (patient_id, _) = self
            .patients
            .get(self.patient_idx)
            .ok_or(FormError::NoPatientSelected)?;
        let (doctor_id, _) = self
            .doctors
            .get(self.doctor_idx)
            .ok_or(FormError::NoDoctorSelected)?;

        let date = self.date.trim();
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| FormError::InvalidDate)?;

        Ok((*patient_id, *doctor_id, date.to_string()))
    }

    /// Label of the doctor currently picked, for the booking status message.
    pub(crate) fn selected_doctor_label(&self) -> Option<&str> {
        self.doctors.get(self.doctor_idx).map(|(_, label)| label.as_str())
    }

    pub(crate) fn build_lines(&self) -> Vec<Line<'static>> {
        let patient_label = self
            .patients
            .get(self.patient_idx)
            .map(|(_, label)| label.as_str())
            .unwrap_or("<none>");
        let doctor_label = self
            .doctors
            .get(self.doctor_idx)
            .map(|(_, label)| label.as_str())
            .unwrap_or("<none>");

        vec![
            picker_line(
                AppointmentField::Patient.label(),
                patient_label,
                self.active == AppointmentField::Patient,
            ),
            picker_line(
                AppointmentField::Doctor.label(),
                doctor_label,
                self.active == AppointmentField::Doctor,
            ),
            field_line(
                AppointmentField::Date.label(),
                &self.date,
                "<required>",
                self.active == AppointmentField::Date,
            ),
        ]
    }

    pub(crate) fn cursor(&self) -> Option<(u16, u16)> {
        if self.active != AppointmentField::Date {
            return None;
        }
        let prefix = AppointmentField::Date.label().chars().count() + 2;
        let len = self.date.chars().count();
        Some(((prefix + len) as u16, self.active.row() as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Doctor, Patient};

    fn sample_patient(id: i64, name: &str) -> Patient {
        Patient {
            id,
            name: name.to_string(),
            age: 34,
            gender: "Female".to_string(),
            diagnosis: String::new(),
            emergency_contact: String::new(),
            insurance_provider: None,
            insurance_number: None,
        }
    }

    fn sample_doctor(id: i64, name: &str) -> Doctor {
        Doctor {
            id,
            name: name.to_string(),
            specialization: "Cardiology".to_string(),
            experience: 12,
        }
    }

    #[test]
    fn patient_form_accepts_empty_name() {
        let form = PatientForm::default();
        let draft = form.parse_inputs().unwrap();
        assert_eq!(draft.name, "");
        assert_eq!(draft.age, 0);
        assert_eq!(draft.gender, "Male");
    }

    #[test]
    fn patient_age_field_is_digit_gated() {
        let mut form = PatientForm::default();
        form.active = PatientField::Age;
        assert!(!form.push_char('x'));
        assert!(form.push_char('3'));
        assert!(form.push_char('4'));
        assert_eq!(form.age, "34");
        assert_eq!(form.parse_inputs().unwrap().age, 34);
    }

    #[test]
    fn patient_age_beyond_widget_bound_is_rejected() {
        let mut form = PatientForm::default();
        form.age = "121".to_string();
        assert!(matches!(
            form.parse_inputs(),
            Err(FormError::AgeOutOfRange)
        ));
    }

    #[test]
    fn blank_insurance_becomes_none() {
        let mut form = PatientForm::default();
        form.insurance_provider = "   ".to_string();
        form.insurance_number = "AH-2291".to_string();
        let draft = form.parse_inputs().unwrap();
        assert_eq!(draft.insurance_provider, None);
        assert_eq!(draft.insurance_number.as_deref(), Some("AH-2291"));
    }

    #[test]
    fn gender_selector_cycles_and_wraps() {
        let mut form = PatientForm::default();
        form.active = PatientField::Gender;
        form.cycle_option(1);
        assert_eq!(form.parse_inputs().unwrap().gender, "Female");
        form.cycle_option(-2);
        assert_eq!(form.parse_inputs().unwrap().gender, "Other");
    }

    #[test]
    fn doctor_experience_defaults_to_slider_start() {
        let form = DoctorForm::new();
        assert_eq!(form.parse_inputs().unwrap().experience, 5);
    }

    #[test]
    fn doctor_experience_beyond_widget_bound_is_rejected() {
        let mut form = DoctorForm::new();
        form.experience = "41".to_string();
        assert!(matches!(
            form.parse_inputs(),
            Err(FormError::ExperienceOutOfRange)
        ));
    }

    #[test]
    fn appointment_form_submits_identities_not_names() {
        let patients = vec![
            sample_patient(1, "Jane Doe"),
            sample_patient(2, "Jane Doe"),
        ];
        let doctors = vec![sample_doctor(7, "Dr. Smith")];
        let mut form = AppointmentForm::new(&patients, &doctors);
        form.cycle_option(1);
        form.date = "2024-06-01".to_string();

        let (patient_id, doctor_id, date) = form.parse_inputs().unwrap();
        assert_eq!(patient_id, 2);
        assert_eq!(doctor_id, 7);
        assert_eq!(date, "2024-06-01");
    }

    #[test]
    fn appointment_date_shape_is_validated() {
        let patients = vec![sample_patient(1, "Jane Doe")];
        let doctors = vec![sample_doctor(7, "Dr. Smith")];
        let mut form = AppointmentForm::new(&patients, &doctors);

        form.date = "June 1st".to_string();
        assert!(matches!(form.parse_inputs(), Err(FormError::InvalidDate)));

        form.date = "2024-13-40".to_string();
        assert!(matches!(form.parse_inputs(), Err(FormError::InvalidDate)));

        form.date = "2024-06-01".to_string();
        assert!(form.parse_inputs().is_ok());
    }

    #[test]
    fn date_field_rejects_letters() {
        let patients = vec![sample_patient(1, "Jane Doe")];
        let doctors = vec![sample_doctor(7, "Dr. Smith")];
        let mut form = AppointmentForm::new(&patients, &doctors);
        form.active = AppointmentField::Date;
        assert!(!form.push_char('j'));
        assert!(form.push_char('2'));
        assert!(form.push_char('-'));
        assert_eq!(form.date, "2-");
    }
}
