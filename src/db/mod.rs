//! Persistence module split across logical submodules.

mod appointments;
mod connection;
mod doctors;
mod patients;

pub use appointments::{
    count_appointments, fetch_appointments, fetch_raw_appointments, schedule_appointment,
};
pub use connection::{apply_schema, ensure_schema};
pub use doctors::{count_doctors, create_doctor, fetch_doctors};
pub use patients::{count_patients, create_patient, fetch_patients};
