//! Core library surface for the clinic records manager TUI.
//!
//! The public modules exposed here keep the API intentionally small: the
//! `bin` target and any external tooling that reads the same SQLite file can
//! reuse the persistence layer without dragging in the terminal front-end.

pub mod db;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer, used by `main.rs` to
/// initialize the embedded SQLite store and preload the first screen.
pub use db::{ensure_schema, fetch_patients};

/// The domain types other layers manipulate.
pub use models::{Appointment, AppointmentRecord, Doctor, Patient, Totals};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
