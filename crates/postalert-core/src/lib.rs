//! `postalert-core` — configuration, error types, cell coercion and the
//! collaborator traits shared by every other postalert crate.

pub mod clock;
pub mod coerce;
pub mod config;
pub mod error;
pub mod secrets;
pub mod types;

pub use config::PostalertConfig;
pub use error::{AlertError, Result};
pub use types::{AlertReason, AlertTarget, CellValue, ScheduleRow};
