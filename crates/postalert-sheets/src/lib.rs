//! Read access to the schedule spreadsheet.
//!
//! [`ScheduleStore`] is the seam the alert run talks to; [`SheetsClient`]
//! implements it over the Google Sheets REST API.

pub mod client;
pub mod error;
pub mod store;

pub use client::SheetsClient;
pub use error::{Result, SheetsError};
pub use store::{load_schedule_rows, ScheduleStore, SheetInfo, ValueRender};
