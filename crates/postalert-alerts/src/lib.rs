//! Deciding which schedule rows are not ready and rendering the alert text.

pub mod compose;
pub mod evaluate;

pub use compose::{compose_message, row_link};
pub use evaluate::{classify, collect_targets, evaluate_row};
