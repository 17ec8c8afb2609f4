//! Author name → Discord mention resolution.

pub mod directory;
pub mod resolver;

pub use directory::NameDirectory;
pub use resolver::{resolve_mention, UNKNOWN_AUTHOR};
