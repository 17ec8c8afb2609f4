use thiserror::Error;

/// Errors reading from the tabular store. All of them abort the run.
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("Sheet '{name}' not found")]
    SheetNotFound { name: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, SheetsError>;
