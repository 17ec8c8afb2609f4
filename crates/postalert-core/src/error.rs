use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required secret is absent. The message names the setup command that stores it.
    #[error("Missing secret: {key} (run `postalert setup {setup_arg}` once to store it)")]
    MissingSecret {
        key: String,
        setup_arg: &'static str,
    },

    #[error("Invalid secret value for {key}: {reason}")]
    InvalidSecret { key: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlertError {
    /// Short error code used in structured log fields.
    pub fn code(&self) -> &'static str {
        match self {
            AlertError::Config(_) => "CONFIG_ERROR",
            AlertError::MissingSecret { .. } => "MISSING_SECRET",
            AlertError::InvalidSecret { .. } => "INVALID_SECRET",
            AlertError::Serialization(_) => "SERIALIZATION_ERROR",
            AlertError::Io(_) => "IO_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, AlertError>;
