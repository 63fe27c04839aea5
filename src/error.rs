use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Invalid {field} selector '{value}': expected \"All\" or one of [{}]", .available.join(", "))]
    InvalidSelector {
        field: &'static str,
        value: String,
        available: Vec<String>,
    },

    #[error("Invalid generator configuration: {0}")]
    InvalidConfig(String),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
