//! Error types and handling.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Attendance batch contained no employees
    #[error("Empty batch: no employee data was supplied")]
    EmptyBatch,

    /// Attendance batch is not a recognizable list of employees
    #[error("Invalid batch: {0}")]
    InvalidBatch(String),

    /// Unexpected failure while assembling the report grid
    #[error("Build error: {0}")]
    Build(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream attendance service unavailable and no fallback could be used
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// JSON decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read, parsed or written
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Excel export error
    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create an invalid batch error with message
    pub fn invalid_batch(msg: impl Into<String>) -> Self {
        Self::InvalidBatch(msg.into())
    }

    /// Create a build error with message
    pub fn build(msg: impl Into<String>) -> Self {
        Self::Build(msg.into())
    }

    /// Create an upstream error with message
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// HTTP-style status code a calling layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyBatch => 400,
            Self::InvalidBatch(_) | Self::Json(_) => 422,
            Self::Http(_) | Self::Upstream(_) => 503,
            Self::Build(_) | Self::Io(_) | Self::Config(_) | Self::Export(_) => 500,
        }
    }

    /// Whether the caller supplied unusable input.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}
