//! Error types for the benchmark and parity harness.

use thiserror::Error;

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness.
#[derive(Error, Debug)]
pub enum Error {
    /// Scenario setup errors (directory creation, schema copy)
    #[error("Setup error: {0}")]
    Setup(String),

    /// Workload generation errors
    #[error("Workload error: {0}")]
    Workload(String),

    /// Generator subprocess errors
    #[error("Generator error: {program}: {message}")]
    Subprocess { program: String, message: String },

    /// Output artifact verification errors
    #[error("Verification error: {0}")]
    Verification(String),

    /// Scenario directory cleanup errors
    #[error("Cleanup error: {0}")]
    Cleanup(String),

    /// Parity driver errors (discovery, golden reads)
    #[error("Parity error: {0}")]
    Parity(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] Box<std::io::Error>),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] Box<serde_json::Error>),

    /// Run interrupted by a cancellation signal
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a setup error.
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup(message.into())
    }

    /// Create a workload generation error.
    pub fn workload(message: impl Into<String>) -> Self {
        Self::Workload(message.into())
    }

    /// Create a subprocess error.
    pub fn subprocess(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Subprocess {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Create a verification error.
    pub fn verification(message: impl Into<String>) -> Self {
        Self::Verification(message.into())
    }

    /// Create a cleanup error.
    pub fn cleanup(message: impl Into<String>) -> Self {
        Self::Cleanup(message.into())
    }

    /// Create a parity error.
    pub fn parity(message: impl Into<String>) -> Self {
        Self::Parity(message.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(Box::new(value))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(Box::new(value))
    }
}
