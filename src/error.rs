
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Unexpected or selector nested inside another one, at this point they should have been all flattened")]
    NestedDisjunction,
    #[error("Predicate error: {message}")]
    Predicate { message: String },
    #[error("Range error: {message}")]
    Range { message: String },
    #[error("I/O error: {0}")]
    Io(String),
    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, CoverageError>;

impl CoverageError {
    pub fn predicate(message: impl Into<String>) -> Self { Self::Predicate { message: message.into() } }
    pub fn range(message: impl Into<String>) -> Self { Self::Range { message: message.into() } }
}

// Helper conversions
impl From<std::io::Error> for CoverageError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
impl From<serde_json::Error> for CoverageError {
    fn from(e: serde_json::Error) -> Self { Self::Json(e.to_string()) }
}
impl From<::config::ConfigError> for CoverageError {
    fn from(e: ::config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
