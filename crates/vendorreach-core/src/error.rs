//! Error type shared by every VendorReach crate.

use thiserror::Error;

/// Errors raised around the planning engine (the engine itself never fails).
#[derive(Debug, Error)]
pub enum ReachError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = ReachError::NotFound("vendor v-1".into());
        assert_eq!(e.to_string(), "Not found: vendor v-1");
    }

    #[test]
    fn test_io_conversion() {
        fn read() -> Result<String> {
            Ok(std::fs::read_to_string("/definitely/not/here.toml")?)
        }
        assert!(matches!(read(), Err(ReachError::Io(_))));
    }
}
