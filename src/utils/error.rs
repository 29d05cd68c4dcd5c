use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {after_ms}ms: {operation}")]
    Timeout { operation: String, after_ms: u64 },

    #[error("Probe error: {endpoint}: {message}")]
    Probe { endpoint: String, message: String },

    #[error("Invalid selector: {selector}")]
    Selector { selector: String },

    #[error("Source error: {source_name}: {message}")]
    Source { source_name: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn timeout(operation: impl Into<String>, after: std::time::Duration) -> Self {
        AppError::Timeout {
            operation: operation.into(),
            after_ms: after.as_millis() as u64,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_source_error() {
        let err = AppError::Source {
            source_name: "OKX".to_string(),
            message: "no session".to_string(),
        };
        assert_eq!(err.to_string(), "Source error: OKX: no session");
    }

    #[test]
    fn test_timeout_error() {
        let err = AppError::timeout("navigate https://example.com", Duration::from_secs(2));
        assert_eq!(err.to_string(), "Timed out after 2000ms: navigate https://example.com");
    }

    #[test]
    fn test_selector_error() {
        let err = AppError::Selector {
            selector: "div >".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid selector: div >");
    }
}
