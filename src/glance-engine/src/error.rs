//! Error types for the Glance engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for the generation pipeline.
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable not set: {name}")]
    MissingEnv { name: String },

    // Validation errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Network errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote endpoint answered with a non-success status.
    #[error("Upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The endpoint answered 2xx but the body was missing the completion
    /// content (or the image entry) the contract requires.
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// A stage deadline fired. Kept distinct from generic upstream failure
    /// so callers can surface "the model did not answer in time".
    #[error("Request timeout")]
    Timeout,

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check whether this error is the distinguishable timeout kind.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::config("missing API key");
        assert_eq!(err.to_string(), "Configuration error: missing API key");

        let err = EngineError::Upstream {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "Upstream error (502): bad gateway");
    }

    #[test]
    fn test_timeout_is_distinguishable() {
        assert!(EngineError::Timeout.is_timeout());
        assert!(!EngineError::invalid_input("x").is_timeout());
    }
}
