use thiserror::Error;

use crate::domain::classifier::RemoteClassifierError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error(transparent)]
    Remote(#[from] RemoteClassifierError),

    #[error("No categorization available: {message}")]
    FallbackExhausted { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn fallback_exhausted(message: impl Into<String>) -> Self {
        Self::FallbackExhausted {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_error() {
        let error = DomainError::invalid_input("text is empty");
        assert_eq!(error.to_string(), "Invalid input: text is empty");
    }

    #[test]
    fn test_cache_error() {
        let error = DomainError::cache("connection refused");
        assert_eq!(error.to_string(), "Cache error: connection refused");
    }

    #[test]
    fn test_remote_error_passthrough() {
        let error: DomainError = RemoteClassifierError::unavailable("timed out").into();
        assert!(error.to_string().contains("timed out"));
    }
}
