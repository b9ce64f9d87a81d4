//! # Errors
//!
//! Failure taxonomy shared by every store and engine. Each variant is handled
//! at the UI event that triggered it; none of them abort the session.

use thiserror::Error;

/// Errors raised by catalog, reservation, checkout and suggestion operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SwapError {
    /// Malformed or missing user input. No state was changed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced item, locker or blob does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Credit balance cannot cover the requested payment
    #[error("insufficient credits: {required} required, {available} available")]
    InsufficientCredits { required: u64, available: u64 },

    /// Static reference data is missing (e.g. empty locker directory)
    #[error("configuration error: {0}")]
    Config(String),

    /// The hosted suggestion service failed
    #[error("suggestion service error: {0}")]
    Service(String),

    /// Image blob could not be written or read
    #[error("storage error: {0}")]
    Storage(String),
}

impl SwapError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Stable snake_case tag used by API responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::InsufficientCredits { .. } => "insufficient_credits",
            Self::Config(_) => "config",
            Self::Service(_) => "service",
            Self::Storage(_) => "storage",
        }
    }
}

pub type Result<T> = std::result::Result<T, SwapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_credits_message() {
        let err = SwapError::InsufficientCredits {
            required: 15,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient credits: 15 required, 10 available"
        );
        assert_eq!(err.kind(), "insufficient_credits");
    }
}
