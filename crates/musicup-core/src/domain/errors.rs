//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! mostly validation failures of identifiers and addresses.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Uploader identifier is empty or contains whitespace
    #[error("Invalid uploader id: {0:?}")]
    InvalidUploaderId(String),

    /// Hardware address could not be parsed
    #[error("Invalid hardware address: {0:?}")]
    InvalidHardwareAddress(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidUploaderId(String::new());
        assert_eq!(err.to_string(), "Invalid uploader id: \"\"");

        let err = DomainError::InvalidHardwareAddress("zz:00".to_string());
        assert_eq!(err.to_string(), "Invalid hardware address: \"zz:00\"");
    }

    #[test]
    fn test_error_equality() {
        let err1 = DomainError::InvalidUploaderId("a b".to_string());
        let err2 = DomainError::InvalidUploaderId("a b".to_string());
        let err3 = DomainError::InvalidHardwareAddress("a b".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
