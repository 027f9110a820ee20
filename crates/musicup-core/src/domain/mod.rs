//! Domain entities
//!
//! This module contains the core domain types for music-upload:
//! - Newtypes for validated identifiers
//! - Upload targets and per-file upload outcomes
//! - Domain-specific error types

pub mod errors;
pub mod newtypes;
pub mod upload;

// Re-export commonly used types
pub use errors::DomainError;
pub use newtypes::UploaderId;
pub use upload::{UploadOutcome, UploadStatus, UploadTarget};
