//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// UploaderId
// ============================================================================

/// Identifier presented to the remote service to label this uploading device
///
/// Either supplied by the caller verbatim or derived from a hardware
/// address, in which case it is the upper-case colon-separated hex form
/// (e.g. `"00:1A:2B:3C:4D:5E"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UploaderId(String);

impl UploaderId {
    /// Create a new UploaderId
    ///
    /// # Errors
    /// Returns error if the id is empty or contains whitespace
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidUploaderId(id));
        }
        Ok(Self(id))
    }

    /// Build an UploaderId from raw hardware address bytes
    ///
    /// # Errors
    /// Returns error if the address is empty or all zeros
    pub fn from_hardware_address(bytes: &[u8]) -> Result<Self, DomainError> {
        let formatted = bytes
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(":");

        if bytes.is_empty() || bytes.iter().all(|b| *b == 0) {
            return Err(DomainError::InvalidHardwareAddress(formatted));
        }

        Ok(Self(formatted))
    }

    /// Parse a textual hardware address (`aa:bb:cc:dd:ee:ff` or
    /// `aa-bb-cc-dd-ee-ff`) into an upper-cased UploaderId
    ///
    /// # Errors
    /// Returns error if any octet is not two hex digits, or the address is all zeros
    pub fn from_hardware_str(address: &str) -> Result<Self, DomainError> {
        let address = address.trim();
        let invalid = || DomainError::InvalidHardwareAddress(address.to_string());

        let bytes = address
            .split([':', '-'])
            .map(|octet| {
                if octet.len() != 2 {
                    return Err(invalid());
                }
                u8::from_str_radix(octet, 16).map_err(|_| invalid())
            })
            .collect::<Result<Vec<u8>, _>>()?;

        Self::from_hardware_address(&bytes)
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UploaderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UploaderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UploaderId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<UploaderId> for String {
    fn from(id: UploaderId) -> Self {
        id.0
    }
}
