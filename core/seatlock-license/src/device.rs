//! Device identifiers.
//!
//! Device IDs are client-supplied and not authenticated on their own. They
//! only become meaningful when paired with the live token in the session
//! registry.

use crate::error::{LicenseError, LicenseResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest accepted device ID, in bytes.
pub const MAX_DEVICE_ID_LEN: usize = 128;

/// A validated device identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    /// Validates and normalizes a raw device ID (surrounding whitespace is trimmed).
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidDeviceId`] if the ID is empty, longer than
    /// [`MAX_DEVICE_ID_LEN`] or contains control characters.
    pub fn parse(raw: &str) -> LicenseResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LicenseError::InvalidDeviceId("empty".to_string()));
        }
        if trimmed.len() > MAX_DEVICE_ID_LEN {
            return Err(LicenseError::InvalidDeviceId(format!(
                "longer than {MAX_DEVICE_ID_LEN} bytes"
            )));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(LicenseError::InvalidDeviceId(
                "contains control characters".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeviceId {
    type Error = LicenseError;

    fn try_from(value: String) -> LicenseResult<Self> {
        Self::parse(&value)
    }
}

impl From<DeviceId> for String {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}
