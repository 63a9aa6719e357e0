//! Patient directory entries and service status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque patient identifier as listed by the scoring service.
///
/// The service reports integer row ids; they are kept as text so the client
/// never has to care about the backing store's key type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PatientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Result of the service health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    /// Number of patient records the service has loaded.
    #[serde(default)]
    pub records: u64,
}

impl ServiceHealth {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
