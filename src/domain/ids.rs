//! Domain identifier types with validation
//!
//! Newtype wrappers for the opaque identifiers handed out by the usage API.
//! Each type rejects empty input so a blank id never reaches a URL path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Organization identifier newtype wrapper
///
/// # Examples
///
/// ```
/// use usage_export::domain::ids::OrganizationId;
/// use std::str::FromStr;
///
/// let org = OrganizationId::from_str("c0ffee00-1234-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(org.as_str(), "c0ffee00-1234-4bad-97dc-d78268e01398");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrganizationId(String);

impl OrganizationId {
    /// Creates a new OrganizationId, trimming surrounding whitespace
    ///
    /// # Returns
    ///
    /// Returns `Err` if the identifier is empty or only whitespace
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("Organization ID cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the organization ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrganizationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OrganizationId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrganizationId> for String {
    fn from(id: OrganizationId) -> Self {
        id.0
    }
}

impl AsRef<str> for OrganizationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Export job identifier
///
/// Opaque token returned by the job creation call and echoed back on
/// every status query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Creates a new JobId
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Export job ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the job ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for JobId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
