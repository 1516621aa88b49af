//! Organizations on a shared plan

use super::ids::OrganizationId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An organization returned by shared-plan discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization identifier
    pub id: OrganizationId,

    /// Display name, when the API reports one
    pub name: Option<String>,

    /// Version control provider (e.g. `github`, `bitbucket`, `circleci`)
    pub vcs_type: Option<String>,
}

impl Organization {
    /// Create an organization with only an identifier
    pub fn new(id: OrganizationId) -> Self {
        Self {
            id,
            name: None,
            vcs_type: None,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the VCS type
    pub fn with_vcs_type(mut self, vcs_type: impl Into<String>) -> Self {
        self.vcs_type = Some(vcs_type.into());
        self
    }
}

/// Ordered, deduplicated, non-empty set of organization identifiers
///
/// Order follows first appearance in the discovery response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationSet {
    ids: Vec<OrganizationId>,
}

impl OrganizationSet {
    /// Builds a set from identifiers, dropping later duplicates
    ///
    /// # Returns
    ///
    /// `None` when no identifiers are supplied
    pub fn new(ids: impl IntoIterator<Item = OrganizationId>) -> Option<Self> {
        let mut seen = HashSet::new();
        let ids: Vec<OrganizationId> = ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        if ids.is_empty() {
            None
        } else {
            Some(Self { ids })
        }
    }

    /// Builds a set from discovered organizations
    pub fn from_organizations(orgs: &[Organization]) -> Option<Self> {
        Self::new(orgs.iter().map(|org| org.id.clone()))
    }

    /// Number of distinct organizations
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &OrganizationId> {
        self.ids.iter()
    }

    /// Identifiers as plain strings, in order
    pub fn as_strings(&self) -> Vec<String> {
        self.ids.iter().map(|id| id.as_str().to_string()).collect()
    }
}
