//! Organization discovery

use crate::adapters::usage_api::UsageApi;
use crate::domain::{OrganizationSet, Result, UsageExportError};

/// Resolve the organizations on the shared plan into an [`OrganizationSet`]
///
/// # Errors
///
/// Returns [`UsageExportError::Discovery`] if the listing call fails or
/// yields no organizations. Malformed responses propagate unchanged.
pub async fn discover_organization_set(api: &dyn UsageApi) -> Result<OrganizationSet> {
    let orgs = api.discover_organizations().await.map_err(|e| match e {
        UsageExportError::Api(source) => UsageExportError::Discovery(source.to_string()),
        other => other,
    })?;

    let set = OrganizationSet::from_organizations(&orgs).ok_or_else(|| {
        UsageExportError::Discovery("no organizations found on the shared plan".to_string())
    })?;

    if set.len() < orgs.len() {
        tracing::debug!(
            listed = orgs.len(),
            distinct = set.len(),
            "Dropped duplicate organization ids"
        );
    }

    tracing::info!(count = set.len(), "Found organizations on the shared plan");
    Ok(set)
}
