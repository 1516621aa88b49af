//! List organizations command implementation
//!
//! Prints the organizations on the primary organization's shared plan, i.e.
//! exactly the set an export would cover.

use crate::adapters::usage_api::{CircleCiClient, UsageApi};
use crate::cli::{exit_code_for, EXIT_FAILURE, EXIT_SUCCESS};
use crate::config::UsageExportConfig;
use crate::domain::Organization;
use clap::Args;

/// Arguments for the list-orgs command
#[derive(Args, Debug)]
pub struct ListOrgsArgs {}

impl ListOrgsArgs {
    /// Execute the list-orgs command
    pub async fn execute(&self, config: &UsageExportConfig) -> anyhow::Result<i32> {
        tracing::info!(primary_org_id = %config.primary_org_id, "Listing shared plan organizations");

        let client = match CircleCiClient::new(config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to initialize API client: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let orgs = match client.discover_organizations().await {
            Ok(orgs) => orgs,
            Err(e) => {
                crate::log_error_with_context!(&e, "Organization discovery failed");
                eprintln!("Failed to list organizations: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if orgs.is_empty() {
            println!("No organizations found on the shared plan");
            return Ok(EXIT_FAILURE);
        }

        println!("Found {} organizations on the shared plan:", orgs.len());
        println!();
        print!("{}", render_table(&orgs));

        Ok(EXIT_SUCCESS)
    }
}

/// Render organizations as a fixed-width table: index, name, VCS type, id
fn render_table(orgs: &[Organization]) -> String {
    const UNKNOWN: &str = "-";

    let name_width = orgs
        .iter()
        .map(|o| o.name.as_deref().unwrap_or(UNKNOWN).len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let vcs_width = orgs
        .iter()
        .map(|o| o.vcs_type.as_deref().unwrap_or(UNKNOWN).len())
        .max()
        .unwrap_or(0)
        .max("VCS".len());

    let mut out = format!(
        "{:>3}  {:<name_width$}  {:<vcs_width$}  ID\n",
        "#", "NAME", "VCS"
    );
    for (index, org) in orgs.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<name_width$}  {:<vcs_width$}  {}\n",
            index + 1,
            org.name.as_deref().unwrap_or(UNKNOWN),
            org.vcs_type.as_deref().unwrap_or(UNKNOWN),
            org.id
        ));
    }
    out
}
