//! Export command implementation
//!
//! This module implements the `export` command: one usage export job covering
//! every organization on the shared plan, downloaded into the report directory.

use crate::adapters::usage_api::{CircleCiClient, UsageApi};
use crate::cli::{exit_code_for, EXIT_SUCCESS};
use crate::config::UsageExportConfig;
use crate::core::export::{ExportPipeline, ExportSummary};
use clap::Args;
use std::sync::Arc;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Dry run mode - discover organizations and show the request without creating a job
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config: &UsageExportConfig) -> anyhow::Result<i32> {
        tracing::info!(dry_run = self.dry_run, "Starting export command");

        let client = match CircleCiClient::new(config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create API client");
                eprintln!("Failed to initialize export: {e}");
                return Ok(exit_code_for(&e));
            }
        };
        let api: Arc<dyn UsageApi> = Arc::new(client);
        let pipeline = ExportPipeline::new(config.clone(), api);

        if self.dry_run {
            return self.execute_dry_run(&pipeline).await;
        }

        println!("🚀 Starting usage export for {}", config.time_range);
        println!();

        let summary = match pipeline.execute(chrono::Utc::now()).await {
            Ok(s) => s,
            Err(e) => {
                crate::log_error_with_context!(&e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_summary(&summary);
        Ok(EXIT_SUCCESS)
    }

    async fn execute_dry_run(&self, pipeline: &ExportPipeline) -> anyhow::Result<i32> {
        tracing::info!("Dry run mode enabled - no export job will be created");
        println!("🔍 DRY RUN MODE - No export job will be created");
        println!();

        let plan = match pipeline.plan().await {
            Ok(p) => p,
            Err(e) => {
                crate::log_error_with_context!(&e, "Organization discovery failed");
                eprintln!("Dry run failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let request = plan.request();
        tracing::info!(
            start = %request.time_range.start_wire(),
            end = %request.time_range.end_wire(),
            organization_count = request.organizations.len(),
            "Would submit usage export job"
        );

        println!("Export Request:");
        println!("  Start: {}", request.time_range.start_wire());
        println!("  End: {}", request.time_range.end_wire());
        println!("  Organizations: {}", request.organizations.len());
        for org_id in request.organizations.iter() {
            println!("    - {org_id}");
        }

        Ok(EXIT_SUCCESS)
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Job ID: {}", summary.job_id);
    println!("  Time Range: {}", summary.time_range);
    println!("  Organizations: {}", summary.organization_count);
    println!(
        "  Status Checks: {} ({}s waiting)",
        summary.poll_attempts,
        summary.total_wait.as_secs()
    );
    println!("  Downloaded: {} bytes", summary.total_bytes());
    println!("  Decompressed: {} bytes", summary.total_decompressed_bytes());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();
    println!("📁 Reports:");
    for artifact in &summary.artifacts {
        println!("  - {}", artifact.compressed_path.display());
        println!("  - {}", artifact.decompressed_path.display());
        println!("    sha256: {}", artifact.sha256);
    }
    println!();
    println!("✅ Export completed successfully");
}
