//! Core business logic for the usage export.
//!
//! # Export Workflow
//!
//! 1. **Discover**: list the organizations on the primary org's shared plan
//! 2. **Submit**: create one export job covering all of them
//! 3. **Poll**: check job status with progressive backoff until it finishes
//! 4. **Retrieve**: download each gzip report and decompress it
//! 5. **Report**: log and print an export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use usage_export::adapters::usage_api::CircleCiClient;
//! use usage_export::config::load_config;
//! use usage_export::core::export::ExportPipeline;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None)?;
//! let client = Arc::new(CircleCiClient::new(&config)?);
//!
//! let pipeline = ExportPipeline::new(config, client);
//! let summary = pipeline.execute(chrono::Utc::now()).await?;
//!
//! println!("Job: {}", summary.job_id);
//! println!("Artifacts: {}", summary.artifacts.len());
//! # Ok(())
//! # }
//! ```

pub mod export;
