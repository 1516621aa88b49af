// Usage Export - Shared Plan Usage Report Downloader
// Copyright (c) 2025 Usage Export Contributors
// Licensed under the MIT License

//! # Usage Export
//!
//! Downloads a consolidated compute-usage report for every organization on a
//! CircleCI shared plan.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Discovering** the organizations billed under a primary organization
//! - **Submitting** one asynchronous usage export job covering all of them
//! - **Polling** the job with progressive backoff and a bounded attempt budget
//! - **Retrieving** the gzip reports and decompressing them to CSV
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export workflow (discovery, submission, polling, retrieval)
//! - [`adapters`] - Remote usage API
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use usage_export::adapters::usage_api::CircleCiClient;
//! use usage_export::config::load_config;
//! use usage_export::core::export::ExportPipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // CIRCLE_TOKEN, PRIMARY_ORG_ID, START_DATE and END_DATE come from the environment
//!     let config = load_config(None)?;
//!     let client = Arc::new(CircleCiClient::new(&config)?);
//!
//!     let summary = ExportPipeline::new(config, client)
//!         .execute(chrono::Utc::now())
//!         .await?;
//!
//!     println!("Wrote {} reports", summary.artifacts.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Polling
//!
//! The delay after status check `n` is `min(30s * n, 5 min)` with the default
//! settings, for at most 30 checks. Transient API failures (5xx, 408, 429,
//! timeouts, connection errors) consume an attempt like a non-terminal state
//! does.
//!
//! ## Error Handling
//!
//! All library errors are [`domain::UsageExportError`]:
//!
//! ```rust,no_run
//! use usage_export::domain::UsageExportError;
//!
//! fn example() -> Result<(), UsageExportError> {
//!     let config = usage_export::config::load_config(None)?;
//!     println!("Exporting {}", config.time_range);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
