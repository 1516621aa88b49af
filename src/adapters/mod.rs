//! External system integrations.
//!
//! - [`usage_api`] - the remote usage export API (organization discovery,
//!   job creation, job status, artifact download)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the export
//! workflow can be driven by scripted fakes in tests:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use usage_export::adapters::usage_api::{CircleCiClient, UsageApi};
//! use usage_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None)?;
//! let api: Arc<dyn UsageApi> = Arc::new(CircleCiClient::new(&config)?);
//! println!("Using {}", api.base_url());
//! # Ok(())
//! # }
//! ```

pub mod usage_api;
