//! Export orchestration
//!
//! This module provides the core export workflow:
//! - Organization discovery
//! - Job submission
//! - Status polling with progressive backoff
//! - Artifact download and decompression
//! - Summary and reporting

pub mod discovery;
pub mod pipeline;
pub mod poll;
pub mod retrieve;
pub mod submit;
pub mod summary;

pub use discovery::discover_organization_set;
pub use pipeline::{ExportPipeline, ExportPlan};
pub use poll::{BackoffPolicy, PollLoop, PollOutcome, RetryState, Sleeper, TokioSleeper};
pub use retrieve::ArtifactRetriever;
pub use submit::JobSubmitter;
pub use summary::ExportSummary;
