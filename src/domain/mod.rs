//! Domain models and types for the usage exporter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`OrganizationId`], [`JobId`])
//! - **Domain models** ([`TimeRange`], [`OrganizationSet`], [`ExportJob`], [`ReportArtifact`])
//! - **Error types** ([`UsageExportError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, UsageExportError>`]:
//!
//! ```rust
//! use usage_export::domain::{Result, TimeRange};
//!
//! fn example() -> Result<()> {
//!     let range = TimeRange::parse("2024-11-01T00:00:00Z", "2024-11-30T23:59:59Z")?;
//!     assert_eq!(range.date_label(), "2024-11-01_2024-11-30");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod artifact;
pub mod errors;
pub mod ids;
pub mod job;
pub mod organization;
pub mod result;
pub mod time_range;

pub use artifact::ReportArtifact;
pub use errors::{ApiError, UsageExportError};
pub use ids::{JobId, OrganizationId};
pub use job::{ExportJob, JobState, JobStatus};
pub use organization::{Organization, OrganizationSet};
pub use result::Result;
pub use time_range::TimeRange;
