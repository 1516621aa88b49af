//! Usage export API adapter
//!
//! The [`UsageApi`] trait is the seam between the export workflow and the
//! backend; [`CircleCiClient`] is the production implementation.

pub mod circleci;
pub mod models;
mod r#trait;

pub use circleci::CircleCiClient;
pub use r#trait::{ExportRequest, UsageApi};
