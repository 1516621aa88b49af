//! Report artifacts written to disk

use serde::Serialize;
use std::path::PathBuf;

/// A downloaded report and its decompressed counterpart
///
/// Written once by the retriever; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportArtifact {
    /// Path of the gzip-compressed download
    pub compressed_path: PathBuf,

    /// Path of the decompressed CSV
    pub decompressed_path: PathBuf,

    /// Size of the compressed download in bytes
    pub byte_size: u64,

    /// Size of the decompressed CSV in bytes
    pub decompressed_size: u64,

    /// Hex-encoded SHA-256 of the compressed download
    pub sha256: String,
}
