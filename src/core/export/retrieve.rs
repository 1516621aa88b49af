//! Report artifact retrieval
//!
//! Downloads every artifact of a completed job, persists the gzip stream and
//! decompresses it next to it. Files are written under a `.partial` suffix and
//! renamed only once complete, so an interrupted run never leaves a file that
//! looks finished.

use crate::adapters::usage_api::UsageApi;
use crate::config::OutputConfig;
use crate::domain::{ReportArtifact, Result, TimeRange, UsageExportError};
use chrono::{DateTime, Utc};
use flate2::read::MultiGzDecoder;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const PARTIAL_SUFFIX: &str = "partial";

/// Fetches and unpacks report artifacts
pub struct ArtifactRetriever {
    api: Arc<dyn UsageApi>,
    output: OutputConfig,
}

impl ArtifactRetriever {
    /// Create a retriever writing into `output.report_dir`
    pub fn new(api: Arc<dyn UsageApi>, output: OutputConfig) -> Self {
        Self { api, output }
    }

    /// Base file name (without extensions) for one artifact
    ///
    /// `{prefix}_{run timestamp}_{start date}_{end date}`, with `_partN`
    /// appended when the job produced more than one artifact.
    pub fn base_name(
        &self,
        run_started: DateTime<Utc>,
        time_range: &TimeRange,
        index: usize,
        total: usize,
    ) -> String {
        let mut name = format!(
            "{}_{}_{}",
            self.output.filename_prefix,
            run_started.format("%Y%m%d_%H%M%S"),
            time_range.date_label()
        );
        if total > 1 {
            name.push_str(&format!("_part{}", index + 1));
        }
        name
    }

    /// Retrieve all artifacts; a failure on any one fails the step
    ///
    /// # Errors
    ///
    /// Returns [`UsageExportError::Artifact`] if the URL list is empty, a
    /// download fails, the payload is not gzip, a target file already exists,
    /// or decompression fails.
    pub async fn retrieve(
        &self,
        urls: &[String],
        time_range: &TimeRange,
        run_started: DateTime<Utc>,
    ) -> Result<Vec<ReportArtifact>> {
        if urls.is_empty() {
            return Err(UsageExportError::Artifact(
                "no download URLs to retrieve".to_string(),
            ));
        }

        tokio::fs::create_dir_all(&self.output.report_dir)
            .await
            .map_err(|e| {
                UsageExportError::Artifact(format!(
                    "failed to create report directory {}: {e}",
                    self.output.report_dir.display()
                ))
            })?;

        let mut artifacts = Vec::with_capacity(urls.len());
        for (index, url) in urls.iter().enumerate() {
            let base = self.base_name(run_started, time_range, index, urls.len());
            let artifact = self
                .retrieve_one(url, &base, index + 1, urls.len())
                .await?;
            artifacts.push(artifact);
        }

        Ok(artifacts)
    }

    async fn retrieve_one(
        &self,
        url: &str,
        base: &str,
        part: usize,
        total: usize,
    ) -> Result<ReportArtifact> {
        let compressed_path = self.output.report_dir.join(format!("{base}.csv.gz"));
        let decompressed_path = self.output.report_dir.join(format!("{base}.csv"));

        for path in [&compressed_path, &decompressed_path] {
            if path.exists() {
                return Err(UsageExportError::Artifact(format!(
                    "refusing to overwrite existing report {}",
                    path.display()
                )));
            }
        }

        tracing::info!(part, total, url = %redact_url(url), "Downloading report");

        let bytes = self.api.download_artifact(url).await.map_err(|e| {
            UsageExportError::Artifact(format!(
                "download of part {part}/{total} ({}) failed: {e}",
                redact_url(url)
            ))
        })?;

        if !bytes.starts_with(&GZIP_MAGIC) {
            return Err(UsageExportError::Artifact(format!(
                "part {part}/{total} is not a gzip stream ({} bytes received)",
                bytes.len()
            )));
        }

        let sha256 = format!("{:x}", Sha256::digest(&bytes));
        let byte_size = bytes.len() as u64;

        let compressed_partial = partial_path(&compressed_path);
        tokio::fs::write(&compressed_partial, &bytes)
            .await
            .map_err(|e| {
                UsageExportError::Artifact(format!(
                    "failed to write {}: {e}",
                    compressed_partial.display()
                ))
            })?;
        promote(&compressed_partial, &compressed_path).await?;

        tracing::info!(
            path = %compressed_path.display(),
            bytes = byte_size,
            sha256 = %sha256,
            "Report downloaded"
        );

        let decompressed_size = self
            .decompress(&compressed_path, &decompressed_path)
            .await?;

        tracing::info!(
            path = %decompressed_path.display(),
            bytes = decompressed_size,
            "Report decompressed"
        );

        Ok(ReportArtifact {
            compressed_path,
            decompressed_path,
            byte_size,
            decompressed_size,
            sha256,
        })
    }

    async fn decompress(&self, source: &Path, target: &Path) -> Result<u64> {
        let partial = partial_path(target);
        let (src, dst) = (source.to_path_buf(), partial.clone());

        let outcome = tokio::task::spawn_blocking(move || gunzip_file(&src, &dst))
            .await
            .map_err(|e| UsageExportError::Artifact(format!("decompression task failed: {e}")))?;

        match outcome {
            Ok(size) => {
                promote(&partial, target).await?;
                Ok(size)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                    tracing::debug!(
                        path = %partial.display(),
                        error = %cleanup,
                        "Could not remove partial decompressed file"
                    );
                }
                Err(UsageExportError::Artifact(format!(
                    "failed to decompress {}: {e}",
                    source.display()
                )))
            }
        }
    }
}

/// Stream-decompress a gzip file, returning the number of bytes written
///
/// Every member of a multi-member stream is decoded, not just the first.
fn gunzip_file(source: &Path, target: &Path) -> std::io::Result<u64> {
    let mut decoder = MultiGzDecoder::new(BufReader::new(File::open(source)?));
    let mut writer = BufWriter::new(File::create(target)?);
    let written = std::io::copy(&mut decoder, &mut writer)?;
    writer.flush()?;
    Ok(written)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

async fn promote(partial: &Path, target: &Path) -> Result<()> {
    tokio::fs::rename(partial, target).await.map_err(|e| {
        UsageExportError::Artifact(format!(
            "failed to move {} into place: {e}",
            partial.display()
        ))
    })
}

/// Strip the query string from a signed URL before it reaches a log line
fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => "<invalid url>".to_string(),
    }
}
