//! Shared fakes for integration tests
//!
//! `ScriptedApi` answers status checks from a queue and records every call;
//! `RecordingSleeper` records requested delays without sleeping.

#![allow(dead_code)]

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use usage_export::adapters::usage_api::{ExportRequest, UsageApi};
use usage_export::config::{load_config_with, UsageExportConfig};
use usage_export::core::export::Sleeper;
use usage_export::domain::{
    ApiError, JobId, JobState, JobStatus, Organization, OrganizationId, Result, UsageExportError,
};

pub const START: &str = "2024-11-01T00:00:00Z";
pub const END: &str = "2024-11-30T23:59:59Z";

/// Build a configuration from the required variables plus `extra`
pub fn test_config(report_dir: &Path, extra: &[(&str, &str)]) -> Result<UsageExportConfig> {
    let report_dir = report_dir.display().to_string();
    let mut vars: HashMap<String, String> = HashMap::from([
        ("CIRCLE_TOKEN".to_string(), "test-token".to_string()),
        ("PRIMARY_ORG_ID".to_string(), "org-primary".to_string()),
        ("START_DATE".to_string(), START.to_string()),
        ("END_DATE".to_string(), END.to_string()),
        ("USAGE_EXPORT_REPORT_DIR".to_string(), report_dir),
    ]);
    for (name, value) in extra {
        vars.insert(name.to_string(), value.to_string());
    }
    load_config_with(None, |name: &str| vars.get(name).cloned())
}

/// Gzip `data` in memory
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn status(state: JobState) -> Result<JobStatus> {
    Ok(JobStatus::new(state))
}

pub fn completed(urls: &[&str]) -> Result<JobStatus> {
    Ok(JobStatus::new(JobState::Completed)
        .with_download_urls(urls.iter().map(|u| u.to_string()).collect()))
}

pub fn api_error(error: ApiError) -> Result<JobStatus> {
    Err(UsageExportError::Api(error))
}

/// Fake `UsageApi` driven by scripted responses
pub struct ScriptedApi {
    orgs: Vec<Organization>,
    discovery_error: Option<ApiError>,
    create_result: Mutex<Option<Result<JobId>>>,
    statuses: Mutex<VecDeque<Result<JobStatus>>>,
    fallback_status: JobState,
    downloads: HashMap<String, Result<Vec<u8>>>,
    pub discover_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
    pub last_request: Mutex<Option<ExportRequest>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            orgs: Vec::new(),
            discovery_error: None,
            create_result: Mutex::new(None),
            statuses: Mutex::new(VecDeque::new()),
            fallback_status: JobState::Processing,
            downloads: HashMap::new(),
            discover_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_orgs(mut self, ids: &[&str]) -> Self {
        self.orgs = ids
            .iter()
            .map(|id| Organization::new(OrganizationId::new(*id).unwrap()))
            .collect();
        self
    }

    pub fn with_discovery_error(mut self, error: ApiError) -> Self {
        self.discovery_error = Some(error);
        self
    }

    pub fn with_job(self, job_id: &str) -> Self {
        *self.create_result.lock().unwrap() = Some(Ok(JobId::new(job_id).unwrap()));
        self
    }

    pub fn with_create_error(self, error: ApiError) -> Self {
        *self.create_result.lock().unwrap() = Some(Err(UsageExportError::Api(error)));
        self
    }

    /// Queue status responses; once drained, every check reports `fallback`
    pub fn with_statuses(self, statuses: Vec<Result<JobStatus>>) -> Self {
        self.statuses.lock().unwrap().extend(statuses);
        self
    }

    pub fn with_fallback_status(mut self, state: JobState) -> Self {
        self.fallback_status = state;
        self
    }

    pub fn with_download(mut self, url: &str, body: Result<Vec<u8>>) -> Self {
        self.downloads.insert(url.to_string(), body);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.discover_calls.load(Ordering::SeqCst)
            + self.create_calls.load(Ordering::SeqCst)
            + self.status_calls.load(Ordering::SeqCst)
            + self.download_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UsageApi for ScriptedApi {
    async fn discover_organizations(&self) -> Result<Vec<Organization>> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        match &self.discovery_error {
            Some(e) => Err(UsageExportError::Api(e.clone())),
            None => Ok(self.orgs.clone()),
        }
    }

    async fn create_export_job(&self, request: &ExportRequest) -> Result<JobId> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match self.create_result.lock().unwrap().take() {
            Some(result) => result,
            None => Ok(JobId::new("job-1").unwrap()),
        }
    }

    async fn get_job_status(&self, _job_id: &JobId) -> Result<JobStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.statuses.lock().unwrap().pop_front() {
            Some(next) => next,
            None => Ok(JobStatus::new(self.fallback_status)),
        }
    }

    async fn download_artifact(&self, url: &str) -> Result<Vec<u8>> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        match self.downloads.get(url) {
            Some(Ok(bytes)) => Ok(bytes.clone()),
            Some(Err(UsageExportError::Api(e))) => Err(UsageExportError::Api(e.clone())),
            Some(Err(e)) => Err(UsageExportError::Artifact(e.to_string())),
            None => Err(UsageExportError::Api(ApiError::ClientError {
                status: 404,
                body: "no such object".to_string(),
            })),
        }
    }

    fn base_url(&self) -> &str {
        "https://scripted.invalid"
    }
}

/// Sleeper that records requested delays and returns immediately
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}
