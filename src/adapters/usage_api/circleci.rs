//! CircleCI implementation of the usage API
//!
//! Talks to the shared-plan listing endpoint and the v2 usage export job
//! endpoints. Every request carries the `Circle-Token` header except artifact
//! downloads, which go to pre-signed URLs.

use super::models::{
    CreateUsageExportJobRequest, CreateUsageExportJobResponse, SharedOrg, SharedOrgsResponse,
    UsageExportJobResponse,
};
use super::{ExportRequest, UsageApi};
use crate::config::{SecretString, UsageExportConfig};
use crate::domain::errors::excerpt;
use crate::domain::{
    ApiError, JobId, JobStatus, Organization, OrganizationId, Result, UsageExportError,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;

const TOKEN_HEADER: &str = "Circle-Token";

/// HTTP client for the CircleCI usage export API
///
/// # Example
///
/// ```no_run
/// use usage_export::adapters::usage_api::{CircleCiClient, UsageApi};
/// use usage_export::config::load_config;
///
/// # async fn example() -> usage_export::domain::Result<()> {
/// let config = load_config(None)?;
/// let client = CircleCiClient::new(&config)?;
/// let orgs = client.discover_organizations().await?;
/// println!("{} organizations on the shared plan", orgs.len());
/// # Ok(())
/// # }
/// ```
pub struct CircleCiClient {
    base_url: String,
    client: Client,
    api_timeout: Duration,
    download_timeout: Duration,
    token: SecretString,
    primary_org_id: OrganizationId,
}

impl CircleCiClient {
    /// Build a client from configuration
    ///
    /// API calls are bounded by `timeout_seconds`, so a hung connection
    /// surfaces as [`ApiError::Timeout`] instead of stalling the poll loop.
    /// Artifact downloads get the longer `download_timeout_seconds`, since
    /// the timeout covers reading the whole body.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &UsageExportConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(config.api.connect_timeout_seconds))
            .user_agent(concat!("usage-export/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                UsageExportError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            client,
            api_timeout: Duration::from_secs(config.api.timeout_seconds),
            download_timeout: Duration::from_secs(config.api.download_timeout_seconds),
            token: config.token.clone(),
            primary_org_id: config.primary_org_id.clone(),
        })
    }

    fn jobs_url(&self) -> String {
        format!(
            "{}/api/v2/organizations/{}/usage_export_job",
            self.base_url, self.primary_org_id
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token: &str = self.token.expose_secret().as_ref();
        request
            .timeout(self.api_timeout)
            .header(TOKEN_HEADER, token)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send a request, turning transport failures and non-2xx statuses into [`ApiError`]
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), &body).into())
    }
}

/// Decode a JSON body, reporting undecodable payloads as malformed
async fn read_json<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
    let body = response.text().await.map_err(transport_error)?;
    serde_json::from_str(&body).map_err(|e| {
        UsageExportError::MalformedResponse(format!(
            "{context}: {e} (body: {})",
            excerpt(&body)
        ))
    })
}

fn transport_error(err: reqwest::Error) -> UsageExportError {
    let api_error = if err.is_timeout() {
        ApiError::Timeout(err.to_string())
    } else {
        ApiError::Connection(err.to_string())
    };
    api_error.into()
}

#[async_trait]
impl UsageApi for CircleCiClient {
    async fn discover_organizations(&self) -> Result<Vec<Organization>> {
        let url = format!(
            "{}/private/orgs/{}/plan/shares-for",
            self.base_url, self.primary_org_id
        );

        tracing::info!(
            primary_org_id = %self.primary_org_id,
            "Fetching organizations on the shared plan"
        );

        let response = self.send(self.authorized(self.client.get(&url))).await?;
        let body: SharedOrgsResponse =
            read_json(response, "shared plan response has no 'orgs' list").await?;

        let total = body.orgs.len();
        let orgs: Vec<Organization> = body
            .orgs
            .into_iter()
            .filter_map(SharedOrg::into_domain)
            .collect();

        if orgs.len() < total {
            tracing::warn!(
                skipped = total - orgs.len(),
                "Ignoring shared plan entries without an organization id"
            );
        }

        tracing::debug!(count = orgs.len(), "Shared plan organizations fetched");
        Ok(orgs)
    }

    async fn create_export_job(&self, request: &ExportRequest) -> Result<JobId> {
        let body = CreateUsageExportJobRequest {
            start: request.time_range.start_wire(),
            end: request.time_range.end_wire(),
            shared_org_ids: request.organizations.as_strings(),
        };

        let response = self
            .send(self.authorized(self.client.post(self.jobs_url()).json(&body)))
            .await?;
        let created: CreateUsageExportJobResponse =
            read_json(response, "unexpected job creation response").await?;

        let job_id = created.usage_export_job_id.ok_or_else(|| {
            UsageExportError::MalformedResponse(
                "job creation response has no 'usage_export_job_id'".to_string(),
            )
        })?;

        JobId::new(job_id).map_err(UsageExportError::MalformedResponse)
    }

    async fn get_job_status(&self, job_id: &JobId) -> Result<JobStatus> {
        let url = format!("{}/{}", self.jobs_url(), job_id);
        let response = self.send(self.authorized(self.client.get(&url))).await?;
        let body: UsageExportJobResponse =
            read_json(response, "unexpected job status response").await?;
        body.into_domain()
    }

    async fn download_artifact(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .send(self.client.get(url).timeout(self.download_timeout))
            .await?;
        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(bytes.to_vec())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
