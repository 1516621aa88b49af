//! HTTP-level tests for the CircleCI usage API client

mod common;

use common::{gzip, test_config};
use mockito::{Matcher, Server};
use serde_json::json;
use tempfile::TempDir;
use usage_export::adapters::usage_api::{CircleCiClient, ExportRequest, UsageApi};
use usage_export::config::UsageExportConfig;
use usage_export::domain::{
    ApiError, JobId, JobState, OrganizationId, OrganizationSet, UsageExportError,
};

const JOBS_PATH: &str = "/api/v2/organizations/org-primary/usage_export_job";

fn config(server: &Server, dir: &TempDir) -> UsageExportConfig {
    test_config(dir.path(), &[("USAGE_EXPORT_BASE_URL", server.url().as_str())]).unwrap()
}

#[tokio::test]
async fn test_discover_organizations() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let mock = server
        .mock("GET", "/private/orgs/org-primary/plan/shares-for")
        .match_header("circle-token", "test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "orgs": [
                    {"id": "org-1", "name": "platform", "vcs_type": "github"},
                    {"id": "org-2", "name": "mobile", "vcs_type": "bitbucket"},
                    {"name": "orphan"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = CircleCiClient::new(&config(&server, &dir)).unwrap();
    let orgs = client.discover_organizations().await.unwrap();

    mock.assert_async().await;
    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[0].id.as_str(), "org-1");
    assert_eq!(orgs[0].name.as_deref(), Some("platform"));
    assert_eq!(orgs[1].vcs_type.as_deref(), Some("bitbucket"));
}

#[tokio::test]
async fn test_discover_without_orgs_list_is_malformed() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let _mock = server
        .mock("GET", "/private/orgs/org-primary/plan/shares-for")
        .with_status(200)
        .with_body(r#"{"message": "ok"}"#)
        .create_async()
        .await;

    let client = CircleCiClient::new(&config(&server, &dir)).unwrap();
    let err = client.discover_organizations().await.unwrap_err();

    assert!(matches!(err, UsageExportError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_create_export_job_sends_request_body() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let mock = server
        .mock("POST", JOBS_PATH)
        .match_header("circle-token", "test-token")
        .match_body(Matcher::Json(json!({
            "start": "2024-11-01T00:00:00Z",
            "end": "2024-11-30T23:59:59Z",
            "shared_org_ids": ["org-1", "org-2", "org-3"]
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"usage_export_job_id": "abc"}"#)
        .create_async()
        .await;

    let config = config(&server, &dir);
    let organizations = OrganizationSet::new(
        ["org-1", "org-2", "org-3"]
            .into_iter()
            .map(|id| OrganizationId::new(id).unwrap()),
    )
    .unwrap();
    let request = ExportRequest::new(organizations, config.time_range);

    let client = CircleCiClient::new(&config).unwrap();
    let job_id = client.create_export_job(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(job_id.as_str(), "abc");
}

#[tokio::test]
async fn test_create_export_job_without_id_is_malformed() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let _mock = server
        .mock("POST", JOBS_PATH)
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    let config = config(&server, &dir);
    let organizations =
        OrganizationSet::new([OrganizationId::new("org-1").unwrap()]).unwrap();
    let request = ExportRequest::new(organizations, config.time_range);

    let client = CircleCiClient::new(&config).unwrap();
    let err = client.create_export_job(&request).await.unwrap_err();

    assert!(matches!(err, UsageExportError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_http_status_classification() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let _unauthorized = server
        .mock("GET", format!("{JOBS_PATH}/denied").as_str())
        .with_status(401)
        .with_body(r#"{"message": "You must log in first."}"#)
        .create_async()
        .await;
    let _unavailable = server
        .mock("GET", format!("{JOBS_PATH}/flaky").as_str())
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let client = CircleCiClient::new(&config(&server, &dir)).unwrap();

    let err = client
        .get_job_status(&JobId::new("denied").unwrap())
        .await
        .unwrap_err();
    match &err {
        UsageExportError::Api(ApiError::ClientError { status, body }) => {
            assert_eq!(*status, 401);
            assert!(body.contains("log in"));
        }
        other => panic!("expected client error, got {other:?}"),
    }
    assert!(!err.is_transient());

    let err = client
        .get_job_status(&JobId::new("flaky").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        UsageExportError::Api(ApiError::ServerError { status: 503, .. })
    ));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_get_job_status() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let _processing = server
        .mock("GET", format!("{JOBS_PATH}/running").as_str())
        .match_header("circle-token", "test-token")
        .with_status(200)
        .with_body(r#"{"state": "processing", "download_urls": []}"#)
        .create_async()
        .await;
    let _completed = server
        .mock("GET", format!("{JOBS_PATH}/done").as_str())
        .with_status(200)
        .with_body(
            json!({
                "state": "completed",
                "download_urls": ["https://exports.example.com/a.csv.gz?sig=1"]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _failed = server
        .mock("GET", format!("{JOBS_PATH}/broken").as_str())
        .with_status(200)
        .with_body(r#"{"state": "failed", "error_reason": "no usage in range"}"#)
        .create_async()
        .await;

    let client = CircleCiClient::new(&config(&server, &dir)).unwrap();

    let running = client
        .get_job_status(&JobId::new("running").unwrap())
        .await
        .unwrap();
    assert_eq!(running.state, JobState::Processing);
    assert!(running.download_urls.is_empty());

    let done = client
        .get_job_status(&JobId::new("done").unwrap())
        .await
        .unwrap();
    assert_eq!(done.state, JobState::Completed);
    assert_eq!(done.download_urls.len(), 1);

    let broken = client
        .get_job_status(&JobId::new("broken").unwrap())
        .await
        .unwrap();
    assert_eq!(broken.state, JobState::Failed);
    assert_eq!(broken.error_message.as_deref(), Some("no usage in range"));
}

#[tokio::test]
async fn test_unknown_job_state_is_malformed() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let _mock = server
        .mock("GET", format!("{JOBS_PATH}/odd").as_str())
        .with_status(200)
        .with_body(r#"{"state": "exploded"}"#)
        .create_async()
        .await;

    let client = CircleCiClient::new(&config(&server, &dir)).unwrap();
    let err = client
        .get_job_status(&JobId::new("odd").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, UsageExportError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_download_artifact_omits_token() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let payload = gzip(b"org_id,compute_credits\n");
    let mock = server
        .mock("GET", "/exports/a.csv.gz")
        .match_query(Matcher::UrlEncoded("sig".into(), "xyz".into()))
        .match_header("circle-token", Matcher::Missing)
        .with_status(200)
        .with_body(payload.clone())
        .create_async()
        .await;

    let client = CircleCiClient::new(&config(&server, &dir)).unwrap();
    let url = format!("{}/exports/a.csv.gz?sig=xyz", server.url());
    let bytes = client.download_artifact(&url).await.unwrap();

    mock.assert_async().await;
    assert_eq!(bytes, payload);
}

#[tokio::test]
async fn test_expired_download_url_is_client_error() {
    let mut server = Server::new_async().await;
    let dir = TempDir::new().unwrap();
    let _mock = server
        .mock("GET", "/exports/expired.csv.gz")
        .with_status(403)
        .with_body("<Error><Code>AccessDenied</Code></Error>")
        .create_async()
        .await;

    let client = CircleCiClient::new(&config(&server, &dir)).unwrap();
    let url = format!("{}/exports/expired.csv.gz", server.url());
    let err = client.download_artifact(&url).await.unwrap_err();

    assert!(matches!(
        err,
        UsageExportError::Api(ApiError::ClientError { status: 403, .. })
    ));
}
