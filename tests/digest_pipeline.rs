//! End-to-end runs: config → mock Notion API → filtered digest → delivery.

mod common;

use common::{query_body, wire_page, API_KEY, DATABASE_ID_HYPHENATED};
use notion_digest::output::{digest_file_path, DeliveryTarget};
use notion_digest::{
    run_job, run_jobs, AppConfig, AppError, CommandLineInput, ConfigFile, FetchError,
    NotionHttpClient,
};
use regex::Regex;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OTHER_DATABASE_HYPHENATED: &str = "01234567-89ab-cdef-0123-456789abcdef";

fn config_yaml(server: &MockServer) -> String {
    format!(
        r#"
apiKey: {key}
apiBaseUrl: {base}
timezone: UTC
mail:
  from: Digest <digest@example.com>
  to: [me@example.com]
db:
  - id: {db}
    name: reading list
    notion:
      filterJSON: '{{"timestamp": "created_time", "created_time": {{"on_or_after": "{{{{yesterday}}}}"}}}}'
      sortJSON: '[{{"timestamp": "created_time", "direction": "ascending"}}]'
  - id: {other}
    name: journal
"#,
        key = API_KEY,
        base = server.uri(),
        db = DATABASE_ID_HYPHENATED,
        other = OTHER_DATABASE_HYPHENATED,
    )
}

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("notion-digest-test-{}", uuid::Uuid::new_v4()))
}

fn load_config(server: &MockServer, output_dir: Option<PathBuf>) -> AppConfig {
    let cli = CommandLineInput {
        config: PathBuf::from("test.yaml"),
        verbose: false,
        dry_run: true,
        output_dir,
        only: None,
    };
    let file = ConfigFile::parse(&config_yaml(server), Path::new("test.yaml")).unwrap();
    AppConfig::resolve(cli, file, |_| None).unwrap()
}

fn client_for(config: &AppConfig) -> NotionHttpClient {
    NotionHttpClient::with_base_url(&config.api_key, &config.api_base_url).unwrap()
}

async fn mount_reading_list(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/databases/{}/query", DATABASE_ID_HYPHENATED)))
        .respond_with(ResponseTemplate::new(200).set_body_json(query_body(
            vec![
                wire_page("p1", "Rust in Action", &["books"], "2024-01-15T08:00:00.000Z"),
                wire_page("p2", "Secret plans", &["gister:ignore"], "2024-01-15T09:00:00.000Z"),
                wire_page("p3", "", &[], "2024-01-15T10:30:00.000Z"),
                wire_page("p4", "Fish & Chips <recipe>", &["food"], "2024-01-15T11:00:00.000Z"),
            ],
            None,
        )))
        .mount(server)
        .await;
}

fn anchors(html: &str) -> Vec<(String, String)> {
    let re = Regex::new(r#"<li><a href="([^"]+)" target="_blank" rel="noopener noreferrer">([^<]*)</a></li>"#)
        .unwrap();
    re.captures_iter(html)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

#[tokio::test]
async fn test_dry_run_writes_filtered_digest() {
    let server = MockServer::start().await;
    mount_reading_list(&server).await;

    let dir = scratch_dir();
    let config = load_config(&server, Some(dir.clone()));
    let job = &config.jobs[0];

    let report = run_job(&config, job, client_for(&config), &CancellationToken::new())
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.completed.len(), 2);
    assert!(report
        .completed
        .iter()
        .any(|c| matches!(c.operation, DeliveryTarget::PrintToStdout { .. })));

    let html = std::fs::read_to_string(digest_file_path(&dir, &job.name)).unwrap();
    assert!(html.starts_with("<ol>\n"));
    assert!(html.ends_with("</ol>"));

    let found = anchors(&html);
    assert_eq!(found.len(), 3);
    assert_eq!(
        found[0],
        ("https://www.notion.so/p1".to_string(), "Rust in Action".to_string())
    );
    assert!(found[1].1.starts_with('(') && found[1].1.ends_with(')'));
    assert_eq!(found[1].0, "https://www.notion.so/p3");
    assert_eq!(found[2].1, "Fish &amp; Chips &lt;recipe&gt;");
    assert!(!html.contains("Secret plans"));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_query_templates_are_expanded_before_sending() {
    let server = MockServer::start().await;
    mount_reading_list(&server).await;

    let config = load_config(&server, None);
    run_job(
        &config,
        &config.jobs[0],
        client_for(&config),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = requests[0].body_json().unwrap();

    let since = body["filter"]["created_time"]["on_or_after"].as_str().unwrap();
    let midnight = Regex::new(r"^\d{4}-\d{2}-\d{2}T00:00:00Z$").unwrap();
    assert!(midnight.is_match(since), "unexpected date {}", since);
    assert_eq!(
        body["sorts"],
        json!([{"timestamp": "created_time", "direction": "ascending"}])
    );
    assert_eq!(body["page_size"], 100);
}

#[tokio::test]
async fn test_one_failing_database_does_not_stop_the_others() {
    let server = MockServer::start().await;
    mount_reading_list(&server).await;
    Mock::given(method("POST"))
        .and(path(format!("/databases/{}/query", OTHER_DATABASE_HYPHENATED)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "object": "error",
            "status": 404,
            "code": "object_not_found",
            "message": "Could not find database"
        })))
        .mount(&server)
        .await;

    let config = Arc::new(load_config(&server, None));
    let client = Arc::new(client_for(&config));

    let outcomes = run_jobs(Arc::clone(&config), client, CancellationToken::new()).await;

    let names: Vec<_> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["reading list", "journal"]);
    assert!(outcomes[0].is_success());
    assert!(matches!(
        outcomes[1].result,
        Err(AppError::Fetch(FetchError::NotionApi { status: 404, .. }))
    ));
}

#[tokio::test]
async fn test_cancelled_run_reports_cancellation() {
    let server = MockServer::start().await;
    mount_reading_list(&server).await;

    let config = load_config(&server, None);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = run_job(&config, &config.jobs[0], client_for(&config), &cancel).await;

    assert!(matches!(result, Err(AppError::Fetch(FetchError::Cancelled))));
    assert!(server.received_requests().await.unwrap().is_empty());
}
