use std::time::Duration;

use palace_engine::{
    ApiClient, ApiError, ApiSettings, CancellationToken, ContentFormat, CrawlBackend, CrawlError,
    CrawlOptions, CrawlOrchestrator, CrawlStatus, NoopProgressSink, PollPolicy, StatusReport,
    TokioSleeper,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("client")
}

fn fast_policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(1),
        max_attempts: 5,
    }
}

#[tokio::test]
async fn start_sends_camel_case_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawl-start"))
        .and(body_json(json!({
            "url": "https://docs.example.com",
            "maxDepth": 3,
            "limit": 15,
            "scrapeOptions": { "formats": ["html"] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "crawl_id": "c-42" })))
        .expect(1)
        .mount(&server)
        .await;

    let options = CrawlOptions {
        max_depth: 3,
        limit: 15,
        formats: vec![ContentFormat::Html],
    };
    let job_id = client(&server)
        .start_crawl("https://docs.example.com", &options)
        .await
        .unwrap();
    assert_eq!(job_id.as_deref(), Some("c-42"));
}

#[tokio::test]
async fn status_defaults_missing_counts_to_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crawl-status/c-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "running" })))
        .mount(&server)
        .await;

    let report = client(&server).crawl_status("c-1").await.unwrap();
    assert_eq!(
        report,
        StatusReport {
            status: CrawlStatus::Running,
            completed: 0,
            total: 0,
        }
    );
}

#[tokio::test]
async fn end_to_end_crawl_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawl-start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "crawl_id": "c-7" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crawl-status/c-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "running", "completed": 3, "total": 10
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crawl-status/c-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed", "completed": 10, "total": 10
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/crawl-save/c-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "inserted_count": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator =
        CrawlOrchestrator::with_sleeper(client(&server), TokioSleeper, fast_policy());
    let summary = orchestrator
        .run(
            "https://docs.example.com",
            &CrawlOptions::default(),
            &NoopProgressSink,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(summary.inserted_count, 7);
    assert_eq!(summary.job_id, "c-7");
}

#[tokio::test]
async fn start_error_body_is_surfaced_and_nothing_is_polled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawl-start"))
        .respond_with(ResponseTemplate::new(400).set_body_string("limit too high"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let orchestrator =
        CrawlOrchestrator::with_sleeper(client(&server), TokioSleeper, fast_policy());
    let err = orchestrator
        .run(
            "https://docs.example.com",
            &CrawlOptions::default(),
            &NoopProgressSink,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CrawlError::Start("http status 400: limit too high".to_string())
    );
    assert_eq!(
        err.to_string(),
        "crawl failed to start: http status 400: limit too high"
    );
}

#[tokio::test]
async fn undecodable_status_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawl-start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "crawl_id": "c-9" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crawl-status/c-9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/crawl-save/c-9"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let orchestrator =
        CrawlOrchestrator::with_sleeper(client(&server), TokioSleeper, fast_policy());
    let err = orchestrator
        .run(
            "https://docs.example.com",
            &CrawlOptions::default(),
            &NoopProgressSink,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::Status(_)));
}

#[tokio::test]
async fn save_without_inserted_count_is_a_save_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/crawl-start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "crawl_id": "c-11" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crawl-status/c-11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed", "completed": 2, "total": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/crawl-save/c-11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(
        client.save_crawl("c-11").await.unwrap_err(),
        ApiError::MissingField("inserted_count")
    );

    let orchestrator = CrawlOrchestrator::with_sleeper(client, TokioSleeper, fast_policy());
    let err = orchestrator
        .run(
            "https://docs.example.com",
            &CrawlOptions::default(),
            &NoopProgressSink,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CrawlError::Save(_)));
}

#[tokio::test]
async fn odd_page_counts_read_as_zero_and_polling_continues() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crawl-status/c-12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "scraping", "completed": -1, "total": 4.5
        })))
        .mount(&server)
        .await;

    let report = client(&server).crawl_status("c-12").await.unwrap();
    assert_eq!(
        report,
        StatusReport {
            status: CrawlStatus::Running,
            completed: 0,
            total: 4,
        }
    );
}
