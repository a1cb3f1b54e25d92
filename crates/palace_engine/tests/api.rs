use palace_engine::{
    ApiClient, ApiError, ApiSettings, NewNote, PageCapture, SearchQuery, SelectionKind,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn create_note_trims_text_and_returns_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/notes"))
        .and(body_json(json!({
            "text": "remember this",
            "source_url": "https://a.example.com",
            "metadata": { "ui": "cli" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "n-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let note = NewNote::new("  remember this \n")
        .with_source("https://a.example.com")
        .with_metadata("ui", "cli");
    let id = client(&server).create_note(&note).await.unwrap();
    assert_eq!(id, "n-1");
}

#[tokio::test]
async fn blank_note_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .create_note(&NewNote::new("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn list_notes_passes_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/notes"))
        .and(query_param("skip", "20"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": "n-1", "text": "one", "source_url": null, "created_at": "2025-01-01T00:00:00" },
                { "id": "n-2", "text": "two", "source_url": "https://b.example.com" }
            ]
        })))
        .mount(&server)
        .await;

    let page = client(&server).list_notes(20, 10).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].created_at.as_deref(), Some("2025-01-01T00:00:00"));
    assert_eq!(
        page.items[1].source_url.as_deref(),
        Some("https://b.example.com")
    );
}

#[tokio::test]
async fn delete_note_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/notes/n-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/notes/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let client = client(&server);
    client.delete_note("n-1").await.unwrap();
    let err = client.delete_note("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn scrape_reads_nested_markdown_and_note_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape-website"))
        .and(body_json(json!({ "url": "https://a.example.com/page" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "markdown": "# Page\n\nbody" },
            "id": "n-9"
        })))
        .mount(&server)
        .await;

    let result = client(&server)
        .scrape(" https://a.example.com/page ")
        .await
        .unwrap();
    assert_eq!(result.markdown, "# Page\n\nbody");
    assert_eq!(result.note_id.as_deref(), Some("n-9"));
}

#[tokio::test]
async fn scrape_tolerates_non_json_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape-website"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let result = client(&server)
        .scrape("https://a.example.com")
        .await
        .unwrap();
    assert!(result.markdown.is_empty());
    assert_eq!(result.note_id, None);
}

#[tokio::test]
async fn scrape_failure_carries_backend_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape-website"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream timeout"))
        .mount(&server)
        .await;

    let err = client(&server)
        .scrape("https://a.example.com")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "http status 502: upstream timeout");
}

#[tokio::test]
async fn capture_posts_selection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mind-palace/page/extract"))
        .and(body_json(json!({
            "raw_text": "a quote",
            "html": null,
            "page_url": "https://a.example.com",
            "page_title": "A",
            "selection_type": "full_page"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "d-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let capture = PageCapture {
        raw_text: "a quote".to_string(),
        html: None,
        page_url: "https://a.example.com".to_string(),
        page_title: "A".to_string(),
        selection_type: SelectionKind::FullPage,
    };
    let response = client(&server).capture(&capture).await.unwrap();
    assert_eq!(response["id"], "d-1");
}

#[tokio::test]
async fn search_omits_empty_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/mind-palace/search"))
        .and(query_param("q", "rust"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "_id": "d-1", "title": "Ownership", "summary": "borrowing rules" },
                { "id": "d-2", "source": { "url": "https://b.example.com" }, "raw_text": "text" }
            ]
        })))
        .mount(&server)
        .await;

    let query = SearchQuery {
        q: "rust".to_string(),
        ..SearchQuery::default()
    };
    let results = client(&server).search(&query).await.unwrap();
    assert_eq!(results.items.len(), 2);
    assert_eq!(results.items[0].doc_id(), Some("d-1"));
    assert_eq!(results.items[1].display_title(), "https://b.example.com");

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(!query.contains("topic"));
    assert!(!query.contains("domain"));
}

#[tokio::test]
async fn document_fetches_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/mind-palace/doc/d-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "d-1", "topics": ["rust"] })))
        .mount(&server)
        .await;

    let doc = client(&server).document("d-1").await.unwrap();
    assert_eq!(doc["topics"][0], "rust");
}

#[tokio::test]
async fn health_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    assert_eq!(client(&server).health().await.unwrap(), "ok");
}
