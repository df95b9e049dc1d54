use chrono::{Duration, Utc};
use crosspost::backend::Backend;
use crosspost::config::DevtoConfig;
use crosspost::devto::{DevtoBackend, DevtoClient};
use crosspost::{Article, CanonicalIdentity, PublishOutcome};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(uri: String) -> DevtoBackend {
    let client = DevtoClient::new(&DevtoConfig {
        api_key: "test_key".into(),
        api_base: uri,
    })
    .unwrap()
    .disable_throttle();
    DevtoBackend::with_client(client)
}

fn article() -> Article {
    Article {
        title: "Hello World".into(),
        body: "Body.".into(),
        tags: vec!["Rust".into()],
        description: Some("desc".into()),
        draft: false,
        date: None,
    }
}

fn identity() -> CanonicalIdentity {
    CanonicalIdentity {
        url: "https://example.com/posts/hello-world/".into(),
        title: "Hello World".into(),
    }
}

#[tokio::test]
async fn test_publish_creates_when_no_existing_post() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/me/all"))
        .and(header("api-key", "test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 41,
            "url": "https://dev.to/u/hello-world"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let outcome = tokio::task::spawn_blocking(move || {
        backend_for(uri).publish(&article(), &identity(), None)
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(
        outcome,
        PublishOutcome::Created("https://dev.to/u/hello-world".into())
    );
}

#[tokio::test]
async fn test_publish_updates_when_canonical_url_matches() {
    let mock_server = MockServer::start().await;

    // Stored URL differs in scheme, case, and trailing slash
    Mock::given(method("GET"))
        .and(path("/api/articles/me/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 7, "title": "Old Title", "canonical_url": "http://Example.com/posts/hello-world"}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/articles/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 7,
            "url": "https://dev.to/u/hello-world"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let outcome = tokio::task::spawn_blocking(move || {
        backend_for(uri).publish(&article(), &identity(), None)
    })
    .await
    .unwrap()
    .unwrap();

    assert!(matches!(outcome, PublishOutcome::Updated(_)));
}

#[tokio::test]
async fn test_publish_updates_on_title_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/me/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 9, "title": "Hello World", "canonical_url": "https://example.com/posts/renamed/"}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/articles/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 9,
            "url": "https://dev.to/u/hello-world"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let outcome = tokio::task::spawn_blocking(move || {
        backend_for(uri).publish(&article(), &identity(), None)
    })
    .await
    .unwrap()
    .unwrap();

    assert!(matches!(outcome, PublishOutcome::Updated(_)));
}

#[tokio::test]
async fn test_future_date_is_scheduled_and_past_date_is_omitted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/me/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 1})))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    tokio::task::spawn_blocking(move || {
        let backend = backend_for(uri);
        let future = Utc::now() + Duration::hours(1);
        backend
            .publish(&article(), &identity(), Some(future))
            .unwrap();
        let past = Utc::now() - Duration::hours(1);
        backend.publish(&article(), &identity(), Some(past)).unwrap();
    })
    .await
    .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let creates: Vec<_> = requests
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .collect();
    assert_eq!(creates.len(), 2);

    let first: serde_json::Value = serde_json::from_slice(&creates[0].body).unwrap();
    assert!(first["article"]["published_at"].is_string());

    let second: serde_json::Value = serde_json::from_slice(&creates[1].body).unwrap();
    assert!(second["article"].get("published_at").is_none());
}

#[tokio::test]
async fn test_listing_failure_degrades_to_create() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/me/all"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 3})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let outcome = tokio::task::spawn_blocking(move || {
        backend_for(uri).publish(&article(), &identity(), None)
    })
    .await
    .unwrap()
    .unwrap();

    assert!(matches!(outcome, PublishOutcome::Created(_)));
}

#[tokio::test]
async fn test_write_failure_surfaces_error_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/me/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(422).set_body_string(r#"{"error": "canonical_url taken"}"#),
        )
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        backend_for(uri).publish(&article(), &identity(), None)
    })
    .await
    .unwrap();

    match result {
        Err(crosspost::Error::Api {
            backend, status, message,
        }) => {
            assert_eq!(backend, "devto");
            assert_eq!(status, 422);
            assert!(message.contains("canonical_url taken"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let mock_server = MockServer::start().await;

    // First run: empty listing, then a create
    Mock::given(method("GET"))
        .and(path("/api/articles/me/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 12,
            "url": "https://dev.to/u/hello-world"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Second run: the listing now echoes the created post
    Mock::given(method("GET"))
        .and(path("/api/articles/me/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 12, "title": "Hello World", "canonical_url": "https://example.com/posts/hello-world"}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/articles/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 12,
            "url": "https://dev.to/u/hello-world"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let (first, second) = tokio::task::spawn_blocking(move || {
        let backend = backend_for(uri);
        let first = backend.publish(&article(), &identity(), None).unwrap();
        let second = backend.publish(&article(), &identity(), None).unwrap();
        (first, second)
    })
    .await
    .unwrap();

    assert!(matches!(first, PublishOutcome::Created(_)));
    assert!(matches!(second, PublishOutcome::Updated(_)));
}
