//! Model catalog resolution against a mock vendor endpoint.
//!
//! Covers the live-listing happy path, the typed classification of listing
//! failures, and the static-fallback guarantee: `list_models` never fails
//! and never returns an empty catalog.

use std::sync::Arc;
use std::time::Duration;

use modelgate::prelude::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn kimi_client(server_url: &str) -> VendorClient {
    let settings = VendorSettings::new()
        .with_api_key("sk-test")
        .with_base_url(server_url);
    VendorClient::new(Arc::new(KimiAdapter::with_settings(settings)))
}

fn live_listing() -> serde_json::Value {
    serde_json::json!({
        "object": "list",
        "data": [
            {"id": "moonshot-v1-8k", "context_length": 8192},
            {"id": "moonshot-v1-32k", "context_length": 32768},
            {"id": "kimi-k2-0905-preview", "context_length": 262144},
            // Foreign entry on a shared gateway; must be discarded.
            {"id": "gpt-4o", "context_length": 128000},
            // Missing context_length falls back to the 8192 floor.
            {"id": "kimi-latest"}
        ]
    })
}

#[tokio::test]
async fn live_listing_is_filtered_and_projected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(live_listing()))
        .expect(1)
        .mount(&server)
        .await;

    let client = kimi_client(&server.uri());
    let models = client.discover_models().await.expect("live discovery");

    let ids: Vec<_> = models.iter().map(|m| m.model.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "moonshot-v1-8k",
            "moonshot-v1-32k",
            "kimi-k2-0905-preview",
            "kimi-latest"
        ]
    );
    for model in &models {
        assert_eq!(model.handle, format!("kimi/{}", model.model));
        assert!(!model.put_inner_thoughts_in_kwargs);
    }
    let latest = models.iter().find(|m| m.model == "kimi-latest").expect("kimi-latest");
    assert_eq!(latest.context_window, 8192);
    let k2 = models
        .iter()
        .find(|m| m.model == "kimi-k2-0905-preview")
        .expect("k2");
    assert_eq!(k2.context_window, 262144);
    assert_eq!(k2.max_reasoning_tokens, 1024);
}

#[tokio::test]
async fn listing_401_classifies_as_authentication_error_and_falls_back() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "Invalid Authentication", "type": "invalid_authentication_error"}
        })))
        .mount(&server)
        .await;

    let client = kimi_client(&server.uri());

    // The live-discovery path surfaces the typed error...
    let err = client.discover_models().await.expect_err("401 must fail discovery");
    assert_eq!(err.kind(), "authentication");
    assert_eq!(err.status_code(), Some(401));

    // ...but the catalog call still serves the full static fallback.
    let models = client.list_models().await;
    assert!(models.len() >= 6);
    assert!(models.iter().any(|m| m.handle == "kimi/kimi-k2-0905-preview"));
}

#[tokio::test]
async fn listing_403_classifies_as_permission_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let client = kimi_client(&server.uri());
    let err = client.discover_models().await.expect_err("403 must fail discovery");
    assert_eq!(err.kind(), "permission");
    assert!(!client.list_models().await.is_empty());
}

#[tokio::test]
async fn listing_500_preserves_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {"message": "internal error"}
        })))
        .mount(&server)
        .await;

    let client = kimi_client(&server.uri());
    let err = client.discover_models().await.expect_err("500 must fail discovery");
    assert_eq!(err.kind(), "vendor");
    assert_eq!(err.status_code(), Some(500));
    assert!(err.body().is_some());
}

#[tokio::test]
async fn listing_timeout_classifies_and_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(live_listing())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let settings = VendorSettings::new()
        .with_api_key("sk-test")
        .with_base_url(server.uri());
    let client = VendorClient::with_transport(
        Arc::new(KimiAdapter::with_settings(settings)),
        ChatTransport::with_timeout(Duration::from_millis(100)),
    );

    let err = client.discover_models().await.expect_err("timeout must fail discovery");
    assert_eq!(err.kind(), "timeout");
    assert_eq!(client.list_models().await.len(), 6);
}

#[tokio::test]
async fn foreign_only_listing_falls_back_to_static_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"id": "gpt-4o"}, {"id": "claude-sonnet-4"}]
        })))
        .mount(&server)
        .await;

    let client = kimi_client(&server.uri());
    let models = client.list_models().await;
    assert_eq!(models.len(), 6);
    assert!(models.iter().all(|m| m.handle.starts_with("kimi/")));
}

#[tokio::test]
async fn undecodable_listing_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = kimi_client(&server.uri());
    let err = client.discover_models().await.expect_err("html body must fail discovery");
    assert_eq!(err.kind(), "parse");
    assert!(!client.list_models().await.is_empty());
}

#[tokio::test]
async fn missing_credentials_fall_back_without_network_io() {
    // No key configured, no mock server involved at all: the resolver fails
    // before any I/O and the catalog still serves the static fallback.
    let settings = VendorSettings::new().with_base_url("http://127.0.0.1:1");
    let client = VendorClient::new(Arc::new(ZhipuAdapter::with_settings(settings)));

    let models = client.list_models().await;
    assert_eq!(models.len(), 9);
    assert!(models.iter().any(|m| m.handle == "zhipu/glm-4-long"));
}

#[test]
fn blocking_facade_works_outside_a_runtime() {
    let settings = VendorSettings::new()
        .with_api_key("sk-test")
        // Nothing listens here; discovery fails fast and falls back.
        .with_base_url("http://127.0.0.1:1");
    let client = VendorClient::new(Arc::new(KimiAdapter::with_settings(settings)));

    let models = client.list_models_blocking();
    assert_eq!(models.len(), 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_facade_does_not_deadlock_inside_a_runtime() {
    let settings = VendorSettings::new()
        .with_api_key("sk-test")
        .with_base_url("http://127.0.0.1:1");
    let client = VendorClient::new(Arc::new(ZhipuAdapter::with_settings(settings)));

    let models = client.list_models_blocking();
    assert_eq!(models.len(), 9);
}
