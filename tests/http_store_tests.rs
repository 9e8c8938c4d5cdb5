use std::time::Duration;

use serde_json::json;
use venom::core::config::StoreSettings;
use venom::core::error::StoreError;
use venom::core::project::Project;
use venom::store::{HttpProjectStore, ProjectStore};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{basic_auth, body_json, method, path},
};

const DOCUMENTS: &str = "/v1/buckets/venom/scopes/mindsnap/collections/projects/documents";

// ============================================================================
// Helper Functions
// ============================================================================

fn store_for(server: &MockServer) -> HttpProjectStore {
    let settings = StoreSettings {
        base_url: server.uri(),
        username: Some("admin".to_string()),
        password: Some("secret".to_string()),
        ..Default::default()
    };
    HttpProjectStore::new(&settings).expect("valid settings")
}

fn web() -> Project {
    Project::new("web", "/srv/web", ".env").with_variable("PORT", "80")
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_list_all_keys_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCUMENTS))
        .and(basic_auth("admin", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "web", "file_name": ".env", "target_folder": "/srv/web", "variables": {"PORT": "80"}},
            {"name": "api", "file_name": ".env", "target_folder": "/srv/api", "variables": null},
            {"name": "db", "file_name": ".env", "target_folder": "/srv/db"}
        ])))
        .mount(&server)
        .await;

    let projects = store_for(&server).list_all().await.unwrap();
    assert_eq!(projects.len(), 3);
    assert_eq!(projects["web"], web());
    assert!(projects["api"].variables.is_empty());
    assert!(projects["db"].variables.is_empty());
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{DOCUMENTS}/ghost")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = store_for(&server).get("ghost").await.unwrap_err();
    assert_eq!(err, StoreError::NotFound("ghost".to_string()));
}

#[tokio::test]
async fn test_garbage_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCUMENTS))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = store_for(&server).list_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Parse(_)));
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCUMENTS))
        .respond_with(ResponseTemplate::new(503).set_body_string("warming up"))
        .mount(&server)
        .await;

    let err = store_for(&server).list_all().await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Api {
            status: 503,
            message: "warming up".to_string()
        }
    );
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_create_puts_document_and_returns_name() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{DOCUMENTS}/web")))
        .and(body_json(json!({
            "name": "web",
            "file_name": ".env",
            "target_folder": "/srv/web",
            "variables": {"PORT": "80"}
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let name = store_for(&server).create(&web()).await.unwrap();
    assert_eq!(name, "web");
}

#[tokio::test]
async fn test_update_posts_and_echoes_project() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS}/web")))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let first = store.update("web", &web()).await.unwrap();
    let second = store.update("web", &web()).await.unwrap();
    assert_eq!(first, web());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_update_vanished_project_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS}/web")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = store_for(&server).update("web", &web()).await.unwrap_err();
    assert_eq!(err, StoreError::NotFound("web".to_string()));
}

#[tokio::test]
async fn test_delete_sends_delete() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{DOCUMENTS}/web")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store_for(&server).delete("web").await.unwrap();
}

// ============================================================================
// Readiness
// ============================================================================

#[tokio::test]
async fn test_wait_until_ready_succeeds_on_ping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    store_for(&server)
        .wait_until_ready(Duration::from_secs(2))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_wait_until_ready_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ping"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = store_for(&server)
        .wait_until_ready(Duration::from_millis(400))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test]
async fn test_unreachable_store_is_network_error() {
    // Nothing listens on port 9 on loopback
    let settings = StoreSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_millis(200),
        ..Default::default()
    };
    let store = HttpProjectStore::new(&settings).unwrap();
    let err = store.list_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Network(_)));
}
