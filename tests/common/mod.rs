//! Shared helpers for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use supacheck::config::AppConfig;
use supacheck::probe::{HealthProber, StaticDefaults};
use supacheck::routes::create_router;
use supacheck::state::AppState;
use supacheck::templates::init_templates;
use tower::ServiceExt;

pub const TEST_KEY: &str = "test-anon-key";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::from_toml(
        r#"
[http]
host = "127.0.0.1"
port = 0
"#,
    )
    .expect("test config parses");
    config.ui.templates_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/templates").to_string();
    config.ui.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string();
    config
}

pub fn prober(url: Option<&str>, key: Option<&str>) -> HealthProber {
    HealthProber::new(Arc::new(StaticDefaults::new(url, key)), None).expect("client builds")
}

/// Router whose prober falls back to the given defaults.
pub fn app(url: Option<&str>, key: Option<&str>) -> Router {
    let config = test_config();
    let tera = init_templates(&config.ui).expect("templates load");
    create_router(AppState::new(config, tera, prober(url, key)))
}

/// Base URL of a local port with nothing listening on it.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: impl Into<Body>) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await
}

pub async fn post_form(app: Router, uri: &str, url: &str, key: &str) -> Response<Body> {
    let body = format!(
        "supabase-url={}&supabase-key={}",
        form_encode(url),
        form_encode(key)
    );
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
}

fn form_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads")
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body is JSON")
}

pub async fn body_string(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body is UTF-8")
}
