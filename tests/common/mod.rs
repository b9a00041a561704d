#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use axum_test::TestServer;
use base64::{Engine, engine::general_purpose::STANDARD};
use tempfile::TempDir;

use ddc_panel::config::Config;
use ddc_panel::routes::routes;
use ddc_panel::state::AppState;
use ddc_panel::telemetry::NoopLevelControl;

pub const TEST_PASSWORD: &str = "panel-secret";

fn test_config(data_dir: PathBuf) -> Config {
    Config {
        data_dir,
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        behind_proxy: false,
        status_cache_ttl_seconds: 1,
        animation_cache_ttl_seconds: 1,
        // Deliberately missing so container refresh fails deterministically
        docker_bin: "ddc-test-docker-missing".to_string(),
        temp_debug_max_minutes: 60,
    }
}

/// Fresh, unconfigured state backed by a temp data directory.
pub async fn create_state() -> (AppState, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path().to_path_buf());
    let state = AppState::initialize(config, Arc::new(NoopLevelControl))
        .await
        .unwrap();
    (state, dir)
}

/// State with the admin password already set.
pub async fn create_configured_state() -> (AppState, TempDir) {
    let (state, dir) = create_state().await;
    state
        .auth_service
        .set_initial_password(TEST_PASSWORD, TEST_PASSWORD)
        .await
        .unwrap();
    (state, dir)
}

/// Test server over the full route table (no rate limiting).
pub fn server(state: AppState) -> TestServer {
    TestServer::new(routes(state)).unwrap()
}

pub fn auth_header() -> (HeaderName, HeaderValue) {
    basic_auth("admin", TEST_PASSWORD)
}

pub fn basic_auth(user: &str, password: &str) -> (HeaderName, HeaderValue) {
    let encoded = STANDARD.encode(format!("{user}:{password}"));
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Basic {encoded}")).unwrap(),
    )
}
