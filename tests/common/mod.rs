#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use nano_url::api::routes::{owner_routes, public_routes, root_routes};
use nano_url::domain::repositories::AnalyticsRepository;
use nano_url::infrastructure::persistence::InMemoryStore;
use nano_url::state::AppState;
use nano_url::utils::code_generator::CodeGenerator;

pub const BASE_URL: &str = "http://sho.rt";

pub fn create_test_state() -> (AppState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(
        store.clone(),
        store.clone(),
        CodeGenerator::default(),
        BASE_URL,
    );
    (state, store)
}

/// Full router without rate limiting; the governor needs a peer address that
/// the in-process transport does not provide.
pub fn create_test_app(state: AppState) -> Router {
    Router::new()
        .merge(root_routes())
        .nest("/api/v1", owner_routes().merge(public_routes()))
        .with_state(state)
}

pub fn create_test_server() -> (TestServer, Arc<InMemoryStore>) {
    let (state, store) = create_test_state();
    let server = TestServer::new(create_test_app(state)).unwrap();
    (server, store)
}

pub async fn create_link(server: &TestServer, owner: Uuid, url: &str) -> Value {
    let response = server
        .post("/api/v1/urls")
        .add_header("x-user-id", owner.to_string())
        .json(&json!({ "url": url }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

/// Waits until the owner's analytics show `expected` clicks.
///
/// The owner total is bumped after the link's own counters, in the same
/// click task, so both are settled once this returns.
pub async fn wait_for_clicks(store: &InMemoryStore, owner: Uuid, expected: i64) {
    let counted = async {
        loop {
            let total = store
                .find_by_owner(owner)
                .await
                .unwrap()
                .map_or(0, |record| record.total_clicks);
            if total >= expected {
                return total;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };

    let total = tokio::time::timeout(Duration::from_secs(5), counted)
        .await
        .expect("click tasks did not finish");
    assert_eq!(total, expected);
}
