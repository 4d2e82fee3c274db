mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use nano_url::application::jobs::{DailyResetScheduler, ResetZone, RetryPolicy, SchedulerState};
use nano_url::domain::repositories::LinkRepository;

#[tokio::test]
async fn test_health_without_scheduler() {
    let (server, _store) = common::create_test_server();
    common::create_link(&server, Uuid::new_v4(), "https://example.com").await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["store"]["message"], "1 links, 0 clicks");
    assert_eq!(json["checks"]["daily_reset"]["status"], "ok");
}

#[tokio::test]
async fn test_health_reports_armed_scheduler() {
    let (state, store) = common::create_test_state();
    let links: Arc<dyn LinkRepository> = store;
    let handle = DailyResetScheduler::new(links, ResetZone::Named(chrono_tz::Asia::Kolkata))
        .with_policy(RetryPolicy {
            max_attempts: 1,
            retry_delay: Duration::from_millis(10),
            attempt_timeout: Duration::from_secs(1),
        })
        .start();

    let mut states = handle.subscribe();
    states
        .wait_for(|s| matches!(s, SchedulerState::Armed { .. }))
        .await
        .unwrap();

    let state = state.with_reset_state(handle.subscribe());
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["checks"]["daily_reset"]["scheduler"]["state"], "armed");
    assert!(json["checks"]["daily_reset"]["scheduler"]["next_reset"].is_string());

    handle.stop();
    handle.join().await.unwrap();

    let response = server.get("/health").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["daily_reset"]["scheduler"]["state"], "stopped");
}
