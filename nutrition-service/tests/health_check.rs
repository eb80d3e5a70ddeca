mod common;

use common::spawn_app;
use nutrition_service::services::providers::mock::MockReply;

#[tokio::test]
async fn health_check_returns_service_identity() {
    let app = spawn_app(MockReply::Text("ok".into())).await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "nutrition-service");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn readiness_follows_provider_health() {
    let healthy = spawn_app(MockReply::Text("ok".into())).await;
    let response = healthy
        .client
        .get(format!("{}/ready", healthy.address))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 200);

    let unhealthy = spawn_app(MockReply::Fail("no key".into())).await;
    let response = unhealthy
        .client
        .get(format!("{}/ready", unhealthy.address))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 503);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["detail"], "Service unavailable");
}

#[tokio::test]
async fn index_page_is_served_with_page_csp() {
    let app = spawn_app(MockReply::Text("ok".into())).await;

    let response = app
        .client
        .get(format!("{}/", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let csp = response
        .headers()
        .get("content-security-policy")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(csp.contains("script-src 'self'"));

    let html = response.text().await.expect("Failed to read body");
    assert!(html.contains("/api/analyze") || html.contains("/static/scripts.js"));
}

#[tokio::test]
async fn static_script_is_served() {
    let app = spawn_app(MockReply::Text("ok".into())).await;

    let response = app
        .client
        .get(format!("{}/static/scripts.js", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let script = response.text().await.expect("Failed to read body");
    assert!(script.contains("/api/analyze"));
}
