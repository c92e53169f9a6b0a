//! API integration tests
//!
//! These expect a running server with a migrated database.

use chrono::{Duration, Utc};
use regdesk::models::{StaffClaims, StaffRole};
use reqwest::Client;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Mint a token with the secret the server was started with
fn auth_token(role: StaffRole) -> String {
    let secret =
        std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-this-secret-in-production".into());
    let now = Utc::now();
    StaffClaims {
        sub: "integration@example.org".to_string(),
        role,
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    }
    .create_token(&secret)
    .expect("Failed to create token")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_stats_require_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/stats/dashboard", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_dashboard() {
    let client = Client::new();
    let token = auth_token(StaffRole::Viewer);

    let response = client
        .get(format!("{}/stats/dashboard", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["trend"]["buckets"].is_array());
    assert!(body["meals"]["days"].is_array());
    assert!(body["modes"]["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_filtered_trend() {
    let client = Client::new();
    let token = auth_token(StaffRole::Viewer);

    let response = client
        .get(format!(
            "{}/stats/trend?participation_mode=onsite&created_from=2025-01-01",
            BASE_URL
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total_online"], 0);
}

#[tokio::test]
#[ignore]
async fn test_master_export_download() {
    let client = Client::new();
    let token = auth_token(StaffRole::Viewer);

    let response = client
        .get(format!("{}/exports/master", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("Master_Report_"));
    assert!(disposition.ends_with(".xlsx\""));

    let bytes = response.bytes().await.expect("Failed to read body");
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
#[ignore]
async fn test_viewer_cannot_issue_badges() {
    let client = Client::new();
    let token = auth_token(StaffRole::Viewer);

    let response = client
        .post(format!(
            "{}/registrations/00000000-0000-0000-0000-000000000000/badge",
            BASE_URL
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_badge_for_unknown_registration() {
    let client = Client::new();
    let token = auth_token(StaffRole::Desk);

    let response = client
        .post(format!(
            "{}/registrations/00000000-0000-0000-0000-000000000000/badge",
            BASE_URL
        ))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_support_session_lifecycle() {
    let client = Client::new();

    let response = client
        .post(format!("{}/support/sessions", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let created: Value = response.json().await.expect("Failed to parse response");
    let id = created["id"].as_str().expect("No session id").to_string();

    let response = client
        .delete(format!("{}/support/sessions/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let cleared: Value = response.json().await.expect("Failed to parse response");
    assert!(cleared["id"].is_null());
}
