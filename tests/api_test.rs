//! Integration tests for API endpoints

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use common::*;
use nifty_scanner::{app, AppState};

fn test_app(provider: Arc<MockProvider>, symbols: &[&str]) -> axum::Router {
    app(AppState::new(Arc::new(scanner(provider, symbols))))
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let app = test_app(Arc::new(MockProvider::new()), &["TCS.NS", "INFY.NS"]);
    let (status, body) = get_json(app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["universe"], 2);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_scanner_defaults_to_swing() {
    let provider = Arc::new(MockProvider::new().with_daily("BRK.NS", breakout_bars()));
    let app = test_app(provider, &["BRK.NS"]);
    let (status, body) = get_json(app, "/api/scanner").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scan_type"], "swing");
    assert_eq!(body["universe"], 1);
    assert_eq!(body["count"], body["signals"].as_array().unwrap().len());
    assert!(body["market_note"].as_str().unwrap().contains("Educational"));
    assert!(body["scanned_at"].as_str().unwrap().ends_with("+05:30"));

    let first = &body["signals"][0];
    assert_eq!(first["symbol"], "BRK");
    assert_eq!(first["algorithm"], "52W High Breakout");
    assert_eq!(first["algo_type"], "swing");
    assert_eq!(first["signal"], "BUY");
    assert_eq!(first["confidence"], 69);
    assert_eq!(first["risk_reward"], "1:1.4");
    assert_eq!(first["tags"][0], "Momentum");
}

#[tokio::test]
async fn test_scanner_explicit_type() {
    let app = test_app(Arc::new(MockProvider::failing_everything()), &["TCS.NS"]);
    let (status, body) = get_json(app, "/api/scanner?type=longterm").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scan_type"], "longterm");
    assert_eq!(body["count"], 0);
    assert_eq!(body["signals"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_scanner_rejects_unknown_type() {
    let provider = Arc::new(MockProvider::new());
    let app = test_app(provider.clone(), &["TCS.NS"]);
    let (status, body) = get_json(app, "/api/scanner?type=weekly").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("intraday, swing, or longterm"));
    assert_eq!(provider.total_calls(), 0);
}
