//! Integration tests for budget administration.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::TestApp;

fn budget_body(tool: &str, total: u32, commit: u32, max_overage: u32) -> serde_json::Value {
    json!({
        "tool": tool,
        "total": total,
        "commit": commit,
        "max_overage": max_overage,
        "commit_price": 5000.0,
        "overage_price_per_license": 500.0,
    })
}

#[tokio::test]
async fn test_budget_listing_shows_all_pools() {
    let app = TestApp::new(&[
        TestApp::seed("cad_tool", 20, 5, 15),
        TestApp::seed("sim_tool", 10, 10, 0),
    ]);

    let (status, body) = app.request("GET", "/config/budget", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tools"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_budget_update_applies_new_limits() {
    let app = TestApp::new(&[TestApp::seed("cad_tool", 20, 5, 15)]);

    let (status, body) = app
        .request("PUT", "/config/budget", Some(budget_body("cad_tool", 30, 10, 20)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 30);
    assert_eq!(body["commit"], 10);
    assert_eq!(body["max_overage"], 20);
}

#[tokio::test]
async fn test_budget_update_refuses_reduction_below_borrows() {
    let app = TestApp::new(&[TestApp::seed("cad_tool", 4, 4, 0)]);
    app.borrow("cad_tool", "alice").await;
    app.borrow("cad_tool", "bob").await;

    let (status, body) = app
        .request("PUT", "/config/budget", Some(budget_body("cad_tool", 1, 1, 0)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_budget_update_of_unknown_tool_is_not_found() {
    let app = TestApp::new(&[]);
    let (status, _) = app
        .request("PUT", "/config/budget", Some(budget_body("nope", 2, 2, 0)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_provision_creates_pool_and_rejects_duplicates() {
    let app = TestApp::new(&[]);

    let (status, body) = app
        .request("POST", "/config/pools", Some(budget_body("new_tool", 5, 3, 2)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tool"], "new_tool");

    let (status, _) = app
        .request("POST", "/config/pools", Some(budget_body("new_tool", 5, 3, 2)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The pool is immediately borrowable.
    app.borrow("new_tool", "alice").await;
}

#[tokio::test]
async fn test_deactivated_pool_refuses_borrows_but_stays_listed() {
    let app = TestApp::new(&[TestApp::seed("cad_tool", 2, 2, 0)]);

    let (status, _) = app.request("DELETE", "/config/pools/cad_tool", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            "POST",
            "/licenses/borrow",
            Some(json!({ "tool": "cad_tool", "user": "alice" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Soft-deactivation keeps the pool visible in status listings.
    let (_, body) = app.request("GET", "/licenses/status", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
