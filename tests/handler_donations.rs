mod common;

use serde_json::{Value, json};

#[tokio::test]
async fn test_protected_endpoints_require_auth() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);

    server
        .post("/api/donation/submit")
        .json(&json!({"amount": 10}))
        .await
        .assert_status_unauthorized();

    let (name, value) = common::basic_auth("admin", "wrong-password");
    server
        .post("/api/donation/submit")
        .add_header(name, value)
        .json(&json!({"amount": 10}))
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_submit_then_list() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    let response = server
        .post("/api/donation/submit")
        .add_header(name.clone(), value.clone())
        .json(&json!({"amount": 25, "donor_name": "Max", "publish_to_discord": false}))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["donation_info"]["donor"], "Max");
    assert_eq!(body["donation_info"]["amount"], 25);

    let response = server
        .get("/api/donations/list")
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["stats"]["total_power"], 25);
    assert_eq!(body["stats"]["total_donations"], 1);
    let donations = body["donations"].as_array().unwrap();
    assert_eq!(donations.len(), 1);
    assert_eq!(donations[0]["donor"], "Max");
}

#[tokio::test]
async fn test_submit_rejects_invalid_amounts() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    for amount in [0, -5] {
        server
            .post("/api/donation/submit")
            .add_header(name.clone(), value.clone())
            .json(&json!({"amount": amount}))
            .await
            .assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_add_power_positive_raises_power() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    let response = server
        .post("/api/donation/add-power")
        .add_header(name, value)
        .json(&json!({"amount": 30, "type": "test", "user": "Tester"}))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["Power"], 30);
    assert_eq!(body["total_donated"], 30);
    assert_eq!(body["level"], 3);
}

#[tokio::test]
async fn test_add_power_accepts_numeric_strings() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    let response = server
        .post("/api/donation/add-power")
        .add_header(name, value)
        .json(&json!({"amount": "12"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["Power"], 12);
}

#[tokio::test]
async fn test_add_power_zero_and_garbage_are_rejected() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    let response = server
        .post("/api/donation/add-power")
        .add_header(name.clone(), value.clone())
        .json(&json!({"amount": 0}))
        .await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"], "Amount must be non-zero");

    server
        .post("/api/donation/add-power")
        .add_header(name, value)
        .json(&json!({"amount": "lots"}))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_add_power_negative_does_not_reduce_power() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    server
        .post("/api/donation/add-power")
        .add_header(name.clone(), value.clone())
        .json(&json!({"amount": 50}))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/donation/add-power")
        .add_header(name.clone(), value.clone())
        .json(&json!({"amount": -20}))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    // Stored power is untouched; the response only reports what it would be
    assert_eq!(body["Power"], 50);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("Power reduction not supported (would be $30)")
    );

    let response = server
        .post("/api/donation/consume-power")
        .add_header(name, value)
        .await;
    assert_eq!(response.json::<Value>()["new_Power"], 50);
}

#[tokio::test]
async fn test_delete_and_restore_round_trip() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    server
        .post("/api/donation/submit")
        .add_header(name.clone(), value.clone())
        .json(&json!({"amount": 40, "donor_name": "Alice"}))
        .await
        .assert_status_ok();

    // Delete the donation (ledger index 0)
    let response = server
        .post("/api/donations/delete/0")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status_ok();
    assert!(
        response.json::<Value>()["message"]
            .as_str()
            .unwrap()
            .contains("deleted")
    );

    let response = server
        .get("/api/donations/list")
        .add_header(name.clone(), value.clone())
        .await;
    let body = response.json::<Value>();
    assert_eq!(body["stats"]["total_power"], 0);
    assert_eq!(body["donations"][0]["deleted"], true);

    // Deleting the tombstone (ledger index 1) restores the donation
    let response = server
        .post("/api/donations/delete/1")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status_ok();
    assert!(
        response.json::<Value>()["message"]
            .as_str()
            .unwrap()
            .contains("restored")
    );

    let response = server
        .get("/api/donations/list")
        .add_header(name, value)
        .await;
    assert_eq!(response.json::<Value>()["stats"]["total_power"], 40);
}

#[tokio::test]
async fn test_delete_out_of_range_is_not_found() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    server
        .post("/api/donations/delete/7")
        .add_header(name, value)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_reset_power_clears_everything() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    server
        .post("/api/donation/submit")
        .add_header(name.clone(), value.clone())
        .json(&json!({"amount": 100}))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/donation/reset-power")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["Power"], 0);
    assert_eq!(body["level"], 1);
    assert_eq!(body["total_donated"], 0);

    let response = server
        .get("/api/donations/list")
        .add_header(name, value)
        .await;
    assert_eq!(response.json::<Value>()["stats"]["total_donations"], 0);
}

#[tokio::test]
async fn test_public_donation_status() {
    let (state, _dir) = common::create_state().await;
    let server = common::server(state);

    let response = server.get("/api/donation/status").await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["enabled"], true);
    assert_eq!(body["level"], 1);
    assert_eq!(body["level_name"], "Scrapling");
    assert_eq!(body["power"], 0);
}
