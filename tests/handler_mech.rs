mod common;

use serde_json::{Value, json};

#[tokio::test]
async fn test_difficulty_defaults_to_dynamic() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    let response = server
        .get("/api/mech/difficulty")
        .add_header(name, value)
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["difficulty_multiplier"], 1.0);
    assert_eq!(body["mode"], "dynamic");
}

#[tokio::test]
async fn test_difficulty_set_and_reset() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    let response = server
        .post("/api/mech/difficulty")
        .add_header(name.clone(), value.clone())
        .json(&json!({"difficulty_multiplier": 2.5, "manual_override": true}))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["mode"], "static");
    assert_eq!(body["difficulty_multiplier"], 2.5);

    // Get reflects the override
    let response = server
        .get("/api/mech/difficulty")
        .add_header(name.clone(), value.clone())
        .await;
    assert_eq!(response.json::<Value>()["difficulty_multiplier"], 2.5);

    // Setting without manual_override returns to dynamic mode
    let response = server
        .post("/api/mech/difficulty")
        .add_header(name.clone(), value.clone())
        .json(&json!({"difficulty_multiplier": 9.9, "manual_override": false}))
        .await;
    assert_eq!(response.json::<Value>()["mode"], "dynamic");

    // Explicit reset endpoint
    server
        .post("/api/mech/difficulty")
        .add_header(name.clone(), value.clone())
        .json(&json!({"difficulty_multiplier": 3.0, "manual_override": true}))
        .await
        .assert_status_ok();
    let response = server
        .post("/api/mech/difficulty/reset")
        .add_header(name, value)
        .await;
    assert_eq!(response.json::<Value>()["mode"], "dynamic");
}

#[tokio::test]
async fn test_difficulty_validation() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    server
        .post("/api/mech/difficulty")
        .add_header(name.clone(), value.clone())
        .json(&json!({"manual_override": true}))
        .await
        .assert_status_bad_request();

    server
        .post("/api/mech/difficulty")
        .add_header(name, value)
        .json(&json!({"difficulty_multiplier": 50.0, "manual_override": true}))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_mech_status_and_reset() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    server
        .post("/api/donation/add-power")
        .add_header(name.clone(), value.clone())
        .json(&json!({"amount": 60}))
        .await
        .assert_status_ok();

    let response = server
        .get("/api/mech/status")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["status"]["current_level"], 4);
    assert_eq!(body["status"]["total_donated"], 60);

    let response = server
        .post("/api/mech/reset")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["previous_status"]["current_level"], 4);
    assert!(body["operations"].as_array().unwrap().len() >= 2);

    let response = server
        .get("/api/mech/status")
        .add_header(name, value)
        .await;
    assert_eq!(response.json::<Value>()["status"]["current_level"], 1);
}

#[tokio::test]
async fn test_speed_config() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    let response = server
        .post("/api/mech-speed-config")
        .add_header(name, value)
        .json(&json!({"total_donations": 120}))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["total_donations"], 120);
    assert!(body["level"].as_u64().unwrap() >= 4);
    assert!(body["speed"].as_f64().unwrap() >= 0.25);
    assert!(body["frame_delay_ms"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_simulate_broadcast_is_a_stub() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);
    let (name, value) = common::auth_header();

    let response = server
        .post("/api/simulate-donation-broadcast")
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    assert!(
        response.json::<Value>()["message"]
            .as_str()
            .unwrap()
            .contains("not yet implemented")
    );
}

#[tokio::test]
async fn test_music_endpoints_are_public() {
    let (state, _dir) = common::create_state().await;
    let server = common::server(state);

    let response = server.get("/api/mech/music/5").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["level"], 5);
    assert_eq!(body["platform"], "YouTube");
    assert!(body["url"].as_str().unwrap().contains("youtube.com"));

    server.get("/api/mech/music/12").await.assert_status_not_found();

    let response = server.get("/api/mech/music/info").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["total_tracks"], 11);
}

#[tokio::test]
async fn test_display_image_serving() {
    let (state, _dir) = common::create_state().await;
    let server = common::server(state);

    let response = server.get("/api/mech/display/3/unlocked").await;
    response.assert_status_ok();
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/webp"
    );
    assert_eq!(
        response.headers().get("etag").unwrap(),
        "mech-3-unlocked"
    );
    let bytes = response.as_bytes();
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WEBP");

    server
        .get("/api/mech/display/3/sprite")
        .await
        .assert_status_bad_request();
    server
        .get("/api/mech/display/12/shadow")
        .await
        .assert_status_bad_request();

    let response = server.get("/api/mech/display/info").await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["cached_images"]["3"]["unlocked"]["available"], true);
}

#[tokio::test]
async fn test_live_animation_is_a_gif() {
    let (state, _dir) = common::create_state().await;
    let server = common::server(state);

    let response = server.get("/mech_animation").await;
    response.assert_status_ok();
    assert_eq!(response.headers().get("content-type").unwrap(), "image/gif");
    assert_eq!(&response.as_bytes()[0..4], b"GIF8");
}

#[tokio::test]
async fn test_test_animation_requires_auth_and_renders() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);

    server
        .post("/api/test-mech-animation")
        .json(&json!({"total_donations": 200}))
        .await
        .assert_status_unauthorized();

    let (name, value) = common::auth_header();
    let response = server
        .post("/api/test-mech-animation")
        .add_header(name, value)
        .json(&json!({"donor_name": "Tester", "amount": "10", "total_donations": 200}))
        .await;
    response.assert_status_ok();
    assert_eq!(&response.as_bytes()[0..4], b"GIF8");
}
