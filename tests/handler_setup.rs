mod common;

use serde_json::Value;

#[tokio::test]
async fn test_setup_page_served_while_unconfigured() {
    let (state, _dir) = common::create_state().await;
    let server = common::server(state);

    let response = server.get("/setup").await;
    response.assert_status_ok();
    assert!(response.text().contains("Complete setup"));
}

#[tokio::test]
async fn test_setup_page_redirects_once_configured() {
    let (state, _dir) = common::create_configured_state().await;
    let server = common::server(state);

    let response = server.get("/setup").await;
    assert!(response.status_code().is_redirection());
}

#[tokio::test]
async fn test_setup_validation_failures() {
    let (state, _dir) = common::create_state().await;
    let server = common::server(state);

    let cases = [
        (("", ""), "required"),
        (("abcdef", "different"), "do not match"),
        (("short", "short"), "at least 6 characters"),
    ];

    for ((password, confirm), expected) in cases {
        let response = server
            .post("/setup")
            .form(&[("password", password), ("confirm_password", confirm)])
            .await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains(expected));
    }
}

#[tokio::test]
async fn test_setup_flow_enables_login() {
    let (state, _dir) = common::create_state().await;
    let server = common::server(state);

    // Protected routes are locked before setup
    server.get("/api/mech/status").await.assert_status_unauthorized();

    let response = server
        .post("/setup")
        .form(&[
            ("password", common::TEST_PASSWORD),
            ("confirm_password", common::TEST_PASSWORD),
        ])
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("admin"));

    // Repeating setup is refused
    let response = server
        .post("/setup")
        .form(&[
            ("password", "other-password"),
            ("confirm_password", "other-password"),
        ])
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("not allowed"));

    // The new credentials work on protected routes
    let (name, value) = common::auth_header();
    server
        .get("/api/mech/status")
        .add_header(name, value)
        .await
        .assert_status_ok();
}
