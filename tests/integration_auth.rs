mod common;

use axum::http::StatusCode;
use std::time::{Duration, Instant};

use common::{ADMIN_EMAIL, TEST_PASSWORD, form_request, json_request, setup_test_app};

const TOKEN_URI: &str = "/api/v1/oauth/token/";

#[tokio::test]
async fn test_password_grant_success() {
    let app = setup_test_app();

    let response = app
        .send(form_request(
            TOKEN_URI,
            &format!("grant_type=password&email=%20ADMIN%40admin.com%20&password={TEST_PASSWORD}"),
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["expires_in"], 21600);
    assert_eq!(response.body["token_type"], "bearer");
    let access_token = response.body["access_token"].as_str().unwrap();
    assert!(response.body["refresh_token"].as_str().is_some());

    // the access token opens the resource routes
    let response = app
        .send(json_request("GET", "/api/v1/users/1", Some(access_token), None))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], ADMIN_EMAIL);
    assert!(response.body.get("password").is_none());
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let app = setup_test_app();

    for form in [
        "grant_type=password&email=admin%40admin.com&password=wrongpass",
        "grant_type=password&email=ghost%40nowhere.com&password=wrongpass",
        "grant_type=password&email=not-an-email&password=wrongpass",
    ] {
        let started = Instant::now();
        let response = app.send(form_request(TOKEN_URI, form)).await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{form}");
        assert_eq!(response.body["error"], "invalid_client");
        assert!(started.elapsed() >= Duration::from_millis(500));
    }
}

#[tokio::test]
async fn test_missing_credentials() {
    let app = setup_test_app();

    let response = app
        .send(form_request(TOKEN_URI, "grant_type=password&email=admin%40admin.com"))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "invalid_request");
    assert_eq!(response.body["error_description"], "credentials_not_provided");
}

#[tokio::test]
async fn test_unsupported_grant_type() {
    let app = setup_test_app();

    let response = app
        .send(form_request(TOKEN_URI, "grant_type=client_credentials"))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "unsupported_grant_type");
}

#[tokio::test]
async fn test_json_body_is_refused() {
    let app = setup_test_app();

    let response = app
        .send(json_request(
            "POST",
            TOKEN_URI,
            None,
            Some(serde_json::json!({ "grant_type": "password" })),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "invalid_request");
    assert_eq!(response.body["error_description"], "content_type_not_accepted");
}

#[tokio::test]
async fn test_refresh_grant() {
    let app = setup_test_app();
    let admin = app.admin().await;

    let refresh_token = app.refresh_token(&admin);
    let response = app
        .send(form_request(
            TOKEN_URI,
            &format!("grant_type=refresh_token&refresh_token={refresh_token}"),
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["access_token"].as_str().is_some());

    // an access token is not a refresh token
    let access_token = app.access_token(&admin);
    let response = app
        .send(form_request(
            TOKEN_URI,
            &format!("grant_type=refresh_token&refresh_token={access_token}"),
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "invalid_client");
}

#[tokio::test]
async fn test_refresh_token_is_not_a_bearer() {
    let app = setup_test_app();
    let admin = app.admin().await;

    let response = app
        .send(json_request(
            "GET",
            "/api/v1/users/",
            Some(&app.refresh_token(&admin)),
            None,
        ))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "unauthorized");
}

#[tokio::test]
async fn test_deactivated_principal_loses_outstanding_tokens() {
    let app = setup_test_app();
    let mut member = app.create_test_user("member@example.com", 2).await;
    let access_token = app.access_token(&member);
    let refresh_token = app.refresh_token(&member);

    let uri = "/api/v1/ratings/?target=1";
    let response = app
        .send(json_request("GET", uri, Some(&access_token), None))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    member.active = false;
    app.repositories.users.update(&member).await.unwrap();

    let response = app
        .send(json_request("GET", uri, Some(&access_token), None))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "unauthorized");

    let response = app
        .send(form_request(
            TOKEN_URI,
            &format!("grant_type=refresh_token&refresh_token={refresh_token}"),
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "invalid_client");
}

#[tokio::test]
async fn test_token_of_deleted_principal_is_refused() {
    let app = setup_test_app();
    let departed = app.create_test_user("departed@example.com", 2).await;
    let access_token = app.access_token(&departed);
    app.repositories.users.delete(departed.id).await.unwrap();

    let newcomer = app.create_test_user("newcomer@example.com", 2).await;
    assert_ne!(newcomer.id, departed.id);

    let response = app
        .send(json_request(
            "GET",
            "/api/v1/ratings/?target=1",
            Some(&access_token),
            None,
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
