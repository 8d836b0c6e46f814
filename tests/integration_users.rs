mod common;

use axum::http::StatusCode;
use serde_json::json;

use ratingsapp_core::permissions::Permissions;
use ratingsapp_db::RoleRepository;
use ratingsapp_models::Role;

use common::{TestApp, json_request, setup_test_app};

/// Principal holding exactly `permissions` through a fresh role.
async fn user_with_permissions(app: &TestApp, email: &str, permissions: Permissions) -> String {
    let mut role = Role {
        label: format!("role for {email}"),
        permissions,
        ..Default::default()
    };
    app.repositories.roles.create(&mut role).await.unwrap();
    let user = app.create_test_user(email, role.id).await;
    app.access_token(&user)
}

#[tokio::test]
async fn test_missing_bearer_is_unauthorized() {
    let app = setup_test_app();

    let response = app.send(json_request("GET", "/api/v1/users/", None, None)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, json!({ "error": "unauthorized" }));

    let response = app
        .send(json_request("GET", "/api/v1/users/", Some("not-a-jwt"), None))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_insufficient_permissions_are_forbidden() {
    let app = setup_test_app();
    let reader = user_with_permissions(&app, "reader@example.com", Permissions::READ_USERS).await;

    let response = app
        .send(json_request("GET", "/api/v1/users/", Some(&reader), None))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .send(json_request(
            "POST",
            "/api/v1/users/",
            Some(&reader),
            Some(json!({
                "email": "new@example.com",
                "firstName": "New",
                "password": "long-enough"
            })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, json!({ "error": "forbidden" }));
}

#[tokio::test]
async fn test_plain_user_cannot_read_users() {
    let app = setup_test_app();
    let user = app.create_test_user("plain@example.com", 2).await;

    let response = app
        .send(json_request("GET", "/api/v1/users/", Some(&app.access_token(&user)), None))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_update_delete_user() {
    let app = setup_test_app();
    let token = app.access_token(&app.admin().await);

    let response = app
        .send(json_request(
            "POST",
            "/api/v1/users/",
            Some(&token),
            Some(json!({
                "email": "  Jane@Example.com ",
                "firstName": "Jane",
                "password": "long-enough"
            })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["email"], "jane@example.com");
    assert_eq!(response.body["roleId"], 2);
    assert_eq!(response.body["role"]["label"], "user");
    assert!(response.body.get("password").is_none());
    let id = response.body["id"].as_i64().unwrap();

    let response = app
        .send(json_request(
            "PUT",
            &format!("/api/v1/users/{id}"),
            Some(&token),
            Some(json!({
                "email": "jane@example.com",
                "firstName": "Janet",
                "roleId": 1
            })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["firstName"], "Janet");
    assert_eq!(response.body["role"]["permissions"], json!(["readUsers", "writeUsers", "readRatings", "writeRatings"]));

    let response = app
        .send(json_request("DELETE", &format!("/api/v1/users/{id}"), Some(&token), None))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .send(json_request("GET", &format!("/api/v1/users/{id}"), Some(&token), None))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({ "error": "not_found" }));
}

#[tokio::test]
async fn test_validation_errors_are_reported_per_field() {
    let app = setup_test_app();
    let token = app.access_token(&app.admin().await);

    let response = app
        .send(json_request(
            "POST",
            "/api/v1/users/",
            Some(&token),
            Some(json!({ "email": "nope", "firstName": "J", "roleId": 77 })),
        ))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body,
        json!({
            "error": "validation_error",
            "fields": {
                "email": "invalid",
                "firstName": "too_short",
                "password": "required",
                "roleId": "reference_not_found"
            }
        })
    );
}

#[tokio::test]
async fn test_duplicate_email() {
    let app = setup_test_app();
    let token = app.access_token(&app.admin().await);

    let response = app
        .send(json_request(
            "POST",
            "/api/v1/users/",
            Some(&token),
            Some(json!({
                "email": "ADMIN@admin.com",
                "firstName": "Copy",
                "password": "long-enough"
            })),
        ))
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["fields"], json!({ "email": "is_duplicate" }));
}

#[tokio::test]
async fn test_super_admin_is_read_only() {
    let app = setup_test_app();
    let token = app.access_token(&app.admin().await);

    let response = app
        .send(json_request(
            "PUT",
            "/api/v1/users/1",
            Some(&token),
            Some(json!({ "email": "admin@admin.com", "firstName": "Root" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body, json!({ "error": "read_only" }));

    let response = app
        .send(json_request("DELETE", "/api/v1/users/1", Some(&token), None))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_by_ids() {
    let app = setup_test_app();
    let token = app.access_token(&app.admin().await);
    let other = app.create_test_user("other@example.com", 2).await;

    let response = app
        .send(json_request(
            "GET",
            &format!("/api/v1/users/?id=1,{},999", other.id),
            Some(&token),
            None,
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 2);

    let response = app
        .send(json_request("GET", "/api/v1/users/?id=1,abc", Some(&token), None))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["fields"], json!({ "id": "invalid_parse" }));
}

#[tokio::test]
async fn test_non_numeric_path_id() {
    let app = setup_test_app();
    let token = app.access_token(&app.admin().await);

    let response = app
        .send(json_request("GET", "/api/v1/users/abc", Some(&token), None))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_negotiation() {
    let app = setup_test_app();
    let token = app.access_token(&app.admin().await);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/users/")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "text/plain")
        .body(axum::body::Body::from("hello"))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::NOT_ACCEPTABLE);

    let request = axum::http::Request::builder()
        .uri("/api/v1/users/")
        .header("authorization", format!("Bearer {token}"))
        .header("accept", "text/html")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(response.body, json!({ "error": "not_acceptable" }));

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/users/")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, json!({ "error": "invalid_json" }));
}
