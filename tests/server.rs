use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use directory_purge::{
    filter::UsernamePattern,
    server::{router, AppState},
    Client,
};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(server: &MockServer) -> Router {
    let client = Client::builder()
        .no_env()
        .with_client_id("id")
        .with_client_secret("secret")
        .with_refresh_token("refresh")
        .with_token_url(server.url("/token"))
        .with_directory_url(server.base_url())
        .build()
        .unwrap();
    let pattern = UsernamePattern::new("chatgpt.nyc.mn", 8).unwrap();
    router(AppState::new(client, pattern))
}

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(200).json_body(json!({ "access_token": "ya29.t" }));
        })
        .await
}

async fn send(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn index_serves_control_page() {
    let server = MockServer::start_async().await;
    let (status, body) = send(app(&server), Method::GET, "/", "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/api/listByUsernamePattern"));
    assert!(body.contains("/api/deleteUser"));
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let server = MockServer::start_async().await;
    let token = mock_token(&server).await;

    let (status, body) = send(app(&server), Method::GET, "/unknown", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not Found");

    let (status, _) = send(app(&server), Method::POST, "/api/listByUsernamePattern", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app(&server), Method::GET, "/api/deleteUser", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app(&server), Method::DELETE, "/", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app(&server), Method::HEAD, "/", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app(&server), Method::HEAD, "/api/listByUsernamePattern", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    token.assert_hits_async(0).await;
}

#[tokio::test]
async fn list_returns_only_matching_users() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/admin/directory/v1/users")
                .query_param("domain", "chatgpt.nyc.mn")
                .header("authorization", "Bearer ya29.t");
            then.status(200).json_body(json!({
                "users": [
                    { "primaryEmail": "abc12345@chatgpt.nyc.mn", "id": "1", "isAdmin": false },
                    { "primaryEmail": "abc1234@chatgpt.nyc.mn", "id": "2" },
                    { "primaryEmail": "abc-12345@chatgpt.nyc.mn", "id": "3" },
                    { "primaryEmail": "abc12345@other.com", "id": "4" },
                    { "id": "5" }
                ]
            }));
        })
        .await;

    let (status, body) = send(app(&server), Method::GET, "/api/listByUsernamePattern", "").await;
    assert_eq!(status, StatusCode::OK);
    let users: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        users,
        json!([{ "primaryEmail": "abc12345@chatgpt.nyc.mn", "id": "1", "isAdmin": false }])
    );

    list.assert_hits_async(1).await;
}

#[tokio::test]
async fn list_reports_upstream_failure() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/admin/directory/v1/users");
            then.status(403).body("Not Authorized to access this resource/api");
        })
        .await;

    let (status, body) = send(app(&server), Method::GET, "/api/listByUsernamePattern", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Not Authorized to access this resource/api"));
}

#[tokio::test]
async fn list_reports_token_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(400).body(r#"{"error":"invalid_grant"}"#);
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/admin/directory/v1/users");
            then.status(200).json_body(json!({}));
        })
        .await;

    let (status, body) = send(app(&server), Method::GET, "/api/listByUsernamePattern", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("invalid_grant"));

    list.assert_hits_async(0).await;
}

#[tokio::test]
async fn delete_without_email_is_bad_request() {
    let server = MockServer::start_async().await;
    let token = mock_token(&server).await;

    let (status, _) = send(app(&server), Method::POST, "/api/deleteUser", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app(&server), Method::POST, "/api/deleteUser", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    token.assert_hits_async(0).await;
}

#[tokio::test]
async fn delete_reports_upstream_failure() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path_contains("/admin/directory/v1/users/x");
            then.status(404).body("Resource Not Found: userKey");
        })
        .await;

    let (status, body) = send(
        app(&server),
        Method::POST,
        "/api/deleteUser",
        r#"{"email":"x@y.com"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Resource Not Found: userKey"));
}

#[tokio::test]
async fn delete_reports_token_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(400).body(r#"{"error":"invalid_grant"}"#);
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path_contains("/admin/directory/v1/users/");
            then.status(204);
        })
        .await;

    let (status, body) = send(
        app(&server),
        Method::POST,
        "/api/deleteUser",
        r#"{"email":"x@y.com"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("invalid_grant"));

    delete.assert_hits_async(0).await;
}

#[tokio::test]
async fn delete_succeeds() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path_contains("/admin/directory/v1/users/x")
                .header("authorization", "Bearer ya29.t");
            then.status(204);
        })
        .await;

    let (status, body) = send(
        app(&server),
        Method::POST,
        "/api/deleteUser",
        r#"{"email":"x@y.com"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "deleted");

    delete.assert_hits_async(1).await;
}
