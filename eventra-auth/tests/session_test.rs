mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{body_json, cookie_value, login_for_token, register_user, test_app};
use tower::util::ServiceExt;

fn logout_request(cookie: Option<&str>, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/logout");
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("jwtToken={}", token));
    }
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn check_cookie_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("GET")
        .uri("/check-cookie-authentication");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("jwtToken={}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_check_cookie_authentication_reflects_session_state() {
    let t = test_app();
    register_user(&t.state, "alice@example.com", "Strong1!", None).await;
    let token = login_for_token(&t.app, "alice@example.com", "Strong1!").await;

    // No cookie
    let response = t
        .app
        .clone()
        .oneshot(check_cookie_request(None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!(false));

    // Valid cookie
    let response = t
        .app
        .clone()
        .oneshot(check_cookie_request(Some(&token)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, serde_json::json!(true));

    // Garbage cookie
    let response = t
        .app
        .oneshot(check_cookie_request(Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, serde_json::json!(false));
}

#[tokio::test]
async fn test_logout_revokes_session_and_clears_cookie() {
    let t = test_app();
    register_user(&t.state, "alice@example.com", "Strong1!", None).await;
    let token = login_for_token(&t.app, "alice@example.com", "Strong1!").await;

    let response = t
        .app
        .clone()
        .oneshot(logout_request(Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Cookie cleared
    let cleared = cookie_value(&response, "jwtToken").expect("No clearing cookie set");
    assert!(cleared.is_empty());
    let body = body_json(response).await;
    assert_eq!(body["message"], "Logout successful");

    // Session is gone even though the token itself has not expired
    assert!(t.state.jwt.is_valid(&token));
    let check = t
        .app
        .clone()
        .oneshot(check_cookie_request(Some(&token)))
        .await
        .unwrap();
    assert_eq!(body_json(check).await, serde_json::json!(false));

    // And the revoked token no longer authenticates bearer requests
    let me = t
        .app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_via_bearer_header() {
    let t = test_app();
    register_user(&t.state, "alice@example.com", "Strong1!", None).await;
    let token = login_for_token(&t.app, "alice@example.com", "Strong1!").await;

    let response = t
        .app
        .clone()
        .oneshot(logout_request(None, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let check = t
        .app
        .oneshot(check_cookie_request(Some(&token)))
        .await
        .unwrap();
    assert_eq!(body_json(check).await, serde_json::json!(false));
}

#[tokio::test]
async fn test_logout_without_session_succeeds() {
    let t = test_app();

    let response = t
        .app
        .clone()
        .oneshot(logout_request(None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Already logged out");

    // Stale token is a no-op, never an error
    let response = t
        .app
        .oneshot(logout_request(Some("not-a-jwt"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let t = test_app();
    register_user(&t.state, "alice@example.com", "Strong1!", None).await;
    let token = login_for_token(&t.app, "alice@example.com", "Strong1!").await;

    for _ in 0..2 {
        let response = t
            .app
            .clone()
            .oneshot(logout_request(Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
