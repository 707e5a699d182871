mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{body_json, cookie_value, register_user, test_app, ALLOWED_ORIGIN};
use tower::util::ServiceExt;

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(format!(
            r#"{{"email":"{}","password":"{}"}}"#,
            email, password
        )))
        .unwrap()
}

fn register_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_login_success_returns_token_and_session_cookie() {
    let t = test_app();
    register_user(&t.state, "alice@example.com", "Strong1!", None).await;

    let response = t
        .app
        .oneshot(login_request("alice@example.com", "Strong1!"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookie = cookie_value(&response, "jwtToken").expect("No session cookie set");
    assert!(!cookie.is_empty());

    let raw_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(raw_cookie.contains("HttpOnly"));
    assert!(raw_cookie.contains("SameSite=Lax"));
    assert!(raw_cookie.contains("Path=/"));

    let body = body_json(response).await;
    assert_eq!(body["email"], "alice@example.com");
    assert!(body["token"].as_str().is_some());
    assert!(body["roles"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("USER")));
    assert!(body["permissions"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("VIEW_EVENT")));
}

#[tokio::test]
async fn test_login_failure_is_generic_for_unknown_email_and_wrong_password() {
    let t = test_app();
    register_user(&t.state, "alice@example.com", "Strong1!", None).await;

    let unknown = t
        .app
        .clone()
        .oneshot(login_request("nobody@example.com", "Strong1!"))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown_body = body_json(unknown).await;

    let wrong = t
        .app
        .oneshot(login_request("alice@example.com", "WrongPass1!"))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong_body = body_json(wrong).await;

    // Neither response may reveal which factor failed
    assert_eq!(unknown_body, wrong_body);
    assert_eq!(unknown_body["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_register_success_and_duplicate_conflict() {
    let t = test_app();

    let response = t
        .app
        .clone()
        .oneshot(register_request(
            r#"{"email":"bob@example.com","password":"Strong1!"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User registered successfully");

    // Same email with different casing conflicts
    let duplicate = t
        .app
        .oneshot(register_request(
            r#"{"email":"BOB@EXAMPLE.COM","password":"Strong1!"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let t = test_app();

    let response = t
        .app
        .oneshot(register_request(
            r#"{"email":"bob@example.com","password":"Weak1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let t = test_app();

    let response = t
        .app
        .oneshot(register_request(
            r#"{"email":"not-an-email","password":"Strong1!"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_ignores_disallowed_role() {
    let t = test_app();

    let response = t
        .app
        .clone()
        .oneshot(register_request(
            r#"{"email":"eve@example.com","password":"Strong1!","role":"EVENT_MANAGER"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let login = t
        .app
        .oneshot(login_request("eve@example.com", "Strong1!"))
        .await
        .unwrap();
    let body = body_json(login).await;
    assert_eq!(body["roles"], serde_json::json!(["USER"]));
}
