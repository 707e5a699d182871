#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use eventra_auth::{
    build_router,
    config::{
        Config, DatabaseConfig, Environment, GoogleOAuthConfig, JwtConfig, PasswordPolicy,
        SecurityConfig,
    },
    services::{InMemoryRevocationList, InMemoryUserStore, TokenRevocationList, UserStore},
    AppState,
};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

pub fn test_config() -> Config {
    Config {
        environment: Environment::Dev,
        service_name: "eventra-auth-test".to_string(),
        log_level: "error".to_string(),
        port: 8080,
        database: DatabaseConfig { url: None },
        jwt: JwtConfig {
            secret: "integration-test-signing-secret".to_string(),
            token_expiry_hours: 2,
        },
        security: SecurityConfig {
            allowed_origin: ALLOWED_ORIGIN.to_string(),
            origin_gated_paths: vec!["/login".to_string()],
            frontend_url: ALLOWED_ORIGIN.to_string(),
        },
        password_policy: PasswordPolicy::default(),
        google: GoogleOAuthConfig {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost:8080/oauth/google/callback".to_string(),
        },
    }
}

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<InMemoryUserStore>,
    pub revocation_list: Arc<InMemoryRevocationList>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(InMemoryUserStore::new());
    let revocation_list = Arc::new(InMemoryRevocationList::new());
    let state = AppState::new(
        test_config(),
        store.clone() as Arc<dyn UserStore>,
        revocation_list.clone() as Arc<dyn TokenRevocationList>,
    );
    let app = build_router(state.clone());
    TestApp {
        app,
        state,
        store,
        revocation_list,
    }
}

/// Register an account directly through the service layer.
pub async fn register_user(state: &AppState, email: &str, password: &str, role: Option<&str>) {
    state
        .auth_service
        .signup(eventra_auth::dtos::auth::SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            role: role.map(str::to_string),
        })
        .await
        .expect("Failed to register test user");
}

/// POST /login with the allowed origin and return the issued token.
pub async fn login_for_token(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::ORIGIN, ALLOWED_ORIGIN)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(
                    r#"{{"email":"{}","password":"{}"}}"#,
                    email, password
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success(), "Login failed in test setup");
    let body = body_json(response).await;
    body["token"].as_str().expect("No token in response").to_string()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not valid JSON")
}

/// Value of the first `set-cookie` header whose name matches, if any.
pub fn cookie_value(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let (pair, _) = cookie.split_once(';').unwrap_or((cookie, ""));
            let (cookie_name, cookie_value) = pair.split_once('=')?;
            (cookie_name.trim() == name).then(|| cookie_value.to_string())
        })
}
