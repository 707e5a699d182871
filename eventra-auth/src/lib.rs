pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use eventra_core::middleware::{request_id_middleware, security_headers_middleware};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::services::{AuthService, JwtService, TokenRevocationList, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn UserStore>,
    pub jwt: JwtService,
    pub revocation_list: Arc<dyn TokenRevocationList>,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn UserStore>,
        revocation_list: Arc<dyn TokenRevocationList>,
    ) -> Self {
        let jwt = JwtService::new(&config.jwt);
        let auth_service = AuthService::new(
            store.clone(),
            jwt.clone(),
            revocation_list.clone(),
            config.password_policy.clone(),
        );
        Self {
            config,
            store,
            jwt,
            revocation_list,
            auth_service,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let allowed_origin = state
        .config
        .security
        .allowed_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|e| {
            tracing::error!(
                "Invalid CORS origin '{}': {}. Using fallback.",
                state.config.security.allowed_origin,
                e
            );
            HeaderValue::from_static("http://localhost:3000")
        });

    Router::new()
        .route("/health", get(health_check))
        .route("/login", post(handlers::auth::login))
        .route("/register", post(handlers::auth::register))
        .route("/logout", post(handlers::auth::logout))
        .route(
            "/check-cookie-authentication",
            get(handlers::auth::check_cookie_authentication),
        )
        .route("/oauth/google", get(handlers::social::google_login))
        .route(
            "/oauth/google/callback",
            get(handlers::social::google_callback),
        )
        .route("/me", get(handlers::user::get_me))
        .with_state(state.clone())
        // Pipeline order (outermost last): origin check runs before
        // token authentication, which runs before any handler.
        .layer(from_fn_with_state(
            state.clone(),
            middleware::token_authentication_middleware,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::origin_validation_middleware,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(eventra_core::middleware::REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(allowed_origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        )
}

/// Service liveness check.
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
    }))
}
