use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::{dtos::ErrorResponse, AppState};

/// Origin validation for state-changing endpoints.
///
/// Runs ahead of token authentication so that a cross-origin login
/// attempt is rejected before any credential checking happens. Only
/// the configured paths (by default `/login`) are gated; everything
/// else passes through untouched.
pub async fn origin_validation_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let gated = state
        .config
        .security
        .origin_gated_paths
        .iter()
        .any(|p| p == req.uri().path());

    if gated {
        let origin = req
            .headers()
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok());

        match origin {
            Some(origin) if origin == state.config.security.allowed_origin => {}
            _ => {
                tracing::warn!(
                    path = %req.uri().path(),
                    origin = origin.unwrap_or("<none>"),
                    "Rejected request from forbidden origin"
                );
                return (
                    StatusCode::FORBIDDEN,
                    Json(ErrorResponse {
                        error: "Forbidden origin".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    }

    next.run(req).await
}
