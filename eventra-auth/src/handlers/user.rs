use axum::Json;
use serde::Serialize;

use crate::middleware::AuthUser;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub email: String,
    pub authorities: Vec<String>,
}

/// The authenticated caller's identity and current authorities.
/// Unauthenticated requests are rejected by the [`AuthUser`] extractor.
pub async fn get_me(AuthUser(ctx): AuthUser) -> Json<MeResponse> {
    let mut authorities: Vec<String> = ctx.authorities.iter().cloned().collect();
    authorities.sort();

    Json(MeResponse {
        email: ctx.subject,
        authorities,
    })
}
