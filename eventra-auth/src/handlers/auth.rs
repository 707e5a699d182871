use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use eventra_core::error::AppError;

use crate::{
    dtos::auth::{LoginRequest, MessageResponse, SignupRequest},
    middleware::bearer_token,
    utils::ValidatedJson,
    AppState,
};

pub const SESSION_COOKIE: &str = "jwtToken";

/// Build the HTTP-only session cookie carrying a token.
pub fn session_cookie(token: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_seconds))
        .build()
}

fn cleared_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Login with email and password. On success the issued token is both
/// returned in the body and set as the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state.auth_service.login(req).await?;
    let jar = jar.add(session_cookie(
        res.token.clone(),
        state.jwt.token_expiry_seconds(),
    ));
    Ok((jar, (StatusCode::OK, Json(res))))
}

/// Register a new account.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state.auth_service.signup(req).await?;
    Ok((StatusCode::OK, Json(res)))
}

/// Logout: revoke the session token if it is still valid and clear the
/// cookie. Always succeeds — an absent or stale token means the caller
/// is already logged out.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> impl IntoResponse {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| bearer_token(&headers).map(str::to_string));

    let message = match token {
        Some(token) => {
            state.auth_service.logout(&token);
            "Logout successful"
        }
        None => "Already logged out",
    };

    let jar = jar.add(cleared_session_cookie());
    (
        jar,
        (
            StatusCode::OK,
            Json(MessageResponse {
                message: message.to_string(),
            }),
        ),
    )
}

/// Whether the request's cookie carries a currently valid, unrevoked
/// token.
pub async fn check_cookie_authentication(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Json<bool> {
    let authenticated = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value())
        .map(|token| state.jwt.is_valid(token) && !state.revocation_list.is_revoked(token))
        .unwrap_or(false);

    Json(authenticated)
}
