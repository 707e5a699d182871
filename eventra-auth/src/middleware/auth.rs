use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};

use crate::{
    dtos::ErrorResponse,
    models::{authorities_of, AuthContext, RoleName},
    AppState,
};

/// Extract the bearer token from an `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Token authentication stage of the request pipeline.
///
/// A token is accepted iff its signature verifies, it has not expired,
/// and it is not on the revocation list. Accepted tokens get an
/// [`AuthContext`] attached to the request; everything else (missing
/// header, malformed, expired, forged, revoked) lets the request
/// continue anonymously — protected endpoints reject the anonymous
/// context themselves. A bad token is data here, never an error.
pub async fn token_authentication_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    // Another identity-setting mechanism may already have run.
    if req.extensions().get::<AuthContext>().is_none() {
        if let Some(token) = bearer_token(req.headers()) {
            if state.jwt.is_valid(token) && !state.revocation_list.is_revoked(token) {
                if let Ok(claims) = state.jwt.verify(token) {
                    if let Some(ctx) = resolve_context(&state, &claims.sub).await {
                        req.extensions_mut().insert(ctx);
                    }
                }
            }
        }
    }

    next.run(req).await
}

/// Resolve a token subject to an identity context. Authorities reflect
/// the identity's role assignment at validation time, not at token
/// issuance. A subject with no local credential is a federated-login
/// user: synthesize a minimal identity with the default USER
/// authorities rather than failing.
async fn resolve_context(state: &AppState, subject: &str) -> Option<AuthContext> {
    match state.store.find_by_email(subject).await {
        Ok(Some(user)) if user.enabled => Some(AuthContext::new(
            user.email.clone(),
            authorities_of(&user.roles),
        )),
        Ok(Some(_)) => {
            tracing::warn!(email = %subject, "Token for disabled account, treating as anonymous");
            None
        }
        Ok(None) => Some(AuthContext::new(
            subject.to_string(),
            authorities_of(&[RoleName::User]),
        )),
        Err(e) => {
            tracing::error!(error = %e, "Credential store lookup failed, treating as anonymous");
            None
        }
    }
}

/// Extractor for handlers that require an authenticated identity.
/// Rejects with 401 when the pipeline attached no context.
pub struct AuthUser(pub AuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts.extensions.get::<AuthContext>().ok_or((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Authentication required".to_string(),
            }),
        ))?;

        Ok(AuthUser(ctx.clone()))
    }
}
