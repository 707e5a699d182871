use axum::{
    extract::{FromRequest, Request},
    Json,
};
use eventra_core::error::AppError;
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor that runs the DTO's `validator` rules after
/// deserialization. Both failure modes reject through the shared error
/// taxonomy: an unparsable body is a 400, a rule violation a 422.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Malformed JSON body: {}", e)))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
