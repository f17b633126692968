use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;

use crate::error::AppError;
use crate::validation::FromPayload;

/// JSON body checked against `T`'s payload rules before the handler runs.
///
/// Malformed JSON is a `BadRequest`; a well-formed body that fails validation
/// is rejected with every failing field.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: FromPayload + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        match T::from_payload(&payload) {
            Ok(value) => Ok(ValidatedJson(value)),
            Err(errors) => {
                tracing::debug!("Rejected payload: {}", errors);
                Err(AppError::Validation(errors))
            }
        }
    }
}
