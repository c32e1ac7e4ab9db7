use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has passed its `validator` rules
///
/// Malformed JSON is a 400; a well-formed body that breaks a rule is a 422.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                tracing::debug!("Rejected request body: {}", rejection.body_text());
                AppError::InvalidInput(rejection.body_text())
            })?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Path parameters; a value that does not parse is a 400 with a JSON body
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// Query string parameters; rejections are reported like [`Path`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

/// Clamp pagination parameters to sane bounds
pub fn page(skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    use crate::constants::{DEFAULT_LIMIT, DEFAULT_SKIP, MAX_LIMIT};

    let skip = skip.unwrap_or(DEFAULT_SKIP).max(0);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(0, MAX_LIMIT);
    (skip, limit)
}
