//! Validated JSON extractor for automatic request validation.
//!
//! `ValidatedJson<T>` deserializes the body and runs the `validator` rules
//! before the handler sees it. Both a body that fails to decode and a body
//! that fails validation are answered with 422 Unprocessable Entity.

use crate::responses::error_response;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, OriginalUri, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use keystone_core::{validation_errors_to_field_errors, ErrorResponse};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON extractor that automatically validates the deserialized value.
///
/// # Example
///
/// ```ignore
/// use keystone_rest::extractors::ValidatedJson;
///
/// async fn create_user(ValidatedJson(request): ValidatedJson<CreateUserRequest>) {
///     // request is guaranteed to be valid here
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// JSON parsing/deserialization error.
    JsonError { rejection: JsonRejection, path: String },
    /// Validation error with field-level details.
    ValidationError { errors: ValidationErrors, path: String },
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let body = match self {
            Self::JsonError { rejection, path } => ErrorResponse {
                code: "INVALID_JSON".to_string(),
                message: format!("Invalid JSON: {}", rejection.body_text()),
                details: None,
                path: Some(path),
            },
            Self::ValidationError { errors, path } => ErrorResponse {
                code: "VALIDATION_ERROR".to_string(),
                message: "Request validation failed".to_string(),
                details: Some(validation_errors_to_field_errors(&errors)),
                path: Some(path),
            },
        };

        error_response(StatusCode::UNPROCESSABLE_ENTITY, body)
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers see a stripped uri; report the path the client sent.
        let path = req
            .extensions()
            .get::<OriginalUri>()
            .map_or_else(|| req.uri().path(), |uri| uri.0.path())
            .to_string();

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ValidatedJsonRejection::JsonError {
                rejection,
                path: path.clone(),
            })?;

        value
            .validate()
            .map_err(|errors| ValidatedJsonRejection::ValidationError { errors, path })?;

        Ok(ValidatedJson(value))
    }
}
