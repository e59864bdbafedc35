//! User controller.

use crate::{
    extractors::ValidatedJson,
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use keystone_core::KeystoneError;
use keystone_service::{CreateUserRequest, UserResponse};
use tracing::{debug, warn};

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/:id", get(get_user))
}

/// Create a new user.
async fn create_user(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    debug!("Create user request: {}", request.email);

    let outcome = state
        .user_service
        .create_user(request)
        .await
        .map_err(|e| AppError::from(e).with_path(uri.path()))?;

    if let Some(warning) = &outcome.cache_warning {
        warn!(key = %warning.key, reason = %warning.reason, "User created but not cached");
    }

    Ok(created(UserResponse::from(outcome.user)))
}

/// Get a user by ID.
async fn get_user(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> ApiResult<UserResponse> {
    debug!("Get user request: {}", id);

    let with_path = |e: KeystoneError| AppError::from(e).with_path(uri.path());

    let id = parse_user_id(&id).map_err(with_path)?;
    let user = state.user_service.get_user(id).await.map_err(with_path)?;

    ok(UserResponse::from(user))
}

/// Parses the raw path segment. Range checks happen in the service.
fn parse_user_id(id: &str) -> Result<i64, KeystoneError> {
    id.parse::<i64>().map_err(|_| KeystoneError::InvalidIdentifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("42").unwrap(), 42);
        assert_eq!(parse_user_id("-3").unwrap(), -3);
        assert!(matches!(parse_user_id("abc"), Err(KeystoneError::InvalidIdentifier)));
        assert!(matches!(parse_user_id(""), Err(KeystoneError::InvalidIdentifier)));
        assert!(matches!(
            parse_user_id("99999999999999999999"),
            Err(KeystoneError::InvalidIdentifier)
        ));
    }
}
