//! Login handler

use axum::{extract::State, Json};
use tracing::{info, warn};
use validator::Validate;

use core_kernel::FieldViolation;

use crate::dto::auth::{LoginRequest, LoginResponse};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::AppState;

/// Returned for an unknown email and for a wrong password alike
pub const BAD_CREDENTIALS_MSG: &str = "Invalid email or password.";

/// Exchanges valid credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request
        .validate()
        .map_err(|errors| ApiError::invalid_fields(violations(&errors)))?;

    let user = state
        .users
        .find_by_email(&request.email)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let Some(user) = user else {
        warn!("Login attempt for unknown email");
        return Err(ApiError::Business(BAD_CREDENTIALS_MSG.to_string()));
    };

    // argon2 is CPU-bound; keep it off the async workers
    let password = request.password;
    let (user, verified) = tokio::task::spawn_blocking(move || {
        let verified = user.verify_password(&password);
        (user, verified)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?;
    let verified = verified.map_err(|e| ApiError::Internal(e.to_string()))?;
    if !verified {
        warn!(user_id = %user.id, "Login attempt with wrong password");
        return Err(ApiError::Business(BAD_CREDENTIALS_MSG.to_string()));
    }

    let token = state.tokens.create_token(&user.email)?;
    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        name: user.name,
        token,
    }))
}

fn violations(errors: &validator::ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                FieldViolation::new(field.to_string(), message)
            })
        })
        .collect();
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}
