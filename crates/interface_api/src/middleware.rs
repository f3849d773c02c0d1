//! API middleware

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::auth::{bearer_token, AuthError, Claims};
use crate::error::ApiError;
use crate::AppState;

/// Authentication middleware
///
/// Validates the bearer token, checks that its subject is still a known
/// user and stores the claims in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = bearer_token(header).inspect_err(|_| {
        warn!("Missing or invalid Authorization header");
    })?;

    let claims = state.tokens.validate_token(token).inspect_err(|e| {
        warn!(error = %e, "Token validation failed");
    })?;

    let user = state
        .users
        .find_by_email(&claims.sub)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if user.is_none() {
        warn!(subject = %claims.sub, "Token subject is not a known user");
        return Err(AuthError::UnknownUser.into());
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Audit logging middleware
///
/// Logs every authenticated request with its caller and outcome
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let user = request
        .extensions()
        .get::<Claims>()
        .map(|c| c.sub.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        user = %user,
        status = status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        "API request"
    );

    response
}
