//! API-key authentication for the REST surface.
//!
//! Every non-health route requires an `x-api-key` header matching the key
//! configured in the environment. The key identifies the deployment, not the
//! reporter; per-user identity arrives as the opaque `reported_by` field and
//! is passed through untouched.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use std::env;

/// Validates the provided API key against the expected API key from environment.
///
/// Returns `Ok(())` if the key is valid, or an error if invalid or missing.
pub fn validate_api_key(provided_key: &str) -> Result<(), (StatusCode, &'static str)> {
    let expected_key = env::var("API_KEY").map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "API_KEY not set in environment",
        )
    })?;

    if provided_key == expected_key {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "Invalid API key"))
    }
}

/// Axum middleware enforcing the `x-api-key` header.
pub async fn require_api_key(
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let provided = req
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    validate_api_key(provided)?;
    Ok(next.run(req).await)
}
