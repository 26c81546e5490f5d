use super::config::ServiceKeyConfig;
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

pub const SERVICE_KEY_HEADER: &str = "x-api-key";

/// Equal-time comparison over fixed-size digests, so neither the content
/// nor the length of the configured key leaks through timing.
fn keys_match(presented: &str, expected: &str) -> bool {
    let a = Sha256::digest(presented.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Admits only requests whose `X-API-Key` matches the configured key.
pub async fn service_key_middleware(
    State(config): State<ServiceKeyConfig>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(SERVICE_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing API key".to_string()))?;

    if !keys_match(presented, &config.api_key) {
        tracing::warn!("Rejected request with invalid service API key");
        return Err(AppError::Unauthorized("Invalid API key".to_string()));
    }

    Ok(next.run(request).await)
}
