use super::jwt::JwtAuth;
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Token from `Authorization: Bearer <t>`, falling back to the
/// `access_token` cookie.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    bearer.or_else(|| {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == ACCESS_TOKEN_COOKIE && !value.is_empty()).then_some(value)
            })
    })
}

/// Rejects the request with 401 unless it carries a valid access token.
/// On success the [`JwtClaims`](super::JwtClaims) are stored in the
/// request extensions for [`AuthUser`](super::AuthUser) and
/// [`AdminUser`](super::AdminUser).
///
/// ```ignore
/// let protected = Router::new()
///     .route("/products", get(list))
///     .layer(axum::middleware::from_fn_with_state(jwt.clone(), jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))?;

    let claims = auth.verify_token(token).map_err(|e| {
        tracing::debug!("JWT verification failed: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
