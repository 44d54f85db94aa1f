//! Bearer-token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Gate for every protected route.
///
/// Verifies the session token from the `Authorization` header and stores the
/// resulting `Identity` in the request extensions, where handlers pick it up
/// with `Extension<Identity>`. A missing, malformed, expired or forged token
/// ends the request with 401 before any handler runs.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)?;

    let identity = state.auth_service.verify_token(token.trim())?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
