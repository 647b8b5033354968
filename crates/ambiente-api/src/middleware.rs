use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

/// Bearer-token guard for the sensor routes.
///
/// Rejects requests without a valid `Authorization: Bearer <token>` header;
/// the validated user id is attached to request extensions for handlers
/// that want it.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let user_id = state
        .token_provider
        .validate_token(token)
        .map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            StatusCode::UNAUTHORIZED
        })?;

    request.extensions_mut().insert(user_id);
    Ok(next.run(request).await)
}
