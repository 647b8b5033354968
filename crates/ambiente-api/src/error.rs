use ambiente_domain::DomainError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Maps domain failures onto HTTP responses.
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            DomainError::InvalidCredentials | DomainError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            DomainError::UserNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            DomainError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Auth failures carry no detail.
        let message = match &self.0 {
            DomainError::InvalidCredentials | DomainError::InvalidToken(_) => {
                "unauthorized".to_string()
            }
            e => e.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(e: DomainError) -> StatusCode {
        ApiError(e).into_response().status()
    }

    #[test]
    fn domain_errors_map_to_expected_statuses() {
        assert_eq!(
            status_of(DomainError::MalformedPayload("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(DomainError::UserAlreadyExists("a@b.com".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::StoreUnavailable("down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(DomainError::StoreRejected("bad row".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
