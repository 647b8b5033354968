use crate::error::ApiError;
use crate::middleware::require_bearer;
use crate::state::AppState;
use crate::ws::ws_handler;
use ambiente_domain::{DomainError, Reading, RegisterUserInput};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveReadingRequest {
    pub lumen: f64,
    pub temperature: f64,
    pub humidity: f64,
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let sensor_routes = Router::new()
        .route("/sensors/get", get(get_readings))
        .route("/sensors/get/{date}", get(get_readings_by_date))
        .route("/sensors/save", post(save_reading))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/ws", get(ws_handler))
        .merge(sensor_routes)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .users
        .register(RegisterUserInput {
            name: request.name,
            email: request.email,
            password: request.password,
        })
        .await?;
    Ok(StatusCode::CREATED)
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = state.users.login(&request.email, &request.password).await?;
    Ok(Json(LoginResponse { token }))
}

async fn get_readings(State(state): State<AppState>) -> Result<Json<Vec<Reading>>, ApiError> {
    let readings = state.readings.get_readings().await?;
    Ok(Json(readings))
}

async fn get_readings_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Reading>>, ApiError> {
    let date: DateTime<Utc> = date
        .parse()
        .map_err(|_| DomainError::MalformedPayload(format!("invalid date: {}", date)))?;

    let readings = state.readings.get_readings_by_date(date).await?;
    Ok(Json(readings))
}

/// Enqueues the submitted reading on the ingestion stream; persistence,
/// alerting and broadcast happen in the pipeline, exactly as for readings
/// arriving from the queue.
async fn save_reading(
    State(state): State<AppState>,
    Json(request): Json<SaveReadingRequest>,
) -> Result<StatusCode, ApiError> {
    let reading = Reading {
        lumen: request.lumen,
        temperature: request.temperature,
        humidity: request.humidity,
        captured_at: request.captured_at.unwrap_or_else(Utc::now),
    };

    state.publisher.publish(&reading).await?;
    Ok(StatusCode::ACCEPTED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::WsManager;
    use ambiente_domain::auth::{MockAuthTokenProvider, MockPasswordService};
    use ambiente_domain::repository::{
        MockReadingPublisher, MockReadingStore, MockUserRepository,
    };
    use ambiente_domain::{ReadingService, UserService};
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(store: MockReadingStore, tokens: MockAuthTokenProvider) -> AppState {
        state_with_publisher(store, tokens, MockReadingPublisher::new())
    }

    fn state_with_publisher(
        store: MockReadingStore,
        tokens: MockAuthTokenProvider,
        publisher: MockReadingPublisher,
    ) -> AppState {
        let store = Arc::new(store);
        AppState {
            readings: Arc::new(ReadingService::new(store)),
            publisher: Arc::new(publisher),
            users: Arc::new(UserService::new(
                Arc::new(MockUserRepository::new()),
                Arc::new(MockPasswordService::new()),
                Arc::new(MockAuthTokenProvider::new()),
            )),
            token_provider: Arc::new(tokens),
            ws_manager: Arc::new(WsManager::new()),
        }
    }

    #[tokio::test]
    async fn health_is_open() {
        let app = router(state(MockReadingStore::new(), MockAuthTokenProvider::new()));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn sensor_routes_require_a_bearer_token() {
        let app = router(state(MockReadingStore::new(), MockAuthTokenProvider::new()));
        let response = app
            .oneshot(Request::get("/sensors/get").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_reaches_the_store() {
        let mut store = MockReadingStore::new();
        store.expect_get_all().times(1).return_once(|| Ok(vec![]));

        let mut tokens = MockAuthTokenProvider::new();
        tokens
            .expect_validate_token()
            .withf(|token: &str| token == "good-token")
            .times(1)
            .return_once(|_| Ok("user-1".to_string()));

        let app = router(state(store, tokens));
        let response = app
            .oneshot(
                Request::get("/sensors/get")
                    .header("Authorization", "Bearer good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn save_enqueues_on_the_stream_instead_of_writing_the_store() {
        let store = MockReadingStore::new();

        let mut publisher = MockReadingPublisher::new();
        publisher
            .expect_publish()
            .withf(|r: &Reading| r.temperature == 22.0 && r.lumen == 550.0)
            .times(1)
            .return_once(|_| Ok(()));

        let mut tokens = MockAuthTokenProvider::new();
        tokens
            .expect_validate_token()
            .returning(|_| Ok("user-1".to_string()));

        let app = router(state_with_publisher(store, tokens, publisher));
        let response = app
            .oneshot(
                Request::post("/sensors/save")
                    .header("Authorization", "Bearer good-token")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"lumen":550.0,"temperature":22.0,"humidity":65.0}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn invalid_date_is_a_bad_request() {
        let mut tokens = MockAuthTokenProvider::new();
        tokens
            .expect_validate_token()
            .returning(|_| Ok("user-1".to_string()));

        let app = router(state(MockReadingStore::new(), tokens));
        let response = app
            .oneshot(
                Request::get("/sensors/get/not-a-date")
                    .header("Authorization", "Bearer good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
