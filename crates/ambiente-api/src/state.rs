use crate::ws::WsManager;
use ambiente_domain::{AuthTokenProvider, ReadingPublisher, ReadingService, UserService};
use std::sync::Arc;

/// Shared application state for the HTTP and WebSocket surface.
#[derive(Clone)]
pub struct AppState {
    pub readings: Arc<ReadingService>,
    pub publisher: Arc<dyn ReadingPublisher>,
    pub users: Arc<UserService>,
    pub token_provider: Arc<dyn AuthTokenProvider>,
    pub ws_manager: Arc<WsManager>,
}
