use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::manager::WsManager;
use crate::ws::protocol::{ClientEvent, ServerEvent};
use ambiente_domain::ReadingService;

/// HTTP handler that upgrades the connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager.clone(), state.readings.clone()))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection as a live subscription.
///   2. Spawns a sender task forwarding messages from the manager channel.
///   3. Answers snapshot and date-filtered requests on the current task.
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, readings: Arc<ReadingService>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: answer subscription requests.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Text(text)) => {
                handle_client_event(&conn_id, text.as_str(), &ws_manager, &readings).await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Answer one inbound request frame. Malformed frames are logged and
/// ignored; they must not tear down the connection.
async fn handle_client_event(
    conn_id: &str,
    text: &str,
    ws_manager: &WsManager,
    readings: &ReadingService,
) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(conn_id = %conn_id, error = %e, "Ignoring malformed client frame");
            return;
        }
    };

    let reply = match event {
        ClientEvent::GetAll => match readings.get_readings().await {
            Ok(all) => ServerEvent::ReadAll(all),
            Err(e) => {
                tracing::error!(conn_id = %conn_id, error = %e, "Snapshot query failed");
                return;
            }
        },
        ClientEvent::GetByDate { date } => match readings.get_readings_by_date(date).await {
            Ok(filtered) => ServerEvent::ReadByDate(filtered),
            Err(e) => {
                tracing::error!(conn_id = %conn_id, error = %e, "Date query failed");
                return;
            }
        },
    };

    match reply.to_json() {
        Ok(frame) => {
            ws_manager.send_to(conn_id, Message::Text(frame.into())).await;
        }
        Err(e) => {
            tracing::error!(conn_id = %conn_id, error = %e, "Failed to serialize reply");
        }
    }
}
