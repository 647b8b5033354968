use crate::ws::manager::WsManager;
use crate::ws::protocol::ServerEvent;
use ambiente_domain::{DomainError, DomainResult, Reading, ReadingBroadcaster};
use async_trait::async_trait;
use axum::extract::ws::Message;
use std::sync::Arc;
use tracing::debug;

/// WebSocket implementation of the domain broadcast trait: pushes each
/// accepted reading to every live subscription on `sensors:readAll`.
pub struct WsBroadcaster {
    manager: Arc<WsManager>,
}

impl WsBroadcaster {
    pub fn new(manager: Arc<WsManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl ReadingBroadcaster for WsBroadcaster {
    async fn broadcast(&self, reading: &Reading) -> DomainResult<()> {
        let frame = ServerEvent::ReadAll(vec![reading.clone()])
            .to_json()
            .map_err(|e| DomainError::BroadcastFailed(e.to_string()))?;

        self.manager.broadcast(Message::Text(frame.into())).await;
        let subscribers = self.manager.connection_count().await;
        debug!(subscribers, "Broadcast reading");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn broadcast_reaches_registered_subscriber() {
        let manager = Arc::new(WsManager::new());
        let mut rx = manager.add("conn-1".to_string()).await;

        let broadcaster = WsBroadcaster::new(manager.clone());
        broadcaster
            .broadcast(&Reading {
                lumen: 550.0,
                temperature: 40.0,
                humidity: 65.0,
                captured_at: Utc::now(),
            })
            .await
            .unwrap();

        match rx.recv().await {
            Some(Message::Text(frame)) => {
                let value: serde_json::Value = serde_json::from_str(frame.as_str()).unwrap();
                assert_eq!(value["event"], "sensors:readAll");
                assert_eq!(value["data"][0]["lumen"], 550.0);
            }
            other => panic!("expected text frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn broadcast_without_subscribers_is_a_no_op() {
        let broadcaster = WsBroadcaster::new(Arc::new(WsManager::new()));
        broadcaster
            .broadcast(&Reading {
                lumen: 1.0,
                temperature: 2.0,
                humidity: 3.0,
                captured_at: Utc::now(),
            })
            .await
            .unwrap();
    }
}
