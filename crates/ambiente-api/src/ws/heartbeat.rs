use crate::ws::manager::WsManager;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Interval between keep-alive pings.
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Periodically ping every connection so stale ones surface as send
/// failures in their receive loops. Runs until cancellation.
pub async fn heartbeat_loop(manager: Arc<WsManager>, ctx: CancellationToken) {
    let mut interval = tokio::time::interval(PING_INTERVAL);
    loop {
        tokio::select! {
            _ = ctx.cancelled() => break,
            _ = interval.tick() => {
                manager.ping_all().await;
            }
        }
    }
}
