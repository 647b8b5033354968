use crate::routes::router;
use crate::state::AppState;
use anyhow::Context;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Serve the HTTP and WebSocket API until the token is cancelled.
pub async fn serve(state: AppState, addr: SocketAddr, ctx: CancellationToken) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind api listener on {}", addr))?;

    info!(address = %addr, "api server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { ctx.cancelled().await })
        .await
        .context("api server error")?;

    info!("api server stopped");

    Ok(())
}
