//! Concurrent process runner with graceful shutdown.
//!
//! The runner owns a set of long-running app processes and a set of closers.
//! Processes run concurrently until one fails or a shutdown signal arrives;
//! closers then run with a bounded timeout regardless of how the processes
//! stopped. `run` returns the first process error so the binary decides the
//! exit code.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// A long-running process driven by a cancellation token.
pub type AppProcess = Box<
    dyn FnOnce(CancellationToken) -> Pin<Box<dyn Future<Output = Result<(), anyhow::Error>> + Send>>
        + Send,
>;

/// A cleanup function executed after all processes stop.
pub type Closer =
    Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = Result<(), anyhow::Error>> + Send>> + Send>;

pub struct Runner {
    app_processes: Vec<AppProcess>,
    closers: Vec<Closer>,
    closer_timeout: Duration,
    cancellation_token: CancellationToken,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self {
            app_processes: Vec::new(),
            closers: Vec::new(),
            closer_timeout: Duration::from_secs(10),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Adds an app process. If any process returns an error, all others are
    /// cancelled and closers run.
    pub fn with_app_process<F, Fut>(mut self, process: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
    {
        self.app_processes.push(Box::new(|token| Box::pin(process(token))));
        self
    }

    /// Adds a boxed app process, for callers that build processes dynamically.
    pub fn with_boxed_app_process(mut self, process: AppProcess) -> Self {
        self.app_processes.push(process);
        self
    }

    /// Adds a closer. Closers run after every process has stopped, and all of
    /// them are attempted even when some fail.
    pub fn with_closer<F, Fut>(mut self, closer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
    {
        self.closers.push(Box::new(|| Box::pin(closer())));
        self
    }

    /// Bounds how long the closers may take as a group. Default is 10s.
    pub fn with_closer_timeout(mut self, timeout: Duration) -> Self {
        self.closer_timeout = timeout;
        self
    }

    /// Uses an externally-owned cancellation token, letting callers trigger
    /// shutdown without a signal.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Runs every process to completion or shutdown, then runs the closers.
    ///
    /// Returns the first process error, if any. Signal handling (SIGINT and,
    /// on unix, SIGTERM) cancels the shared token.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let token = self.cancellation_token;
        let mut join_set = JoinSet::new();

        for process in self.app_processes {
            let process_token = token.clone();
            join_set.spawn(async move { process(process_token).await });
        }

        let signal_token = token.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("received shutdown signal");
                    signal_token.cancel();
                }
                Err(err) => {
                    tracing::error!(error = %err, "failed to install signal handler");
                }
            }
        });

        #[cfg(unix)]
        {
            let sigterm_token = token.clone();
            tokio::spawn(async move {
                use tokio::signal::unix::{signal, SignalKind};
                match signal(SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        sigterm.recv().await;
                        tracing::info!("received SIGTERM");
                        sigterm_token.cancel();
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "failed to install SIGTERM handler");
                    }
                }
            });
        }

        let mut first_error = None;
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(Ok(())) => {
                    tracing::debug!("app process finished");
                }
                Ok(Err(err)) => {
                    tracing::error!(error = format!("{:#}", err), "app process failed");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                    token.cancel();
                }
                Err(err) => {
                    tracing::error!(error = %err, "app process panicked");
                    if first_error.is_none() {
                        first_error = Some(anyhow::anyhow!("app process panicked: {err}"));
                    }
                    token.cancel();
                }
            }
        }

        if !self.closers.is_empty() {
            let closed =
                tokio::time::timeout(self.closer_timeout, Self::run_closers(self.closers)).await;
            match closed {
                Ok(()) => tracing::info!("closers finished"),
                Err(_) => {
                    tracing::error!(timeout = ?self.closer_timeout, "closers timed out");
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn run_closers(closers: Vec<Closer>) {
        let mut closer_set = JoinSet::new();

        for closer in closers {
            closer_set.spawn(async move { closer().await });
        }

        while let Some(result) = closer_set.join_next().await {
            match result {
                Ok(Ok(())) => tracing::debug!("closer finished"),
                Ok(Err(err)) => {
                    tracing::error!(error = format!("{:#}", err), "closer failed");
                }
                Err(err) => tracing::error!(error = %err, "closer panicked"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn cancelled_processes_stop_and_closers_run() {
        let closer_called = Arc::new(AtomicBool::new(false));
        let flag = closer_called.clone();

        let token = CancellationToken::new();
        let trigger = token.clone();

        let runner = Runner::new()
            .with_app_process(|ctx| async move {
                ctx.cancelled().await;
                Ok(())
            })
            .with_closer(move || async move {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            })
            .with_cancellation_token(token)
            .with_closer_timeout(Duration::from_secs(1));

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = runner.run().await;
        assert!(result.is_ok());
        assert!(closer_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn failing_process_cancels_the_rest_and_surfaces_the_error() {
        let peer_stopped = Arc::new(AtomicBool::new(false));
        let peer_flag = peer_stopped.clone();

        let runner = Runner::new()
            .with_app_process(|_ctx| async move { Err(anyhow::anyhow!("boom")) })
            .with_app_process(move |ctx| async move {
                ctx.cancelled().await;
                peer_flag.store(true, Ordering::SeqCst);
                Ok(())
            });

        let result = runner.run().await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "boom");
        assert!(peer_stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn all_closers_run_even_when_one_fails() {
        let ran = Arc::new(AtomicUsize::new(0));
        let a = ran.clone();
        let b = ran.clone();

        let runner = Runner::new()
            .with_closer(move || async move {
                a.fetch_add(1, Ordering::SeqCst);
                Err(anyhow::anyhow!("close failed"))
            })
            .with_closer(move || async move {
                b.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });

        Runner::run_closers(runner.closers).await;
        assert_eq!(ran.load(Ordering::SeqCst), 2);
    }
}
