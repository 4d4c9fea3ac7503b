//! Lifecycle controller.
//!
//! ```text
//! Initializing --bind ok--> Listening --stop signal--> Stopping --drained--> Stopped
//! ```
//!
//! [`Server::bind`] is the Initializing phase: a bind failure is returned to
//! the caller and the server never exists. [`Server::serve`] drives the rest.
//! Only the controller can move the state; anyone may watch it through
//! [`Server::subscribe`].

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};
use tokio::time::Instant;

use httpbench_core::error::{BenchError, Result};

use crate::app_state::AppState;
use crate::config::ServerSection;
use crate::pool::WorkerPool;
use crate::router;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Initializing,
    Listening,
    Stopping,
    Stopped,
}

impl LifecycleState {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Initializing => "initializing",
            LifecycleState::Listening => "listening",
            LifecycleState::Stopping => "stopping",
            LifecycleState::Stopped => "stopped",
        }
    }
}

/// Forward-only state holder. Not exported: observers get a receiver.
struct Lifecycle {
    tx: watch::Sender<LifecycleState>,
}

impl Lifecycle {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(LifecycleState::Initializing);
        Self { tx }
    }

    fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.tx.subscribe()
    }

    /// Move to `next` if it is ahead of the current state.
    fn advance(&self, next: LifecycleState) -> bool {
        let moved = self.tx.send_if_modified(|cur| {
            if next > *cur {
                *cur = next;
                true
            } else {
                false
            }
        });
        if moved {
            tracing::info!(state = next.as_str(), "lifecycle transition");
        }
        moved
    }
}

/// Create a stop trigger and the signal it fires.
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx: Arc::new(tx) }, ShutdownSignal { rx })
}

/// Fires the stop signal. Cloneable; any clone may trigger.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolves once triggered. If every handle is dropped untriggered it
    /// never resolves.
    pub async fn wait(mut self) {
        if self.rx.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

pub struct Server {
    cfg: ServerSection,
    listener: TcpListener,
    local_addr: SocketAddr,
    state: AppState,
    lifecycle: Lifecycle,
}

impl Server {
    /// Validate `cfg`, bind the endpoint, start the pool, and register the
    /// routes. Must run inside a tokio runtime.
    pub async fn bind(cfg: ServerSection) -> Result<Self> {
        cfg.validate()?;
        let lifecycle = Lifecycle::new();

        let addr = cfg.addr();
        let listener = TcpListener::bind((cfg.host.as_str(), cfg.port))
            .await
            .map_err(|source| {
                tracing::error!(%addr, error = %source, "bind failed");
                BenchError::Bind {
                    addr: addr.clone(),
                    source,
                }
            })?;
        let local_addr = listener.local_addr()?;

        let pool = Arc::new(WorkerPool::start(cfg.workers));
        let state = AppState::new(&cfg, pool);

        Ok(Self {
            cfg,
            listener,
            local_addr,
            state,
            lifecycle,
        })
    }

    /// Actual bound address (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.lifecycle.subscribe()
    }

    /// Serve until `shutdown` resolves, then drain and stop.
    ///
    /// After the signal no new connections are accepted; in-flight requests
    /// finish, the pool drains, and the listener is released. With
    /// `drain_timeout_ms` set, whatever is still running when it elapses is
    /// abandoned.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Server {
            cfg,
            listener,
            local_addr,
            state,
            lifecycle,
        } = self;
        let lifecycle = Arc::new(lifecycle);
        let drain_timeout = cfg.drain_timeout_ms.map(Duration::from_millis);

        let app = router::build_router(state.clone());

        state.mark_listening();
        lifecycle.advance(LifecycleState::Listening);
        tracing::info!(
            url = %format!("http://{local_addr}"),
            workers = cfg.workers,
            "httpbench listening"
        );
        for endpoint in state.routes().endpoints() {
            tracing::info!(path = endpoint.path(), "  {}", endpoint.describe());
        }

        // One drain budget covers connections and the pool; it starts when
        // the signal fires.
        let stopped_at: Arc<OnceLock<Instant>> = Arc::new(OnceLock::new());
        let (stopped_tx, stopped_rx) = oneshot::channel::<Instant>();
        let signal = {
            let lifecycle = Arc::clone(&lifecycle);
            let stopped_at = Arc::clone(&stopped_at);
            async move {
                shutdown.await;
                let now = *stopped_at.get_or_init(Instant::now);
                lifecycle.advance(LifecycleState::Stopping);
                tracing::info!("stop signal received; draining connections");
                let _ = stopped_tx.send(now);
            }
        };

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .into_future();
        let result = match drain_timeout {
            None => served.await,
            Some(limit) => {
                tokio::pin!(served);
                tokio::select! {
                    r = &mut served => r,
                    _ = drain_deadline(stopped_rx, limit) => {
                        tracing::warn!(timeout_ms = limit.as_millis() as u64, "connection drain timed out");
                        Ok(())
                    }
                }
            }
        };

        lifecycle.advance(LifecycleState::Stopping);
        let pool_budget =
            drain_timeout.map(|limit| remaining_budget(limit, stopped_at.get().copied()));
        state.pool().stop(pool_budget).await;
        lifecycle.advance(LifecycleState::Stopped);
        tracing::info!(
            total_requests = state.counter().get(),
            "httpbench stopped"
        );

        result.map_err(BenchError::from)
    }
}

async fn drain_deadline(stopped: oneshot::Receiver<Instant>, limit: Duration) {
    match stopped.await {
        Ok(at) => tokio::time::sleep_until(at + limit).await,
        Err(_) => std::future::pending::<()>().await,
    }
}

/// What is left of `limit` for the pool once connections have drained.
/// Without a recorded stop instant the pool gets the whole budget.
fn remaining_budget(limit: Duration, stopped_at: Option<Instant>) -> Duration {
    match stopped_at {
        Some(at) => limit.saturating_sub(at.elapsed()),
        None => limit,
    }
}
