//! Shared application state for the httpbench server.
//!
//! Built once by the lifecycle controller and handed to the router; every
//! handler invocation reaches the counter, clock, and pool through it.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use httpbench_core::clock::WallClock;
use httpbench_core::counter::RequestCounter;
use httpbench_core::payload::Metadata;

use crate::config::ServerSection;
use crate::pool::WorkerPool;
use crate::router::RouteTable;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    pool: Arc<WorkerPool>,
}

struct AppStateInner {
    counter: RequestCounter,
    clock: WallClock,
    metadata: Metadata,
    routes: RouteTable,
    listening_since: OnceLock<Instant>,
}

impl AppState {
    pub fn new(cfg: &ServerSection, pool: Arc<WorkerPool>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                counter: RequestCounter::new(),
                clock: WallClock::new(),
                metadata: Metadata::new(cfg.name.clone()),
                routes: RouteTable::standard(),
                listening_since: OnceLock::new(),
            }),
            pool,
        }
    }

    pub fn counter(&self) -> &RequestCounter {
        &self.inner.counter
    }

    pub fn clock(&self) -> &WallClock {
        &self.inner.clock
    }

    pub fn metadata(&self) -> &Metadata {
        &self.inner.metadata
    }

    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    pub fn pool(&self) -> Arc<WorkerPool> {
        Arc::clone(&self.pool)
    }

    /// Start the uptime clock. Only the first call has an effect.
    pub(crate) fn mark_listening(&self) {
        let _ = self.inner.listening_since.set(Instant::now());
    }

    /// Seconds since the server reached Listening; 0 before that.
    pub fn uptime_secs(&self) -> f64 {
        self.inner
            .listening_since
            .get()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}
