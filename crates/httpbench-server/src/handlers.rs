//! The fixed handler set.
//!
//! Each endpoint is one variant of [`Endpoint`]; [`Endpoint::handle`] is the
//! shared contract. Handlers are synchronous and run on a pool worker. Every
//! variant counts itself exactly once before building its body, so the
//! counter tracks attempts rather than successes.

use axum::http::Method;
use bytes::Bytes;

use httpbench_core::error::Result;
use httpbench_core::payload::{encode, JsonPayload, RootPayload, StatsPayload};

use crate::app_state::AppState;

/// Reported as `runtime_version` by `/stats`.
pub const RUNTIME_VERSION: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (rust, tokio)"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Root,
    Json,
    Stats,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Root, Endpoint::Json, Endpoint::Stats];

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Root => "/",
            Endpoint::Json => "/json",
            Endpoint::Stats => "/stats",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Root => "root",
            Endpoint::Json => "json",
            Endpoint::Stats => "stats",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Endpoint::Root => "simple message",
            Endpoint::Json => "synthetic JSON payload",
            Endpoint::Stats => "server statistics",
        }
    }

    /// Produce the response body for one request.
    pub fn handle(self, app: &AppState, _req: &RequestHandle) -> Result<Bytes> {
        match self {
            Endpoint::Root => root(app),
            Endpoint::Json => json(app),
            Endpoint::Stats => stats(app),
        }
    }
}

/// What a handler gets to see of the request. None of the current
/// handlers read it.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    method: Method,
    path: String,
}

impl RequestHandle {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

fn root(app: &AppState) -> Result<Bytes> {
    app.counter().increment();
    encode(&RootPayload::hello())
}

fn json(app: &AppState) -> Result<Bytes> {
    app.counter().increment();
    let payload = JsonPayload::generate(
        &mut rand::thread_rng(),
        app.clock().now_millis(),
        app.metadata().clone(),
    );
    encode(&payload)
}

// Reports the total seen before this call: a /stats request counts itself
// but does not see itself.
fn stats(app: &AppState) -> Result<Bytes> {
    let total_requests = app.counter().increment();
    encode(&StatsPayload {
        total_requests,
        uptime: app.uptime_secs(),
        runtime_version: RUNTIME_VERSION.to_string(),
    })
}
