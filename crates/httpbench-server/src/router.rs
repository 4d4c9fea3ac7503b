//! Request routing.
//!
//! [`RouteTable`] is the immutable path → [`Endpoint`] map built at startup.
//! axum only supplies the HTTP plumbing: every request lands in one fallback
//! handler that resolves the path here and schedules the handler on the
//! worker pool.

use std::collections::HashMap;

use axum::{
    extract::State,
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Router,
};

use httpbench_core::error::BenchError;

use crate::app_state::AppState;
use crate::handlers::{Endpoint, RequestHandle};
use crate::response::{json_ok, ErrorResponse};

/// Exact-match routes. Paths are disjoint by construction.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<&'static str, Endpoint>,
}

impl RouteTable {
    /// `/`, `/json`, `/stats`.
    pub fn standard() -> Self {
        Self {
            routes: Endpoint::ALL.into_iter().map(|e| (e.path(), e)).collect(),
        }
    }

    pub fn resolve(&self, path: &str) -> Option<Endpoint> {
        self.routes.get(path).copied()
    }

    /// Registered endpoints ordered by path.
    pub fn endpoints(&self) -> Vec<Endpoint> {
        let mut v: Vec<Endpoint> = self.routes.values().copied().collect();
        v.sort_by_key(|e| e.path());
        v
    }

}

pub fn build_router(state: AppState) -> Router {
    Router::new().fallback(route_request).with_state(state)
}

async fn route_request(State(app): State<AppState>, method: Method, uri: Uri) -> Response {
    let req = RequestHandle::new(method, uri.path());
    match app.routes().resolve(req.path()) {
        Some(endpoint) => dispatch(app, endpoint, req).await,
        None => {
            tracing::debug!(method = %req.method(), path = %req.path(), "no route");
            ErrorResponse::from(BenchError::NotFound(req.path().to_string())).into_response()
        }
    }
}

/// Run `endpoint` on the worker pool and render its result.
pub async fn dispatch(app: AppState, endpoint: Endpoint, req: RequestHandle) -> Response {
    let pool = app.pool();
    let result = pool
        .run(move || endpoint.handle(&app, &req))
        .await
        .and_then(|r| r);

    match result {
        Ok(body) => {
            tracing::debug!(endpoint = endpoint.name(), "request served");
            json_ok(body)
        }
        Err(e) => {
            tracing::warn!(endpoint = endpoint.name(), error = %e, "request failed");
            ErrorResponse::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_exact_paths_only() {
        let t = RouteTable::standard();
        assert_eq!(t.endpoints().len(), 3);
        assert_eq!(t.resolve("/"), Some(Endpoint::Root));
        assert_eq!(t.resolve("/json"), Some(Endpoint::Json));
        assert_eq!(t.resolve("/stats"), Some(Endpoint::Stats));
        assert_eq!(t.resolve("/nope"), None);
        assert_eq!(t.resolve("/json/"), None);
        assert_eq!(t.resolve("/stats/extra"), None);
        assert_eq!(t.resolve(""), None);
    }

    #[test]
    fn endpoints_are_sorted_by_path() {
        let paths: Vec<_> = RouteTable::standard()
            .endpoints()
            .into_iter()
            .map(|e| e.path())
            .collect();
        assert_eq!(paths, vec!["/", "/json", "/stats"]);
    }
}
