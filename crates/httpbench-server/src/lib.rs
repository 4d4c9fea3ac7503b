//! httpbench server library entry.
//!
//! Wires the route table, handler set, worker pool, and lifecycle controller
//! into a small HTTP benchmarking target. Consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod app_state;
pub mod config;
pub mod handlers;
pub mod lifecycle;
pub mod pool;
pub mod response;
pub mod router;

pub use lifecycle::{shutdown_channel, LifecycleState, Server, ShutdownHandle, ShutdownSignal};
