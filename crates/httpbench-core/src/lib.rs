//! httpbench core: request accounting, response payloads, and the shared error surface.
//!
//! This crate holds everything a handler needs that is independent of the
//! HTTP transport: the atomic request counter, the wall clock used for
//! payload timestamps, and the JSON payload encoder. It carries no runtime or
//! transport dependencies so the payload contracts can be tested in isolation.
//!
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod clock;
pub mod counter;
pub mod error;
pub mod payload;

/// Shared result type.
pub use error::{Result, BenchError};
