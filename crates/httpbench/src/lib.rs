//! Top-level facade crate for httpbench.
//!
//! Re-exports the core types and the server library so users can depend on a single crate.

pub mod core {
    pub use httpbench_core::*;
}

pub mod server {
    pub use httpbench_server::*;
}
