//! Server config loader (strict parsing).
//!
//! Precedence is defaults < YAML file < command line; `apply_overrides`
//! merges the command line on top and re-validates.

pub mod schema;

use std::fs;

use httpbench_core::error::{BenchError, Result};

pub use schema::{BenchConfig, ServerSection};

pub fn load_from_file(path: &str) -> Result<BenchConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| BenchError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<BenchConfig> {
    let cfg: BenchConfig = serde_yaml::from_str(s)
        .map_err(|e| BenchError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Command-line values that win over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub workers: Option<usize>,
}

pub fn apply_overrides(mut cfg: BenchConfig, o: Overrides) -> Result<BenchConfig> {
    if let Some(host) = o.host {
        cfg.server.host = host;
    }
    if let Some(port) = o.port {
        cfg.server.port = port;
    }
    if let Some(workers) = o.workers {
        cfg.server.workers = workers;
    }
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn overrides_win_over_file() {
        let cfg = load_from_str("version: 1\nserver:\n  port: 9000\n  workers: 3\n").unwrap();
        let cfg = apply_overrides(
            cfg,
            Overrides {
                host: Some("0.0.0.0".into()),
                port: None,
                workers: Some(6),
            },
        )
        .unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.workers, 6);
    }

    #[test]
    fn overrides_are_validated() {
        let err = apply_overrides(
            BenchConfig::default(),
            Overrides {
                workers: Some(0),
                ..Overrides::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("server.workers"));
    }

    #[test]
    fn ipv6_addr_is_bracketed() {
        let s = ServerSection {
            host: "::1".into(),
            ..ServerSection::default()
        };
        assert_eq!(s.addr(), "[::1]:8000");
        assert_eq!(ServerSection::default().addr(), "127.0.0.1:8000");
    }
}
