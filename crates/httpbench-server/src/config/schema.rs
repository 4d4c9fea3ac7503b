use serde::Deserialize;
use httpbench_core::error::{BenchError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(BenchError::BadConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Upper bound on the shutdown drain. Absent means wait for every
    /// in-flight request.
    #[serde(default)]
    pub drain_timeout_ms: Option<u64>,

    /// Reported as `metadata.server` by `/json`.
    #[serde(default = "default_name")]
    pub name: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            drain_timeout_ms: None,
            name: default_name(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(BenchError::BadConfig("server.host must not be empty".into()));
        }
        if !(1..=1024).contains(&self.workers) {
            return Err(BenchError::BadConfig(
                "server.workers must be between 1 and 1024".into(),
            ));
        }
        if self.drain_timeout_ms == Some(0) {
            return Err(BenchError::BadConfig(
                "server.drain_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.name.is_empty() {
            return Err(BenchError::BadConfig("server.name must not be empty".into()));
        }
        Ok(())
    }

    /// `host:port` as given, for logs and bind errors.
    pub fn addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}
fn default_workers() -> usize {
    10
}
fn default_name() -> String {
    "Rust axum".into()
}
