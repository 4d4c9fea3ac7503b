//! JSON response payloads and their encoder.
//!
//! One payload type per endpoint. Payloads are built per request, encoded
//! once into `Bytes`, and dropped; nothing here is shared between requests.

use bytes::Bytes;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Fixed body of the root endpoint.
pub const HELLO: &str = "Hello World";
/// Number of random samples in a `/json` payload.
pub const VALUES_LEN: usize = 10;
/// Inclusive upper bound of the `/json` id.
pub const MAX_ID: u32 = 1000;

const ITEM_NAME: &str = "Test Item";

/// `/` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootPayload {
    pub message: String,
}

impl RootPayload {
    pub fn hello() -> Self {
        Self {
            message: HELLO.to_string(),
        }
    }
}

/// Static identification embedded in every `/json` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub server: String,
    pub version: String,
    pub status: String,
}

impl Metadata {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            version: "1.0".to_string(),
            status: "active".to_string(),
        }
    }
}

/// `/json` body: a synthetic item with random content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonPayload {
    pub id: u32,
    pub name: String,
    /// Epoch millis.
    pub timestamp: u64,
    pub values: [f64; VALUES_LEN],
    pub metadata: Metadata,
}

impl JsonPayload {
    /// Build a payload from `rng`. `id` lands in `[1, MAX_ID]`, each value in `[0, 1)`.
    pub fn generate<R: Rng>(rng: &mut R, timestamp: u64, metadata: Metadata) -> Self {
        let mut values = [0.0; VALUES_LEN];
        for v in values.iter_mut() {
            *v = rng.gen::<f64>();
        }
        Self {
            id: rng.gen_range(1..=MAX_ID),
            name: ITEM_NAME.to_string(),
            timestamp,
            values,
            metadata,
        }
    }
}

/// `/stats` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsPayload {
    pub total_requests: u64,
    /// Seconds since the server started listening.
    pub uptime: f64,
    pub runtime_version: String,
}

/// Serialize a payload into response bytes.
pub fn encode<T: Serialize>(payload: &T) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(payload)?))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn root_is_byte_stable() {
        let a = encode(&RootPayload::hello()).unwrap();
        let b = encode(&RootPayload::hello()).unwrap();
        assert_eq!(&a[..], br#"{"message":"Hello World"}"#);
        assert_eq!(a, b);
    }

    #[test]
    fn json_field_order_and_metadata() {
        let mut rng = StdRng::seed_from_u64(7);
        let p = JsonPayload::generate(&mut rng, 42, Metadata::new("Rust axum"));
        let s = String::from_utf8(encode(&p).unwrap().to_vec()).unwrap();
        assert!(s.starts_with(r#"{"id":"#));
        assert!(s.contains(r#""name":"Test Item","timestamp":42,"values":["#));
        assert!(s.ends_with(
            r#""metadata":{"server":"Rust axum","version":"1.0","status":"active"}}"#
        ));
    }

    #[test]
    fn stats_keys() {
        let p = StatsPayload {
            total_requests: 3,
            uptime: 1.5,
            runtime_version: "x".into(),
        };
        let v: serde_json::Value = serde_json::from_slice(&encode(&p).unwrap()).unwrap();
        assert_eq!(v["total_requests"], 3);
        assert_eq!(v["uptime"], 1.5);
        assert_eq!(v["runtime_version"], "x");
    }
}
