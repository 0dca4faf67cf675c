//! Versioned JSON wrapper for stored values

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Payload schema version
    pub version: u32,
    /// Unix timestamp (ms) of the save
    #[serde(default)]
    pub saved_at: f64,
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn new(version: u32, payload: T) -> Self {
        Self {
            version,
            saved_at: crate::platform::now_ms(),
            payload,
        }
    }
}
