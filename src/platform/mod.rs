//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger installation
//! - Wall-clock timestamps (leaderboard entries, save envelopes)
//! - Default storage backend

use crate::persistence::KeyValueStore;

/// Install the platform logger. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // Err means a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Install the platform logger. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Unix timestamp in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Unix timestamp in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Default store for this platform
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn KeyValueStore> {
    Box::new(crate::persistence::LocalStorageStore::new())
}

/// Default store for this platform (`OFF_COLOR_DATA_DIR`, else `.off-color`)
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn KeyValueStore> {
    let dir = std::env::var("OFF_COLOR_DATA_DIR").unwrap_or_else(|_| ".off-color".to_string());
    Box::new(crate::persistence::FileStore::new(dir))
}
