//! Where the warehouse backend lives.

use std::env;

/// Used when nothing else names a backend. Matches a stock local server.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8069";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and port of the backend, without a trailing path.
    pub backend_url: String,
}

impl ClientConfig {
    /// Resolves the backend address.
    ///
    /// # Resolution order
    /// - `WAREHOUSE_BACKEND_URL` in the runtime environment (native targets).
    /// - `WAREHOUSE_BACKEND_URL` at build time (the only option in wasm).
    /// - `fallback()`, e.g. the page origin when served by the backend itself.
    pub fn from_env_or(fallback: impl FnOnce() -> String) -> Self {
        let backend_url = env::var("WAREHOUSE_BACKEND_URL")
            .ok()
            .or_else(|| option_env!("WAREHOUSE_BACKEND_URL").map(str::to_string))
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(fallback);

        Self { backend_url }
    }

    pub fn from_env() -> Self {
        Self::from_env_or(|| DEFAULT_BACKEND_URL.to_string())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
