// ── Runtime connection configuration ──
//
// Describes *where* the backend lives. Never touches disk; the TUI builds a
// `BackendConfig` from the resolved profile and hands it in.

use std::time::Duration;

use url::Url;

/// Configuration for connecting to a single backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Backend origin (e.g. `http://localhost:8080`). `/api/` is appended
    /// by the client.
    pub url: Url,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl BackendConfig {
    pub fn new(url: Url) -> Self {
        Self { url, timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
