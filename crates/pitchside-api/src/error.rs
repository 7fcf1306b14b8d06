use thiserror::Error;

/// Top-level error type for the `pitchside-api` crate.
///
/// Covers every failure mode of the monitor link: connecting, timing out,
/// and socket I/O (which includes oversized or truncated frames reported by
/// the length-delimited codec). `pitchside-core` maps these into its own
/// diagnostics; the link loop itself only logs them.
#[derive(Debug, Error)]
pub enum Error {
    // ── Connection ──────────────────────────────────────────────────
    /// TCP connect failed (refused, unreachable, DNS failure, etc.)
    #[error("Cannot connect to match server at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// TCP connect did not complete within the configured timeout.
    #[error("Connecting to {addr} timed out after {timeout_ms}ms")]
    Timeout { addr: String, timeout_ms: u64 },

    // ── Transport ───────────────────────────────────────────────────
    /// Read/write failure on an established connection.
    #[error("Monitor link I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error happened before a connection was established.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::Timeout { .. })
    }
}
