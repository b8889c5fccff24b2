//! WhatsApp adapter: HTTP bridge client and event listener.
//!
//! Talks to a baileys-based bridge sidecar over HTTP. The sidecar owns the
//! WhatsApp session (pairing, delivery, the session store at `DB_PATH`);
//! this crate only sends text and long-polls for incoming messages.

pub mod client;
pub mod events;

/// Errors from the WhatsApp adapter.
#[derive(Debug, thiserror::Error)]
pub enum WhatsAppError {
    /// HTTP request to the bridge failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The bridge is not running or not reachable.
    #[error("bridge not running")]
    BridgeNotRunning,

    /// The bridge is running but WhatsApp is not paired (needs QR scan).
    #[error("not connected to WhatsApp")]
    NotConnected,

    /// Pairing or lifecycle operation failed.
    #[error("setup failed: {0}")]
    SetupFailed(String),
}
