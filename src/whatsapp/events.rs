//! Event listener for incoming WhatsApp messages.
//!
//! Long-polls the bridge's `/events/poll` endpoint and forwards events to
//! the relay over an mpsc channel. Rejected polls and transport failures
//! share one exponential backoff; a long-poll timeout is normal and polls
//! again immediately.

use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// An incoming WhatsApp event from the bridge.
///
/// Bridge fields the relay has no use for are ignored at deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum WhatsAppEvent {
    /// A new message was received (or sent by us).
    #[serde(rename = "message")]
    Message {
        /// WhatsApp JID of the sender's conversation.
        jid: String,
        /// Message text content.
        text: String,
        /// Whether this message was sent by us.
        from_me: bool,
    },
    /// WhatsApp connection established.
    #[serde(rename = "connected")]
    Connected,
    /// WhatsApp connection lost.
    #[serde(rename = "disconnected")]
    Disconnected {
        /// Human-readable reason, if available.
        reason: Option<String>,
    },
}

/// Long-poll timeout for the HTTP client (seconds).
const POLL_TIMEOUT_SECS: u64 = 60;

/// Backoff after the first failed poll (milliseconds).
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Maximum backoff between failed polls (milliseconds).
const MAX_BACKOFF_MS: u64 = 30_000;

/// Outcome of a single poll round.
enum Poll {
    /// Events (possibly none) were delivered to the channel.
    Delivered,
    /// The long-poll window expired with nothing to report.
    Idle,
    /// The bridge answered the poll with a non-success status.
    Rejected(reqwest::StatusCode),
    /// The receiver was dropped; the listener should stop.
    Closed,
}

/// Spawn the event listener as a background Tokio task.
///
/// Returns immediately. The task polls until the receiving side of
/// `event_tx` is dropped, backing off exponentially after failed polls and
/// resetting the backoff after each successful one.
pub fn spawn_event_listener(
    base_url: String,
    event_tx: mpsc::Sender<WhatsAppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let poll_url = format!("{base_url}/events/poll");
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(POLL_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build polling client with timeout, using default");
                reqwest::Client::default()
            });

        info!(url = %poll_url, "WhatsApp event listener starting");
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let failure = match poll_once(&client, &poll_url, &event_tx).await {
                Ok(Poll::Closed) => {
                    info!("event receiver dropped, listener stopping");
                    break;
                }
                Ok(Poll::Delivered | Poll::Idle) => {
                    backoff_ms = INITIAL_BACKOFF_MS;
                    continue;
                }
                Ok(Poll::Rejected(status)) => format!("poll rejected with status {status}"),
                Err(e) => format!("poll failed: {e}"),
            };

            warn!(%failure, backoff_ms, "event poll error, backing off");
            tokio::time::sleep(std::time::Duration::from_millis(backoff_ms)).await;
            backoff_ms = backoff_ms.saturating_mul(2).min(MAX_BACKOFF_MS);
        }
    })
}

/// Run one poll round and forward any events to the channel.
async fn poll_once(
    client: &reqwest::Client,
    poll_url: &str,
    event_tx: &mpsc::Sender<WhatsAppEvent>,
) -> Result<Poll, reqwest::Error> {
    let response = match client.get(poll_url).send().await {
        Ok(response) => response,
        // Normal: the long-poll window expired, poll again immediately.
        Err(e) if e.is_timeout() => return Ok(Poll::Idle),
        Err(e) => return Err(e),
    };

    if !response.status().is_success() {
        return Ok(Poll::Rejected(response.status()));
    }

    let events: Vec<WhatsAppEvent> = response.json().await?;
    for event in events {
        if event_tx.send(event).await.is_err() {
            return Ok(Poll::Closed);
        }
    }
    Ok(Poll::Delivered)
}
