//! Message relay: turns inbound WhatsApp messages into inventory replies.
//!
//! One extraction round trip per inbound text message. On success the parsed
//! [`InventoryAction`](crate::inventory::InventoryAction) is serialized and
//! sent back to the originating JID. On any extraction failure the error is
//! logged and the reply is suppressed — the relay never crashes the event
//! loop and never sends malformed output.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::groq::ActionExtractor;
use crate::inventory::InventoryAction;
use crate::whatsapp::client::WhatsAppClient;
use crate::whatsapp::events::WhatsAppEvent;

/// Relays inbound messages through the extractor and back out as replies.
pub struct Relay {
    whatsapp: Arc<WhatsAppClient>,
    extractor: Arc<dyn ActionExtractor>,
}

impl Relay {
    /// Create a relay over the given WhatsApp client and extractor.
    pub fn new(whatsapp: Arc<WhatsAppClient>, extractor: Arc<dyn ActionExtractor>) -> Self {
        Self {
            whatsapp,
            extractor,
        }
    }

    /// Consume events until the channel closes.
    ///
    /// Connection events are logged; message events are handled one at a
    /// time. Each handler invocation is independent and stateless, so a
    /// failure only affects its own message.
    pub async fn run(&self, mut events: mpsc::Receiver<WhatsAppEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                WhatsAppEvent::Message { jid, text, from_me } => {
                    if from_me {
                        continue;
                    }
                    self.handle_message(&jid, &text).await;
                }
                WhatsAppEvent::Connected => info!("WhatsApp connected"),
                WhatsAppEvent::Disconnected { reason } => {
                    info!(?reason, "WhatsApp disconnected");
                }
            }
        }
        info!("event channel closed, relay stopping");
    }

    /// Handle one inbound message end to end.
    async fn handle_message(&self, jid: &str, text: &str) {
        let Some(reply) = self.build_reply(text).await else {
            return;
        };
        if let Err(e) = self.whatsapp.send_text(jid, &reply).await {
            error!(jid, error = %e, "failed to send reply");
        }
    }

    /// Run extraction for a message and serialize the reply body.
    ///
    /// Returns `None` when the message is empty or extraction fails; the
    /// caller sends nothing in that case.
    pub async fn build_reply(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            debug!("skipping empty message");
            return None;
        }

        match self.extractor.extract(text).await {
            Ok(action) => {
                info!(item = %action.item_name, "extracted inventory action");
                reply_body(&action)
            }
            Err(e) => {
                error!(error = %e, "inventory extraction failed, suppressing reply");
                None
            }
        }
    }
}

/// Serialize an action for the outbound reply body.
///
/// Returns `None` on serialization failure so the caller suppresses the
/// reply; error prose is never sent to the user.
pub fn reply_body(action: &InventoryAction) -> Option<String> {
    match serde_json::to_string(action) {
        Ok(body) => Some(body),
        Err(e) => {
            error!(error = %e, "failed to serialize action, suppressing reply");
            None
        }
    }
}
