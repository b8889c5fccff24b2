//! Pantrybot — a WhatsApp inventory bot.
//!
//! Single Rust binary. Listens for WhatsApp messages through a bridge
//! sidecar, asks a Groq-hosted model to extract a structured inventory
//! action from each message via a forced tool call, and replies with the
//! parsed action.
//!
//! See `DESIGN.md` for architecture documentation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod groq;
pub mod inventory;
pub mod logging;
pub mod relay;
pub mod whatsapp;
