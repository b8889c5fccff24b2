//! Groq chat-completions client for inventory extraction.
//!
//! Defines the [`ActionExtractor`] trait — the seam callers use to
//! substitute the transport in tests — and the error taxonomy for the
//! request/response pipeline. The wire format and HTTP client live in
//! [`completions`].
//!
//! Each failure mode is a distinct variant so the relay can attribute a
//! bad reply to the correct layer: local encoding, transport, HTTP status,
//! envelope decoding, or the doubly-encoded argument payload.

use async_trait::async_trait;

use crate::inventory::InventoryAction;

pub mod completions;

/// Errors from the Groq extraction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GroqError {
    /// `GROQ_API_KEY` was not configured. Checked before any network I/O.
    #[error("GROQ_API_KEY is not set")]
    MissingApiKey,

    /// The request body could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The HTTP request could not be sent or the connection failed.
    #[error("request to Groq failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Groq answered with a non-success status.
    #[error("Groq returned status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// The response body was not a valid completion envelope.
    #[error("failed to decode Groq response: {source}")]
    Decode {
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// The response carried no choices.
    #[error("Groq response contained no choices")]
    NoChoice,

    /// The first choice carried no tool calls. The model ignored the
    /// forced-function-call directive.
    #[error("Groq response contained no tool call")]
    NoToolCall,

    /// The tool-call arguments string was not a valid `InventoryAction`.
    #[error("failed to parse tool arguments: {source}")]
    ArgumentParse {
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
        /// The raw arguments string, unmodified.
        raw: String,
    },
}

/// Check an HTTP response status and return the body text or a typed error.
///
/// # Errors
///
/// Returns `GroqError::Request` if the body cannot be read, or
/// `GroqError::HttpStatus` with the raw body on a non-2xx status.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, GroqError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(GroqError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// Extracts a structured inventory action from a raw user message.
///
/// Implementations must be `Send + Sync`; the relay holds one behind an
/// `Arc` and may invoke it from overlapping handler tasks. Invocations are
/// independent and stateless, so no locking is required.
#[async_trait]
pub trait ActionExtractor: Send + Sync {
    /// Run one extraction round trip for the given message.
    ///
    /// # Errors
    ///
    /// Returns [`GroqError`] on configuration, transport, or parse failure.
    /// Exactly one attempt is made; retries are the caller's decision.
    async fn extract(&self, message: &str) -> Result<InventoryAction, GroqError>;
}
