//! Wire format and HTTP client for the Groq `/v1/chat/completions` API.
//!
//! The pipeline is split into pure stages so each one is testable without a
//! network: [`build_request`] assembles the forced-tool-call request,
//! [`extract_action`] walks the response envelope, and [`GroqClient`] wires
//! them together around a single POST.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::inventory::schema::{
    update_inventory_parameters, SchemaNode, FUNCTION_DESCRIPTION, FUNCTION_NAME, SYSTEM_PROMPT,
};
use crate::inventory::InventoryAction;

use super::{check_http_response, ActionExtractor, GroqError};

/// Groq's OpenAI-compatible chat completions endpoint.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default model for inventory extraction.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";

/// Token ceiling for the completion. Must be large enough to hold the full
/// argument JSON.
const MAX_COMPLETION_TOKENS: u32 = 4000;

/// HTTP request timeout. The Groq endpoint is the only long-latency
/// dependency; its unavailability must not stall the handler indefinitely.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP connect timeout for the reqwest client.
const CONNECT_TIMEOUT_SECS: u64 = 5;

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Chat completions request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Ordered conversation: system instruction, then the user message.
    pub messages: Vec<ChatMessage>,
    /// Completion token ceiling.
    pub max_completion_tokens: u32,
    /// Sampling temperature. Pinned to zero for deterministic extraction.
    pub temperature: f32,
    /// Declared tools; always exactly the `update_inventory` function.
    pub tools: Vec<Tool>,
    /// Forced tool choice. The model may not reply with plain text.
    pub tool_choice: ToolChoice,
}

/// A message in chat format.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role (`system` or `user`).
    pub role: String,
    /// Message text.
    pub content: String,
}

/// A declared tool.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct Tool {
    /// Tool type (always `function`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Function definition.
    pub function: FunctionDefinition,
}

/// A function definition with its parameter schema.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct FunctionDefinition {
    /// Function name.
    pub name: String,
    /// Description shown to the model.
    pub description: String,
    /// JSON Schema for the arguments.
    pub parameters: SchemaNode,
}

/// Directive forcing the model to call a specific function.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct ToolChoice {
    /// Choice type (always `function`).
    #[serde(rename = "type")]
    pub kind: String,
    /// The function the model must call.
    pub function: ToolChoiceFunction,
}

/// Function reference inside a [`ToolChoice`].
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct ToolChoiceFunction {
    /// Function name.
    pub name: String,
}

/// Chat completions response envelope.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Response identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Response choices.
    pub choices: Vec<Choice>,
    /// Token usage.
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// A response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct Choice {
    /// Assistant message for this choice.
    pub message: ResponseMessage,
}

/// Assistant message in a response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    /// Optional plain text content.
    #[serde(default)]
    pub content: Option<String>,
    /// Tool calls requested by the model. Absent or null when the model
    /// replied with plain text.
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// A tool call in a response.
#[doc(hidden)]
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    /// Call identifier.
    pub id: String,
    /// Call type (always `function`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Function call payload.
    pub function: FunctionCall,
}

/// Function payload in a tool call.
#[doc(hidden)]
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    /// Function name.
    pub name: String,
    /// Arguments encoded as a JSON string. Requires a second decode pass.
    pub arguments: String,
}

/// Token usage statistics.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct Usage {
    /// Total tokens consumed by the round trip.
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

// ---------------------------------------------------------------------------
// Request builder / response extractor (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build a forced-tool-call completion request for a user message.
///
/// Pure data assembly: the user text is passed through byte-for-byte and no
/// validation happens here — extraction quality is the model's job.
#[doc(hidden)]
pub fn build_request(model: &str, user_message: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_owned(),
        messages: vec![
            ChatMessage {
                role: "system".to_owned(),
                content: SYSTEM_PROMPT.to_owned(),
            },
            ChatMessage {
                role: "user".to_owned(),
                content: user_message.to_owned(),
            },
        ],
        max_completion_tokens: MAX_COMPLETION_TOKENS,
        temperature: 0.0,
        tools: vec![Tool {
            kind: "function".to_owned(),
            function: FunctionDefinition {
                name: FUNCTION_NAME.to_owned(),
                description: FUNCTION_DESCRIPTION.to_owned(),
                parameters: update_inventory_parameters(),
            },
        }],
        tool_choice: ToolChoice {
            kind: "function".to_owned(),
            function: ToolChoiceFunction {
                name: FUNCTION_NAME.to_owned(),
            },
        },
    }
}

/// Pull the structured inventory action out of a response envelope.
///
/// Only `choices[0]` and its first tool call are consulted. This is a
/// documented first-match contract, not a general multi-candidate protocol;
/// callers needing more must wrap the extractor.
///
/// # Errors
///
/// Returns `GroqError::NoChoice` when `choices` is empty,
/// `GroqError::NoToolCall` when the first choice carries no tool calls, and
/// `GroqError::ArgumentParse` (with the raw arguments string) when the
/// doubly-encoded payload is not a valid [`InventoryAction`].
#[doc(hidden)]
pub fn extract_action(response: ChatResponse) -> Result<InventoryAction, GroqError> {
    let choice = response.choices.into_iter().next().ok_or(GroqError::NoChoice)?;

    let call = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(GroqError::NoToolCall)?;

    debug!(call_id = %call.id, function = %call.function.name, "tool call received");

    serde_json::from_str(&call.function.arguments).map_err(|source| GroqError::ArgumentParse {
        source,
        raw: call.function.arguments,
    })
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Groq chat completions API.
#[derive(Debug, Clone)]
pub struct GroqClient {
    model: String,
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl GroqClient {
    /// Create a client for the default Groq endpoint and model.
    ///
    /// The key is optional at construction; a missing key fails each call
    /// with [`GroqError::MissingApiKey`] before any network I/O.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_MODEL.to_owned(), api_key, GROQ_API_BASE.to_owned())
    }

    /// Create a client with an explicit model and endpoint URL.
    pub fn with_base_url(model: String, api_key: Option<String>, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build HTTP client with timeouts, using default");
                reqwest::Client::default()
            });
        Self {
            model,
            api_key,
            base_url,
            client,
        }
    }

    /// The model identifier this client requests completions from.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The endpoint URL this client posts to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait::async_trait]
impl ActionExtractor for GroqClient {
    async fn extract(&self, message: &str) -> Result<InventoryAction, GroqError> {
        let api_key = self.api_key.as_deref().ok_or(GroqError::MissingApiKey)?;

        let request = build_request(&self.model, message);
        let body = serde_json::to_string(&request).map_err(GroqError::Encode)?;

        let response = self
            .client
            .post(&self.base_url)
            .header("authorization", format!("Bearer {api_key}"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await?;

        let payload = check_http_response(response).await?;
        let envelope: ChatResponse =
            serde_json::from_str(&payload).map_err(|source| GroqError::Decode {
                source,
                body: payload.clone(),
            })?;

        if let Some(total) = envelope.usage.as_ref().and_then(|u| u.total_tokens) {
            debug!(total_tokens = total, "completion usage");
        }

        extract_action(envelope)
    }
}
