//! Shared plumbing for the chat-completions providers.
//!
//! Both [`OpenAIClient`](crate::clients::openai::OpenAIClient) and
//! [`AzureOpenAIClient`](crate::clients::azure::AzureOpenAIClient) speak the
//! same JSON wire format; only the URL shape and auth header differ. The serde
//! types and the response decoding live here.

use crate::client_wrapper::{Message, Role, SendError, TokenUsage};
use serde::{Deserialize, Serialize};

/// One message in the chat-completions request body.
#[derive(Serialize)]
pub(crate) struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

/// Chat-completions request body.
#[derive(Serialize)]
pub(crate) struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<WireMessage>,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<ChatChoice>,
    pub usage: Option<WireUsage>,
}

#[derive(Deserialize)]
pub(crate) struct ChatChoice {
    pub message: WireResponseMessage,
}

#[derive(Deserialize)]
pub(crate) struct WireResponseMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct WireUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Convert pipeline messages into the wire representation.
pub(crate) fn to_wire(messages: &[Message]) -> Vec<WireMessage> {
    messages
        .iter()
        .map(|m| WireMessage {
            role: match m.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: m.content.clone(),
        })
        .collect()
}

/// Pull the assistant message and usage out of a decoded response.
pub(crate) fn decode(response: ChatResponse) -> Result<(Message, Option<TokenUsage>), SendError> {
    let usage = response.usage.map(|u| TokenUsage {
        input_tokens: u.prompt_tokens,
        output_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| SendError::from("Chat response contained no choices"))?;

    let content = choice.message.content.unwrap_or_default();

    Ok((
        Message {
            role: Role::Assistant,
            content,
        },
        usage,
    ))
}
