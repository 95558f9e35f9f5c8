use async_trait::async_trait;
use std::error::Error;

/// A ClientWrapper is a wrapper around a specific hosted LLM service.
/// It provides a common interface for the pipeline to send a prepared
/// set of messages and receive a single completion. It does not keep
/// track of any conversation state; the pipeline threads the shared
/// document through each call itself.

/// Represents the possible roles for a message.
#[derive(Clone, Debug, PartialEq)]
pub enum Role {
    /// Set by the pipeline to steer a stage's behaviour (the stage instructions).
    System,
    /// The task text or the current shared document handed to a stage.
    User,
    /// Content generated by the model.
    Assistant,
}

/// How many tokens were spent on prompt vs. completion.
#[derive(Clone, Debug)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

/// A generic message to be sent to (or received from) an LLM.
#[derive(Clone, Debug)]
pub struct Message {
    /// The role associated with the message.
    pub role: Role,
    /// The actual content of the message.
    pub content: String,
}

/// Type alias for a Send-able error box.
pub type SendError = Box<dyn Error + Send + Sync>;

/// Trait defining the interface to interact with various LLM services.
///
/// The pipeline treats implementations as a black box that may be slow, fail,
/// or return arbitrary text. No retry or backoff policy lives behind this
/// trait; if a provider wants one it belongs inside the client implementation.
#[async_trait]
pub trait ClientWrapper: Send + Sync {
    /// Send the prepared messages and return the assistant's reply.
    async fn send_message(&self, messages: &[Message]) -> Result<Message, SendError>;

    /// Name of the underlying model, for logging and events.
    fn model_name(&self) -> &str;

    /// Usage reported by the *last* `send_message()` call, if the provider
    /// reports it. Default returns `None` so simple clients don't break.
    async fn get_last_usage(&self) -> Option<TokenUsage> {
        None
    }
}
