//! OpenAI-compatible chat-completions client.
//!
//! Works against api.openai.com and any endpoint that speaks the same wire
//! format (many self-hosted gateways do). The Azure variant in
//! [`azure`](crate::clients::azure) differs only in URL shape and auth header.
//!
//! # Example
//!
//! ```rust,no_run
//! use tripforge::client_wrapper::{ClientWrapper, Message, Role};
//! use tripforge::clients::openai::OpenAIClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAIClient::new(&std::env::var("OPENAI_API_KEY")?, "gpt-4o-mini");
//!     let reply = client
//!         .send_message(&[Message {
//!             role: Role::User,
//!             content: "Say hello.".into(),
//!         }])
//!         .await
//!         .map_err(|e| e.to_string())?;
//!     println!("{}", reply.content);
//!     Ok(())
//! }
//! ```

use crate::client_wrapper::{ClientWrapper, Message, SendError, TokenUsage};
use crate::tripforge::clients::common::{decode, to_wire, ChatRequest, ChatResponse};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Client wrapper for OpenAI-compatible chat-completions endpoints.
pub struct OpenAIClient {
    http: reqwest::Client,
    secret_key: String,
    model: String,
    base_url: String,
    last_usage: Mutex<Option<TokenUsage>>,
}

impl OpenAIClient {
    /// Create a client against the public OpenAI endpoint.
    pub fn new(secret_key: &str, model: &str) -> Self {
        Self::new_with_base_url(secret_key, model, "https://api.openai.com/v1")
    }

    /// Create a client pointing at a custom OpenAI-compatible base URL.
    ///
    /// `base_url` should not have a trailing slash; the client appends
    /// `/chat/completions`.
    pub fn new_with_base_url(secret_key: &str, model: &str, base_url: &str) -> Self {
        OpenAIClient {
            http: reqwest::Client::new(),
            secret_key: secret_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            last_usage: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ClientWrapper for OpenAIClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_message(&self, messages: &[Message]) -> Result<Message, SendError> {
        let body = ChatRequest {
            model: Some(self.model.clone()),
            messages: to_wire(messages),
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SendError::from(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(format!("Chat completion failed with {}: {}", status, detail).into());
        }

        let decoded: ChatResponse = response
            .json()
            .await
            .map_err(|e| SendError::from(e.to_string()))?;
        let (message, usage) = decode(decoded)?;

        *self.last_usage.lock().await = usage;
        Ok(message)
    }

    async fn get_last_usage(&self) -> Option<TokenUsage> {
        self.last_usage.lock().await.clone()
    }
}
