//! Azure OpenAI client wrapper.
//!
//! Azure routes chat completions through a per-deployment path with an
//! `api-version` query parameter and an `api-key` header instead of bearer
//! auth. Everything else matches the OpenAI wire format, so the serde types
//! are shared with [`openai`](crate::clients::openai).
//!
//! # Example
//!
//! ```rust,no_run
//! use tripforge::clients::azure::AzureOpenAIClient;
//!
//! // Reads AZURE_OPENAI_ENDPOINT, AZURE_DEPLOYMENT_NAME,
//! // AZURE_OPENAI_API_VERSION and AZURE_OPENAI_API_KEY.
//! let client = AzureOpenAIClient::from_env().expect("Azure environment not configured");
//! ```

use crate::client_wrapper::{ClientWrapper, Message, SendError, TokenUsage};
use crate::tripforge::clients::common::{decode, to_wire, ChatRequest, ChatResponse};
use async_trait::async_trait;
use std::env;
use tokio::sync::Mutex;

/// Client wrapper for Azure OpenAI deployments.
pub struct AzureOpenAIClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    deployment: String,
    api_version: String,
    model: String,
    last_usage: Mutex<Option<TokenUsage>>,
}

impl AzureOpenAIClient {
    /// Create a client from explicit connection parameters.
    ///
    /// `endpoint` is the resource base URL (e.g. `https://myres.openai.azure.com`),
    /// `deployment` the deployment name, `model` the underlying model identifier
    /// (used only for logging; Azure selects the model via the deployment).
    pub fn new(
        api_key: &str,
        endpoint: &str,
        deployment: &str,
        api_version: &str,
        model: &str,
    ) -> Self {
        AzureOpenAIClient {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            deployment: deployment.to_string(),
            api_version: api_version.to_string(),
            model: model.to_string(),
            last_usage: Mutex::new(None),
        }
    }

    /// Create a client from the `AZURE_OPENAI_*` environment variables.
    ///
    /// Returns an error naming the first missing variable.
    pub fn from_env() -> Result<Self, SendError> {
        let var = |name: &str| -> Result<String, SendError> {
            env::var(name).map_err(|_| SendError::from(format!("{} is not set", name)))
        };
        Ok(Self::new(
            &var("AZURE_OPENAI_API_KEY")?,
            &var("AZURE_OPENAI_ENDPOINT")?,
            &var("AZURE_DEPLOYMENT_NAME")?,
            &var("AZURE_OPENAI_API_VERSION")?,
            &var("AZURE_OPENAI_MODEL_NAME")?,
        ))
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait]
impl ClientWrapper for AzureOpenAIClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_message(&self, messages: &[Message]) -> Result<Message, SendError> {
        // Azure ignores the model field; the deployment decides.
        let body = ChatRequest {
            model: None,
            messages: to_wire(messages),
        };

        let response = self
            .http
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SendError::from(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(format!("Azure chat completion failed with {}: {}", status, detail).into());
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
