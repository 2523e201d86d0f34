//! One-shot completion client for external LLM APIs.

use reqwest::Client;
use serde_json::json;
use tracing::debug;

use innbox_core::{Error, Result};

use crate::config::LlmConfig;
use crate::types::{ChatMessage, LlmProvider};

const MAX_COMPLETION_TOKENS: usize = 400;

/// Non-streaming completion client. The request timeout from the
/// configuration is enforced at the HTTP client level, so a hung
/// provider surfaces as an error rather than a stalled extraction.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: Client,
    provider: LlmProvider,
    model: String,
    api_key: String,
}

impl LlmClient {
    /// Build a client for the configured provider, or `None` when no
    /// provider has a usable key.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>> {
        let Some((provider, model, api_key)) = config.resolve_provider() else {
            return Ok(None);
        };

        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Some(Self {
            http,
            provider,
            model,
            api_key,
        }))
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Send one completion request and return the reply text.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        match self.provider {
            LlmProvider::OpenAI => {
                self.complete_openai_compat("https://api.openai.com/v1/chat/completions", messages)
                    .await
            }
            LlmProvider::Groq => {
                self.complete_openai_compat(
                    "https://api.groq.com/openai/v1/chat/completions",
                    messages,
                )
                .await
            }
            LlmProvider::Anthropic => self.complete_anthropic(messages).await,
        }
    }

    /// Complete against OpenAI-compatible APIs (OpenAI, Groq).
    async fn complete_openai_compat(&self, url: &str, messages: &[ChatMessage]) -> Result<String> {
        let msgs: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect();

        let body = json!({
            "model": self.model,
            "messages": msgs,
            "temperature": 0.0,
            "max_tokens": MAX_COMPLETION_TOKENS,
        });

        debug!("Completion request to {} with model {}", url, self.model);

        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("API error {status}: {body}")));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("invalid response body: {e}")))?;

        parsed["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::Llm("response contained no message content".into()))
    }

    /// Complete against Anthropic's Messages API.
    async fn complete_anthropic(&self, messages: &[ChatMessage]) -> Result<String> {
        // Separate system message from conversation
        let system_msg: Option<String> = messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.clone());

        let conv_msgs: Vec<serde_json::Value> = messages
            .iter()
            .filter(|m| m.role != "system")
            .map(|m| json!({"role": m.role, "content": m.content}))
            .collect();

        let mut body = json!({
            "model": self.model,
            "messages": conv_msgs,
            "temperature": 0.0,
            "max_tokens": MAX_COMPLETION_TOKENS,
        });

        if let Some(sys) = system_msg {
            body["system"] = json!(sys);
        }

        debug!("Completion request to Anthropic with model {}", self.model);

        let response = self
            .http
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("API error {status}: {body}")));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Llm(format!("invalid response body: {e}")))?;

        parsed["content"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::Llm("response contained no text content".into()))
    }
}
