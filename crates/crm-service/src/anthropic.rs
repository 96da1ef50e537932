//! Anthropic messages API client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::CompletionService;
use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};

const PROVIDER: &str = "Anthropic";
const API_VERSION: &str = "2023-06-01";

/// [`CompletionService`] over the Anthropic messages API.
pub struct AnthropicService {
    config: ServiceConfig,
    client: reqwest::Client,
}

impl AnthropicService {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = config.http_client()?;
        Ok(Self { config, client })
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl MessagesResponse {
    /// Concatenated text blocks.
    fn text(self) -> String {
        self.content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("")
    }
}

#[async_trait]
impl CompletionService for AnthropicService {
    async fn submit(&self, prompt: &str) -> Result<String> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };
        let transport = |source| ServiceError::Transport {
            provider: PROVIDER,
            source,
        };

        let response = self
            .client
            .post(self.config.endpoint("messages"))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await.map_err(transport)?;
        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(ServiceError::EmptyResponse { provider: PROVIDER });
        }

        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            response_len = text.len(),
            "anthropic completion finished"
        );
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_blocks_are_joined() {
        let parsed: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"First Name,"},{"type":"text","text":"Email"}],"stop_reason":"end_turn"}"#,
        )
        .unwrap();
        assert_eq!(parsed.text(), "First Name,Email");
    }

    #[test]
    fn non_text_blocks_are_skipped() {
        let parsed: MessagesResponse =
            serde_json::from_str(r#"{"content":[{"type":"tool_use","id":"t1"}]}"#).unwrap();
        assert_eq!(parsed.text(), "");
    }
}
