// src/llm/mod.rs

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::CompletionConfig;
use crate::error::CompletionError;

/// Client for the remote chat-completion deployment. One synchronous call
/// per question; no retry, every fault mapped to [`CompletionError`].
pub struct CompletionClient {
    http: Client,
    endpoint: Url,
    deployment: String,
    api_version: String,
    api_key: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl CompletionClient {
    pub fn new(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let api_key = config
            .resolved_api_key()
            .ok_or(CompletionError::MissingApiKey)?;
        let mut endpoint = Url::parse(&config.endpoint)?;
        // Url::join treats the last path segment as a file unless it ends in '/'.
        if !endpoint.path().ends_with('/') {
            endpoint.set_path(&format!("{}/", endpoint.path()));
        }
        Ok(Self {
            http: Client::new(),
            endpoint,
            deployment: config.deployment.clone(),
            api_version: config.api_version.clone(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request_url(&self) -> Result<Url, CompletionError> {
        let mut url = self.endpoint.join(&format!(
            "openai/deployments/{}/chat/completions",
            self.deployment
        ))?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    /// Send one system + user exchange and return the trimmed text of the
    /// first choice.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let url = self.request_url()?;
        let body = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(url = %url, prompt_bytes = user.len(), "sending completion request");
        let response = self
            .http
            .post(url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Service {
                status: status.as_u16(),
                body: text,
            });
        }
        extract_content(&text)
    }
}

/// Pull the first choice's message text out of a completion response body.
fn extract_content(body: &str) -> Result<String, CompletionError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Service {
            status: 200,
            body: format!("unparseable completion response: {e}"),
        })?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|content| content.trim().to_string())
        .ok_or(CompletionError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn config() -> CompletionConfig {
        CompletionConfig {
            endpoint: "https://example.openai.azure.com".to_string(),
            api_key: Some("test-key".to_string()),
            ..CompletionConfig::default()
        }
    }

    #[test]
    fn request_url_targets_the_deployment() -> Result<()> {
        let client = CompletionClient::new(&config())?;
        assert_eq!(
            client.request_url()?.as_str(),
            "https://example.openai.azure.com/openai/deployments/gpt/chat/completions?api-version=2024-02-15-preview"
        );
        Ok(())
    }

    #[test]
    fn request_body_is_a_two_message_exchange() -> Result<()> {
        let body = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "ask",
                },
            ],
            temperature: 0.5,
            max_tokens: Some(1000),
        };
        let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(&body)?)?;
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "ask");
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["max_tokens"], 1000);
        Ok(())
    }

    #[test]
    fn max_tokens_is_omitted_when_unset() -> Result<()> {
        let body = ChatRequest {
            messages: vec![],
            temperature: 0.7,
            max_tokens: None,
        };
        let text = serde_json::to_string(&body)?;
        assert!(!text.contains("max_tokens"));
        Ok(())
    }

    #[test]
    fn first_choice_content_is_trimmed() -> Result<()> {
        let body = r#"{"choices":[{"message":{"content":"  the answer \n"}},{"message":{"content":"second"}}]}"#;
        assert_eq!(extract_content(body)?, "the answer");
        Ok(())
    }

    #[test]
    fn empty_choices_are_a_typed_fault() {
        let err = extract_content(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, CompletionError::EmptyResponse));

        let err = extract_content("not json").unwrap_err();
        assert!(matches!(err, CompletionError::Service { .. }));
    }
}
