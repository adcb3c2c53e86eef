use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:1234/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "qwen2.5-coder-3b-instruct-mlx";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for an OpenAI-compatible chat completion endpoint.
#[derive(Clone)]
pub struct ChatClient {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
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
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl ChatClient {
    pub fn new(endpoint: String, model: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            endpoint,
            model,
            client,
        })
    }

    /// Send `prompt` as a single user message and return the trimmed content
    /// of the first choice. Sampling is deterministic (temperature 0).
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "Sending chat completion request");

        let response = self.client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to chat completion endpoint")?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .context("Failed to read chat completion response body")?;

        info!(status = %status, raw = %raw, "Raw chat completion response");

        if !status.is_success() {
            anyhow::bail!("Chat completion request failed: {} {}", status, raw);
        }

        decode_reply(&raw)
    }

    /// Probe the endpoint's `models` listing. Endpoints without a sibling
    /// listing count as reachable on any HTTP response.
    pub async fn ping(&self) -> Result<()> {
        let Some(models_url) = self.models_url() else {
            self.client
                .get(&self.endpoint)
                .send()
                .await
                .context("Failed to reach chat completion endpoint")?;
            return Ok(());
        };

        let response = self.client
            .get(models_url)
            .send()
            .await
            .context("Failed to reach chat completion endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!("Model listing returned {}", response.status());
        }
        Ok(())
    }

    fn models_url(&self) -> Option<String> {
        self.endpoint
            .strip_suffix("/chat/completions")
            .map(|base| format!("{}/models", base))
    }
}

/// Pull `choices[0].message.content` out of a raw response body.
pub fn decode_reply(raw: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(raw)
        .context("Failed to parse chat completion response")?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .context("Chat completion response has no choices")?;

    let content = choice
        .message
        .content
        .context("Chat completion choice has no message content")?;

    Ok(content.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest {
            model: "m",
            messages: vec![ChatMessage { role: "user", content: "hi" }],
            temperature: 0.0,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "m",
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 0.0
            })
        );
    }

    #[test]
    fn test_decode_reply_trims_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"\n amount: 10\n"}},{"message":{"content":"second"}}]}"#;
        assert_eq!(decode_reply(raw).unwrap(), "amount: 10");
    }

    #[test]
    fn test_decode_reply_errors() {
        let err = decode_reply("<html>bad gateway</html>").unwrap_err();
        assert!(err.downcast_ref::<serde_json::Error>().is_some());

        assert!(decode_reply(r#"{"choices":[]}"#).is_err());
        assert!(decode_reply(r#"{"choices":[{"message":{"content":null}}]}"#).is_err());
        assert!(decode_reply(r#"{"error":"model not loaded"}"#).is_err());
    }

    #[test]
    fn test_models_url() {
        let client = ChatClient::new(DEFAULT_ENDPOINT.into(), DEFAULT_MODEL.into(), DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.models_url().as_deref(), Some("http://localhost:1234/v1/models"));

        let other = ChatClient::new("http://host/generate".into(), "m".into(), DEFAULT_TIMEOUT).unwrap();
        assert_eq!(other.models_url(), None);
    }
}
