//! Completion endpoint client
//!
//! HTTP transport for the converse-style text-completion API. One
//! user message in, one assistant text block out. Transport failures
//! map into the pipeline taxonomy; interpretation of the returned
//! text is the callers' concern.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::CompletionModel;
use crate::error::{PipelineError, PipelineResult};

pub struct BedrockClient {
    http: Client,
    url: String,
    access_key: String,
    secret: String,
}

impl BedrockClient {
    pub fn new(
        region: &str,
        model_id: &str,
        access_key: &str,
        secret: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?;

        Ok(Self {
            http,
            url: format!("https://bedrock-runtime.{region}.amazonaws.com/model/{model_id}/converse"),
            access_key: access_key.to_string(),
            secret: secret.to_string(),
        })
    }
}

// Converse wire types

#[derive(Serialize)]
struct ConverseRequest<'a> {
    messages: Vec<Message<'a>>,
    #[serde(rename = "inferenceConfig")]
    inference_config: InferenceConfig,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
struct ContentBlock<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct InferenceConfig {
    temperature: f32,
    #[serde(rename = "maxTokens")]
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ConverseResponse {
    output: ConverseOutput,
}

#[derive(Deserialize)]
struct ConverseOutput {
    message: OutputMessage,
}

#[derive(Deserialize)]
struct OutputMessage {
    content: Vec<OutputBlock>,
}

#[derive(Deserialize)]
struct OutputBlock {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl CompletionModel for BedrockClient {
    #[instrument(skip_all, fields(prompt_len = prompt.len()))]
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> PipelineResult<String> {
        let request = ConverseRequest {
            messages: vec![Message {
                role: "user",
                content: vec![ContentBlock { text: prompt }],
            }],
            inference_config: InferenceConfig {
                temperature,
                max_tokens,
            },
        };

        let response = self
            .http
            .post(&self.url)
            .basic_auth(&self.access_key, Some(&self.secret))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::Network(format!("model request timed out: {e}"))
                } else {
                    PipelineError::Network(format!("model request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PipelineError::AccessDenied),
                StatusCode::TOO_MANY_REQUESTS => Err(PipelineError::RateLimited),
                s => Err(PipelineError::Network(format!("model endpoint returned {s}"))),
            };
        }

        let body: ConverseResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse completion response");
            PipelineError::AiResponseInvalid(format!("malformed completion envelope: {e}"))
        })?;

        let text = body
            .output
            .message
            .content
            .into_iter()
            .next()
            .map(|b| b.text)
            .ok_or_else(|| {
                PipelineError::AiResponseInvalid("completion had no content blocks".to_string())
            })?;

        debug!(response_len = text.len(), "Completion received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_shape() {
        let request = ConverseRequest {
            messages: vec![Message {
                role: "user",
                content: vec![ContentBlock { text: "hello" }],
            }],
            inference_config: InferenceConfig {
                temperature: 0.2,
                max_tokens: 1000,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"][0]["text"], "hello");
        assert_eq!(value["inferenceConfig"]["maxTokens"], 1000);
        assert!(value["inferenceConfig"]["temperature"].is_number());
    }

    #[test]
    fn response_text_extraction() {
        let body: ConverseResponse = serde_json::from_value(serde_json::json!({
            "output": {"message": {"role": "assistant", "content": [{"text": "{\"success\":true}"}]}}
        }))
        .unwrap();
        assert_eq!(body.output.message.content[0].text, "{\"success\":true}");
    }

    #[test]
    fn url_follows_region_and_model() {
        let client = BedrockClient::new(
            "eu-west-1",
            "us.amazon.nova-lite-v1:0",
            "key",
            "secret",
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(
            client.url,
            "https://bedrock-runtime.eu-west-1.amazonaws.com/model/us.amazon.nova-lite-v1:0/converse"
        );
    }
}
