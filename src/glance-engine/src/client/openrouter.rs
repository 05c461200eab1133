//! OpenRouter-compatible chat-completions client.
//!
//! One HTTP POST per call. Non-success statuses and bodies missing the
//! expected content are hard failures carrying the status and body; the
//! per-call deadline maps to the distinguishable `Timeout` error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use super::{CompletionClient, GenerationOptions, ImageClient};
use crate::config::{EngineConfig, ReasoningEffort};
use crate::error::{EngineError, Result};

const USER_AGENT: &str = concat!("glance/", env!("CARGO_PKG_VERSION"));

/// Connection timeout; response deadlines are per-call.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenRouter-shaped client for both completion and image generation.
pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    api_key: String,
    image_model: String,
}

impl OpenRouterClient {
    /// Build a client from engine configuration.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| EngineError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            image_model: config.image_model.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// POST the request and parse the response envelope. The deadline wraps
    /// the whole request/response cycle.
    async fn post_chat(
        &self,
        body: &ChatRequest,
        deadline: Duration,
    ) -> Result<ChatResponse> {
        let url = self.completions_url();
        let send = async {
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown error".to_string());
                return Err(EngineError::Upstream {
                    status: status.as_u16(),
                    body,
                });
            }

            Ok(response.json::<ChatResponse>().await?)
        };

        match timeout(deadline, send).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(url = %url, timeout_ms = deadline.as_millis() as u64, "chat call timed out");
                Err(EngineError::Timeout)
            }
        }
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
        options: &GenerationOptions,
    ) -> Result<String> {
        let request = ChatRequest {
            model: options.model.clone(),
            temperature: Some(options.temperature),
            max_tokens: Some(options.max_tokens),
            reasoning: options
                .reasoning_effort
                .map(|effort| Reasoning { effort }),
            modalities: None,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_message.to_string(),
                },
            ],
        };

        let response = self.post_chat(&request, options.timeout).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty());

        content.ok_or_else(|| {
            EngineError::MalformedResponse("completion endpoint returned no content".into())
        })
    }
}

#[async_trait]
impl ImageClient for OpenRouterClient {
    async fn generate_image(&self, prompt: &str, deadline: Duration) -> Result<String> {
        let request = ChatRequest {
            model: self.image_model.clone(),
            temperature: None,
            max_tokens: None,
            reasoning: None,
            modalities: Some(vec!["image"]),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
        };

        let response = self.post_chat(&request, deadline).await?;

        let data_url = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.images)
            .and_then(|images| images.into_iter().next())
            .map(|img| img.image_url.url)
            .filter(|url| !url.is_empty());

        data_url.ok_or_else(|| {
            EngineError::MalformedResponse("image endpoint returned no images".into())
        })
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning: Option<Reasoning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modalities: Option<Vec<&'static str>>,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct Reasoning {
    effort: ReasoningEffort,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    images: Option<Vec<ResponseImage>>,
}

#[derive(Debug, Deserialize)]
struct ResponseImage {
    image_url: ImageUrl,
}

#[derive(Debug, Deserialize)]
struct ImageUrl {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: String) -> OpenRouterClient {
        OpenRouterClient::new(&EngineConfig {
            base_url,
            api_key: "test-key".into(),
            model: "test-model".into(),
            fast_model: "test-fast".into(),
            image_model: "test-image".into(),
        })
        .expect("build client")
    }

    fn options() -> GenerationOptions {
        GenerationOptions {
            model: "test-model".into(),
            temperature: 0.2,
            max_tokens: 1000,
            reasoning_effort: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_complete_happy_path() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/chat/completions"))
            .and(wiremock::matchers::header("authorization", "Bearer test-key"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_raw(
                serde_json::json!({
                    "choices": [{"message": {"content": "<html>hi</html>"}}]
                })
                .to_string(),
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let html = client
            .complete("system", "question", &options())
            .await
            .expect("complete");
        assert_eq!(html, "<html>hi</html>");
    }

    #[tokio::test]
    async fn test_complete_upstream_error_embeds_status_and_body() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/chat/completions"))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client
            .complete("system", "question", &options())
            .await
            .unwrap_err();
        match err {
            EngineError::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_empty_content_is_malformed() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/chat/completions"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_raw(
                serde_json::json!({"choices": [{"message": {"content": ""}}]}).to_string(),
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client
            .complete("system", "question", &options())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_complete_times_out() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/chat/completions"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_raw(
                        serde_json::json!({"choices": [{"message": {"content": "late"}}]})
                            .to_string(),
                        "application/json",
                    ),
            )
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let mut opts = options();
        opts.timeout = Duration::from_millis(100);
        let err = client.complete("system", "question", &opts).await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_generate_image_happy_path() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/chat/completions"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_raw(
                serde_json::json!({
                    "choices": [{"message": {
                        "images": [{"image_url": {"url": "data:image/png;base64,AAAA"}}]
                    }}]
                })
                .to_string(),
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let url = client
            .generate_image("a red fox", Duration::from_secs(5))
            .await
            .expect("image");
        assert_eq!(url, "data:image/png;base64,AAAA");
    }

    #[tokio::test]
    async fn test_generate_image_no_images_is_failure() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/chat/completions"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_raw(
                serde_json::json!({"choices": [{"message": {"content": "not an image"}}]})
                    .to_string(),
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client
            .generate_image("a red fox", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MalformedResponse(_)));
    }
}
