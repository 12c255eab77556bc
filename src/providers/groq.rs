//! Chat-completion client for the Groq OpenAI-compatible API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{check_status, ChatMessage, CompletionProvider, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Completion provider backed by Groq's `/chat/completions` endpoint.
#[derive(Clone, Debug)]
pub struct GroqCompletion {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GroqCompletion {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Overrides the API base URL. Used to point at a mock server in tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[async_trait]
impl CompletionProvider for GroqCompletion {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&ChatCompletionRequest { model, messages })
            .send()
            .await?;
        let payload: ChatCompletionResponse = check_status(response).await?.json().await?;
        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("completion reply had no choices".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn parses_first_choice_content() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .json_body_includes(json!({"model": "model-x"}).to_string());
                then.status(200).json_body(json!({
                    "choices": [
                        {"message": {"role": "assistant", "content": "42"}},
                        {"message": {"role": "assistant", "content": "ignored"}}
                    ]
                }));
            })
            .await;

        let provider = GroqCompletion::new("key").with_base_url(server.base_url());
        let reply = provider
            .complete(&[ChatMessage::user("what is the answer?")], "model-x")
            .await
            .expect("completion failed");

        assert_eq!(reply, "42");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_becomes_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(429).body("rate limited");
            })
            .await;

        let provider = GroqCompletion::new("key").with_base_url(server.base_url());
        let err = provider
            .complete(&[ChatMessage::user("q")], "model-x")
            .await
            .expect_err("expected failure");

        match err {
            ProviderError::Api { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(json!({"choices": []}));
            })
            .await;

        let provider = GroqCompletion::new("key").with_base_url(server.base_url());
        let err = provider
            .complete(&[ChatMessage::user("q")], "model-x")
            .await
            .expect_err("expected failure");
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }
}
