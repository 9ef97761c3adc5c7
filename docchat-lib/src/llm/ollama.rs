use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmSettings;
use crate::llm::{ChatMessage, ChatModel};
use crate::{Error, Result};

/// Client for an Ollama server's `/api/chat` endpoint.
#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: Client,
}

#[derive(Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponseBody {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Upstream(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        })
    }

    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        Self::new(
            settings.base_url.clone(),
            settings.model.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequestBody {
            model: &self.model,
            messages: &messages,
            stream: false,
        };

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("Ollama chat error ({status}): {text}")));
        }

        let payload: ChatResponseBody = res
            .json()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        Ok(payload.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> OllamaClient {
        OllamaClient::new(base_url, "llava", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_chat_returns_message_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "model": "llava",
                "stream": false,
                "messages": [{ "role": "user", "content": "Hello" }],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llava",
                "message": { "role": "assistant", "content": "Hi there!" },
                "done": true,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client(&server.uri()).chat(vec![ChatMessage::user("Hello")]).await.unwrap();
        assert_eq!(reply, "Hi there!");
    }

    #[tokio::test]
    async fn test_images_are_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "messages": [{ "role": "user", "images": ["aGVsbG8="] }],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": { "role": "assistant", "content": "A cat." },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let message = ChatMessage::user("What is this?").with_image("aGVsbG8=");
        let reply = client(&server.uri()).chat(vec![message]).await.unwrap();
        assert_eq!(reply, "A cat.");
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let err = client(&server.uri()).chat(vec![ChatMessage::user("Hello")]).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(ref msg) if msg.contains("model not loaded")));
    }

    #[tokio::test]
    async fn test_unreachable_is_upstream_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{port}");

        let err = client(&url).chat(vec![ChatMessage::user("Hello")]).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let c = client("http://localhost:11434/");
        assert_eq!(c.base_url, "http://localhost:11434");
        assert_eq!(c.model(), "llava");
    }

    #[test]
    fn test_message_without_images_omits_field() {
        let value = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(value, json!({ "role": "user", "content": "hi" }));
    }
}
