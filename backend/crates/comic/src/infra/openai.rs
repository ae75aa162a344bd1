//! OpenAI-compatible API client
//!
//! Chat completions for scripts, image generations for panels. Any server
//! speaking the same wire format (local or hosted) works.

use crate::application::config::ComicConfig;
use crate::domain::gateway::{ImageGenerator, ImageJob, ScriptGenerator};
use crate::domain::services::ScriptPrompt;
use crate::error::{ComicError, ComicResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Longest upstream error body kept for logging
const MAX_DETAIL_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    chat_url: String,
    images_url: String,
    script_api_key: Option<String>,
    image_api_key: Option<String>,
    image_model: String,
}

impl OpenAiClient {
    pub fn new(config: &ComicConfig) -> ComicResult<Self> {
        let client = Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(|e| ComicError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            chat_url: config.chat_completions_url(),
            images_url: config.image_generations_url(),
            script_api_key: config.script_api_key.clone(),
            image_api_key: config.image_api_key.clone(),
            image_model: config.image_model.clone(),
        })
    }

    async fn post_json<B, R>(&self, url: &str, api_key: Option<&str>, body: &B) -> ComicResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(url).json(body);
        if let Some(key) = api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail: String = detail.chars().take(MAX_DETAIL_CHARS).collect();
            return Err(ComicError::Upstream(format!("{url} answered {status}: {detail}")));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ComicError::Upstream(format!("Malformed response from {url}: {e}")))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

impl ImageResponse {
    /// Hosted URLs as-is, inline payloads as data URLs
    fn into_urls(self) -> Vec<String> {
        self.data
            .into_iter()
            .filter_map(|datum| match (datum.url, datum.b64_json) {
                (Some(url), _) => Some(url),
                (None, Some(b64)) => Some(format!("data:image/png;base64,{b64}")),
                (None, None) => None,
            })
            .collect()
    }
}

impl ScriptGenerator for OpenAiClient {
    async fn complete(&self, model: &str, prompt: &ScriptPrompt) -> ComicResult<String> {
        let body = ChatRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: 0.7,
        };

        let response: ChatResponse = self
            .post_json(&self.chat_url, self.script_api_key.as_deref(), &body)
            .await?;

        response
            .into_text()
            .ok_or_else(|| ComicError::Upstream("Chat completion had no content".into()))
    }
}

impl ImageGenerator for OpenAiClient {
    async fn render(&self, job: &ImageJob) -> ComicResult<Vec<String>> {
        let body = ImageRequest {
            model: &self.image_model,
            prompt: &job.prompt,
            n: job.count,
            size: &job.size,
        };

        let response: ImageResponse = self
            .post_json(&self.images_url, self.image_api_key.as_deref(), &body)
            .await?;

        Ok(response.into_urls())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_shape() {
        let prompt = ScriptPrompt {
            system: "sys".into(),
            user: "article".into(),
        };
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: 0.7,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "article");
    }

    #[test]
    fn test_chat_response_text() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Scene 1: hi"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().as_deref(), Some("Scene 1: hi"));

        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(response.into_text(), None);

        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(response.into_text(), None);
    }

    #[test]
    fn test_image_response_urls() {
        let response: ImageResponse = serde_json::from_str(
            r#"{"created":1,"data":[{"url":"https://img/1.png"},{"b64_json":"AAAA"},{}]}"#,
        )
        .unwrap();
        assert_eq!(
            response.into_urls(),
            vec!["https://img/1.png", "data:image/png;base64,AAAA"]
        );
    }

    #[test]
    fn test_client_urls_from_config() {
        let config = ComicConfig {
            script_api_url: "http://llm.local/v1/".into(),
            ..ComicConfig::default()
        };
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.chat_url, "http://llm.local/v1/chat/completions");
        assert_eq!(client.images_url, "https://api.openai.com/v1/images/generations");
    }
}
