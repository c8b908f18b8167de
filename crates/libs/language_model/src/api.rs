use base64::{Engine as _, engine::general_purpose};
use bon::bon;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API error (status {status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl LlmError {
    /// Whether the request gave up waiting on the server.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout(),
            Self::Api { status, .. } => *status == reqwest::StatusCode::GATEWAY_TIMEOUT,
            Self::Json(_) => false,
        }
    }

    /// HTTP status returned by the server, if it answered at all.
    #[must_use]
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Http(e) => e.status(),
            Self::Api { status, .. } => Some(*status),
            Self::Json(_) => None,
        }
    }
}

pub type LlmResult<T> = Result<T, LlmError>;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Message {
    pub role: String,
    pub content: MessageContent,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum MessagePart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Deserialize)]
pub struct ChatFullResponse {
    pub choices: Vec<FullChoice>,
}

#[derive(Deserialize)]
pub struct FullChoice {
    pub message: FullMessage,
}

#[derive(Deserialize)]
pub struct FullMessage {
    pub content: Option<String>,
}

#[derive(Clone)]
pub struct LlmConfig {
    pub temperature: f32,
    pub top_p: Option<f32>,
}

/// Client for an OpenAI-compatible `chat/completions` endpoint.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    config: LlmConfig,
}

#[bon]
impl LlmClient {
    /// `base_url` includes the version segment, e.g. `http://localhost:8080/v1`.
    #[builder(start_fn = with_base_url)]
    pub fn new(
        #[builder(start_fn)] base_url: &str,
        model: Option<String>,
        api_key: Option<String>,
        temperature: Option<f32>,
        top_p: Option<f32>,
        timeout: Option<Duration>,
    ) -> LlmResult<Self> {
        let mut http = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            http = http.timeout(timeout);
        }
        Ok(Self {
            http: http.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.unwrap_or_default(),
            api_key: api_key.filter(|k| !k.is_empty()),
            config: LlmConfig {
                temperature: temperature.unwrap_or(0.0),
                top_p,
            },
        })
    }

    /// Whether a key is configured. Hosted endpoints refuse requests without one.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build a user message from a prompt followed by inline images.
    #[must_use]
    pub fn prepare_message(prompt: &str, images: &[&[u8]]) -> Message {
        let mut parts = vec![MessagePart::Text {
            text: prompt.to_string(),
        }];
        for bytes in images {
            let mime_type = infer::get(bytes).map_or("image/jpeg", |kind| kind.mime_type());
            let b64 = general_purpose::STANDARD.encode(bytes);
            parts.push(MessagePart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:{mime_type};base64,{b64}"),
                },
            });
        }
        Message {
            role: "user".to_string(),
            content: MessageContent::Parts(parts),
        }
    }

    #[builder]
    pub async fn chat(
        &self,
        #[builder(start_fn)] prompt: &str,
        images: Option<&[&[u8]]>,
    ) -> LlmResult<String> {
        let msg = Self::prepare_message(prompt, images.unwrap_or_default());
        self.call(vec![msg]).await
    }

    pub async fn call(&self, messages: Vec<Message>) -> LlmResult<String> {
        let req_body = self.build_request(messages);
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, "Sending chat completion request to {url}");
        let mut request = self.http.post(url).json(&req_body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(LlmError::Api {
                status: response.status(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let full: ChatFullResponse = response.json().await?;
        Ok(full
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default())
    }

    fn build_request(&self, messages: Vec<Message>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            stream: false,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        }
    }
}
