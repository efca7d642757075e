use async_trait::async_trait;
use serde_json::Value;

#[cfg(test)]
use mockall::automock;

/// One prompt sent to the text-completion provider
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System message framing the model's role
    pub system: String,

    /// User prompt carrying the instructions and the transcript
    pub prompt: String,

    pub temperature: f32,

    pub max_tokens: u32,
}

#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("Missing API key for the text-completion provider (set OPENAI_API_KEY)")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Text-completion capability used by the learning package generator
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one prompt and return the raw completion text
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

/// Client for OpenAI-compatible `chat/completions` endpoints
pub struct OpenAiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        tracing::debug!(
            "Sending completion request to {} (model {}, {} prompt chars)",
            self.api_url,
            self.model,
            request.prompt.len()
        );

        let response = self
            .http
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "system",
                        "content": request.system,
                    },
                    {
                        "role": "user",
                        "content": request.prompt,
                    },
                ],
                "temperature": request.temperature,
                "max_tokens": request.max_tokens,
            }))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str::<Value>(&text);

        if !status.is_success() {
            let message = match &body {
                Ok(body) => error_message(body),
                Err(_) => text,
            };
            return Err(LlmError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = body.map_err(|e| LlmError::InvalidResponse(format!("body is not JSON: {}", e)))?;
        extract_content(&body)
    }
}

/// Pull `choices[0].message.content` out of a chat completion body
fn extract_content(body: &Value) -> Result<String, LlmError> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| LlmError::InvalidResponse("missing choices[0].message.content".to_string()))
}

fn error_message(body: &Value) -> String {
    body["error"]["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}
