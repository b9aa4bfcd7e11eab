use crate::constants::gemini;
use crate::error::GlossaError;
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: gemini::DEFAULT_MODEL.to_string(),
            base_url: gemini::BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Upper bound on how long one request may take, connect through body.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, GlossaError> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url,
            gemini::API_VERSION,
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: &'a [Message],
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Reply text lives at `candidates[0].content.parts[0].text`.
fn extract_reply(response: GenerateContentResponse) -> Result<String, GlossaError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GlossaError::Protocol("response has no candidates".into()))?;
    let content = candidate
        .content
        .ok_or_else(|| GlossaError::Protocol("candidate has no content".into()))?;
    content
        .parts
        .into_iter()
        .next()
        .and_then(|part| part.text)
        .ok_or_else(|| GlossaError::Protocol("candidate content has no text part".into()))
}

/// Drop the URL from transport errors so the request target never ends up in
/// a reply, the history file or the log.
fn transport_error(e: reqwest::Error) -> GlossaError {
    GlossaError::Http(e.without_url())
}

fn api_error(status: reqwest::StatusCode, body: String) -> GlossaError {
    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => {
            let msg = envelope.error.message.unwrap_or_else(|| body.clone());
            match envelope.error.status {
                Some(s) if !s.is_empty() => format!("{s}: {msg}"),
                _ => msg,
            }
        }
        Err(_) => body,
    };
    GlossaError::api(status.as_u16(), message)
}

#[async_trait::async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(
        &self,
        system_instruction: &str,
        messages: &[Message],
    ) -> Result<String, GlossaError> {
        if messages.is_empty() {
            return Err(GlossaError::Protocol(
                "cannot request a completion for an empty conversation".into(),
            ));
        }

        let request_body = GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: [TextPart {
                    text: system_instruction,
                }],
            },
            contents: messages,
        };

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let response_text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!(%status, "Gemini API returned an error status");
            return Err(api_error(status, response_text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| GlossaError::Protocol(format!("failed to parse response: {e}")))?;

        extract_reply(parsed)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
