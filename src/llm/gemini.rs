/// Generative-language API client.
///
/// Talks to the `generateContent` endpoint with the synchronous `ureq`
/// client. One request per call: no retry, no backoff and no request
/// timeout, so a hung call only holds up its own caller.
use serde::{Deserialize, Serialize};

use crate::config::schema::AiConfig;
use crate::error::RemoteCallError;

use super::TextGenerator;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /models/{model}:generateContent`.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    /// A single-turn user request.
    pub(crate) fn user_prompt(prompt: &'a str) -> Self {
        Self {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
        }
    }
}

/// Response body. Only the path to the first generated text is modelled;
/// every level is optional so a partial body still deserializes.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// `candidates[0].content.parts[0].text`, if present.
    pub(crate) fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous client for one model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &AiConfig) -> Self {
        Self {
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.api_base.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.trim().to_string(),
        }
    }

    /// Endpoint URL without the key, for display.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, RemoteCallError> {
        let resp = ureq::post(&self.endpoint)
            .query("key", &self.api_key)
            .send_json(GenerateRequest::user_prompt(prompt));

        let resp = match resp {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, _)) => {
                return Err(RemoteCallError::Status { status });
            }
            Err(e) => return Err(RemoteCallError::Transport(e.to_string())),
        };

        let parsed: GenerateResponse = resp
            .into_json()
            .map_err(|_| RemoteCallError::UnexpectedFormat)?;

        parsed
            .into_first_text()
            .ok_or(RemoteCallError::UnexpectedFormat)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
