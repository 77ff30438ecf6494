// API client module: a small blocking HTTP client for the Gemini
// `generateContent` endpoint. One request per prompt, no streaming.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Models accepted by `/model`. The first entry is the startup default.
pub const SUPPORTED_MODELS: [&str; 2] = ["gemini-1.5-flash", "gemini-1.5-pro"];

/// Returned in place of a reply when a 200 body does not carry the
/// expected `candidates[0].content.parts[0].text` path.
pub const NO_REPLY: &str = "No response from Gemini.";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Blocking client for the Gemini API. Holds the API key, the currently
/// selected model and the endpoint base URL.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// Request payload for `generateContent`. Serializes to
/// `{"contents":[{"parts":[{"text": ...}]}]}`.
#[derive(Serialize, Debug)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Part {
    pub text: String,
}

/// Success response body. Every field defaults so that a body with
/// missing keys decodes to empty containers instead of failing.
#[derive(Deserialize, Debug, Default)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

impl GeminiClient {
    /// Create a client from the `GEMINI_API_KEY` environment variable.
    /// A missing key is the one fatal startup error.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .with_context(|| format!("{API_KEY_VAR} is not set (export it or add it to .env)"))?;
        Self::new(api_key)
    }

    /// Create a client with an explicit key. The model starts at the
    /// allow-list default.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GeminiClient {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: SUPPORTED_MODELS[0].to_string(),
        })
    }

    /// Point the client at a different host. The default is the public
    /// Gemini endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The currently selected model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Switch to `name` if it is on the allow-list. Returns whether the
    /// switch happened; an unknown name leaves the selection unchanged.
    pub fn set_model(&mut self, name: &str) -> bool {
        if SUPPORTED_MODELS.contains(&name) {
            self.model = name.to_string();
            true
        } else {
            false
        }
    }

    /// Send one prompt to the current model and return the reply text,
    /// trimmed of surrounding whitespace.
    ///
    /// A 200 response whose body lacks the expected shape yields the
    /// `NO_REPLY` sentinel. Any other status returns an error carrying
    /// the status and the raw response body.
    pub fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.model, "sending generateContent request");
        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .context("Failed to send request to Gemini")?;

        let status = res.status();
        if !status.is_success() {
            let txt = res.text().unwrap_or_else(|_| "".into());
            warn!(%status, "Gemini request failed");
            anyhow::bail!("Gemini request failed: {} - {}", status, txt);
        }

        let txt = res.text().context("Reading Gemini response body")?;
        // Any undecodable body counts as "no response", not an error.
        let parsed: GenerateResponse = serde_json::from_str(&txt).unwrap_or_default();
        Ok(extract_reply(&parsed))
    }
}

/// Walk `candidates[0].content.parts[0].text`; fall back to the sentinel
/// when any step of the path is missing.
fn extract_reply(response: &GenerateResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.parts.first())
        .map(|part| part.text.trim().to_string())
        .unwrap_or_else(|| NO_REPLY.to_string())
}
