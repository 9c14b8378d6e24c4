use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{ComparisonResult, Verdict};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Facts handed to the narrator once a comparison is settled.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentaryRequest {
    pub competitor1: String,
    pub competitor2: String,
    pub activity: String,
    pub verdict: Verdict,
    pub margin: f64,
}

impl CommentaryRequest {
    pub fn from_result(result: &ComparisonResult) -> Self {
        Self {
            competitor1: result.competitor1.clone(),
            competitor2: result.competitor2.clone(),
            activity: result.activity.clone(),
            verdict: result.verdict.clone(),
            margin: result.margin,
        }
    }

    /// The margin is given for tone only and the model is told not to repeat it.
    pub fn prompt(&self) -> String {
        let outcome = match &self.verdict {
            Verdict::Winner(name) => format!("{name} won."),
            Verdict::Draw => "It ended in a draw.".to_string(),
        };
        format!(
            "Write a funny, dramatic commentary about a competition between {} and {} in {}. \
             {} (For context: the difference between their scores was {:.2}, \
             but do not include this number in your commentary.) \
             Keep it 2-3 sentences and make it funny.",
            self.competitor1, self.competitor2, self.activity, outcome, self.margin
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentaryError {
    #[error("commentary disabled: no provider configured")]
    Disabled,
    #[error("commentary timed out after {0:?}")]
    Timeout(Duration),
    #[error("commentary transport failure: {0}")]
    Transport(String),
    #[error("commentary provider returned status {0}")]
    Provider(u16),
    #[error("commentary provider returned no text")]
    EmptyResponse,
}

/// Outbound narrative hook; implementations may be slow or fail.
#[async_trait]
pub trait CommentaryGenerator: Send + Sync {
    async fn generate(&self, request: &CommentaryRequest) -> Result<String, CommentaryError>;

    fn provider_name(&self) -> &'static str;
}

/// Used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCommentary;

#[async_trait]
impl CommentaryGenerator for DisabledCommentary {
    async fn generate(&self, _request: &CommentaryRequest) -> Result<String, CommentaryError> {
        Err(CommentaryError::Disabled)
    }

    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Google Gemini `generateContent` client.
pub struct GeminiCommentary {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for GeminiCommentary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiCommentary")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<OutboundPart<'a>>,
}

#[derive(Serialize)]
struct OutboundPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<InboundPart>,
}

#[derive(Deserialize)]
struct InboundPart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiCommentary {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, CommentaryError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("crystal-ball/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(request_timeout)
            .build()
            .map_err(|err| CommentaryError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: GEMINI_ENDPOINT.to_string(),
        })
    }

    /// Point the client at a different base URL (proxies, local fakes).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl CommentaryGenerator for GeminiCommentary {
    async fn generate(&self, request: &CommentaryRequest) -> Result<String, CommentaryError> {
        let prompt = request.prompt();
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![OutboundPart { text: &prompt }],
            }],
        };

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| CommentaryError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CommentaryError::Provider(status.as_u16()));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|err| CommentaryError::Transport(err.to_string()))?;

        extract_text(payload).ok_or(CommentaryError::EmptyResponse)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

fn extract_text(payload: GenerateResponse) -> Option<String> {
    let content = payload.candidates.into_iter().next()?.content?;
    let text = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
