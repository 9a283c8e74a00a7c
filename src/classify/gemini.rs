use crate::classify::parse::parse_patterns;
use crate::error::{LensError, Result};
use crate::locator::PatternDescriptor;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini-backed dark-pattern classifier
pub struct GeminiClassifier {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClassifier {
    /// Create a classifier with an explicit API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LensError::ClassifierUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Create a classifier from the GEMINI_API_KEY environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(LensError::MissingApiKey)?;
        Self::new(api_key)
    }

    /// Builder method: override the endpoint base URL (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builder method: override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Classify a page's visible text, returning the detected patterns.
    ///
    /// Transport failures and non-success statuses surface as errors and are
    /// never retried. A successful response whose payload cannot be parsed
    /// yields an empty list instead.
    pub async fn classify(&self, page_text: &str) -> Result<Vec<PatternDescriptor>> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content { parts: vec![Part { text: build_prompt(page_text) }] }],
            generation_config: GenerationConfig { temperature: 0.1, max_output_tokens: 4096 },
        };

        log::debug!("Sending {} chars of page text to {}", page_text.len(), self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LensError::ClassifierUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LensError::ClassifierUnavailable(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LensError::ClassifierRejected { status: status.as_u16(), message });
        }

        let envelope: GenerateContentResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::warn!("Unparsable classifier envelope: {}", e);
                return Ok(Vec::new());
            }
        };

        let answer = envelope
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .unwrap_or_default();

        let patterns = parse_patterns(answer);
        log::info!("Classifier returned {} patterns", patterns.len());

        Ok(patterns)
    }
}

fn build_prompt(page_text: &str) -> String {
    format!(
        r#"Analyze this webpage content for dark patterns. For each dark pattern found, provide:
1. The exact text where the dark pattern appears
2. The type of dark pattern
3. A brief description of how it's being used and how it affects users
4. Find all possible dark patterns on the entire webpage.

Format your response as a JSON array like this:
{{
  "dark_patterns": [
    {{
      "text": "the exact text containing the dark pattern",
      "type": "type of dark pattern (e.g., Urgency, Misdirection, etc.)",
      "description": "brief explanation of how this creates a dark pattern and affects users"
    }}
  ]
}}

Here's the webpage content to analyze:
{}"#,
        page_text
    )
}
