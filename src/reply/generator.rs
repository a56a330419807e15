//! Core `ResponseGenerator` trait and `GeminiGenerator` implementation.
//!
//! `GeminiGenerator` calls the Google Generative Language
//! `models/{model}:generateContent` endpoint.  All connection details come
//! from [`GeneratorConfig`]; the API key may also be supplied through the
//! `GEMINI_API_KEY` environment variable.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::GeneratorConfig;

// ---------------------------------------------------------------------------
// Persona instruction
// ---------------------------------------------------------------------------

/// Fixed persona/style instruction prepended to every request.
const PERSONA_INSTRUCTION: &str = "\
Eres un asistente conversacional en español. Adáptate al contexto de la \
conversación (por ejemplo: si la persona te habla como si fueras su amigo o \
un familiar, respóndele con ese rol). Tú no eres un chatbot, eres la persona. \
Mantén tus respuestas cortas. Responde de manera natural y conversacional.";

// ---------------------------------------------------------------------------
// GenError
// ---------------------------------------------------------------------------

/// Errors that can occur during response generation.
///
/// The remote-service variants are deliberately distinct so the conversation
/// loop can branch on kind instead of matching message strings.  None of
/// them are retried automatically.
#[derive(Debug, Error)]
pub enum GenError {
    /// No API key in config or `GEMINI_API_KEY` — construction fails.
    #[error("Gemini API key not found; set it in settings.toml or GEMINI_API_KEY")]
    MissingApiKey,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("generation request timed out")]
    Timeout,

    /// The remote quota is exhausted (HTTP 429).  Retryable by the caller.
    #[error("API rate limit exceeded; try again later")]
    QuotaExhausted,

    /// The remote service is unavailable (HTTP 5xx).  Retryable by the caller.
    #[error("generation service is currently unavailable; try again later")]
    Unavailable,

    /// The input was rejected by the model (HTTP 400).
    #[error("invalid input to model: {0}")]
    InvalidInput(String),

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse generation response: {0}")]
    Parse(String),

    /// The model returned a response with no usable text content.
    #[error("received empty response from model")]
    EmptyResponse,
}

impl From<reqwest::Error> for GenError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GenError::Timeout
        } else {
            GenError::Request(e.to_string())
        }
    }
}

/// Map a non-success HTTP status to the matching [`GenError`] kind.
fn classify_status(status: StatusCode, body: String) -> GenError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => GenError::QuotaExhausted,
        StatusCode::BAD_REQUEST => GenError::InvalidInput(body),
        s if s.is_server_error() => GenError::Unavailable,
        s => GenError::Request(format!("unexpected status {s}: {body}")),
    }
}

// ---------------------------------------------------------------------------
// ResponseGenerator trait
// ---------------------------------------------------------------------------

/// Async trait for conversational reply generation.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn ResponseGenerator>`).
///
/// # Arguments
/// * `text`    – Transcribed user utterance.
/// * `context` – Optional pre-built context string from
///               [`ContextWindow`](crate::reply::ContextWindow).
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, text: &str, context: Option<&str>) -> Result<String, GenError>;
}

// ---------------------------------------------------------------------------
// GeminiGenerator
// ---------------------------------------------------------------------------

/// Calls the Gemini `generateContent` endpoint with the fixed persona
/// instruction.
#[derive(Debug)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
    api_key: String,
}

impl GeminiGenerator {
    /// Build a `GeminiGenerator` from application config.
    ///
    /// The API key is taken from `config.api_key` or, failing that, the
    /// `GEMINI_API_KEY` environment variable.  Absence of both is a fatal
    /// construction error.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()))
            .ok_or(GenError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    /// Combine persona, optional context, and the user utterance into the
    /// single prompt string sent to the model.
    fn build_prompt(text: &str, context: Option<&str>) -> String {
        let mut prompt = String::with_capacity(512);
        prompt.push_str(PERSONA_INSTRUCTION);
        if let Some(ctx) = context {
            prompt.push_str("\n\n");
            prompt.push_str(ctx);
        }
        prompt.push_str("\n\nLa persona dice: ");
        prompt.push_str(text);
        prompt
    }
}

#[async_trait]
impl ResponseGenerator for GeminiGenerator {
    async fn generate(&self, text: &str, context: Option<&str>) -> Result<String, GenError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.api_key
        );

        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": Self::build_prompt(text, context) } ] }
            ]
        });

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenError::Parse(e.to_string()))?;

        let reply = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or(GenError::EmptyResponse)?
            .trim()
            .to_string();

        if reply.is_empty() {
            return Err(GenError::EmptyResponse);
        }

        Ok(reply)
    }
}

// ---------------------------------------------------------------------------
// MockGenerator  (test-only)
// ---------------------------------------------------------------------------

/// A test double that replies with a fixed string or fails with a chosen
/// error kind.
#[cfg(test)]
pub struct MockGenerator {
    response: Result<String, MockFailure>,
}

#[cfg(test)]
#[derive(Clone, Copy)]
pub enum MockFailure {
    Quota,
    Unavailable,
    InvalidInput,
    Empty,
}

#[cfg(test)]
impl MockGenerator {
    pub fn ok(reply: impl Into<String>) -> Self {
        Self {
            response: Ok(reply.into()),
        }
    }

    pub fn fail(kind: MockFailure) -> Self {
        Self {
            response: Err(kind),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl ResponseGenerator for MockGenerator {
    async fn generate(&self, _text: &str, _ctx: Option<&str>) -> Result<String, GenError> {
        match &self.response {
            Ok(reply) => Ok(reply.clone()),
            Err(MockFailure::Quota) => Err(GenError::QuotaExhausted),
            Err(MockFailure::Unavailable) => Err(GenError::Unavailable),
            Err(MockFailure::InvalidInput) => Err(GenError::InvalidInput("bad input".into())),
            Err(MockFailure::Empty) => Err(GenError::EmptyResponse),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> GeneratorConfig {
        GeneratorConfig {
            api_key: api_key.map(|s| s.to_string()),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn from_config_with_key_builds() {
        let config = make_config(Some("test-key-1234"));
        assert!(GeminiGenerator::from_config(&config).is_ok());
    }

    #[test]
    fn from_config_empty_key_and_no_env_fails() {
        // Empty string keys must not count as "present".
        let config = make_config(Some(""));
        // Only meaningful when GEMINI_API_KEY is not set in the test env.
        if std::env::var("GEMINI_API_KEY").is_err() {
            let err = GeminiGenerator::from_config(&config).unwrap_err();
            assert!(matches!(err, GenError::MissingApiKey));
        }
    }

    #[test]
    fn build_prompt_contains_persona_and_text() {
        let prompt = GeminiGenerator::build_prompt("hola", None);
        assert!(prompt.contains("asistente conversacional"));
        assert!(prompt.ends_with("hola"));
    }

    #[test]
    fn build_prompt_includes_context_when_present() {
        let prompt = GeminiGenerator::build_prompt("hola", Some("Conversación previa: …"));
        assert!(prompt.contains("Conversación previa"));
    }

    #[test]
    fn classify_429_as_quota() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, String::new());
        assert!(matches!(err, GenError::QuotaExhausted));
    }

    #[test]
    fn classify_400_as_invalid_input() {
        let err = classify_status(StatusCode::BAD_REQUEST, "bad prompt".into());
        assert!(matches!(err, GenError::InvalidInput(msg) if msg == "bad prompt"));
    }

    #[test]
    fn classify_503_as_unavailable() {
        let err = classify_status(StatusCode::SERVICE_UNAVAILABLE, String::new());
        assert!(matches!(err, GenError::Unavailable));
    }

    #[test]
    fn classify_other_as_request() {
        let err = classify_status(StatusCode::FORBIDDEN, String::new());
        assert!(matches!(err, GenError::Request(_)));
    }

    /// Verify that `GeminiGenerator` is object-safe (usable as
    /// `dyn ResponseGenerator`).
    #[test]
    fn generator_is_object_safe() {
        let config = make_config(Some("test-key"));
        let generator: Box<dyn ResponseGenerator> =
            Box::new(GeminiGenerator::from_config(&config).unwrap());
        drop(generator);
    }

    #[tokio::test]
    async fn mock_ok_replies() {
        let generator = MockGenerator::ok("¡Hola!");
        assert_eq!(generator.generate("hola", None).await.unwrap(), "¡Hola!");
    }

    #[tokio::test]
    async fn mock_quota_fails_with_quota_kind() {
        let generator = MockGenerator::fail(MockFailure::Quota);
        let err = generator.generate("hola", None).await.unwrap_err();
        assert!(matches!(err, GenError::QuotaExhausted));
    }
}
