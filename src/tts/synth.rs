//! Speech synthesis client and the `Speaker` trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::{play_blocking, read_wav, AudioError};
use crate::config::TtsConfig;

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

/// Errors that can occur while synthesising or playing speech.
#[derive(Debug, Error)]
pub enum TtsError {
    /// HTTP transport or connection error.
    #[error("TTS request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("TTS request timed out")]
    Timeout,

    /// The endpoint returned a non-success status.
    #[error("TTS endpoint returned {status}: {body}")]
    Endpoint { status: u16, body: String },

    /// Writing or reading the synthesised WAV failed.
    #[error("speech file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Decoding or playing the synthesised audio failed.
    #[error("speech playback failed: {0}")]
    Playback(#[from] AudioError),

    /// The playback task was cancelled or panicked.
    #[error("playback task failed: {0}")]
    Join(String),
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Speaker trait
// ---------------------------------------------------------------------------

/// Async trait for speaking a reply out loud.
///
/// Implementations synthesise `text`, persist the audio at `output_path`,
/// play it to completion, and return the path of the written file.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str, output_path: &Path) -> Result<PathBuf, TtsError>;
}

// ---------------------------------------------------------------------------
// ApiSpeaker
// ---------------------------------------------------------------------------

/// Production speaker backed by an OpenAI-compatible `/v1/audio/speech`
/// endpoint.
pub struct ApiSpeaker {
    client: reqwest::Client,
    config: TtsConfig,
}

impl ApiSpeaker {
    /// Build an `ApiSpeaker` from application config.
    pub fn from_config(config: &TtsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Request synthesis and return the raw WAV bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let url = format!("{}/v1/audio/speech", self.config.base_url);

        let body = serde_json::json!({
            "model": self.config.model,
            "input": text,
            "voice": self.config.voice,
            "response_format": "wav",
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Speaker for ApiSpeaker {
    async fn speak(&self, text: &str, output_path: &Path) -> Result<PathBuf, TtsError> {
        let wav_bytes = self.synthesize(text).await?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output_path, &wav_bytes)?;

        let clip = read_wav(output_path)?;

        // cpal playback blocks on the output stream; keep it off the async
        // runtime threads.
        tokio::task::spawn_blocking(move || play_blocking(&clip))
            .await
            .map_err(|e| TtsError::Join(e.to_string()))??;

        Ok(output_path.to_path_buf())
    }
}

// ---------------------------------------------------------------------------
// MockSpeaker  (test-only)
// ---------------------------------------------------------------------------

/// A test double that records spoken texts instead of calling any endpoint
/// or audio device.
#[cfg(test)]
pub struct MockSpeaker {
    fail: bool,
    pub spoken: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockSpeaker {
    pub fn ok() -> Self {
        Self {
            fail: false,
            spoken: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            spoken: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Speaker for MockSpeaker {
    async fn speak(&self, text: &str, output_path: &Path) -> Result<PathBuf, TtsError> {
        if self.fail {
            return Err(TtsError::Endpoint {
                status: 503,
                body: "down".into(),
            });
        }
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(output_path.to_path_buf())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_builds() {
        let speaker = ApiSpeaker::from_config(&TtsConfig::default());
        assert_eq!(speaker.config.voice, "nova");
    }

    #[test]
    fn speaker_is_object_safe() {
        let speaker: Box<dyn Speaker> = Box::new(ApiSpeaker::from_config(&TtsConfig::default()));
        drop(speaker);
    }

    #[tokio::test]
    async fn mock_records_spoken_text() {
        let speaker = MockSpeaker::ok();
        let path = speaker
            .speak("¡Hola!", Path::new("/tmp/reply.wav"))
            .await
            .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/reply.wav"));
        assert_eq!(speaker.spoken.lock().unwrap().as_slice(), ["¡Hola!"]);
    }

    #[tokio::test]
    async fn mock_failing_returns_endpoint_error() {
        let speaker = MockSpeaker::failing();
        let err = speaker
            .speak("hola", Path::new("/tmp/reply.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::Endpoint { status: 503, .. }));
    }

    #[test]
    fn timeout_classification() {
        // TtsError::Timeout has a distinct display string the loop logs.
        assert_eq!(TtsError::Timeout.to_string(), "TTS request timed out");
    }
}
