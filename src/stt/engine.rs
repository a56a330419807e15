//! Core transcription trait and the Whisper implementation.
//!
//! [`Transcriber`] is object-safe and `Send + Sync` so it can be held behind
//! an `Arc<dyn Transcriber>` shared by the conversation loop and the HTTP
//! facade.  [`WhisperTranscriber`] wraps a `whisper_rs::WhisperContext`; the
//! model is loaded exactly once (at process start) because loading is by far
//! the most expensive part of a transcription.
//!
//! An empty transcript is **not** an error: it means nothing intelligible was
//! detected, and callers handle it as a "please repeat" branch.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::sample::AudioSample;
use crate::audio::resample::resample;
use crate::stt::transcribe::TranscribeParams;

/// Whisper only accepts 16 kHz mono input.
const WHISPER_RATE: u32 = 16_000;

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// All errors that can arise from the STT subsystem.
///
/// Note that "no speech detected" is deliberately absent — that case is an
/// `Ok` with an empty string.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// The GGML model file was not found at the given path.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// `whisper_rs` failed to initialise a `WhisperContext` or `WhisperState`.
    #[error("Whisper context initialisation failed: {0}")]
    ContextInit(String),

    /// An error occurred during the inference pass.
    #[error("transcription error: {0}")]
    Transcription(String),
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for speech-to-text engines.
///
/// # Contract
///
/// - Accepts any mono [`AudioSample`]; implementations resample internally
///   when the engine needs a specific rate.
/// - Returns `Ok(String::new())` when nothing intelligible was detected —
///   callers must treat this as "no speech understood", not as an error.
pub trait Transcriber: Send + Sync {
    /// Transcribe `audio` and return the text transcript.
    fn transcribe(&self, audio: &AudioSample) -> Result<String, SttError>;
}

// Compile-time assertion: Box<dyn Transcriber> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Transcriber>) {}
};

// ---------------------------------------------------------------------------
// WhisperTranscriber
// ---------------------------------------------------------------------------

/// Production STT engine that wraps a `whisper_rs::WhisperContext`.
///
/// A new `WhisperState` is created for every [`transcribe`] call so the
/// engine can be shared across threads without any locking.
///
/// [`transcribe`]: Transcriber::transcribe
pub struct WhisperTranscriber {
    ctx: WhisperContext,
    params: TranscribeParams,
}

impl std::fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// `WhisperContext` holds a raw pointer internally but declares
// `unsafe impl Send` and `unsafe impl Sync` in whisper-rs — the model
// weights are read-only after loading.  `TranscribeParams` is fully owned
// and trivially Send+Sync.
// SAFETY: WhisperContext is Send+Sync as declared by whisper-rs.
unsafe impl Send for WhisperTranscriber {}
unsafe impl Sync for WhisperTranscriber {}

impl WhisperTranscriber {
    /// Load a GGML model from `model_path` and prepare it for inference.
    ///
    /// # Errors
    ///
    /// - [`SttError::ModelNotFound`] — `model_path` does not exist.
    /// - [`SttError::ContextInit`]  — whisper-rs failed to load the file.
    pub fn load(
        model_path: impl AsRef<Path>,
        params: TranscribeParams,
    ) -> Result<Self, SttError> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path.to_str().ok_or_else(|| {
            SttError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let ctx_params = WhisperContextParameters::default();
        let ctx = WhisperContext::new_with_params(path_str, ctx_params)
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        Ok(Self { ctx, params })
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, audio: &AudioSample) -> Result<String, SttError> {
        if audio.samples.is_empty() {
            return Ok(String::new());
        }

        // Whisper wants 16 kHz mono; convert when the caller recorded at a
        // different rate.
        let samples: Vec<f32> = if audio.sample_rate == WHISPER_RATE {
            audio.samples.clone()
        } else {
            resample(&audio.samples, audio.sample_rate, WHISPER_RATE)
        };

        let mut fp = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        // set_language takes an Option<&str> whose lifetime is tied to fp.
        // Both `fp` and the borrow of `self.params.language` remain alive
        // until state.full() returns, so the borrow is valid.
        let lang: Option<&str> = if self.params.language == "auto" {
            None
        } else {
            Some(self.params.language.as_str())
        };
        fp.set_language(lang);
        fp.set_n_threads(self.params.n_threads);

        if self.params.suppress_progress {
            fp.set_print_progress(false);
            fp.set_print_realtime(false);
        }

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        state
            .full(fp, &samples)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let mut text = String::new();
        for i in 0..n_segments {
            let seg_text = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Transcription(format!("segment {i}: {e}")))?;
            text.push_str(&seg_text);
        }

        Ok(text.trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// MockTranscriber  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without loading any
/// model file.
#[cfg(test)]
pub struct MockTranscriber {
    response: Result<String, SttError>,
}

#[cfg(test)]
impl MockTranscriber {
    /// Create a mock that always returns `Ok(text)`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    /// Create a mock that always returns `Ok("")` — "no speech understood".
    pub fn empty() -> Self {
        Self::ok("")
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: SttError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
impl Transcriber for MockTranscriber {
    fn transcribe(&self, _audio: &AudioSample) -> Result<String, SttError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn one_second_clip() -> AudioSample {
        AudioSample::new(vec![0.0f32; 16_000], 16_000)
    }

    // --- MockTranscriber ---

    #[test]
    fn mock_ok_returns_configured_text() {
        let engine = MockTranscriber::ok("hola, ¿qué tal?");
        assert_eq!(engine.transcribe(&one_second_clip()).unwrap(), "hola, ¿qué tal?");
    }

    #[test]
    fn mock_empty_returns_empty_string_not_error() {
        let engine = MockTranscriber::empty();
        let text = engine.transcribe(&one_second_clip()).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn mock_err_returns_configured_error() {
        let engine = MockTranscriber::err(SttError::Transcription("boom".into()));
        let err = engine.transcribe(&one_second_clip()).unwrap_err();
        assert!(matches!(err, SttError::Transcription(_)));
    }

    // --- WhisperTranscriber::load missing path ---

    #[test]
    fn load_missing_model_returns_model_not_found() {
        let params = TranscribeParams::default();
        let result = WhisperTranscriber::load("/nonexistent/model.bin", params);
        assert!(
            matches!(result, Err(SttError::ModelNotFound(_))),
            "expected ModelNotFound, got: {result:?}"
        );
    }

    // --- Transcriber object safety ---

    #[test]
    fn box_dyn_transcriber_compiles() {
        // If this test compiles, the trait is object-safe.
        let engine: Box<dyn Transcriber> = Box::new(MockTranscriber::ok("ok"));
        let _ = engine.transcribe(&one_second_clip());
    }

    // --- SttError display ---

    #[test]
    fn stt_error_display_model_not_found() {
        let e = SttError::ModelNotFound("/some/path.bin".into());
        assert!(e.to_string().contains("/some/path.bin"));
    }
}
