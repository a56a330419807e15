//! STT (Speech-to-Text) module.
//!
//! [`Transcriber`] is the narrow interface the conversation loop and HTTP
//! facade transcribe through; [`WhisperTranscriber`] is the production
//! implementation wrapping a `whisper_rs::WhisperContext` loaded once at
//! process start.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use charla::audio::AudioSample;
//! use charla::stt::{Transcriber, TranscribeParams, WhisperTranscriber};
//!
//! let params = TranscribeParams::default(); // language = "es"
//! let engine = WhisperTranscriber::load("models/ggml-small.bin", params).unwrap();
//!
//! let audio = AudioSample::new(vec![0.0; 16_000], 16_000); // 1 s of silence
//! let text = engine.transcribe(&audio).unwrap();
//! assert!(text.is_empty()); // nothing intelligible → empty string, not an error
//! ```

pub mod engine;
pub mod transcribe;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{SttError, Transcriber, WhisperTranscriber};
pub use transcribe::{optimal_threads, TranscribeParams};

// test-only re-export so other modules can import MockTranscriber without
// `use charla::stt::engine::MockTranscriber`.
#[cfg(test)]
pub use engine::MockTranscriber;
