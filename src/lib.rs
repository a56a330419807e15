//! charla — a Spanish voice chat bot.
//!
//! Records a few seconds of speech from the microphone, transcribes it with
//! Whisper, asks the Gemini API for a short conversational reply, and speaks
//! the reply back through a hosted TTS endpoint.
//!
//! # Crate layout
//!
//! | Module         | Responsibility                                        |
//! |----------------|-------------------------------------------------------|
//! | `audio`        | capture, high-pass filtering, resampling, WAV, playback |
//! | `stt`          | Whisper transcription (`Transcriber` trait)           |
//! | `reply`        | Gemini response generation (`ResponseGenerator` trait)|
//! | `tts`          | speech synthesis + playback (`Speaker` trait)         |
//! | `conversation` | the record → transcribe → generate → speak loop       |
//! | `http`         | axum facade mirroring the three adapter operations    |
//! | `dataset`      | podcast dataset metadata + audio preprocessing        |
//! | `config`       | TOML settings and platform paths                      |

pub mod audio;
pub mod config;
pub mod conversation;
pub mod dataset;
pub mod http;
pub mod reply;
pub mod stt;
pub mod tts;
