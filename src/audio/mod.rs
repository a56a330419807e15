//! Audio pipeline — microphone capture → downmix → resample → normalize →
//! high-pass filter, plus WAV persistence and speaker playback.
//!
//! # Recording chain
//!
//! ```text
//! Microphone → cpal callback → chunks (mpsc) → downmix_to_mono
//!           → resample → normalize → highpass_filtfilt → normalize
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use charla::audio::{CpalRecorder, RecordParams, Recorder};
//!
//! let recorder = CpalRecorder::new();
//! let sample = recorder.record(&RecordParams::default()).unwrap();
//! println!("captured {} samples @ {} Hz", sample.samples.len(), sample.sample_rate);
//! ```

pub mod capture;
pub mod filter;
pub mod playback;
pub mod resample;
pub mod sample;
pub mod wav;

pub use capture::{CpalRecorder, RecordParams, Recorder};
pub use filter::highpass_filtfilt;
pub use playback::play_blocking;
pub use resample::{downmix_to_mono, resample};
pub use sample::{normalize, AudioError, AudioSample};
pub use wav::{read_wav, write_wav};

// test-only re-export so other modules can import MockRecorder without
// `use charla::audio::capture::MockRecorder`.
#[cfg(test)]
pub use capture::MockRecorder;
