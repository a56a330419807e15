//! Fixed-duration microphone capture via `cpal`.
//!
//! [`Recorder`] is the narrow interface the conversation loop and the HTTP
//! facade record through; [`CpalRecorder`] is the production implementation.
//! A call blocks for the requested duration, then runs the pre-processing
//! chain from the `audio` module docs: downmix → resample → normalize →
//! high-pass → normalize.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio::filter::highpass_filtfilt;
use crate::audio::resample::{downmix_to_mono, resample};
use crate::audio::sample::{normalize, AudioError, AudioSample};

// ---------------------------------------------------------------------------
// RecordParams
// ---------------------------------------------------------------------------

/// Parameters for one fixed-duration recording.
#[derive(Debug, Clone)]
pub struct RecordParams {
    /// Recording length in seconds.
    pub duration_secs: f32,
    /// Target sample rate of the returned [`AudioSample`], in Hz.
    pub sample_rate: u32,
    /// High-pass cutoff frequency in Hz.
    pub highpass_cutoff_hz: f32,
    /// Butterworth filter order.
    pub highpass_order: usize,
}

impl Default for RecordParams {
    fn default() -> Self {
        Self {
            duration_secs: 5.0,
            sample_rate: 16_000,
            highpass_cutoff_hz: 100.0,
            highpass_order: 4,
        }
    }
}

impl From<&crate::config::AudioConfig> for RecordParams {
    fn from(cfg: &crate::config::AudioConfig) -> Self {
        Self {
            duration_secs: cfg.duration_secs,
            sample_rate: cfg.sample_rate,
            highpass_cutoff_hz: cfg.highpass_cutoff_hz,
            highpass_order: cfg.highpass_order,
        }
    }
}

// ---------------------------------------------------------------------------
// Recorder trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for microphone capture.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn Recorder>` and shared between the conversation loop and the HTTP
/// facade.
///
/// # Contract
///
/// - Blocks for roughly `params.duration_secs`.
/// - Returns a normalized, high-pass-filtered mono waveform at
///   `params.sample_rate`.
/// - Errors when no input device is available or the captured audio is
///   entirely silent (normalization would divide by zero).
pub trait Recorder: Send + Sync {
    /// Capture one fixed-duration clip.
    fn record(&self, params: &RecordParams) -> Result<AudioSample, AudioError>;
}

// Compile-time assertion: Box<dyn Recorder> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Recorder>) {}
};

// ---------------------------------------------------------------------------
// CpalRecorder
// ---------------------------------------------------------------------------

/// Production recorder built on the system default input device.
///
/// The device and stream are opened per call: the conversation loop records
/// once every few seconds, so holding the hardware open between cycles buys
/// nothing and keeps the microphone free for other applications.
#[derive(Debug, Default)]
pub struct CpalRecorder;

impl CpalRecorder {
    pub fn new() -> Self {
        Self
    }
}

/// Extra wall-clock margin allowed beyond the nominal recording duration
/// before the capture is considered stuck.
const CAPTURE_GRACE: Duration = Duration::from_secs(2);

impl Recorder for CpalRecorder {
    fn record(&self, params: &RecordParams) -> Result<AudioSample, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(AudioError::NoInputDevice)?;

        let supported = device.default_input_config()?;
        let channels = supported.channels();
        let native_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        // Interleaved samples needed at the native rate to cover the duration.
        let target_interleaved =
            (params.duration_secs * native_rate as f32) as usize * channels as usize;

        let (tx, rx) = mpsc::channel::<Vec<f32>>();

        let stream = device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Ignore send errors; the receiver is dropped once enough
                // audio has arrived.
                let _ = tx.send(data.to_vec());
            },
            |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
            },
            None,
        )?;
        stream.play()?;

        log::debug!(
            "recording {}s @ {} Hz native ({} ch)",
            params.duration_secs,
            native_rate,
            channels
        );

        let deadline = Instant::now()
            + Duration::from_secs_f32(params.duration_secs)
            + CAPTURE_GRACE;

        let mut raw: Vec<f32> = Vec::with_capacity(target_interleaved);
        while raw.len() < target_interleaved {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(chunk) => raw.extend_from_slice(&chunk),
                Err(_) => {
                    return Err(AudioError::CaptureTimeout {
                        expected: target_interleaved,
                        got: raw.len(),
                    });
                }
            }
        }
        drop(stream);
        raw.truncate(target_interleaved);

        // Downmix → resample → normalize → high-pass → normalize, mirroring
        // the recorder's processing order.
        let mono = downmix_to_mono(&raw, channels);
        let resampled = resample(&mono, native_rate, params.sample_rate);
        let normalized = normalize(&resampled)?;
        let filtered = highpass_filtfilt(
            &normalized,
            params.sample_rate,
            params.highpass_cutoff_hz,
            params.highpass_order,
        );
        let samples = normalize(&filtered)?;

        Ok(AudioSample::new(samples, params.sample_rate))
    }
}

// ---------------------------------------------------------------------------
// MockRecorder  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured clip (or error) without
/// touching any audio hardware.
#[cfg(test)]
pub struct MockRecorder {
    response: MockResponse,
}

#[cfg(test)]
enum MockResponse {
    Sample(AudioSample),
    NoDevice,
    Silent,
}

#[cfg(test)]
impl MockRecorder {
    /// Always return `Ok(sample)`.
    pub fn ok(sample: AudioSample) -> Self {
        Self {
            response: MockResponse::Sample(sample),
        }
    }

    /// Return a half-second 440 Hz tone at the requested rate — a convenient
    /// non-silent default.
    pub fn tone() -> Self {
        let samples: Vec<f32> = (0..8_000)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16_000.0).sin())
            .collect();
        Self::ok(AudioSample::new(samples, 16_000))
    }

    /// Always return `Err(AudioError::NoInputDevice)`.
    pub fn no_device() -> Self {
        Self {
            response: MockResponse::NoDevice,
        }
    }

    /// Always return `Err(AudioError::SilentInput)`.
    pub fn silent() -> Self {
        Self {
            response: MockResponse::Silent,
        }
    }
}

#[cfg(test)]
impl Recorder for MockRecorder {
    fn record(&self, _params: &RecordParams) -> Result<AudioSample, AudioError> {
        match &self.response {
            MockResponse::Sample(sample) => Ok(sample.clone()),
            MockResponse::NoDevice => Err(AudioError::NoInputDevice),
            MockResponse::Silent => Err(AudioError::SilentInput),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AudioConfig;

    #[test]
    fn record_params_default() {
        let p = RecordParams::default();
        assert_eq!(p.duration_secs, 5.0);
        assert_eq!(p.sample_rate, 16_000);
        assert_eq!(p.highpass_cutoff_hz, 100.0);
        assert_eq!(p.highpass_order, 4);
    }

    #[test]
    fn record_params_from_audio_config() {
        let mut cfg = AudioConfig::default();
        cfg.duration_secs = 3.0;
        cfg.highpass_cutoff_hz = 80.0;

        let p = RecordParams::from(&cfg);
        assert_eq!(p.duration_secs, 3.0);
        assert_eq!(p.sample_rate, cfg.sample_rate);
        assert_eq!(p.highpass_cutoff_hz, 80.0);
    }

    #[test]
    fn mock_ok_returns_configured_sample() {
        let sample = AudioSample::new(vec![0.1; 100], 16_000);
        let rec = MockRecorder::ok(sample.clone());
        assert_eq!(rec.record(&RecordParams::default()).unwrap(), sample);
    }

    #[test]
    fn mock_no_device_errors() {
        let rec = MockRecorder::no_device();
        let err = rec.record(&RecordParams::default()).unwrap_err();
        assert!(matches!(err, AudioError::NoInputDevice));
    }

    #[test]
    fn mock_silent_errors() {
        let rec = MockRecorder::silent();
        let err = rec.record(&RecordParams::default()).unwrap_err();
        assert!(matches!(err, AudioError::SilentInput));
    }

    #[test]
    fn mock_tone_is_non_silent() {
        let rec = MockRecorder::tone();
        let sample = rec.record(&RecordParams::default()).unwrap();
        assert!(sample.samples.iter().any(|s| s.abs() > 0.5));
    }

    /// If this test compiles, the trait is object-safe.
    #[test]
    fn box_dyn_recorder_compiles() {
        let rec: Box<dyn Recorder> = Box::new(MockRecorder::tone());
        let _ = rec.record(&RecordParams::default());
    }
}
