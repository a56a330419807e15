//! `AudioSample`, peak normalization, and the audio error type.

use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// Errors that can occur while capturing, processing, or playing audio.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no input device found on the default audio host")]
    NoInputDevice,

    #[error("no output device found on the default audio host")]
    NoOutputDevice,

    #[error("failed to query default stream config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    /// The capture channel stopped delivering chunks before the requested
    /// duration was reached.
    #[error("audio capture timed out before {expected} samples arrived (got {got})")]
    CaptureTimeout { expected: usize, got: usize },

    /// Every captured sample was zero — normalization would divide by zero.
    #[error("recorded audio is silent; cannot normalize")]
    SilentInput,

    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),
}

// ---------------------------------------------------------------------------
// AudioSample
// ---------------------------------------------------------------------------

/// A mono waveform: `f32` amplitudes in `[-1.0, 1.0]` at a known sample rate.
///
/// Produced by [`Recorder::record`](crate::audio::Recorder::record), consumed
/// by the transcription adapter.  Not persisted unless explicitly written via
/// [`write_wav`](crate::audio::write_wav).
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSample {
    /// Mono PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g. 16 000).
    pub sample_rate: u32,
}

impl AudioSample {
    /// Construct a sample from raw mono PCM.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration of the clip in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

/// Scale `samples` so the peak amplitude is exactly 1.0.
///
/// Returns [`AudioError::SilentInput`] when the peak is zero (all-silent
/// input) — dividing by it would produce NaNs.
///
/// # Example
///
/// ```rust
/// use charla::audio::normalize;
///
/// let out = normalize(&[0.25_f32, -0.5, 0.1]).unwrap();
/// assert!((out[1] + 1.0).abs() < 1e-6); // -0.5 was the peak
/// ```
pub fn normalize(samples: &[f32]) -> Result<Vec<f32>, AudioError> {
    let peak = samples.iter().fold(0.0_f32, |m, s| m.max(s.abs()));
    if peak <= f32::EPSILON {
        return Err(AudioError::SilentInput);
    }
    Ok(samples.iter().map(|s| s / peak).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- AudioSample ----

    #[test]
    fn audio_sample_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AudioSample>();
    }

    #[test]
    fn duration_is_len_over_rate() {
        let sample = AudioSample::new(vec![0.0; 8_000], 16_000);
        assert!((sample.duration_secs() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn duration_zero_rate_is_zero() {
        let sample = AudioSample::new(vec![0.0; 100], 0);
        assert_eq!(sample.duration_secs(), 0.0);
    }

    // ---- normalize ----

    #[test]
    fn normalize_scales_peak_to_one() {
        let out = normalize(&[0.2_f32, -0.4, 0.1]).unwrap();
        let peak = out.iter().fold(0.0_f32, |m, s| m.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_preserves_sign_and_ratio() {
        let out = normalize(&[0.5_f32, -0.25]).unwrap();
        assert!((out[0] - 1.0).abs() < 1e-6);
        assert!((out[1] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn normalize_silent_input_errors() {
        let err = normalize(&[0.0_f32; 1_000]).unwrap_err();
        assert!(matches!(err, AudioError::SilentInput));
    }

    #[test]
    fn normalize_empty_input_errors() {
        assert!(matches!(normalize(&[]), Err(AudioError::SilentInput)));
    }

    #[test]
    fn normalize_already_normalized_is_stable() {
        let input = vec![1.0_f32, -0.5, 0.25];
        let out = normalize(&input).unwrap();
        for (a, b) in input.iter().zip(out.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }
}
