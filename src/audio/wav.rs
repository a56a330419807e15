//! WAV persistence for [`AudioSample`].
//!
//! Samples are written as 32-bit float mono WAV, so a write/read round trip
//! preserves every sample bit-for-bit — there is no lossy conversion on this
//! path.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::audio::sample::{AudioError, AudioSample};

/// Write `sample` to `path` as 32-bit float mono WAV.
pub fn write_wav(sample: &AudioSample, path: impl AsRef<Path>) -> Result<(), AudioError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: sample.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    for &s in &sample.samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Read a WAV file back into an [`AudioSample`].
///
/// Accepts both float and 16-bit integer WAV (integer samples are scaled to
/// `[-1, 1]`); multi-channel files are downmixed to mono.
pub fn read_wav(path: impl AsRef<Path>) -> Result<AudioSample, AudioError> {
    let reader = WavReader::open(path.as_ref())?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = f32::from(i16::MAX);
            reader
                .into_samples::<i16>()
                .map(|s| s.map(|v| f32::from(v) / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let samples = crate::audio::resample::downmix_to_mono(&interleaved, spec.channels);
    Ok(AudioSample::new(samples, spec.sample_rate))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tone(rate: u32, n: usize) -> AudioSample {
        let samples: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / rate as f32).sin())
            .collect();
        AudioSample::new(samples, rate)
    }

    /// Round trip preserves sample count, sample rate, and every value.
    #[test]
    fn round_trip_preserves_everything() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("tone.wav");

        let original = tone(16_000, 8_000);
        write_wav(&original, &path).expect("write");
        let loaded = read_wav(&path).expect("read");

        assert_eq!(loaded.sample_rate, original.sample_rate);
        assert_eq!(loaded.samples.len(), original.samples.len());
        for (a, b) in original.samples.iter().zip(loaded.samples.iter()) {
            assert_eq!(a.to_bits(), b.to_bits(), "float WAV must be lossless");
        }
    }

    #[test]
    fn round_trip_non_whisper_rate() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("hi.wav");

        let original = tone(44_100, 4_410);
        write_wav(&original, &path).expect("write");
        let loaded = read_wav(&path).expect("read");

        assert_eq!(loaded.sample_rate, 44_100);
        assert_eq!(loaded.samples.len(), 4_410);
    }

    #[test]
    fn round_trip_empty_clip() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("empty.wav");

        write_wav(&AudioSample::new(Vec::new(), 16_000), &path).expect("write");
        let loaded = read_wav(&path).expect("read");
        assert!(loaded.samples.is_empty());
        assert_eq!(loaded.sample_rate, 16_000);
    }

    #[test]
    fn read_missing_file_errors() {
        let err = read_wav("/nonexistent/missing.wav").unwrap_err();
        assert!(matches!(err, AudioError::Wav(_)));
    }
}
