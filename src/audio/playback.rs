//! Synchronous playback on the default output device.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};

use crate::audio::sample::{AudioError, AudioSample};

/// Play `sample` on the default output device, blocking until playback
/// finishes.
///
/// The output stream is opened at the clip's own sample rate when the device
/// supports it; mono clips are duplicated across however many channels the
/// device wants.
///
/// # Errors
///
/// Returns [`AudioError::NoOutputDevice`] when no output device exists, or a
/// stream setup/start error otherwise.
pub fn play_blocking(sample: &AudioSample) -> Result<(), AudioError> {
    if sample.samples.is_empty() {
        return Ok(());
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(AudioError::NoOutputDevice)?;

    let supported = device.default_output_config()?;
    let channels = supported.channels();
    let config = StreamConfig {
        channels,
        sample_rate: SampleRate(sample.sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let samples = Arc::new(sample.samples.clone());
    let position = Arc::new(Mutex::new(0usize));
    let finished = Arc::new(Mutex::new(false));

    let samples_cb = Arc::clone(&samples);
    let position_cb = Arc::clone(&position);
    let finished_cb = Arc::clone(&finished);
    let ch = channels as usize;

    let stream = device.build_output_stream(
        &config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            let mut pos = position_cb.lock().unwrap();
            for frame in data.chunks_mut(ch) {
                let value = if *pos < samples_cb.len() {
                    let v = samples_cb[*pos];
                    *pos += 1;
                    v
                } else {
                    *finished_cb.lock().unwrap() = true;
                    0.0
                };
                for out in frame.iter_mut() {
                    *out = value;
                }
            }
        },
        |err: cpal::StreamError| {
            log::error!("cpal playback error: {err}");
        },
        None,
    )?;
    stream.play()?;

    // Poll until the callback reports the clip was fully consumed, with a
    // duration-derived timeout in case the device stalls.
    let nominal_ms = (samples.len() as u64 * 1_000) / u64::from(sample.sample_rate.max(1));
    let deadline = Instant::now() + Duration::from_millis(nominal_ms + 500);

    while !*finished.lock().unwrap() {
        if Instant::now() > deadline {
            log::warn!("playback timed out after {nominal_ms} ms nominal duration");
            break;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    drop(stream);
    log::debug!("playback complete ({} samples)", samples.len());
    Ok(())
}
