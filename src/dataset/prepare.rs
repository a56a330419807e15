//! Audio preprocessing for the corpus.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::audio::{normalize, read_wav, resample, write_wav, AudioSample};
use crate::dataset::metadata::{DatasetMetadata, SplitSizes};

// ---------------------------------------------------------------------------
// DatasetPreparator
// ---------------------------------------------------------------------------

/// Turns raw episode WAVs into uniform training segments.
///
/// Every input is downmixed (by [`read_wav`]), resampled to
/// `target_sample_rate`, peak-normalized, and written under
/// `base_dir/processed/` keeping its file name.  Per-segment transcript
/// alignment is not performed.
pub struct DatasetPreparator {
    base_dir: PathBuf,
    target_sample_rate: u32,
}

impl DatasetPreparator {
    pub fn new(base_dir: impl Into<PathBuf>, target_sample_rate: u32) -> Self {
        Self {
            base_dir: base_dir.into(),
            target_sample_rate,
        }
    }

    fn processed_dir(&self) -> PathBuf {
        self.base_dir.join("processed")
    }

    /// Preprocess one WAV file and return the path of the processed copy.
    ///
    /// Silent inputs are rejected: a clip that normalization cannot scale
    /// carries no speech worth keeping.
    pub fn process_audio(&self, input: &Path) -> Result<PathBuf> {
        let clip = read_wav(input)
            .with_context(|| format!("failed to read {}", input.display()))?;

        let resampled = if clip.sample_rate == self.target_sample_rate {
            clip.samples
        } else {
            resample(&clip.samples, clip.sample_rate, self.target_sample_rate)
        };
        let normalized = normalize(&resampled)
            .with_context(|| format!("silent input: {}", input.display()))?;

        let file_name = input
            .file_name()
            .with_context(|| format!("input has no file name: {}", input.display()))?;
        let output = self.processed_dir().join(file_name);

        std::fs::create_dir_all(self.processed_dir())?;
        write_wav(
            &AudioSample::new(normalized, self.target_sample_rate),
            &output,
        )?;

        log::info!("processed {} -> {}", input.display(), output.display());
        Ok(output)
    }

    /// Preprocess every `.wav` in `input_dir`, write the dataset card, and
    /// return the processed paths.
    ///
    /// Files that fail to process are logged and skipped; one bad episode
    /// must not sink the whole corpus.
    pub fn process_dir(&self, input_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut inputs: Vec<PathBuf> = std::fs::read_dir(input_dir)
            .with_context(|| format!("failed to list {}", input_dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "wav"))
            .collect();
        inputs.sort();

        let mut processed = Vec::with_capacity(inputs.len());
        for input in &inputs {
            match self.process_audio(input) {
                Ok(output) => processed.push(output),
                Err(e) => log::warn!("skipping {}: {e:#}", input.display()),
            }
        }

        let card = DatasetMetadata::spanish_podcasts(SplitSizes::standard(processed.len()));
        card.save(&self.base_dir.join("dataset.json"))?;

        Ok(processed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
