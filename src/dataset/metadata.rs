//! JSON metadata formats for the podcast corpus.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Episode / podcast metadata
// ---------------------------------------------------------------------------

/// One podcast episode as listed in a show's metadata file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastEpisode {
    pub title: String,
    pub description: String,
    pub duration_ms: u64,
    pub published_at: String,
    pub audio_url: String,
    pub transcript_url: Option<String>,
}

/// All episodes of one show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodcastMetadata {
    pub podcast_name: String,
    pub episodes: Vec<PodcastEpisode>,
}

impl PodcastMetadata {
    /// Total audio duration across all episodes, in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.episodes.iter().map(|e| e.duration_ms).sum()
    }
}

// ---------------------------------------------------------------------------
// Dataset card
// ---------------------------------------------------------------------------

/// Number of examples in each split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSizes {
    pub train: usize,
    pub validation: usize,
    pub test: usize,
}

impl SplitSizes {
    /// 80/10/10 split over `total` examples.
    ///
    /// Train takes 80 % rounded down, validation takes 10 % rounded down,
    /// test takes the remainder, so the three always sum to `total`.
    pub fn standard(total: usize) -> Self {
        let train = total * 8 / 10;
        let validation = total / 10;
        let test = total - train - validation;
        Self {
            train,
            validation,
            test,
        }
    }
}

/// Top-level dataset card written next to the processed audio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub name: String,
    pub description: String,
    pub language: String,
    pub license: String,
    pub size: SplitSizes,
}

impl DatasetMetadata {
    /// Card for the Spanish podcast corpus with the given split sizes.
    pub fn spanish_podcasts(size: SplitSizes) -> Self {
        Self {
            name: "spanish-podcast-speech".into(),
            description: "Spanish conversational speech segments from podcast episodes".into(),
            language: "es".into(),
            license: "cc-by-nc-4.0".into(),
            size,
        }
    }

    /// Write the card as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load a card from JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn episode(title: &str, duration_ms: u64) -> PodcastEpisode {
        PodcastEpisode {
            title: title.into(),
            description: "un episodio".into(),
            duration_ms,
            published_at: "2024-03-01".into(),
            audio_url: "https://example.com/ep.mp3".into(),
            transcript_url: None,
        }
    }

    #[test]
    fn split_sizes_sum_to_total() {
        for total in [0, 1, 9, 10, 99, 100, 1234] {
            let sizes = SplitSizes::standard(total);
            assert_eq!(sizes.train + sizes.validation + sizes.test, total);
        }
    }

    #[test]
    fn split_sizes_are_80_10_10_on_round_totals() {
        let sizes = SplitSizes::standard(100);
        assert_eq!(sizes.train, 80);
        assert_eq!(sizes.validation, 10);
        assert_eq!(sizes.test, 10);
    }

    #[test]
    fn total_duration_sums_episodes() {
        let meta = PodcastMetadata {
            podcast_name: "Charlas".into(),
            episodes: vec![episode("uno", 60_000), episode("dos", 90_000)],
        };
        assert_eq!(meta.total_duration_ms(), 150_000);
    }

    #[test]
    fn dataset_card_round_trips_through_json() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("dataset.json");

        let card = DatasetMetadata::spanish_podcasts(SplitSizes::standard(50));
        card.save(&path).expect("save");

        let loaded = DatasetMetadata::load(&path).expect("load");
        assert_eq!(loaded.name, "spanish-podcast-speech");
        assert_eq!(loaded.language, "es");
        assert_eq!(loaded.license, "cc-by-nc-4.0");
        assert_eq!(loaded.size, card.size);
    }

    #[test]
    fn episode_json_uses_snake_case_fields() {
        let json = serde_json::to_string(&episode("uno", 1_000)).unwrap();
        assert!(json.contains("\"duration_ms\":1000"));
        assert!(json.contains("\"published_at\""));
        assert!(json.contains("\"transcript_url\":null"));
    }
}
