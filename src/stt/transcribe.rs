//! Transcription parameter types.

// ---------------------------------------------------------------------------
// TranscribeParams
// ---------------------------------------------------------------------------

/// All parameters for a single Whisper transcription run.
///
/// Build with [`TranscribeParams::default()`] for Spanish and override fields
/// as needed:
///
/// ```
/// use charla::stt::TranscribeParams;
///
/// let params = TranscribeParams {
///     language: "auto".into(),
///     ..TranscribeParams::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct TranscribeParams {
    /// ISO-639-1 language code (e.g. `"es"`), or `"auto"` to let Whisper
    /// detect the language automatically.
    pub language: String,

    /// Number of CPU threads handed to Whisper.  Defaults to
    /// [`optimal_threads()`], capped at 8.
    pub n_threads: i32,

    /// Suppress Whisper's progress output to stderr.
    pub suppress_progress: bool,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            language: "es".into(),
            n_threads: optimal_threads(),
            suppress_progress: true,
        }
    }
}

impl From<&crate::config::SttConfig> for TranscribeParams {
    fn from(cfg: &crate::config::SttConfig) -> Self {
        Self {
            language: cfg.language.clone(),
            ..Self::default()
        }
    }
}

/// Returns the number of physical CPU threads to use for inference,
/// capped at 8 to avoid diminishing returns on Whisper.
pub fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SttConfig;

    #[test]
    fn default_language_is_spanish() {
        assert_eq!(TranscribeParams::default().language, "es");
    }

    #[test]
    fn params_from_stt_config() {
        let mut cfg = SttConfig::default();
        cfg.language = "auto".into();
        let params = TranscribeParams::from(&cfg);
        assert_eq!(params.language, "auto");
        assert!(params.suppress_progress);
    }

    #[test]
    fn optimal_threads_is_positive_and_at_most_8() {
        let t = optimal_threads();
        assert!((1..=8).contains(&t));
    }
}
