//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for microphone capture and the recording pre-processing chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Fixed recording length per conversation cycle, in seconds.
    pub duration_secs: f32,
    /// Target sample rate in Hz for captured audio (Whisper wants 16 000).
    pub sample_rate: u32,
    /// Cutoff frequency of the noise-reduction high-pass filter, in Hz.
    pub highpass_cutoff_hz: f32,
    /// Order of the Butterworth high-pass filter; higher = sharper cutoff.
    pub highpass_order: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            duration_secs: 5.0,
            sample_rate: 16_000,
            highpass_cutoff_hz: 100.0,
            highpass_order: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper STT engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// GGML model name / file stem (e.g. `"ggml-small"`).
    pub model: String,
    /// Spoken language as an ISO-639-1 code, or `"auto"` for Whisper's
    /// built-in language detection.
    pub language: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "ggml-small".into(),
            language: "es".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// GeneratorConfig
// ---------------------------------------------------------------------------

/// Settings for the hosted generative-language API (Gemini).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Base URL of the Generative Language API.
    pub base_url: String,
    /// API key.  `None` means read `GEMINI_API_KEY` from the environment at
    /// adapter construction; a missing key is a construction error.
    pub api_key: Option<String>,
    /// Model identifier (e.g. `"gemini-2.0-flash"`).
    pub model: String,
    /// Maximum seconds to wait for a reply before timing out.
    pub timeout_secs: u64,
    /// Number of previous exchanges kept in the rolling context window.
    pub context_window: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-2.0-flash".into(),
            timeout_secs: 30,
            context_window: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the hosted speech-synthesis endpoint.
///
/// Any provider that speaks the OpenAI `/v1/audio/speech` wire format works;
/// local servers need no API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// Base URL of the TTS endpoint.
    pub base_url: String,
    /// API key — `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Voice name.
    pub voice: String,
    /// Maximum seconds to wait for synthesis before timing out.
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "tts-1".into(),
            voice: "nova".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Settings for the HTTP facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the axum server binds to.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use charla::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Recording / pre-processing settings.
    pub audio: AudioConfig,
    /// Whisper STT settings.
    pub stt: SttConfig,
    /// Gemini response-generation settings.
    pub generator: GeneratorConfig,
    /// Speech-synthesis settings.
    pub tts: TtsConfig,
    /// HTTP facade settings.
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        // AudioConfig
        assert_eq!(original.audio.duration_secs, loaded.audio.duration_secs);
        assert_eq!(original.audio.sample_rate, loaded.audio.sample_rate);
        assert_eq!(
            original.audio.highpass_cutoff_hz,
            loaded.audio.highpass_cutoff_hz
        );
        assert_eq!(original.audio.highpass_order, loaded.audio.highpass_order);

        // SttConfig
        assert_eq!(original.stt.model, loaded.stt.model);
        assert_eq!(original.stt.language, loaded.stt.language);

        // GeneratorConfig
        assert_eq!(original.generator.base_url, loaded.generator.base_url);
        assert_eq!(original.generator.api_key, loaded.generator.api_key);
        assert_eq!(original.generator.model, loaded.generator.model);
        assert_eq!(original.generator.timeout_secs, loaded.generator.timeout_secs);

        // TtsConfig
        assert_eq!(original.tts.base_url, loaded.tts.base_url);
        assert_eq!(original.tts.voice, loaded.tts.voice);

        // ServerConfig
        assert_eq!(original.server.bind, loaded.server.bind);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.audio.sample_rate, default.audio.sample_rate);
        assert_eq!(config.stt.language, default.stt.language);
        assert_eq!(config.generator.model, default.generator.model);
        assert_eq!(config.server.bind, default.server.bind);
    }

    /// Verify default values match the design.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.audio.duration_secs, 5.0);
        assert_eq!(cfg.audio.sample_rate, 16_000);
        assert_eq!(cfg.audio.highpass_cutoff_hz, 100.0);
        assert_eq!(cfg.audio.highpass_order, 4);
        assert_eq!(cfg.stt.language, "es");
        assert_eq!(cfg.generator.model, "gemini-2.0-flash");
        assert!(cfg.generator.api_key.is_none());
        assert_eq!(cfg.generator.context_window, 3);
        assert_eq!(cfg.tts.model, "tts-1");
        assert_eq!(cfg.server.bind, "127.0.0.1:8000");
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.audio.duration_secs = 8.0;
        cfg.audio.highpass_cutoff_hz = 80.0;
        cfg.stt.language = "auto".into();
        cfg.generator.api_key = Some("test-key".into());
        cfg.generator.timeout_secs = 60;
        cfg.tts.voice = "alloy".into();
        cfg.server.bind = "0.0.0.0:9000".into();

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.audio.duration_secs, 8.0);
        assert_eq!(loaded.audio.highpass_cutoff_hz, 80.0);
        assert_eq!(loaded.stt.language, "auto");
        assert_eq!(loaded.generator.api_key, Some("test-key".into()));
        assert_eq!(loaded.generator.timeout_secs, 60);
        assert_eq!(loaded.tts.voice, "alloy");
        assert_eq!(loaded.server.bind, "0.0.0.0:9000");
    }
}
