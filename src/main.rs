//! `charla` binary — Spanish voice chat on the command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use charla::audio::{CpalRecorder, RecordParams, Recorder};
use charla::config::{AppConfig, AppPaths};
use charla::conversation::ConversationLoop;
use charla::dataset::DatasetPreparator;
use charla::http::{router, AppState};
use charla::reply::{GeminiGenerator, ResponseGenerator};
use charla::stt::{TranscribeParams, Transcriber, WhisperTranscriber};
use charla::tts::{ApiSpeaker, Speaker};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "charla", version, about = "Bot de conversación por voz en español")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive voice conversation loop (Ctrl-C to stop).
    Chat,
    /// Serve the HTTP facade.
    Serve,
    /// Preprocess a directory of WAV episodes into training data.
    Prepare {
        /// Directory containing raw `.wav` files.
        input: PathBuf,
        /// Output directory for the processed corpus.
        #[arg(long, default_value = "dataset")]
        output: PathBuf,
        /// Target sample rate for processed audio.
        #[arg(long, default_value_t = 16_000)]
        sample_rate: u32,
    },
}

// ---------------------------------------------------------------------------
// Adapter construction
// ---------------------------------------------------------------------------

struct Adapters {
    recorder: Arc<dyn Recorder>,
    transcriber: Arc<dyn Transcriber>,
    generator: Arc<dyn ResponseGenerator>,
    speaker: Arc<dyn Speaker>,
}

/// Build every adapter exactly once; the loop and the facade share them.
fn build_adapters(config: &AppConfig, paths: &AppPaths) -> Result<Adapters> {
    let model_path = paths.models_dir.join(format!("{}.bin", config.stt.model));
    let transcriber = WhisperTranscriber::load(&model_path, TranscribeParams::from(&config.stt))
        .with_context(|| format!("failed to load Whisper model {}", model_path.display()))?;

    let generator =
        GeminiGenerator::from_config(&config.generator).context("failed to set up Gemini")?;

    Ok(Adapters {
        recorder: Arc::new(CpalRecorder::new()),
        transcriber: Arc::new(transcriber),
        generator: Arc::new(generator),
        speaker: Arc::new(ApiSpeaker::from_config(&config.tts)),
    })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let paths = AppPaths::new();
    let config = AppConfig::load().context("failed to load settings.toml")?;

    match cli.command {
        Command::Chat => chat(&config, &paths).await,
        Command::Serve => serve(&config, &paths).await,
        Command::Prepare {
            input,
            output,
            sample_rate,
        } => prepare(&input, &output, sample_rate),
    }
}

async fn chat(config: &AppConfig, paths: &AppPaths) -> Result<()> {
    let adapters = build_adapters(config, paths)?;
    std::fs::create_dir_all(&paths.speech_dir)
        .with_context(|| format!("failed to create {}", paths.speech_dir.display()))?;

    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("stop requested");
            let _ = stop_tx.send(true);
        }
    });

    let chat = ConversationLoop::new(
        adapters.recorder,
        adapters.transcriber,
        adapters.generator,
        adapters.speaker,
        RecordParams::from(&config.audio),
        paths.speech_dir.clone(),
        config.generator.context_window,
    );

    let session = chat.run(stop_rx).await;
    log::info!("session ended with {} turn(s)", session.turns.len());
    Ok(())
}

async fn serve(config: &AppConfig, paths: &AppPaths) -> Result<()> {
    let adapters = build_adapters(config, paths)?;
    std::fs::create_dir_all(&paths.speech_dir)
        .with_context(|| format!("failed to create {}", paths.speech_dir.display()))?;

    let state = AppState {
        recorder: adapters.recorder,
        transcriber: adapters.transcriber,
        generator: adapters.generator,
        speaker: adapters.speaker,
        record_params: RecordParams::from(&config.audio),
        speech_dir: paths.speech_dir.clone(),
    };

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    log::info!("listening on {}", config.server.bind);

    axum::serve(listener, router(state))
        .await
        .context("server error")?;
    Ok(())
}

fn prepare(input: &PathBuf, output: &PathBuf, sample_rate: u32) -> Result<()> {
    let preparator = DatasetPreparator::new(output.clone(), sample_rate);
    let processed = preparator.process_dir(input)?;
    log::info!(
        "processed {} file(s) into {}",
        processed.len(),
        output.display()
    );
    Ok(())
}
