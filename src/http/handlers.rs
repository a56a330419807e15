//! Request handlers.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::audio::AudioSample;
use crate::http::state::AppState;

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Any handler failure: logged in full, surfaced as a 500 with a `detail`
/// message.
pub struct ApiError(String);

impl<E: std::fmt::Display> From<E> for ApiError {
    fn from(e: E) -> Self {
        ApiError(e.to_string())
    }
}

#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { detail: self.0 }),
        )
            .into_response()
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingResponse {
    pub audio_data: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    pub audio_data: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub transcription: String,
}

#[derive(Serialize, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub response: String,
    pub audio_url: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /api/start-recording` — capture one fixed-duration clip and return
/// the raw waveform.
pub async fn start_recording(
    State(state): State<AppState>,
) -> Result<Json<RecordingResponse>, ApiError> {
    let recorder = Arc::clone(&state.recorder);
    let params = state.record_params.clone();

    let sample = tokio::task::spawn_blocking(move || recorder.record(&params)).await??;

    Ok(Json(RecordingResponse {
        audio_data: sample.samples,
    }))
}

/// `POST /api/transcribe` — transcribe a waveform recorded at the configured
/// sample rate.
pub async fn transcribe(
    State(state): State<AppState>,
    Json(request): Json<TranscribeRequest>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let transcriber = Arc::clone(&state.transcriber);
    let audio = AudioSample::new(request.audio_data, state.record_params.sample_rate);

    let transcription =
        tokio::task::spawn_blocking(move || transcriber.transcribe(&audio)).await??;

    Ok(Json(TranscribeResponse { transcription }))
}

/// `POST /api/generate` — generate a reply, speak it, and return both the
/// text and the path of the synthesised WAV.
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let response = state.generator.generate(&request.text, None).await?;

    let output_path = state
        .speech_dir
        .join(format!("reply-{}.wav", Utc::now().format("%Y%m%d-%H%M%S%.3f")));
    let audio_path = state.speaker.speak(&response, &output_path).await?;

    Ok(Json(GenerateResponse {
        response,
        audio_url: audio_path.display().to_string(),
    }))
}

/// `GET /ws` — accept the upgrade and do nothing further.  Clients that
/// expect a streaming protocol get a clean close when they hang up.
pub async fn ws_upgrade(upgrade: WebSocketUpgrade) -> Response {
    upgrade.on_upgrade(|_socket| async {})
}

/// `GET /health` — liveness probe.
pub async fn health() -> &'static str {
    "OK"
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
