//! Shared state handed to every handler.

use std::path::PathBuf;
use std::sync::Arc;

use crate::audio::{RecordParams, Recorder};
use crate::reply::ResponseGenerator;
use crate::stt::Transcriber;
use crate::tts::Speaker;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// All adapters plus the recording parameters, cloned into each handler.
///
/// The adapters are the same trait objects the conversation loop uses; the
/// facade adds nothing on top of them.
#[derive(Clone)]
pub struct AppState {
    pub recorder: Arc<dyn Recorder>,
    pub transcriber: Arc<dyn Transcriber>,
    pub generator: Arc<dyn ResponseGenerator>,
    pub speaker: Arc<dyn Speaker>,
    pub record_params: RecordParams,
    pub speech_dir: PathBuf,
}
