//! The loop itself.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use crate::audio::{RecordParams, Recorder};
use crate::conversation::error::ChatError;
use crate::conversation::session::{Session, Turn};
use crate::reply::{ContextWindow, ResponseGenerator};
use crate::stt::Transcriber;
use crate::tts::Speaker;

// ---------------------------------------------------------------------------
// User-facing messages (Spanish, stdout)
// ---------------------------------------------------------------------------

const GREETING: &str = "¡Hola! Estoy listo para conversar. Presiona Ctrl-C para salir.";
const FAREWELL: &str = "¡Hasta luego!";
const LISTENING: &str = "Te escucho...";
const REPEAT_PROMPT: &str = "No pude entender eso. ¿Podrías repetirlo?";

// ---------------------------------------------------------------------------
// ConversationLoop
// ---------------------------------------------------------------------------

/// Drives record → transcribe → generate → speak cycles until stopped.
///
/// Adapters are injected once at construction and shared as trait objects;
/// the loop owns no hardware or network state of its own.  The stop signal
/// is checked at the top of every cycle, so a cycle already in flight always
/// runs to completion before the loop exits.
pub struct ConversationLoop {
    recorder: Arc<dyn Recorder>,
    transcriber: Arc<dyn Transcriber>,
    generator: Arc<dyn ResponseGenerator>,
    speaker: Arc<dyn Speaker>,
    record_params: RecordParams,
    speech_dir: PathBuf,
    context: ContextWindow,
    session: Session,
}

/// What one cycle did to the session.
enum CycleOutcome {
    /// A turn was appended.
    Turn,
    /// Nothing intelligible was heard; no turn.
    NothingHeard,
    /// The cycle failed; reported, no turn.
    Failed(ChatError),
}

impl ConversationLoop {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        recorder: Arc<dyn Recorder>,
        transcriber: Arc<dyn Transcriber>,
        generator: Arc<dyn ResponseGenerator>,
        speaker: Arc<dyn Speaker>,
        record_params: RecordParams,
        speech_dir: PathBuf,
        context_window: usize,
    ) -> Self {
        Self {
            recorder,
            transcriber,
            generator,
            speaker,
            record_params,
            speech_dir,
            context: ContextWindow::new(context_window),
            session: Session::start(),
        }
    }

    /// Run cycles until `stop` flips to `true`, then return the finished
    /// session transcript.
    pub async fn run(mut self, stop: watch::Receiver<bool>) -> Session {
        println!("{GREETING}");
        log::info!("conversation started");

        while !*stop.borrow() {
            match self.run_cycle().await {
                CycleOutcome::Turn => {}
                CycleOutcome::NothingHeard => println!("{REPEAT_PROMPT}"),
                CycleOutcome::Failed(err) => {
                    log::error!("cycle failed: {err}");
                    println!("{}", err.user_message());
                }
            }
        }

        println!("{FAREWELL}");
        log::info!(
            "conversation stopped after {} turn(s)",
            self.session.turns.len()
        );
        self.session.stop();
        self.session
    }

    /// One record → transcribe → generate → speak cycle.
    async fn run_cycle(&mut self) -> CycleOutcome {
        println!("{LISTENING}");

        // Capture and transcription both block; keep them off the runtime
        // threads.
        let recorder = Arc::clone(&self.recorder);
        let params = self.record_params.clone();
        let audio = match tokio::task::spawn_blocking(move || recorder.record(&params)).await {
            Ok(Ok(audio)) => audio,
            Ok(Err(e)) => return CycleOutcome::Failed(e.into()),
            Err(e) => return CycleOutcome::Failed(ChatError::Unknown(e.to_string())),
        };

        let transcriber = Arc::clone(&self.transcriber);
        let transcript =
            match tokio::task::spawn_blocking(move || transcriber.transcribe(&audio)).await {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => return CycleOutcome::Failed(e.into()),
                Err(e) => return CycleOutcome::Failed(ChatError::Unknown(e.to_string())),
            };

        if transcript.trim().is_empty() {
            return CycleOutcome::NothingHeard;
        }
        println!("Tú: {transcript}");

        let context_block = self.context.build();
        let reply = match self
            .generator
            .generate(&transcript, context_block.as_deref())
            .await
        {
            Ok(reply) => reply,
            Err(e) => return CycleOutcome::Failed(e.into()),
        };
        println!("Bot: {reply}");

        let output_path = self
            .speech_dir
            .join(format!("reply-{}.wav", Utc::now().format("%Y%m%d-%H%M%S%.3f")));
        if let Err(e) = self.speaker.speak(&reply, &output_path).await {
            return CycleOutcome::Failed(e.into());
        }

        self.context.push_exchange(transcript.clone(), reply.clone());
        self.session.push_turn(Turn::now(transcript, reply));
        CycleOutcome::Turn
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MockRecorder;
    use crate::reply::{MockFailure, MockGenerator};
    use crate::stt::MockTranscriber;
    use crate::tts::MockSpeaker;

    fn make_loop(
        recorder: MockRecorder,
        transcriber: MockTranscriber,
        generator: MockGenerator,
        speaker: MockSpeaker,
    ) -> ConversationLoop {
        ConversationLoop::new(
            Arc::new(recorder),
            Arc::new(transcriber),
            Arc::new(generator),
            Arc::new(speaker),
            RecordParams::default(),
            std::env::temp_dir(),
            3,
        )
    }

    /// Flip the stop flag after `n` completed cycles by counting turns is not
    /// possible from outside, so tests drive `run_cycle` directly and use
    /// `run` only for the stop-signal property.
    #[tokio::test]
    async fn successful_cycle_appends_turn() {
        let mut chat = make_loop(
            MockRecorder::tone(),
            MockTranscriber::ok("hola, ¿cómo estás?"),
            MockGenerator::ok("¡Muy bien! ¿Y tú?"),
            MockSpeaker::ok(),
        );

        assert!(matches!(chat.run_cycle().await, CycleOutcome::Turn));
        assert_eq!(chat.session.turns.len(), 1);

        let turn = &chat.session.turns[0];
        assert_eq!(turn.user_text, "hola, ¿cómo estás?");
        assert_eq!(turn.bot_text, "¡Muy bien! ¿Y tú?");
        assert!(turn.timestamp <= Utc::now());
    }

    #[tokio::test]
    async fn turn_timestamps_are_monotonic_across_cycles() {
        let mut chat = make_loop(
            MockRecorder::tone(),
            MockTranscriber::ok("hola"),
            MockGenerator::ok("¡Hola!"),
            MockSpeaker::ok(),
        );

        for _ in 0..3 {
            chat.run_cycle().await;
        }

        assert_eq!(chat.session.turns.len(), 3);
        for pair in chat.session.turns.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn empty_transcript_appends_no_turn_and_keeps_session_active() {
        let mut chat = make_loop(
            MockRecorder::tone(),
            MockTranscriber::empty(),
            MockGenerator::ok("no debería usarse"),
            MockSpeaker::ok(),
        );

        assert!(matches!(chat.run_cycle().await, CycleOutcome::NothingHeard));
        assert!(chat.session.turns.is_empty());
        assert!(chat.session.active);
    }

    #[tokio::test]
    async fn quota_failure_appends_no_turn_and_loop_can_continue() {
        let mut chat = make_loop(
            MockRecorder::tone(),
            MockTranscriber::ok("hola"),
            MockGenerator::fail(MockFailure::Quota),
            MockSpeaker::ok(),
        );

        let outcome = chat.run_cycle().await;
        assert!(matches!(
            outcome,
            CycleOutcome::Failed(ChatError::RemoteQuota(_))
        ));
        assert!(chat.session.turns.is_empty());
        assert!(chat.session.active);

        // The next cycle runs normally; the failure did not poison anything.
        let outcome = chat.run_cycle().await;
        assert!(matches!(
            outcome,
            CycleOutcome::Failed(ChatError::RemoteQuota(_))
        ));
    }

    #[tokio::test]
    async fn device_failure_is_reported_not_fatal() {
        let mut chat = make_loop(
            MockRecorder::no_device(),
            MockTranscriber::ok("hola"),
            MockGenerator::ok("¡Hola!"),
            MockSpeaker::ok(),
        );

        let outcome = chat.run_cycle().await;
        assert!(matches!(outcome, CycleOutcome::Failed(ChatError::Device(_))));
        assert!(chat.session.active);
    }

    #[tokio::test]
    async fn stop_signal_exits_with_inactive_session() {
        let chat = make_loop(
            MockRecorder::tone(),
            MockTranscriber::ok("hola"),
            MockGenerator::ok("¡Hola!"),
            MockSpeaker::ok(),
        );

        // Stop is already set: the loop must exit before running any cycle.
        let (tx, rx) = watch::channel(true);
        let session = chat.run(rx).await;
        drop(tx);

        assert!(!session.active);
        assert!(session.turns.is_empty());
    }

    #[tokio::test]
    async fn context_window_carries_previous_exchanges() {
        let mut chat = make_loop(
            MockRecorder::tone(),
            MockTranscriber::ok("hola"),
            MockGenerator::ok("¡Hola!"),
            MockSpeaker::ok(),
        );

        assert!(chat.context.build().is_none());
        chat.run_cycle().await;
        let block = chat.context.build().unwrap();
        assert!(block.contains("Persona: hola"));
        assert!(block.contains("Tú: ¡Hola!"));
    }

    #[tokio::test]
    async fn speaker_receives_the_generated_reply() {
        let speaker = Arc::new(MockSpeaker::ok());
        let mut chat = ConversationLoop::new(
            Arc::new(MockRecorder::tone()),
            Arc::new(MockTranscriber::ok("hola")),
            Arc::new(MockGenerator::ok("¡Buenas!")),
            Arc::clone(&speaker) as Arc<dyn Speaker>,
            RecordParams::default(),
            std::env::temp_dir(),
            3,
        );

        chat.run_cycle().await;
        assert_eq!(speaker.spoken.lock().unwrap().as_slice(), ["¡Buenas!"]);
    }
}
