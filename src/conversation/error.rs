//! Cycle-level error classification.
//!
//! Every adapter failure the loop can see is folded into one of six
//! [`ChatError`] kinds, each with a fixed Spanish user-facing message.  The
//! kind set is closed so the loop and the tests can branch on it without
//! matching message strings.

use thiserror::Error;

use crate::audio::AudioError;
use crate::reply::GenError;
use crate::stt::SttError;
use crate::tts::TtsError;

// ---------------------------------------------------------------------------
// ChatError
// ---------------------------------------------------------------------------

/// One failed conversation cycle, classified.
///
/// The source error's display string is kept for the log; the user only
/// ever sees [`user_message`](ChatError::user_message).
#[derive(Debug, Error)]
pub enum ChatError {
    /// Local audio hardware problem (no mic, no speaker, silent input,
    /// stream failure).
    #[error("audio device error: {0}")]
    Device(String),

    /// The model replied with nothing usable.
    #[error("empty result: {0}")]
    EmptyResult(String),

    /// Remote quota exhausted; worth retrying later.
    #[error("remote quota exhausted: {0}")]
    RemoteQuota(String),

    /// Remote service down or unreachable; worth retrying later.
    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote service rejected our input.
    #[error("remote rejected input: {0}")]
    RemoteInvalidInput(String),

    /// Anything that does not fit the kinds above.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl ChatError {
    /// The fixed Spanish message printed to the user for this kind.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::Device(_) => {
                "Lo siento, hubo un problema con el audio. Revisa tu micrófono y altavoces."
            }
            ChatError::EmptyResult(_) => {
                "Lo siento, no se me ocurre qué decir. Intentémoslo de nuevo."
            }
            ChatError::RemoteQuota(_) => {
                "Lo siento, se agotó la cuota del servicio. Espera un momento e inténtalo de nuevo."
            }
            ChatError::RemoteUnavailable(_) => {
                "Lo siento, el servicio no está disponible en este momento. Inténtalo más tarde."
            }
            ChatError::RemoteInvalidInput(_) => {
                "Lo siento, no pude procesar eso. ¿Podrías decirlo de otra manera?"
            }
            ChatError::Unknown(_) => "Lo siento, hubo un error inesperado. Sigamos conversando.",
        }
    }
}

impl From<AudioError> for ChatError {
    fn from(e: AudioError) -> Self {
        ChatError::Device(e.to_string())
    }
}

impl From<SttError> for ChatError {
    fn from(e: SttError) -> Self {
        // Model/context failures are local engine problems, not remote ones.
        ChatError::Unknown(e.to_string())
    }
}

impl From<GenError> for ChatError {
    fn from(e: GenError) -> Self {
        match &e {
            GenError::QuotaExhausted => ChatError::RemoteQuota(e.to_string()),
            GenError::Unavailable | GenError::Timeout => {
                ChatError::RemoteUnavailable(e.to_string())
            }
            GenError::InvalidInput(_) => ChatError::RemoteInvalidInput(e.to_string()),
            GenError::EmptyResponse => ChatError::EmptyResult(e.to_string()),
            _ => ChatError::Unknown(e.to_string()),
        }
    }
}

impl From<TtsError> for ChatError {
    fn from(e: TtsError) -> Self {
        match &e {
            TtsError::Playback(_) => ChatError::Device(e.to_string()),
            TtsError::Endpoint { status, .. } if *status == 429 => {
                ChatError::RemoteQuota(e.to_string())
            }
            TtsError::Endpoint { status, .. } if *status >= 500 => {
                ChatError::RemoteUnavailable(e.to_string())
            }
            TtsError::Timeout => ChatError::RemoteUnavailable(e.to_string()),
            _ => ChatError::Unknown(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_errors_classify_as_device() {
        let err = ChatError::from(AudioError::NoInputDevice);
        assert!(matches!(err, ChatError::Device(_)));
        assert!(err.user_message().contains("micrófono"));
    }

    #[test]
    fn quota_classifies_as_remote_quota() {
        let err = ChatError::from(GenError::QuotaExhausted);
        assert!(matches!(err, ChatError::RemoteQuota(_)));
    }

    #[test]
    fn timeout_classifies_as_remote_unavailable() {
        let err = ChatError::from(GenError::Timeout);
        assert!(matches!(err, ChatError::RemoteUnavailable(_)));
    }

    #[test]
    fn invalid_input_classifies_accordingly() {
        let err = ChatError::from(GenError::InvalidInput("bad".into()));
        assert!(matches!(err, ChatError::RemoteInvalidInput(_)));
    }

    #[test]
    fn empty_response_classifies_as_empty_result() {
        let err = ChatError::from(GenError::EmptyResponse);
        assert!(matches!(err, ChatError::EmptyResult(_)));
    }

    #[test]
    fn tts_playback_failure_is_device() {
        let err = ChatError::from(TtsError::Playback(AudioError::NoOutputDevice));
        assert!(matches!(err, ChatError::Device(_)));
    }

    #[test]
    fn tts_503_is_remote_unavailable() {
        let err = ChatError::from(TtsError::Endpoint {
            status: 503,
            body: String::new(),
        });
        assert!(matches!(err, ChatError::RemoteUnavailable(_)));
    }

    #[test]
    fn all_user_messages_are_spanish_apologies() {
        let kinds = [
            ChatError::Device(String::new()),
            ChatError::EmptyResult(String::new()),
            ChatError::RemoteQuota(String::new()),
            ChatError::RemoteUnavailable(String::new()),
            ChatError::RemoteInvalidInput(String::new()),
            ChatError::Unknown(String::new()),
        ];
        for kind in kinds {
            assert!(kind.user_message().starts_with("Lo siento"));
        }
    }
}
