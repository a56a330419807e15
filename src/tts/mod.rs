//! Text-to-speech via a hosted `/v1/audio/speech` endpoint.
//!
//! [`Speaker`] is the async interface the conversation loop speaks through;
//! [`ApiSpeaker`] is the production implementation: it POSTs the reply text,
//! writes the returned WAV to disk, and plays it on the default output
//! device.  Any provider that speaks the OpenAI wire format works, including
//! local servers that need no API key.

pub mod synth;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use synth::{ApiSpeaker, Speaker, TtsError};

#[cfg(test)]
pub use synth::MockSpeaker;
