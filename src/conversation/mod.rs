//! The conversation loop: record → transcribe → generate → speak.
//!
//! [`ConversationLoop`] drives the four adapters through repeated cycles
//! until a stop signal arrives.  Each completed cycle appends one immutable
//! [`Turn`] to the [`Session`]; an empty transcript or a failed cycle appends
//! nothing and the loop keeps going.  The only terminating condition is the
//! stop signal (wired to Ctrl-C in the binary).
//!
//! All user-facing output is Spanish and goes to stdout; diagnostics go
//! through `log`.

pub mod error;
pub mod runner;
pub mod session;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use error::ChatError;
pub use runner::ConversationLoop;
pub use session::{Session, Turn};
