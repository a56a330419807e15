//! Session and turn records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Turn
// ---------------------------------------------------------------------------

/// One completed exchange: what the user said and what the bot replied.
///
/// Turns are immutable once appended; the timestamp is taken when the cycle
/// completes, so timestamps within a session are monotonically non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub user_text: String,
    pub bot_text: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Build a turn stamped with the current time.
    pub fn now(user_text: String, bot_text: String) -> Self {
        Self {
            user_text,
            bot_text,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// In-memory transcript of one conversation run.
///
/// Created active when the loop starts, deactivated when it stops, and
/// mutated only by appending one turn per completed cycle.  Sessions are
/// never persisted across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub active: bool,
    pub turns: Vec<Turn>,
}

impl Session {
    /// Start a new, active, empty session.
    pub fn start() -> Self {
        Self {
            active: true,
            turns: Vec::new(),
        }
    }

    /// Append one completed turn.
    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Mark the session inactive (the loop has exited).
    pub fn stop(&mut self) {
        self.active = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
