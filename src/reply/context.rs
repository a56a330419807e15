//! Rolling conversation memory.
//!
//! `ContextWindow` keeps the last N user/bot exchanges and formats them as a
//! Spanish context block that is prepended to the generation prompt.  The
//! window lives inside the conversation loop and is discarded with the
//! session; it is best-effort memory, never persisted.

use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// ContextWindow
// ---------------------------------------------------------------------------

/// Fixed-capacity window over the most recent exchanges.
///
/// Pushing beyond capacity evicts the oldest exchange.  A capacity of 0 is
/// valid and means "no memory": [`build`](ContextWindow::build) always
/// returns `None`.
#[derive(Debug, Clone)]
pub struct ContextWindow {
    exchanges: VecDeque<(String, String)>,
    capacity: usize,
}

impl ContextWindow {
    /// Create an empty window holding at most `capacity` exchanges.
    pub fn new(capacity: usize) -> Self {
        Self {
            exchanges: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record one completed exchange, evicting the oldest when full.
    pub fn push_exchange(&mut self, user_text: String, bot_text: String) {
        if self.capacity == 0 {
            return;
        }
        if self.exchanges.len() == self.capacity {
            self.exchanges.pop_front();
        }
        self.exchanges.push_back((user_text, bot_text));
    }

    /// Number of exchanges currently held.
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    /// True when no exchanges have been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Format the window as a context block for the prompt, oldest first.
    ///
    /// Returns `None` when the window is empty so the caller can skip the
    /// context section entirely on the first turn.
    pub fn build(&self) -> Option<String> {
        if self.exchanges.is_empty() {
            return None;
        }

        let mut block = String::from("Conversación previa:\n");
        for (user, bot) in &self.exchanges {
            block.push_str("Persona: ");
            block.push_str(user);
            block.push('\n');
            block.push_str("Tú: ");
            block.push_str(bot);
            block.push('\n');
        }
        Some(block.trim_end().to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
