//! Response generation via a hosted generative-language API.
//!
//! This module provides:
//! * [`ResponseGenerator`] — async trait implemented by all reply backends.
//! * [`GeminiGenerator`] — Gemini `generateContent` REST client.
//! * [`ContextWindow`] — rolling window of previous exchanges (best-effort
//!   conversation memory, loop-local, discarded with the session).
//! * [`GenError`] — closed error taxonomy: quota, unavailable, invalid
//!   input, empty reply, transport/parse.
//!
//! No backend retries automatically; failures are surfaced and the caller
//! (the conversation loop) decides whether to continue.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use charla::config::GeneratorConfig;
//! use charla::reply::{ContextWindow, GeminiGenerator, ResponseGenerator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let generator = GeminiGenerator::from_config(&GeneratorConfig::default()).unwrap();
//!     let mut context = ContextWindow::new(3);
//!
//!     let reply = generator
//!         .generate("hola, ¿cómo estás?", context.build().as_deref())
//!         .await
//!         .unwrap();
//!
//!     context.push_exchange("hola, ¿cómo estás?".into(), reply.clone());
//!     println!("{reply}");
//! }
//! ```

pub mod context;
pub mod generator;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use context::ContextWindow;
pub use generator::{GeminiGenerator, GenError, ResponseGenerator};

#[cfg(test)]
pub use generator::{MockFailure, MockGenerator};
