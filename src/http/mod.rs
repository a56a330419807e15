//! HTTP facade over the recording, transcription, and generation adapters.
//!
//! Stateless: every request re-invokes the injected adapters; no session is
//! kept server-side.  All failures map to a 500 with a JSON `detail` message
//! while the full diagnostic goes to the log.
//!
//! | Route                       | Request              | Response                          |
//! |-----------------------------|----------------------|-----------------------------------|
//! | `POST /api/start-recording` | —                    | `{"audioData": [f32…]}`           |
//! | `POST /api/transcribe`      | `{"audioData": […]}` | `{"transcription": "…"}`          |
//! | `POST /api/generate`        | `{"text": "…"}`      | `{"response": "…", "audioUrl": …}`|
//! | `GET /ws`                   | upgrade              | accepted, no protocol             |
//! | `GET /health`               | —                    | `200 OK`                          |

pub mod handlers;
pub mod routes;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use routes::router;
pub use state::AppState;
