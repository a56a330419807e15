//! Fine-tuning dataset preparation for the Spanish podcast corpus.
//!
//! Two halves:
//! * [`metadata`] — serde types for the per-podcast episode listings and the
//!   dataset card, persisted as JSON.
//! * [`prepare`] — audio preprocessing (load, downmix, resample, normalize)
//!   and train/validation/test split sizing.
//!
//! Per-segment transcript alignment is an unresolved requirement and is not
//! implemented here; episode download and dataset upload are out of scope.

pub mod metadata;
pub mod prepare;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use metadata::{DatasetMetadata, PodcastEpisode, PodcastMetadata, SplitSizes};
pub use prepare::DatasetPreparator;
