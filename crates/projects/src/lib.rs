//! Active projects allow-list.
//!
//! [`ActiveProjectsCache`] pulls the allow-list from a [`ProjectSource`] once
//! and answers every later lookup from memory. Lookups resolve a free-text
//! query (a display name, a fragment of one, or a tracker key) through
//! three tiers: exact key, exact name, then substring containment in either
//! direction. Only the last tier is flagged as non-exact.

mod cache;
mod check;
mod snapshot;

pub use cache::ActiveProjectsCache;
pub use check::{ActivityCheck, MatchKind};
pub use snapshot::Snapshot;
pub use tracker::{ProjectRecord, ProjectSource};

/// Sample size used for prompt summaries when the caller has no preference
pub const DEFAULT_SAMPLE_SIZE: usize = 10;
