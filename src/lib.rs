//! Ranked fuzzy lookup over segmented identifiers.
//!
//! Callers register dot-style paths (`Math.Mat44.MultiplyVector3`) with an
//! opaque payload, an importance echelon, and a selection counter, then query
//! with one or more fragments (`["mat4", "mul"]`). Results are ranked by
//! echelon, then learned popularity, then a reverse-subsequence score that
//! rewards matches hugging the tail of each segment. Selection counters are
//! persisted as JSON so the ranking adapts across sessions.

pub mod dict;
pub mod matches;
pub(crate) mod matching;
pub mod score;
pub mod settings;
pub mod split;
