//! Synapse façades: typed, task-specific entry points built on top of
//! [`Service`](crate::service::Service).
//!
//! Each façade owns the default temperature for its task category and the
//! response type's shape; callers needing a type this crate does not ship
//! (`Convert`, `Extraction`) supply their own `T: Deserialize + Validate +
//! Described`.

pub mod analyze;
pub mod binary;
pub mod classification;
pub mod convert;
pub mod extraction;
pub mod ranking;
pub mod sentiment;
pub mod transform;

pub use analyze::{Analyze, AnalyzeResponse};
pub use binary::{Binary, BinaryResponse};
pub use classification::{Classification, ClassificationResponse};
pub use convert::Convert;
pub use extraction::Extraction;
pub use ranking::{Ranking, RankingResponse, TopN};
pub use sentiment::{Sentiment, SentimentResponse};
pub use transform::{Transform, TransformResponse};

/// Default temperature for precision-sensitive yes/no and label tasks.
pub(crate) const DETERMINISTIC_TEMPERATURE: f32 = 0.1;
/// Default temperature for ordering and scoring tasks.
pub(crate) const BALANCED_TEMPERATURE: f32 = 0.2;
/// Default temperature for generative rewriting/analysis/conversion tasks.
pub(crate) const CREATIVE_TEMPERATURE: f32 = 0.3;

/// Join non-empty fragments with a blank line, dropping empty ones.
///
/// Shared by every façade that accepts more than one input fragment (e.g.
/// a primary input plus extra background) and needs to merge them into a
/// single [`Prompt::input`](crate::prompt::Prompt) without emitting
/// doubled separators when a fragment is absent.
pub(crate) fn merge_inputs(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n\n")
}
