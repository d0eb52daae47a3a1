pub mod linear;
pub mod neural;

pub use linear::LexicalClassifier;
pub use neural::NeuralClassifier;

use crate::scoring::{ProbabilityPair, ScoreError};

/// Errors surfaced by the inference collaborators. Request handlers treat
/// any of these as a failed request with no partial result.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model artifact error: {0}")]
    Artifact(String),

    #[error("tokenization failed: {0}")]
    Tokenize(String),

    #[error("forward pass failed: {0}")]
    Forward(String),

    #[error(transparent)]
    NonFinite(#[from] ScoreError),
}

/// A classifier that maps raw review text to a (genuine, fake)
/// probability pair over the fixed class ordering.
///
/// Implementations are read-only after construction and safe to share
/// across request tasks. `classify` is synchronous and CPU-bound; request
/// handlers run it on the blocking pool.
pub trait ReviewClassifier: Send + Sync {
    fn classify(&self, review: &str) -> Result<ProbabilityPair, InferenceError>;

    fn name(&self) -> &'static str;
}
