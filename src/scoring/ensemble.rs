use std::fmt;

use serde::{Deserialize, Serialize};

/// Fake-probability cutoff used by the single-model decision policy.
///
/// Historical value carried over from the first deployed model. It is
/// deliberately above the 0.5 midpoint so ambiguous reviews resolve to
/// "genuine"; the exact calibration rationale was never recorded, so the
/// constant is preserved as-is rather than normalized.
pub const FAKE_THRESHOLD: f64 = 0.6;

/// Errors produced by the scorer. The scorer never recovers from bad
/// inputs; a non-finite component fails the whole request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("non-finite probability pair: genuine={genuine}, fake={fake}")]
    NonFinite { genuine: f64, fake: f64 },
}

// ---------------------------------------------------------------------------
// ProbabilityPair
// ---------------------------------------------------------------------------

/// Normalized (genuine, fake) probability distribution over the two
/// output classes. Callers are trusted to supply components summing to 1;
/// only finiteness is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityPair {
    pub genuine: f64,
    pub fake: f64,
}

impl ProbabilityPair {
    pub fn new(genuine: f64, fake: f64) -> Result<Self, ScoreError> {
        if !genuine.is_finite() || !fake.is_finite() {
            return Err(ScoreError::NonFinite { genuine, fake });
        }
        Ok(Self { genuine, fake })
    }

    /// Build a pair from the fake-class probability alone.
    /// Used by the lexical classifier, whose sigmoid output is P(fake).
    pub fn from_fake_prob(fake: f64) -> Result<Self, ScoreError> {
        Self::new(1.0 - fake, fake)
    }
}

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// Final verdict for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Genuine,
    Fake,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Genuine => "genuine",
            Label::Fake => "fake",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DecisionPolicy
// ---------------------------------------------------------------------------

/// Threshold policy turning a probability pair into a label.
///
/// The two variants are historical and intentionally distinct; they must
/// never be merged into one implicit threshold:
/// - `Asymmetric06`: fake iff `fake >= 0.6`. Single-model policy.
/// - `Symmetric05`: fake iff `fake > genuine` (strict, so an exact tie
///   resolves to genuine). Ensemble policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionPolicy {
    Asymmetric06,
    Symmetric05,
}

impl DecisionPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asymmetric_0_6" => Some(DecisionPolicy::Asymmetric06),
            "symmetric_0_5" => Some(DecisionPolicy::Symmetric05),
            _ => None,
        }
    }

    pub fn decide(&self, pair: &ProbabilityPair) -> Label {
        match self {
            DecisionPolicy::Asymmetric06 => {
                if pair.fake >= FAKE_THRESHOLD {
                    Label::Fake
                } else {
                    Label::Genuine
                }
            }
            DecisionPolicy::Symmetric05 => {
                if pair.fake > pair.genuine {
                    Label::Fake
                } else {
                    Label::Genuine
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Ensemble combination
// ---------------------------------------------------------------------------

/// Output of one ensemble scoring round. All fields carry full f64
/// precision; rounding happens only when the HTTP report is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleResult {
    pub neural: ProbabilityPair,
    pub lexical: ProbabilityPair,
    pub combined: ProbabilityPair,
    pub label: Label,
    /// Confidence-in-authenticity reported to users. Equal to the combined
    /// genuine-class probability, reported as such (not 1 - fake) for
    /// interpretability.
    pub trust_score: f64,
}

/// Average two classifiers' probability pairs and decide a final label.
///
/// Pure function of its inputs. Fails closed on non-finite components;
/// range and sum are the upstream classifiers' responsibility.
pub fn combine(
    neural: ProbabilityPair,
    lexical: ProbabilityPair,
    policy: DecisionPolicy,
) -> Result<EnsembleResult, ScoreError> {
    let neural = ProbabilityPair::new(neural.genuine, neural.fake)?;
    let lexical = ProbabilityPair::new(lexical.genuine, lexical.fake)?;

    let combined = ProbabilityPair::new(
        (neural.genuine + lexical.genuine) / 2.0,
        (neural.fake + lexical.fake) / 2.0,
    )?;

    Ok(EnsembleResult {
        neural,
        lexical,
        combined,
        label: policy.decide(&combined),
        trust_score: combined.genuine,
    })
}

/// Round a probability for display. Internal computation always keeps
/// full precision; only response records pass through here.
pub fn round_display(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
