use serde::{Deserialize, Serialize};

use crate::scoring::{round_display, EnsembleResult, Label, ProbabilityPair};

/// Decimal places for report probabilities.
const REPORT_PRECISION: u32 = 3;
/// The single-model report rounds its trust score one place coarser;
/// carried over from the first deployed API for response compatibility.
const TRUST_PRECISION: u32 = 2;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub review: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Ensemble-variant response: both classifiers' distributions, the
/// averaged pair, and the verdict. Probabilities are rounded here, at the
/// display boundary only.
#[derive(Debug, Clone, Serialize)]
pub struct EnsembleReport {
    pub label: Label,
    pub bert_genuine: f64,
    pub svm_genuine: f64,
    pub final_genuine: f64,
    pub bert_fake: f64,
    pub svm_fake: f64,
    pub final_fake: f64,
    pub trust_score: f64,
}

impl EnsembleReport {
    pub fn from_result(result: &EnsembleResult) -> Self {
        Self {
            label: result.label,
            bert_genuine: round_display(result.neural.genuine, REPORT_PRECISION),
            svm_genuine: round_display(result.lexical.genuine, REPORT_PRECISION),
            final_genuine: round_display(result.combined.genuine, REPORT_PRECISION),
            bert_fake: round_display(result.neural.fake, REPORT_PRECISION),
            svm_fake: round_display(result.lexical.fake, REPORT_PRECISION),
            final_fake: round_display(result.combined.fake, REPORT_PRECISION),
            trust_score: round_display(result.trust_score, REPORT_PRECISION),
        }
    }
}

/// Single-model-variant response: the raw neural distribution thresholded
/// directly, no combination step.
#[derive(Debug, Clone, Serialize)]
pub struct SingleModelReport {
    pub genuine_probability: f64,
    pub fake_probability: f64,
    pub label: Label,
    pub trust_score: f64,
}

impl SingleModelReport {
    pub fn new(pair: &ProbabilityPair, label: Label) -> Self {
        Self {
            genuine_probability: round_display(pair.genuine, REPORT_PRECISION),
            fake_probability: round_display(pair.fake, REPORT_PRECISION),
            label,
            trust_score: round_display(pair.genuine, TRUST_PRECISION),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
