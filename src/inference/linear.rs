use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{InferenceError, ReviewClassifier};
use crate::scoring::ProbabilityPair;

/// Serialized form of the trained lexical model: TF-IDF vocabulary and
/// per-term IDF weights plus the linear decision function. Produced by the
/// offline training pipeline; training itself is out of scope here.
#[derive(Debug, Deserialize)]
struct LexicalArtifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    weights: Vec<f64>,
    intercept: f64,
}

/// Linear classifier over lexical features.
///
/// `classify` vectorizes the review (length-normalized TF x IDF over the
/// artifact's vocabulary), evaluates the decision function `w·x + b`, and
/// squashes the score through a logistic sigmoid. The sigmoid output is
/// the fake-class probability; the pair is `(1 - p, p)`.
pub struct LexicalClassifier {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    weights: Vec<f64>,
    intercept: f64,
}

impl LexicalClassifier {
    /// Load the JSON artifact from disk. Called once at startup.
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| InferenceError::Artifact(format!("{}: {e}", path.display())))?;
        let artifact: LexicalArtifact = serde_json::from_str(&raw)
            .map_err(|e| InferenceError::Artifact(format!("{}: {e}", path.display())))?;
        let classifier = Self::from_artifact(artifact)?;

        tracing::info!(
            path = %path.display(),
            vocabulary_size = classifier.vocabulary.len(),
            "Lexical classifier loaded"
        );
        Ok(classifier)
    }

    fn from_artifact(artifact: LexicalArtifact) -> Result<Self, InferenceError> {
        let n_terms = artifact.vocabulary.len();
        if artifact.idf.len() != n_terms || artifact.weights.len() != n_terms {
            return Err(InferenceError::Artifact(format!(
                "dimension mismatch: vocabulary={}, idf={}, weights={}",
                n_terms,
                artifact.idf.len(),
                artifact.weights.len()
            )));
        }
        if let Some(index) = artifact.vocabulary.values().find(|&&i| i >= n_terms) {
            return Err(InferenceError::Artifact(format!(
                "vocabulary index {index} out of range for {n_terms} terms"
            )));
        }
        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            weights: artifact.weights,
            intercept: artifact.intercept,
        })
    }

    /// Lowercased word tokens; punctuation and digits separate terms.
    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphabetic())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// TF-IDF feature vector: term counts normalized by document length,
    /// scaled by the artifact's IDF weights. Out-of-vocabulary terms are
    /// dropped.
    fn transform(&self, text: &str) -> Vec<f64> {
        let tokens = Self::tokenize(text);
        let mut features = vec![0.0; self.vocabulary.len()];

        for token in &tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                features[index] += 1.0;
            }
        }

        let doc_length = tokens.len() as f64;
        if doc_length > 0.0 {
            for (index, value) in features.iter_mut().enumerate() {
                *value = *value / doc_length * self.idf[index];
            }
        }

        features
    }

    fn decision_function(&self, features: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

impl ReviewClassifier for LexicalClassifier {
    fn classify(&self, review: &str) -> Result<ProbabilityPair, InferenceError> {
        let features = self.transform(review);
        let score = self.decision_function(&features);
        Ok(ProbabilityPair::from_fake_prob(sigmoid(score))?)
    }

    fn name(&self) -> &'static str {
        "lexical"
    }
}

fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_classifier() -> LexicalClassifier {
        // Two-term vocabulary: "best" pushes toward fake, "delivery"
        // toward genuine. IDF of 1 keeps the arithmetic readable.
        let artifact = LexicalArtifact {
            vocabulary: HashMap::from([("best".to_string(), 0), ("delivery".to_string(), 1)]),
            idf: vec![1.0, 1.0],
            weights: vec![4.0, -4.0],
            intercept: 0.0,
        };
        LexicalClassifier::from_artifact(artifact).unwrap()
    }

    #[test]
    fn test_sigmoid_bounds_and_midpoint() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(50.0) > 0.999);
        assert!(sigmoid(-50.0) < 0.001);
    }

    #[test]
    fn test_tokenize_splits_on_non_alphabetic() {
        let tokens = LexicalClassifier::tokenize("Best product!! Buy 2 now...");
        assert_eq!(tokens, vec!["best", "product", "buy", "now"]);
    }

    #[test]
    fn test_transform_counts_and_normalizes() {
        let classifier = test_classifier();
        // 4 tokens, "best" appears twice -> tf 2/4 = 0.5
        let features = classifier.transform("best best product delivery");
        assert!((features[0] - 0.5).abs() < 1e-12);
        assert!((features[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_positive_score_maps_to_fake_probability() {
        let classifier = test_classifier();
        let pair = classifier.classify("best best best best").unwrap();
        assert!(pair.fake > 0.9);
        assert!((pair.genuine + pair.fake - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_score_maps_to_genuine_probability() {
        let classifier = test_classifier();
        let pair = classifier.classify("delivery was on time").unwrap();
        assert!(pair.genuine > 0.5);
    }

    #[test]
    fn test_out_of_vocabulary_text_scores_at_intercept() {
        let classifier = test_classifier();
        let pair = classifier.classify("completely unrelated words").unwrap();
        // All-zero features -> sigmoid(intercept) = sigmoid(0) = 0.5
        assert!((pair.fake - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_artifact_dimension_mismatch_rejected() {
        let artifact = LexicalArtifact {
            vocabulary: HashMap::from([("best".to_string(), 0)]),
            idf: vec![1.0, 2.0],
            weights: vec![1.0],
            intercept: 0.0,
        };
        assert!(matches!(
            LexicalClassifier::from_artifact(artifact),
            Err(InferenceError::Artifact(_))
        ));
    }

    #[test]
    fn test_artifact_index_out_of_range_rejected() {
        let artifact = LexicalArtifact {
            vocabulary: HashMap::from([("best".to_string(), 5)]),
            idf: vec![1.0],
            weights: vec![1.0],
            intercept: 0.0,
        };
        assert!(matches!(
            LexicalClassifier::from_artifact(artifact),
            Err(InferenceError::Artifact(_))
        ));
    }
}
