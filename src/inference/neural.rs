use std::path::Path;

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use tokenizers::{Tokenizer, TruncationDirection};

use super::{InferenceError, ReviewClassifier};
use crate::scoring::ProbabilityPair;

/// DistilBERT sequence classifier over a HuggingFace checkpoint directory
/// (`tokenizer.json`, `config.json`, `model.safetensors`).
///
/// The checkpoint's `id2label` mapping decides which logit index is the
/// genuine class and which is the fake class. The shipped model uses
/// index 0 = genuine, index 1 = fake, but the mapping is read from the
/// config rather than assumed, since it is not stable across checkpoints.
pub struct NeuralClassifier {
    tokenizer: Tokenizer,
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    device: Device,
    max_length: usize,
    genuine_index: usize,
    fake_index: usize,
}

impl NeuralClassifier {
    /// Load the checkpoint from `model_dir`. Called once at startup; the
    /// loaded classifier is immutable afterwards.
    pub fn load(model_dir: &Path, max_length: usize) -> Result<Self, InferenceError> {
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| InferenceError::Artifact(format!("tokenizer.json: {e}")))?;

        let config_path = model_dir.join("config.json");
        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| InferenceError::Artifact(format!("config.json: {e}")))?;
        let config: DistilBertConfig = serde_json::from_str(&config_str)
            .map_err(|e| InferenceError::Artifact(format!("config.json: {e}")))?;

        // hidden size and id2label come from the raw JSON: the candle config
        // struct does not expose them.
        let config_json: serde_json::Value = serde_json::from_str(&config_str)
            .map_err(|e| InferenceError::Artifact(format!("config.json: {e}")))?;
        let hidden_size = config_json
            .get("dim")
            .or_else(|| config_json.get("hidden_size"))
            .and_then(|v| v.as_u64())
            .unwrap_or(768) as usize;
        let (genuine_index, fake_index) = class_indices(&config_json);

        // Device management is out of scope: inference is CPU-only.
        let device = Device::Cpu;

        let weights_path = model_dir.join("model.safetensors");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| InferenceError::Artifact(format!("model.safetensors: {e}")))?
        };

        let model = DistilBertModel::load(vb.pp("distilbert"), &config)
            .map_err(|e| InferenceError::Artifact(format!("encoder weights: {e}")))?;
        let pre_classifier = candle_nn::linear(hidden_size, hidden_size, vb.pp("pre_classifier"))
            .map_err(|e| InferenceError::Artifact(format!("pre_classifier weights: {e}")))?;
        let classifier = candle_nn::linear(hidden_size, 2, vb.pp("classifier"))
            .map_err(|e| InferenceError::Artifact(format!("classifier weights: {e}")))?;

        tracing::info!(
            model_dir = %model_dir.display(),
            hidden_size,
            genuine_index,
            fake_index,
            "Neural classifier loaded"
        );

        Ok(Self {
            tokenizer,
            model,
            pre_classifier,
            classifier,
            device,
            max_length,
            genuine_index,
            fake_index,
        })
    }

    fn forward(&self, review: &str) -> Result<Vec<f32>, InferenceError> {
        let mut encoding = self
            .tokenizer
            .encode(review, true)
            .map_err(|e| InferenceError::Tokenize(e.to_string()))?;
        encoding.truncate(self.max_length, 0, TruncationDirection::Right);

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| i64::from(id)).collect();
        let input_ids = Tensor::new(input_ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| InferenceError::Forward(e.to_string()))?;

        // candle's DistilBERT masks positions where the mask is 1, the
        // inverse of the HuggingFace convention (1 = attend).
        let attention_mask: Vec<u8> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| u8::from(m == 0))
            .collect();
        let attention_mask = Tensor::new(attention_mask.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| InferenceError::Forward(e.to_string()))?;

        let hidden_states = self
            .model
            .forward(&input_ids, &attention_mask)
            .map_err(|e| InferenceError::Forward(e.to_string()))?;

        // [CLS] pooling, then the classification head the HuggingFace
        // sequence-classification export carries: pre_classifier -> ReLU ->
        // classifier -> softmax.
        let logits = hidden_states
            .i((0, 0, ..))
            .and_then(|cls| cls.unsqueeze(0))
            .and_then(|cls| self.pre_classifier.forward(&cls))
            .and_then(|h| h.relu())
            .and_then(|h| self.classifier.forward(&h))
            .map_err(|e| InferenceError::Forward(e.to_string()))?;

        let probs = candle_nn::ops::softmax_last_dim(&logits)
            .and_then(|p| p.squeeze(0))
            .and_then(|p| p.to_vec1::<f32>())
            .map_err(|e| InferenceError::Forward(e.to_string()))?;

        Ok(probs)
    }
}

impl ReviewClassifier for NeuralClassifier {
    fn classify(&self, review: &str) -> Result<ProbabilityPair, InferenceError> {
        let probs = self.forward(review)?;

        let genuine = probs.get(self.genuine_index).copied().ok_or_else(|| {
            InferenceError::Forward(format!(
                "logit index {} missing from output of width {}",
                self.genuine_index,
                probs.len()
            ))
        })?;
        let fake = probs.get(self.fake_index).copied().ok_or_else(|| {
            InferenceError::Forward(format!(
                "logit index {} missing from output of width {}",
                self.fake_index,
                probs.len()
            ))
        })?;

        Ok(ProbabilityPair::new(f64::from(genuine), f64::from(fake))?)
    }

    fn name(&self) -> &'static str {
        "neural"
    }
}

/// Resolve (genuine, fake) logit indices from the checkpoint's `id2label`.
/// Falls back to the shipped model's ordering when the mapping is absent.
fn class_indices(config: &serde_json::Value) -> (usize, usize) {
    let mut genuine = None;
    let mut fake = None;

    if let Some(id2label) = config.get("id2label").and_then(|v| v.as_object()) {
        for (id, label) in id2label {
            let Ok(index) = id.parse::<usize>() else {
                continue;
            };
            match label.as_str().map(str::to_lowercase).as_deref() {
                Some("genuine") => genuine = Some(index),
                Some("fake") => fake = Some(index),
                _ => {}
            }
        }
    }

    match (genuine, fake) {
        (Some(g), Some(f)) => (g, f),
        _ => {
            tracing::warn!("id2label missing or unrecognized, assuming 0=genuine, 1=fake");
            (0, 1)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
