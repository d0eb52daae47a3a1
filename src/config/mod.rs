use std::env;
use std::path::PathBuf;

use crate::scoring::DecisionPolicy;

const DEFAULT_MODEL_DIR: &str = "./fake_review_model";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    /// Directory holding the neural checkpoint
    /// (tokenizer.json, config.json, model.safetensors).
    pub neural_model_dir: PathBuf,

    /// JSON artifact for the lexical classifier. When set, the service
    /// runs the ensemble variant; when absent, the single-model variant.
    pub lexical_model_path: Option<PathBuf>,

    /// Token truncation length for the neural tokenizer.
    pub max_sequence_length: usize,

    /// Optional override of the variant's default decision policy.
    pub decision_policy: Option<DecisionPolicy>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let decision_policy = match env::var("DECISION_POLICY") {
            Ok(raw) => Some(
                DecisionPolicy::from_str(&raw)
                    .ok_or_else(|| anyhow::anyhow!("invalid DECISION_POLICY: {raw}"))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            neural_model_dir: env::var("NEURAL_MODEL_DIR")
                .unwrap_or_else(|_| DEFAULT_MODEL_DIR.into())
                .into(),
            lexical_model_path: env::var("LEXICAL_MODEL_PATH").ok().map(PathBuf::from),
            max_sequence_length: env::var("MAX_SEQUENCE_LENGTH")
                .unwrap_or_else(|_| "256".into())
                .parse()?,
            decision_policy,
        })
    }

    /// Returns true when the lexical artifact is configured and the
    /// service should combine both classifiers.
    pub fn ensemble_enabled(&self) -> bool {
        self.lexical_model_path.is_some()
    }
}
