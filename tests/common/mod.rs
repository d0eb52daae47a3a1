use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::PrometheusHandle;

use reviewguard::api::router::create_router;
use reviewguard::config::AppConfig;
use reviewguard::inference::{InferenceError, ReviewClassifier};
use reviewguard::scoring::ProbabilityPair;
use reviewguard::AppState;

/// Test double returning a fixed probability pair regardless of input.
pub struct FixedClassifier {
    pair: ProbabilityPair,
}

impl FixedClassifier {
    #[allow(dead_code)]
    pub fn new(genuine: f64, fake: f64) -> Arc<dyn ReviewClassifier> {
        // Built raw so tests can also inject non-finite pairs.
        Arc::new(Self {
            pair: ProbabilityPair { genuine, fake },
        })
    }
}

impl ReviewClassifier for FixedClassifier {
    fn classify(&self, _review: &str) -> Result<ProbabilityPair, InferenceError> {
        Ok(self.pair)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Test double that always fails inference.
pub struct FailingClassifier;

impl ReviewClassifier for FailingClassifier {
    fn classify(&self, _review: &str) -> Result<ProbabilityPair, InferenceError> {
        Err(InferenceError::Forward("stubbed failure".into()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// The Prometheus recorder is global to the process; install it once and
/// share the handle across tests.
fn metrics_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(reviewguard::metrics::init_metrics)
        .clone()
}

#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        neural_model_dir: "./fake_review_model".into(),
        lexical_model_path: None,
        max_sequence_length: 256,
        decision_policy: None,
    }
}

/// Build the router over stub classifiers; a `Some` lexical classifier
/// selects the ensemble variant.
#[allow(dead_code)]
pub fn build_test_app(
    neural: Arc<dyn ReviewClassifier>,
    lexical: Option<Arc<dyn ReviewClassifier>>,
) -> axum::Router {
    let state = AppState {
        config: test_config(),
        neural,
        lexical,
        metrics_handle: metrics_handle(),
    };
    create_router(state)
}
