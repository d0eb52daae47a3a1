pub mod api;
pub mod config;
pub mod errors;
pub mod inference;
pub mod metrics;
pub mod models;
pub mod scoring;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::inference::ReviewClassifier;

/// Process-wide state: immutable after startup, cloned into every request
/// handler. The classifiers are read-only model artifacts behind `Arc`s,
/// so concurrent handlers share them without locking.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub neural: Arc<dyn ReviewClassifier>,
    /// Present only in the ensemble variant.
    pub lexical: Option<Arc<dyn ReviewClassifier>>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
