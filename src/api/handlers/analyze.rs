use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics::{counter, histogram};
use tokio::task::JoinHandle;

use crate::errors::AppError;
use crate::inference::{InferenceError, ReviewClassifier};
use crate::models::{AnalyzeRequest, EnsembleReport, SingleModelReport};
use crate::scoring::{self, DecisionPolicy, Label, ProbabilityPair};
use crate::AppState;

/// `POST /analyze`: classify one review.
///
/// Ensemble variant: both classifiers run concurrently on the blocking
/// pool, their pairs are averaged, and the symmetric policy decides.
/// Single-model variant: the raw neural pair is thresholded directly
/// under the asymmetric policy. `DECISION_POLICY` overrides either
/// default.
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Response, AppError> {
    if req.review.trim().is_empty() {
        return Err(AppError::BadRequest("review must not be empty".into()));
    }

    counter!("analyze_requests_total").increment(1);
    let start = Instant::now();

    let neural_task = spawn_classify(Arc::clone(&state.neural), req.review.clone());

    let response = match &state.lexical {
        Some(lexical) => {
            let lexical_task = spawn_classify(Arc::clone(lexical), req.review.clone());
            let neural = await_classify(neural_task).await?;
            let lexical = await_classify(lexical_task).await?;

            let policy = state
                .config
                .decision_policy
                .unwrap_or(DecisionPolicy::Symmetric05);
            let result = scoring::combine(neural, lexical, policy)?;

            tracing::debug!(
                label = %result.label,
                trust_score = result.trust_score,
                "ensemble verdict"
            );
            record_verdict(result.label);
            Json(EnsembleReport::from_result(&result)).into_response()
        }
        None => {
            let pair = await_classify(neural_task).await?;

            let policy = state
                .config
                .decision_policy
                .unwrap_or(DecisionPolicy::Asymmetric06);
            let label = policy.decide(&pair);

            tracing::debug!(label = %label, fake_prob = pair.fake, "single-model verdict");
            record_verdict(label);
            Json(SingleModelReport::new(&pair, label)).into_response()
        }
    };

    histogram!("inference_latency_seconds").record(start.elapsed().as_secs_f64());
    Ok(response)
}

type ClassifyHandle = JoinHandle<Result<ProbabilityPair, InferenceError>>;

/// Run one classifier on the blocking pool; candle inference is
/// synchronous and CPU-bound.
fn spawn_classify(classifier: Arc<dyn ReviewClassifier>, review: String) -> ClassifyHandle {
    tokio::task::spawn_blocking(move || classifier.classify(&review))
}

async fn await_classify(handle: ClassifyHandle) -> Result<ProbabilityPair, AppError> {
    let pair = handle
        .await
        .map_err(|e| anyhow::anyhow!("inference task panicked: {e}"))?
        .inspect_err(|_| counter!("inference_failures_total").increment(1))?;
    Ok(pair)
}

fn record_verdict(label: Label) {
    match label {
        Label::Fake => counter!("fake_verdicts_total").increment(1),
        Label::Genuine => counter!("genuine_verdicts_total").increment(1),
    }
}
