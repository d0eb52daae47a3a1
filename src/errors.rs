use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::inference::InferenceError;
use crate::scoring::ScoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("Scoring failed: {0}")]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Inference(e) => {
                tracing::error!("Inference error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Inference failed".into())
            }
            AppError::Score(e) => {
                tracing::error!("Scoring error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Scoring failed".into())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}
