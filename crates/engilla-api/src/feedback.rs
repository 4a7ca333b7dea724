//! Handler for `POST /feedback`.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use engilla_core::{payment::PaymentVerifier, record::NewFeedback, store::EngillaStore};
use serde::Deserialize;

use crate::{AppState, StatusMessage, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct FeedbackBody {
  #[serde(default)]
  pub feedback: String,
}

/// `POST /feedback` with body `{"feedback":"..."}`. Blank content is a 400.
pub async fn submit<S, V>(
  State(state): State<AppState<S, V>>,
  payload: Result<Json<FeedbackBody>, JsonRejection>,
) -> Result<Json<StatusMessage>, ApiError>
where
  S: EngillaStore,
  V: PaymentVerifier,
{
  let Json(body) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
  let input = NewFeedback::new(body.feedback)?;

  let entry = state
    .store
    .record_feedback(input)
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;

  tracing::info!(entry_id = %entry.entry_id, "feedback recorded");
  Ok(Json(StatusMessage::success("Feedback submitted successfully")))
}
