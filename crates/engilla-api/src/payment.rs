//! Handler for `GET /verify-payment?transaction_id=...`.

use axum::{
  Json,
  extract::{Query, State},
};
use engilla_core::{
  VerificationError, payment::PaymentVerifier, store::EngillaStore,
};
use serde::Deserialize;

use crate::{AppState, StatusMessage, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
  pub transaction_id: Option<String>,
}

/// `GET /verify-payment?transaction_id=<id>`
///
/// Confirms the transaction with the gateway and records it. Any gateway
/// failure becomes a generic 400; nothing is stored in that case.
pub async fn verify<S, V>(
  State(state): State<AppState<S, V>>,
  Query(params): Query<VerifyParams>,
) -> Result<Json<StatusMessage>, ApiError>
where
  S: EngillaStore,
  V: PaymentVerifier,
{
  let transaction_id = params
    .transaction_id
    .as_deref()
    .map(str::trim)
    .filter(|id| !id.is_empty());

  let Some(transaction_id) = transaction_id else {
    return Err(rejected(None, VerificationError::MissingTransactionId));
  };

  let confirmed = state
    .verifier
    .verify(transaction_id)
    .await
    .map_err(|e| rejected(Some(transaction_id), e))?;

  let record = state
    .store
    .record_payment(confirmed.into_new_payment(transaction_id))
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;

  tracing::info!(
    transaction_id = %record.transaction_id,
    amount = record.amount,
    currency = %record.currency,
    "payment verified"
  );
  Ok(Json(StatusMessage::success("Payment verified successfully")))
}

fn rejected(transaction_id: Option<&str>, error: VerificationError) -> ApiError {
  tracing::warn!(?transaction_id, %error, "payment verification failed");
  ApiError::VerificationFailed
}
