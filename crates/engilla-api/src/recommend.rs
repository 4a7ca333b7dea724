//! Handler for `POST /recommend`.
//!
//! Body: `{"conditions": ["dusty", ...], "transaction_id": "..."}`. Both
//! fields are optional. The transaction id may be sent as a string or a
//! number, since gateways hand out numeric ids.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use engilla_core::{
  condition::{ConditionTag, Recommendation},
  gate::check_access,
  payment::PaymentVerifier,
  record::NewUsageLog,
  resolve::resolve,
  store::EngillaStore,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{AppState, error::ApiError, identity::Client};

#[derive(Debug, Deserialize)]
pub struct RecommendBody {
  #[serde(default)]
  pub conditions:     Vec<ConditionTag>,
  #[serde(default, deserialize_with = "string_or_number")]
  pub transaction_id: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<Value>::deserialize(deserializer)? {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(Value::Number(n)) => Ok(Some(n.to_string())),
    Some(other) => Err(serde::de::Error::custom(format!(
      "transaction_id must be a string or number, got {other}"
    ))),
  }
}

/// `POST /recommend`
///
/// Runs the access gate, logs the request whatever the gate decided, then
/// either rejects with 402 or returns the resolved [`Recommendation`].
pub async fn handler<S, V>(
  State(state): State<AppState<S, V>>,
  Client(identity): Client,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Recommendation>, ApiError>
where
  S: EngillaStore,
  V: PaymentVerifier,
{
  let Json(raw) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
  let body: RecommendBody = serde_json::from_value(raw.clone())
    .map_err(|e| ApiError::Validation(e.to_string()))?;

  let decision = check_access(&*state.store, &identity, body.transaction_id.as_deref())
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;

  state
    .store
    .log_usage(NewUsageLog::for_request(raw, &body.conditions))
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;

  if !decision.allowed {
    tracing::warn!(client = %identity, "recommendation refused: payment required");
    return Err(ApiError::PaymentRequired);
  }

  let recommendation = resolve(&body.conditions);
  tracing::info!(
    client = %identity,
    first_visit = decision.is_first_visit,
    conditions = body.conditions.len(),
    "recommendation served"
  );
  Ok(Json(recommendation))
}
