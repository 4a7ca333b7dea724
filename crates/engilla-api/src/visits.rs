//! Handler for `GET /check-first-visit`.

use axum::{Json, extract::State};
use engilla_core::{gate::peek_first_visit, payment::PaymentVerifier, store::EngillaStore};
use serde::Serialize;

use crate::{AppState, error::ApiError, identity::Client};

#[derive(Debug, Serialize)]
pub struct FirstVisit {
  pub is_first_visit: bool,
}

/// `GET /check-first-visit`. Does not count as a visit.
pub async fn check_first_visit<S, V>(
  State(state): State<AppState<S, V>>,
  Client(identity): Client,
) -> Result<Json<FirstVisit>, ApiError>
where
  S: EngillaStore,
  V: PaymentVerifier,
{
  let is_first_visit = peek_first_visit(&*state.store, &identity)
    .await
    .map_err(|e| ApiError::Internal(Box::new(e)))?;
  Ok(Json(FirstVisit { is_first_visit }))
}
