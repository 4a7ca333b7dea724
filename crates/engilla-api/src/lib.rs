//! JSON HTTP API for Engilla.
//!
//! Exposes an axum [`Router`] backed by any [`EngillaStore`] and
//! [`PaymentVerifier`].
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/recommend` | Gated; 402 when a payment is required |
//! | `GET`  | `/verify-payment` | `?transaction_id=<id>` |
//! | `POST` | `/feedback` | Body: `{"feedback":"..."}` |
//! | `GET`  | `/check-first-visit` | Read-only |
//!
//! Client identity comes from the peer address, so the router must be served
//! with `into_make_service_with_connect_info::<SocketAddr>()`.

pub mod error;
pub mod feedback;
pub mod identity;
pub mod payment;
pub mod recommend;
pub mod visits;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use engilla_core::{payment::PaymentVerifier, store::EngillaStore};
use serde::Serialize;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub use error::ApiError;
pub use identity::IdentitySource;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, V> {
  pub store:           Arc<S>,
  pub verifier:        Arc<V>,
  pub identity_source: IdentitySource,
}

impl<S, V> Clone for AppState<S, V> {
  fn clone(&self) -> Self {
    Self {
      store:           Arc::clone(&self.store),
      verifier:        Arc::clone(&self.verifier),
      identity_source: self.identity_source,
    }
  }
}

/// `{"status": "success", "message": ...}` body for successful writes.
#[derive(Debug, Clone, Serialize)]
pub struct StatusMessage {
  pub status:  String,
  pub message: String,
}

impl StatusMessage {
  pub fn success(message: impl Into<String>) -> Self {
    Self { status: "success".to_owned(), message: message.into() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router.
pub fn router<S, V>(state: AppState<S, V>) -> Router
where
  S: EngillaStore + 'static,
  V: PaymentVerifier + 'static,
{
  Router::new()
    .route("/recommend", post(recommend::handler::<S, V>))
    .route("/verify-payment", get(payment::verify::<S, V>))
    .route("/feedback", post(feedback::submit::<S, V>))
    .route("/check-first-visit", get(visits::check_first_visit::<S, V>))
    .layer(CatchPanicLayer::custom(error::panic_response))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::{collections::HashMap, net::SocketAddr};

  use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
  };
  use engilla_core::{
    VerificationError,
    payment::ConfirmedPayment,
    resolve::{HEAVY_DUTY, MANUFACTURER_DEFAULT, MIXED_CONDITIONS},
    rules,
  };
  use engilla_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  /// Confirms exactly the transactions it was built with.
  #[derive(Default)]
  struct StubVerifier {
    paid: HashMap<String, ConfirmedPayment>,
  }

  impl StubVerifier {
    fn paying(transaction_id: &str) -> Self {
      let mut paid = HashMap::new();
      paid.insert(
        transaction_id.to_owned(),
        ConfirmedPayment { amount: 1000.0, currency: "NGN".into() },
      );
      Self { paid }
    }
  }

  impl PaymentVerifier for StubVerifier {
    async fn verify(&self, transaction_id: &str) -> Result<ConfirmedPayment, VerificationError> {
      self
        .paid
        .get(transaction_id)
        .cloned()
        .ok_or_else(|| VerificationError::NotSuccessful("error".into()))
    }
  }

  async fn make_state(verifier: StubVerifier) -> AppState<SqliteStore, StubVerifier> {
    AppState {
      store:           Arc::new(SqliteStore::open_in_memory().await.unwrap()),
      verifier:        Arc::new(verifier),
      identity_source: IdentitySource::PeerAddr,
    }
  }

  async fn call(
    state:   AppState<SqliteStore, StubVerifier>,
    method:  &str,
    uri:     &str,
    peer:    Option<&str>,
    headers: Vec<(&str, &str)>,
    body:    Option<&str>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    if body.is_some() {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let mut req = builder
      .body(body.map(|b| Body::from(b.to_owned())).unwrap_or_else(Body::empty))
      .unwrap();
    if let Some(ip) = peer {
      let addr: SocketAddr = format!("{ip}:40000").parse().unwrap();
      req.extensions_mut().insert(ConnectInfo(addr));
    }

    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
  }

  async fn recommend(
    state: &AppState<SqliteStore, StubVerifier>,
    ip:    &str,
    body:  Value,
  ) -> (StatusCode, Value) {
    call(state.clone(), "POST", "/recommend", Some(ip), vec![], Some(&body.to_string())).await
  }

  fn rec_json(rec: &engilla_core::condition::Recommendation) -> Value {
    serde_json::to_value(rec).unwrap()
  }

  // ── /recommend ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn first_request_is_free() {
    let state = make_state(StubVerifier::default()).await;

    let (status, body) = recommend(&state, "10.0.0.1", json!({ "conditions": ["dusty"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, rec_json(&rules::DUSTY));
  }

  #[tokio::test]
  async fn second_request_without_payment_is_402_and_still_logged() {
    let state = make_state(StubVerifier::default()).await;

    recommend(&state, "10.0.0.1", json!({ "conditions": [] })).await;
    let (status, body) = recommend(&state, "10.0.0.1", json!({ "conditions": ["cold"] })).await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["error"], "Payment required");
    assert_eq!(body["status"], "error");

    let log = state.store.usage_entries().await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].condition_count, 1);
    assert_eq!(log[1].raw_input, json!({ "conditions": ["cold"] }));
  }

  #[tokio::test]
  async fn verified_payment_unlocks_later_requests() {
    let state = make_state(StubVerifier::paying("4412093")).await;
    recommend(&state, "10.0.0.1", json!({})).await;

    let (status, body) = call(
      state.clone(),
      "GET",
      "/verify-payment?transaction_id=4412093",
      Some("10.0.0.1"),
      vec![],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let conditions = ["heavy_load", "long_trips", "short_trips", "smokey"];
    let (status, body) = recommend(
      &state,
      "10.0.0.1",
      json!({ "conditions": conditions, "transaction_id": 4412093 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, rec_json(&HEAVY_DUTY));
  }

  #[tokio::test]
  async fn empty_selection_returns_manufacturer_default() {
    let state = make_state(StubVerifier::default()).await;
    let (_, body) = recommend(&state, "10.0.0.1", json!({})).await;
    assert_eq!(body, rec_json(&MANUFACTURER_DEFAULT));
  }

  #[tokio::test]
  async fn unknown_conditions_fall_back() {
    let state = make_state(StubVerifier::default()).await;
    let (status, body) =
      recommend(&state, "10.0.0.1", json!({ "conditions": ["sandstorm"] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, rec_json(&MIXED_CONDITIONS));
  }

  #[tokio::test]
  async fn malformed_body_is_400_and_not_counted() {
    let state = make_state(StubVerifier::default()).await;

    let (status, body) =
      call(state.clone(), "POST", "/recommend", Some("10.0.0.1"), vec![], Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, _) =
      recommend(&state, "10.0.0.1", json!({ "conditions": "dusty" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) =
      call(state, "GET", "/check-first-visit", Some("10.0.0.1"), vec![], None).await;
    assert_eq!(body["is_first_visit"], true);
  }

  #[tokio::test]
  async fn missing_peer_address_is_internal_error() {
    let state = make_state(StubVerifier::default()).await;
    let (status, body) =
      call(state, "POST", "/recommend", None, vec![], Some("{}")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
  }

  #[tokio::test]
  async fn forwarded_for_identity_when_trusted() {
    let mut state = make_state(StubVerifier::default()).await;
    state.identity_source = IdentitySource::ForwardedFor;

    let body = json!({}).to_string();
    let (status, _) = call(
      state.clone(),
      "POST",
      "/recommend",
      Some("10.0.0.254"),
      vec![("x-forwarded-for", "198.51.100.4")],
      Some(&body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Same proxy, different end client: still a first visit.
    let (status, _) = call(
      state,
      "POST",
      "/recommend",
      Some("10.0.0.254"),
      vec![("x-forwarded-for", "198.51.100.5")],
      Some(&body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
  }

  // ── /verify-payment ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn failed_verification_is_400_and_stores_nothing() {
    let state = make_state(StubVerifier::default()).await;

    let (status, body) = call(
      state.clone(),
      "GET",
      "/verify-payment?transaction_id=999",
      Some("10.0.0.1"),
      vec![],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Payment verification failed");

    use engilla_core::store::EngillaStore as _;
    assert!(state.store.find_successful_payment("999").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn missing_transaction_id_is_400() {
    let state = make_state(StubVerifier::default()).await;
    let (status, _) =
      call(state, "GET", "/verify-payment", Some("10.0.0.1"), vec![], None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── /feedback ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn empty_feedback_is_rejected() {
    let state = make_state(StubVerifier::default()).await;
    let body = json!({ "feedback": "" }).to_string();

    let (status, resp) =
      call(state.clone(), "POST", "/feedback", Some("10.0.0.1"), vec![], Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["status"], "error");
    assert!(state.store.feedback_entries().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn feedback_is_stored() {
    let state = make_state(StubVerifier::default()).await;
    let body = json!({ "feedback": "Spot on for my Corolla" }).to_string();

    let (status, resp) =
      call(state.clone(), "POST", "/feedback", Some("10.0.0.1"), vec![], Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Feedback submitted successfully");

    let stored = state.store.feedback_entries().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].content, "Spot on for my Corolla");
  }

  #[tokio::test]
  async fn whitespace_feedback_is_stored_as_sent() {
    let state = make_state(StubVerifier::default()).await;
    let body = json!({ "feedback": "   " }).to_string();

    let (status, resp) =
      call(state.clone(), "POST", "/feedback", Some("10.0.0.1"), vec![], Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["status"], "success");

    let stored = state.store.feedback_entries().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].content, "   ");
  }

  // ── /check-first-visit ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn check_first_visit_is_read_only() {
    let state = make_state(StubVerifier::default()).await;

    for _ in 0..2 {
      let (status, body) =
        call(state.clone(), "GET", "/check-first-visit", Some("10.0.0.1"), vec![], None).await;
      assert_eq!(status, StatusCode::OK);
      assert_eq!(body, json!({ "is_first_visit": true }));
    }

    let (status, _) = recommend(&state, "10.0.0.1", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) =
      call(state, "GET", "/check-first-visit", Some("10.0.0.1"), vec![], None).await;
    assert_eq!(body, json!({ "is_first_visit": false }));
  }
}
