//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"status": "error", "error": ..., "message": ...}`.

use std::any::Any;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Malformed body or a field that fails domain validation.
  #[error("invalid request: {0}")]
  Validation(String),

  /// Returned by the gate; clients should prompt for payment.
  #[error("payment required")]
  PaymentRequired,

  /// The gateway did not confirm the payment. The cause is logged, not
  /// returned.
  #[error("payment verification failed")]
  VerificationFailed,

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<engilla_core::Error> for ApiError {
  fn from(e: engilla_core::Error) -> Self { ApiError::Validation(e.to_string()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, error, message) = match &self {
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, "Invalid request", m.clone()),
      ApiError::PaymentRequired => (
        StatusCode::PAYMENT_REQUIRED,
        "Payment required",
        "Please make a payment to receive a recommendation".to_owned(),
      ),
      ApiError::VerificationFailed => (
        StatusCode::BAD_REQUEST,
        "Verification failed",
        "Payment verification failed".to_owned(),
      ),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "internal fault");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error", e.to_string())
      }
    };
    (
      status,
      Json(json!({ "status": "error", "error": error, "message": message })),
    )
      .into_response()
  }
}

/// Response for a handler that panicked; used with
/// [`tower_http::catch_panic::CatchPanicLayer`]. The payload is logged and
/// never sent to the client.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
  let detail = if let Some(s) = err.downcast_ref::<String>() {
    s.as_str()
  } else if let Some(s) = err.downcast_ref::<&str>() {
    s
  } else {
    "<non-string payload>"
  };
  tracing::error!(panic = %detail, "handler panicked");
  ApiError::Internal("handler panicked".into()).into_response()
}
