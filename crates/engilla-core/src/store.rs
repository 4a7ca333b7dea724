//! The `EngillaStore` trait.
//!
//! Implemented by storage backends (e.g. `engilla-store-sqlite`). The access
//! gate and the HTTP layer depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use crate::record::{
  ClientIdentity, ClientVisitRecord, FeedbackEntry, NewFeedback, NewPayment,
  NewUsageLog, PaymentRecord, UsageLogEntry,
};

/// Abstraction over an Engilla store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait EngillaStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Visits ────────────────────────────────────────────────────────────

  /// Record a visit from `identity` and return the updated record.
  ///
  /// Creates the record with `visit_count = 1` if none exists, otherwise
  /// increments the count and bumps `last_visit`. Must be atomic per
  /// identity: two concurrent calls for an unseen identity yield counts 1 and
  /// 2, never 1 and 1.
  fn record_visit<'a>(
    &'a self,
    identity: &'a ClientIdentity,
  ) -> impl Future<Output = Result<ClientVisitRecord, Self::Error>> + Send + 'a;

  /// Read the visit record for `identity` without modifying it.
  fn get_visit<'a>(
    &'a self,
    identity: &'a ClientIdentity,
  ) -> impl Future<Output = Result<Option<ClientVisitRecord>, Self::Error>> + Send + 'a;

  // ── Payments ──────────────────────────────────────────────────────────

  /// Persist a gateway-confirmed payment with status `success`.
  ///
  /// Transaction ids are unique. Recording the same id twice keeps the first
  /// record and returns it.
  fn record_payment(
    &self,
    input: NewPayment,
  ) -> impl Future<Output = Result<PaymentRecord, Self::Error>> + Send + '_;

  /// Find a successful payment for `transaction_id`.
  fn find_successful_payment<'a>(
    &'a self,
    transaction_id: &'a str,
  ) -> impl Future<Output = Result<Option<PaymentRecord>, Self::Error>> + Send + 'a;

  // ── Append-only logs ──────────────────────────────────────────────────

  /// Append a usage log entry. `recorded_at` is set by the store.
  fn log_usage(
    &self,
    input: NewUsageLog,
  ) -> impl Future<Output = Result<UsageLogEntry, Self::Error>> + Send + '_;

  /// Append a feedback entry. `recorded_at` is set by the store.
  fn record_feedback(
    &self,
    input: NewFeedback,
  ) -> impl Future<Output = Result<FeedbackEntry, Self::Error>> + Send + '_;
}
