//! Error types for `engilla-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("feedback content cannot be empty")]
  EmptyFeedback,

  #[error("client identity cannot be empty")]
  EmptyIdentity,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a payment could not be confirmed with the gateway.
///
/// Every variant is treated the same way by the gate: the payment is not
/// recorded and access is not granted.
#[derive(Debug, Error)]
pub enum VerificationError {
  #[error("transaction id is empty")]
  MissingTransactionId,

  #[error("gateway request timed out")]
  Timeout,

  #[error("gateway transport error: {0}")]
  Transport(String),

  #[error("gateway responded with HTTP {0}")]
  Status(u16),

  #[error("gateway reported status {0:?}")]
  NotSuccessful(String),

  #[error("malformed gateway response: {0}")]
  Malformed(String),
}
