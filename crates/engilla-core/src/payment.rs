//! The [`PaymentVerifier`] trait: confirm a transaction with a payment
//! gateway.
//!
//! Implementations must fail closed. Anything short of an explicit success
//! from the gateway (timeouts and transport errors included) is an `Err`, and
//! callers persist nothing in that case.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{VerificationError, record::NewPayment};

/// Amount and currency reported by the gateway for a successful transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedPayment {
  pub amount:   f64,
  pub currency: String,
}

impl ConfirmedPayment {
  /// The record to persist for `transaction_id`.
  pub fn into_new_payment(self, transaction_id: impl Into<String>) -> NewPayment {
    NewPayment {
      transaction_id: transaction_id.into(),
      amount:         self.amount,
      currency:       self.currency,
    }
  }
}

pub trait PaymentVerifier: Send + Sync {
  /// Ask the gateway whether `transaction_id` was paid.
  fn verify<'a>(
    &'a self,
    transaction_id: &'a str,
  ) -> impl Future<Output = Result<ConfirmedPayment, VerificationError>> + Send + 'a;
}
