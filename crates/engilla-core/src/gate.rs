//! The access gate: the first visit from a client is free, every later one
//! needs a verified payment.
//!
//! The visit is recorded before the payment check, so a rejected request
//! still counts. Payments are never marked consumed: a successful
//! transaction id keeps opening the gate for as long as it is presented.

use crate::{record::ClientIdentity, store::EngillaStore};

/// Outcome of [`check_access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
  pub allowed:        bool,
  pub is_first_visit: bool,
}

impl AccessDecision {
  pub const FIRST_VISIT: Self = Self { allowed: true, is_first_visit: true };
  pub const PAID: Self = Self { allowed: true, is_first_visit: false };
  pub const PAYMENT_REQUIRED: Self = Self { allowed: false, is_first_visit: false };
}

/// Record a visit from `identity` and decide whether it may proceed.
///
/// A blank `transaction_id` is treated the same as none.
pub async fn check_access<S: EngillaStore>(
  store: &S,
  identity: &ClientIdentity,
  transaction_id: Option<&str>,
) -> Result<AccessDecision, S::Error> {
  let visit = store.record_visit(identity).await?;
  if visit.is_first_visit() {
    return Ok(AccessDecision::FIRST_VISIT);
  }

  let Some(transaction_id) = transaction_id.map(str::trim).filter(|t| !t.is_empty())
  else {
    return Ok(AccessDecision::PAYMENT_REQUIRED);
  };

  match store.find_successful_payment(transaction_id).await? {
    Some(_) => Ok(AccessDecision::PAID),
    None => Ok(AccessDecision::PAYMENT_REQUIRED),
  }
}

/// Whether `identity` has never been seen. Read-only.
pub async fn peek_first_visit<S: EngillaStore>(
  store: &S,
  identity: &ClientIdentity,
) -> Result<bool, S::Error> {
  Ok(store.get_visit(identity).await?.is_none())
}
