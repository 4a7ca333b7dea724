//! Persisted records: client visits, verified payments, usage log entries,
//! and feedback.
//!
//! Visit records are upserted, payment records are written once per
//! transaction id, and usage and feedback entries are append-only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, condition::ConditionTag};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Who is asking. Defaults to the client's network address, so clients behind
/// one NAT share an identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientIdentity(String);

impl ClientIdentity {
  pub fn new(raw: impl Into<String>) -> Result<Self> {
    let raw = raw.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err(Error::EmptyIdentity);
    }
    Ok(Self(trimmed.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<std::net::IpAddr> for ClientIdentity {
  fn from(ip: std::net::IpAddr) -> Self { Self(ip.to_string()) }
}

impl fmt::Display for ClientIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Visits ──────────────────────────────────────────────────────────────────

/// One row per distinct client identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientVisitRecord {
  pub client_identity: ClientIdentity,
  /// Starts at 1; incremented by every gated request after the first.
  pub visit_count:     u64,
  pub last_visit:      DateTime<Utc>,
}

impl ClientVisitRecord {
  pub fn is_first_visit(&self) -> bool { self.visit_count == 1 }
}

// ─── Payments ────────────────────────────────────────────────────────────────

/// Only confirmed payments are ever stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  Success,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
  pub transaction_id: String,
  pub amount:         f64,
  /// ISO 4217 code as reported by the gateway, e.g. `NGN`.
  pub currency:       String,
  pub status:         PaymentStatus,
  pub recorded_at:    DateTime<Utc>,
}

/// Input to [`crate::store::EngillaStore::record_payment`].
#[derive(Debug, Clone)]
pub struct NewPayment {
  pub transaction_id: String,
  pub amount:         f64,
  pub currency:       String,
}

// ─── Usage log ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLogEntry {
  pub entry_id:        Uuid,
  pub recorded_at:     DateTime<Utc>,
  /// The request body exactly as received.
  pub raw_input:       serde_json::Value,
  pub condition_count: u32,
}

/// Input to [`crate::store::EngillaStore::log_usage`].
#[derive(Debug, Clone)]
pub struct NewUsageLog {
  pub raw_input:       serde_json::Value,
  pub condition_count: u32,
}

impl NewUsageLog {
  /// Log entry for a recommendation request. `condition_count` counts the
  /// submitted tags as sent, duplicates included.
  pub fn for_request(raw_input: serde_json::Value, conditions: &[ConditionTag]) -> Self {
    Self {
      raw_input,
      condition_count: u32::try_from(conditions.len()).unwrap_or(u32::MAX),
    }
  }
}

// ─── Feedback ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
  pub entry_id:    Uuid,
  pub recorded_at: DateTime<Utc>,
  pub content:     String,
}

/// Validated input to [`crate::store::EngillaStore::record_feedback`].
#[derive(Debug, Clone)]
pub struct NewFeedback {
  content: String,
}

impl NewFeedback {
  /// Rejects empty content. Whitespace is kept as submitted.
  pub fn new(content: impl Into<String>) -> Result<Self> {
    let content = content.into();
    if content.is_empty() {
      return Err(Error::EmptyFeedback);
    }
    Ok(Self { content })
  }

  pub fn content(&self) -> &str { &self.content }

  pub fn into_content(self) -> String { self.content }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_feedback_is_rejected() {
    assert!(matches!(NewFeedback::new(""), Err(Error::EmptyFeedback)));
    assert_eq!(NewFeedback::new("  \n").unwrap().content(), "  \n");
    assert_eq!(NewFeedback::new("great tool").unwrap().content(), "great tool");
  }

  #[test]
  fn identity_is_trimmed_and_non_empty() {
    assert!(matches!(ClientIdentity::new(" "), Err(Error::EmptyIdentity)));
    assert_eq!(ClientIdentity::new(" 10.0.0.1 ").unwrap().as_str(), "10.0.0.1");
  }

  #[test]
  fn usage_log_counts_duplicates() {
    let tags = vec![ConditionTag::Cold, ConditionTag::Cold];
    let entry = NewUsageLog::for_request(serde_json::json!({}), &tags);
    assert_eq!(entry.condition_count, 2);
  }
}
