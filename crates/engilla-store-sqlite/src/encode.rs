//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. The raw request payload is
//! stored as compact JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use engilla_core::record::{
  ClientIdentity, ClientVisitRecord, FeedbackEntry, PaymentRecord, PaymentStatus,
  UsageLogEntry,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── PaymentStatus ────────────────────────────────────────────────────────────

pub fn encode_payment_status(s: PaymentStatus) -> &'static str {
  match s {
    PaymentStatus::Success => "success",
  }
}

pub fn decode_payment_status(s: &str) -> Result<PaymentStatus> {
  match s {
    "success" => Ok(PaymentStatus::Success),
    other => Err(Error::Decode { column: "payments.status", value: other.to_owned() }),
  }
}

// ─── Counters ─────────────────────────────────────────────────────────────────

fn decode_count<T: TryFrom<i64>>(column: &'static str, n: i64) -> Result<T> {
  T::try_from(n).map_err(|_| Error::Decode { column, value: n.to_string() })
}

// ─── Raw row types ────────────────────────────────────────────────────────────
//
// Column values as read from rusqlite, before decoding. Decoding happens
// outside the connection closure so that domain errors stay in `crate::Error`.

pub struct RawVisit {
  pub client_identity: String,
  pub visit_count:     i64,
  pub last_visit:      String,
}

impl RawVisit {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      client_identity: row.get(0)?,
      visit_count:     row.get(1)?,
      last_visit:      row.get(2)?,
    })
  }

  pub fn into_record(self) -> Result<ClientVisitRecord> {
    Ok(ClientVisitRecord {
      client_identity: ClientIdentity::new(self.client_identity)?,
      visit_count:     decode_count("client_visits.visit_count", self.visit_count)?,
      last_visit:      decode_dt(&self.last_visit)?,
    })
  }
}

pub struct RawPayment {
  pub transaction_id: String,
  pub amount:         f64,
  pub currency:       String,
  pub status:         String,
  pub recorded_at:    String,
}

impl RawPayment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      transaction_id: row.get(0)?,
      amount:         row.get(1)?,
      currency:       row.get(2)?,
      status:         row.get(3)?,
      recorded_at:    row.get(4)?,
    })
  }

  pub fn into_record(self) -> Result<PaymentRecord> {
    Ok(PaymentRecord {
      transaction_id: self.transaction_id,
      amount:         self.amount,
      currency:       self.currency,
      status:         decode_payment_status(&self.status)?,
      recorded_at:    decode_dt(&self.recorded_at)?,
    })
  }
}

pub struct RawUsageLog {
  pub entry_id:        String,
  pub recorded_at:     String,
  pub raw_input:       String,
  pub condition_count: i64,
}

impl RawUsageLog {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entry_id:        row.get(0)?,
      recorded_at:     row.get(1)?,
      raw_input:       row.get(2)?,
      condition_count: row.get(3)?,
    })
  }

  pub fn into_entry(self) -> Result<UsageLogEntry> {
    Ok(UsageLogEntry {
      entry_id:        decode_uuid(&self.entry_id)?,
      recorded_at:     decode_dt(&self.recorded_at)?,
      raw_input:       serde_json::from_str(&self.raw_input)?,
      condition_count: decode_count("usage_log.condition_count", self.condition_count)?,
    })
  }
}

pub struct RawFeedback {
  pub entry_id:    String,
  pub recorded_at: String,
  pub content:     String,
}

impl RawFeedback {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entry_id:    row.get(0)?,
      recorded_at: row.get(1)?,
      content:     row.get(2)?,
    })
  }

  pub fn into_entry(self) -> Result<FeedbackEntry> {
    Ok(FeedbackEntry {
      entry_id:    decode_uuid(&self.entry_id)?,
      recorded_at: decode_dt(&self.recorded_at)?,
      content:     self.content,
    })
  }
}
