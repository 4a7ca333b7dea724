//! [`SqliteStore`], the SQLite implementation of [`EngillaStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use engilla_core::{
  record::{
    ClientIdentity, ClientVisitRecord, FeedbackEntry, NewFeedback, NewPayment,
    NewUsageLog, PaymentRecord, PaymentStatus, UsageLogEntry,
  },
  store::EngillaStore,
};

use crate::{
  Result,
  encode::{
    RawFeedback, RawPayment, RawUsageLog, RawVisit, encode_dt,
    encode_payment_status, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Engilla store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// All usage log entries, oldest first.
  pub async fn usage_entries(&self) -> Result<Vec<UsageLogEntry>> {
    let raws: Vec<RawUsageLog> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT entry_id, recorded_at, raw_input, condition_count
           FROM usage_log ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], RawUsageLog::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUsageLog::into_entry).collect()
  }

  /// All feedback entries, oldest first.
  pub async fn feedback_entries(&self) -> Result<Vec<FeedbackEntry>> {
    let raws: Vec<RawFeedback> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT entry_id, recorded_at, content
           FROM feedback ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], RawFeedback::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFeedback::into_entry).collect()
  }

  /// Number of distinct client identities seen so far.
  pub async fn visit_record_count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM client_visits", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }
}

// ─── EngillaStore impl ───────────────────────────────────────────────────────

impl EngillaStore for SqliteStore {
  type Error = crate::Error;

  // ── Visits ────────────────────────────────────────────────────────────────

  async fn record_visit(&self, identity: &ClientIdentity) -> Result<ClientVisitRecord> {
    let identity_str = identity.as_str().to_owned();
    let now_str      = encode_dt(Utc::now());

    // Single statement: insert-or-increment, then read back the row.
    let raw: RawVisit = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "INSERT INTO client_visits (client_identity, visit_count, last_visit)
           VALUES (?1, 1, ?2)
           ON CONFLICT (client_identity) DO UPDATE SET
             visit_count = visit_count + 1,
             last_visit  = excluded.last_visit
           RETURNING client_identity, visit_count, last_visit",
          rusqlite::params![identity_str, now_str],
          RawVisit::from_row,
        )?)
      })
      .await?;

    raw.into_record()
  }

  async fn get_visit(&self, identity: &ClientIdentity) -> Result<Option<ClientVisitRecord>> {
    let identity_str = identity.as_str().to_owned();

    let raw: Option<RawVisit> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT client_identity, visit_count, last_visit
             FROM client_visits WHERE client_identity = ?1",
            rusqlite::params![identity_str],
            RawVisit::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawVisit::into_record).transpose()
  }

  // ── Payments ──────────────────────────────────────────────────────────────

  async fn record_payment(&self, input: NewPayment) -> Result<PaymentRecord> {
    let status_str = encode_payment_status(PaymentStatus::Success);
    let at_str     = encode_dt(Utc::now());

    // A duplicate transaction id keeps the first row; both paths read it back.
    let raw: RawPayment = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO payments (transaction_id, amount, currency, status, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (transaction_id) DO NOTHING",
          rusqlite::params![
            input.transaction_id,
            input.amount,
            input.currency,
            status_str,
            at_str,
          ],
        )?;
        let raw = tx.query_row(
          "SELECT transaction_id, amount, currency, status, recorded_at
           FROM payments WHERE transaction_id = ?1",
          rusqlite::params![input.transaction_id],
          RawPayment::from_row,
        )?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_record()
  }

  async fn find_successful_payment(&self, transaction_id: &str) -> Result<Option<PaymentRecord>> {
    let id_str     = transaction_id.to_owned();
    let status_str = encode_payment_status(PaymentStatus::Success);

    let raw: Option<RawPayment> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT transaction_id, amount, currency, status, recorded_at
             FROM payments WHERE transaction_id = ?1 AND status = ?2",
            rusqlite::params![id_str, status_str],
            RawPayment::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPayment::into_record).transpose()
  }

  // ── Append-only logs ──────────────────────────────────────────────────────

  async fn log_usage(&self, input: NewUsageLog) -> Result<UsageLogEntry> {
    let entry = UsageLogEntry {
      entry_id:        Uuid::new_v4(),
      recorded_at:     Utc::now(),
      raw_input:       input.raw_input,
      condition_count: input.condition_count,
    };

    let id_str    = encode_uuid(entry.entry_id);
    let at_str    = encode_dt(entry.recorded_at);
    let raw_str   = serde_json::to_string(&entry.raw_input)?;
    let count_val = i64::from(entry.condition_count);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO usage_log (entry_id, recorded_at, raw_input, condition_count)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, at_str, raw_str, count_val],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn record_feedback(&self, input: NewFeedback) -> Result<FeedbackEntry> {
    let entry = FeedbackEntry {
      entry_id:    Uuid::new_v4(),
      recorded_at: Utc::now(),
      content:     input.into_content(),
    };

    let id_str  = encode_uuid(entry.entry_id);
    let at_str  = encode_dt(entry.recorded_at);
    let content = entry.content.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO feedback (entry_id, recorded_at, content) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, at_str, content],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }
}
