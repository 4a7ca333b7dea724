//! SQL schema for the Engilla SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per client identity. Upserted on every gated request.
CREATE TABLE IF NOT EXISTS client_visits (
    client_identity TEXT PRIMARY KEY,
    visit_count     INTEGER NOT NULL DEFAULT 1 CHECK (visit_count >= 1),
    last_visit      TEXT NOT NULL    -- ISO 8601 UTC
);

-- Gateway-confirmed payments only; never updated, never marked consumed.
CREATE TABLE IF NOT EXISTS payments (
    transaction_id TEXT PRIMARY KEY,
    amount         REAL NOT NULL,
    currency       TEXT NOT NULL,
    status         TEXT NOT NULL,   -- 'success'
    recorded_at    TEXT NOT NULL
);

-- Append-only.
CREATE TABLE IF NOT EXISTS usage_log (
    entry_id        TEXT PRIMARY KEY,
    recorded_at     TEXT NOT NULL,
    raw_input       TEXT NOT NULL,   -- request body as JSON
    condition_count INTEGER NOT NULL
);

-- Append-only.
CREATE TABLE IF NOT EXISTS feedback (
    entry_id    TEXT PRIMARY KEY,
    recorded_at TEXT NOT NULL,
    content     TEXT NOT NULL CHECK (length(content) > 0)
);

CREATE INDEX IF NOT EXISTS usage_log_recorded_idx ON usage_log(recorded_at);
CREATE INDEX IF NOT EXISTS feedback_recorded_idx  ON feedback(recorded_at);

PRAGMA user_version = 1;
";
