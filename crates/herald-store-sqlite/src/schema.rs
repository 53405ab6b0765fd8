//! SQL schema for the Herald SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- A topic key is unique per (organization, environment, user), not globally.
CREATE TABLE IF NOT EXISTS topics (
    topic_id        TEXT PRIMARY KEY,
    topic_key       TEXT NOT NULL,
    name            TEXT NOT NULL,
    organization_id TEXT NOT NULL,
    environment_id  TEXT NOT NULL,
    user_id         TEXT NOT NULL,
    created_at      TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    UNIQUE (topic_key, organization_id, environment_id, user_id)
);

CREATE TABLE IF NOT EXISTS subscribers (
    subscriber_record_id TEXT PRIMARY KEY,
    subscriber_id        TEXT NOT NULL,   -- caller-facing identifier
    organization_id      TEXT NOT NULL,
    environment_id       TEXT NOT NULL,
    created_at           TEXT NOT NULL,
    UNIQUE (subscriber_id, organization_id, environment_id)
);

-- Append-only. rowid order is association order.
CREATE TABLE IF NOT EXISTS topic_subscribers (
    association_id       TEXT PRIMARY KEY,
    topic_id             TEXT NOT NULL REFERENCES topics(topic_id),
    subscriber_record_id TEXT NOT NULL REFERENCES subscribers(subscriber_record_id),
    subscriber_id        TEXT NOT NULL,
    organization_id      TEXT NOT NULL,
    environment_id       TEXT NOT NULL,
    created_at           TEXT NOT NULL,
    UNIQUE (topic_id, subscriber_record_id)
);

CREATE INDEX IF NOT EXISTS topic_subscribers_topic_idx ON topic_subscribers(topic_id);

PRAGMA user_version = 1;
";
