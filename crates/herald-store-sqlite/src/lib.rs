//! SQLite backend for the Herald topic store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The uniqueness invariants of
//! [`herald_core::store::TopicStore`] are `UNIQUE` constraints in the schema.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
