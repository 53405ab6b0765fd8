//! Core types, the storage trait, and the topic services for Herald.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! services are generic over [`store::TopicStore`]; backends and transports
//! live in their own crates.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod id;
pub mod scope;
pub mod service;
pub mod store;
pub mod subscriber;
pub mod topic;

pub use error::{Error, Result};
pub use scope::TenantScope;

#[cfg(test)]
mod testing;
