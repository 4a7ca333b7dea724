//! Core types and decision logic for the Engilla oil recommendation service.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! rule table and resolver are pure functions; the access gate is written
//! against the [`store::EngillaStore`] trait so any backend can sit under it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod condition;
pub mod error;
pub mod gate;
pub mod payment;
pub mod record;
pub mod resolve;
pub mod rules;
pub mod store;

pub use error::{Error, Result, VerificationError};
