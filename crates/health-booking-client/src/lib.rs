//! REST client for the deployed appointment API.
//!
//! A thin, fire-and-await client: one request per user action, no retry
//! policy, no client-side timeout tuning. HTTP statuses are mapped onto
//! the same outcome taxonomy the local booking engine uses, so both paths
//! drive identical user-facing messages.

pub mod client;
pub mod config;

pub use client::*;
pub use config::*;
