//! Core types and trait definitions for the Poisk case store.
//!
//! Poisk is the intake and review backend of a search-and-tracing service:
//! applicants file a case describing a missing person, staff move the case
//! through a fixed status lifecycle, applicants check progress by case id.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod case;
pub mod draft;
pub mod error;
pub mod patch;
pub mod stats;
pub mod status;
pub mod store;

pub use error::{Error, Result};
