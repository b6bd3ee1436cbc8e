//! Core types and trait definitions for tenki.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! `tenki-jma` produces the types defined here, `tenki-store-sqlite`
//! persists them, and the front-end only ever talks in these terms.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod area;
pub mod error;
pub mod forecast;
pub mod remap;
pub mod store;

pub use error::{Error, Result};
