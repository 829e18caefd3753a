//! Network access behind the `Fetcher` trait.
//!
//! The worker only ever talks to the network through this seam, which is
//! what lets tests assert that bypassed requests go straight through and
//! that cache hits make no roundtrip at all.

pub mod client;

pub use client::{Fetcher, HttpFetcher};
