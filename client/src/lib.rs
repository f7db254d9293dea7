//! Typed HTTP client for the OfficeDesk API.
//!
//! One [`ApiClient`] holds the base URL, bearer credential and timeout; every
//! endpoint is an async method returning typed results.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, ApiClientBuilder};
pub use error::ClientError;
pub use types::*;
