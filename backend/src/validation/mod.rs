//! Input validation for request payloads.
//!
//! Payload structs derive `validator::Validate`; rules that need code live in
//! [`rules`].

pub mod rules;

pub use validator::Validate;
