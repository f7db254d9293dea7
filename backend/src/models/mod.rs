//! Data models shared across storage and API handlers.

pub mod admin_request;
pub mod company;
pub mod notification;
pub mod request;
pub mod user;
