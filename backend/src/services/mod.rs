//! Policy core: routing, leave ledger and request lifecycle, plus the
//! smaller workflows built on them.

pub mod accounts;
pub mod admin_requests;
pub mod ledger;
pub mod lifecycle;
pub mod notifications;
pub mod routing;
pub mod submission;
