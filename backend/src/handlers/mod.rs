pub mod admin_requests;
pub mod auth;
pub mod company;
pub mod leave_requests;
pub mod requests;
pub mod users;
