//! Storage access behind one trait per collection.

pub mod admin_request;
pub mod company;
pub mod memory;
pub mod request;
pub mod user;

pub use admin_request::{AdminRequestRepository, PgAdminRequestRepository};
pub use company::{CompanyRepository, PgCompanyRepository};
pub use memory::MemoryStore;
pub use request::{PgRequestRepository, RequestRepository, RequestScope};
pub use user::{PgUserRepository, UserRepository};

#[cfg(test)]
pub use admin_request::MockAdminRequestRepository;
#[cfg(test)]
pub use company::MockCompanyRepository;
#[cfg(test)]
pub use request::MockRequestRepository;
#[cfg(test)]
pub use user::MockUserRepository;
