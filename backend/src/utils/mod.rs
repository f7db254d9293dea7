pub mod company_code;

pub use company_code::*;
