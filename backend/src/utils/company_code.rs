//! Company join codes.

use rand::{distributions::Uniform, Rng};

use crate::error::AppError;
use crate::validation::rules::{validate_company_code, COMPANY_CODE_LEN};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a random 8 character code of uppercase letters and digits.
/// Uniqueness is checked by the caller against the store.
pub fn generate_company_code() -> String {
    let mut rng = rand::thread_rng();
    let dist = Uniform::from(0..ALPHABET.len());
    (0..COMPANY_CODE_LEN)
        .map(|_| ALPHABET[rng.sample(dist)] as char)
        .collect()
}

/// Trims and uppercases a user-supplied join code, rejecting blanks and
/// anything that could never have been generated.
pub fn normalize_company_code(raw: Option<String>) -> Result<String, AppError> {
    let code = raw
        .map(|c| c.trim().to_ascii_uppercase())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Company code is required".into()))?;
    validate_company_code(&code)
        .map_err(|_| AppError::BadRequest("Invalid company code format".into()))?;
    Ok(code)
}
