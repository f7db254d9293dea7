//! Common validation rules shared across request payloads.

use validator::ValidationError;

pub const COMPANY_CODE_LEN: usize = 8;
const MAX_DEPARTMENT_LEN: usize = 50;

/// Validates a company's department list.
///
/// Requirements:
/// - At least one department
/// - Every name non-blank and at most 50 characters
/// - No duplicates
#[allow(clippy::ptr_arg)]
pub fn validate_departments(departments: &Vec<String>) -> Result<(), ValidationError> {
    if departments.is_empty() {
        return Err(ValidationError::new("departments_empty"));
    }

    let mut seen = std::collections::HashSet::new();
    for name in departments {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > MAX_DEPARTMENT_LEN {
            return Err(ValidationError::new("department_invalid_length"));
        }
        if !seen.insert(name) {
            return Err(ValidationError::new("department_duplicate"));
        }
    }
    Ok(())
}

/// Validates company code format: 8 uppercase ASCII letters or digits.
pub fn validate_company_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != COMPANY_CODE_LEN {
        return Err(ValidationError::new("company_code_invalid_length"));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(ValidationError::new("company_code_invalid_characters"));
    }
    Ok(())
}
