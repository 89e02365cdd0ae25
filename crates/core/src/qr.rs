//! Verification-code rules shared by the repository and API layers.
//!
//! Codes are stored and compared in their trimmed form. Comparison does not
//! short-circuit on the first differing byte.

use crate::error::CoreError;

/// Maximum length of a verification code, in bytes, after trimming.
pub const MAX_QR_CODE_LEN: usize = 64;

/// Highest value `auth_count` may reach. A code at this count can no longer
/// be verified.
pub const MAX_AUTH_COUNT: i64 = i64::MAX;

/// Strip surrounding whitespace from a presented or stored code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_string()
}

/// Check that a code is storable: non-empty, bounded, printable.
pub fn validate_code(code: &str) -> Result<(), CoreError> {
    let code = code.trim();

    if code.is_empty() {
        return Err(CoreError::Validation("qr_code must not be empty".into()));
    }
    if code.len() > MAX_QR_CODE_LEN {
        return Err(CoreError::Validation(format!(
            "qr_code must be at most {MAX_QR_CODE_LEN} bytes"
        )));
    }
    if code.chars().any(char::is_control) {
        return Err(CoreError::Validation(
            "qr_code must not contain control characters".into(),
        ));
    }
    Ok(())
}

/// Compare a stored code against a presented one.
pub fn codes_match(stored: &str, presented: &str) -> bool {
    let stored = stored.trim().as_bytes();
    let presented = presented.trim().as_bytes();

    if stored.len() != presented.len() {
        return false;
    }

    stored
        .iter()
        .zip(presented)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
