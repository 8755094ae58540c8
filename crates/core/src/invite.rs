//! Invite codes teachers hand out to onboard students.

use rand::Rng;

use crate::error::CoreError;

/// Length of a generated invite code.
pub const INVITE_CODE_LENGTH: usize = 8;

/// Uppercase letters and digits without the easily confused `0 O 1 I`.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a random invite code.
pub fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Normalize user input (trim, uppercase) and check it looks like a code.
pub fn normalize_invite_code(raw: &str) -> Result<String, CoreError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.is_empty() {
        return Err(CoreError::Validation("Invite code is required".to_string()));
    }
    if code.len() != INVITE_CODE_LENGTH || !code.bytes().all(|b| ALPHABET.contains(&b)) {
        return Err(CoreError::Validation(format!(
            "Invalid invite code '{code}'"
        )));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_have_expected_shape() {
        for _ in 0..50 {
            let code = generate_invite_code();
            assert_eq!(code.len(), INVITE_CODE_LENGTH);
            assert!(normalize_invite_code(&code).is_ok());
        }
    }

    #[test]
    fn normalization_trims_and_uppercases() {
        assert_eq!(normalize_invite_code("  abcd2345 ").unwrap(), "ABCD2345");
    }

    #[test]
    fn empty_and_malformed_codes_are_rejected() {
        assert!(normalize_invite_code("").is_err());
        assert!(normalize_invite_code("ABC").is_err());
        assert!(normalize_invite_code("ABCD0000").is_err());
    }
}
