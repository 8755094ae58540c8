//! Telegram login-widget payload verification.
//!
//! The widget signs its fields with HMAC-SHA256. The key is the SHA-256
//! digest of the bot token and the message is the data-check string: every
//! present field except `hash`, as `key=value`, sorted by key and joined
//! with `\n`.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// How old an `auth_date` may be before the payload is rejected.
pub const MAX_AUTH_AGE_SECS: i64 = 24 * 60 * 60;

/// Fields posted by the Telegram login widget.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramLogin {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub photo_url: Option<String>,
    pub auth_date: i64,
    pub hash: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TelegramAuthError {
    #[error("Telegram login signature mismatch")]
    BadSignature,

    #[error("Telegram login data is too old")]
    Expired,
}

impl TelegramLogin {
    /// The sorted `key=value` lines the widget signed.
    pub fn data_check_string(&self) -> String {
        let mut fields: Vec<(&str, String)> = vec![
            ("auth_date", self.auth_date.to_string()),
            ("id", self.id.to_string()),
        ];
        let optional = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("photo_url", &self.photo_url),
            ("username", &self.username),
        ];
        for (key, value) in optional {
            if let Some(v) = value {
                fields.push((key, v.clone()));
            }
        }
        fields.sort_by(|a, b| a.0.cmp(b.0));
        fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check the signature against `bot_token` and the freshness of
    /// `auth_date` against `now` (Unix seconds).
    pub fn verify(&self, bot_token: &str, now: i64) -> Result<(), TelegramAuthError> {
        let expected = sign(bot_token, &self.data_check_string());
        if !expected.eq_ignore_ascii_case(&self.hash) {
            return Err(TelegramAuthError::BadSignature);
        }
        if now - self.auth_date > MAX_AUTH_AGE_SECS {
            return Err(TelegramAuthError::Expired);
        }
        Ok(())
    }
}

/// Hex HMAC of `data_check` keyed by SHA-256 of the bot token.
pub fn sign(bot_token: &str, data_check: &str) -> String {
    let secret = Sha256::digest(bot_token.as_bytes());
    let mut mac = HmacSha256::new_from_slice(&secret).expect("HMAC accepts any key length");
    mac.update(data_check.as_bytes());
    format!("{:x}", mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "123456:test-bot-token";

    fn signed_login(auth_date: i64) -> TelegramLogin {
        let mut login = TelegramLogin {
            id: 777,
            first_name: Some("Ada".to_string()),
            last_name: None,
            username: Some("ada".to_string()),
            photo_url: None,
            auth_date,
            hash: String::new(),
        };
        login.hash = sign(TOKEN, &login.data_check_string());
        login
    }

    #[test]
    fn data_check_string_is_sorted_and_skips_missing_fields() {
        let login = signed_login(1_700_000_000);
        assert_eq!(
            login.data_check_string(),
            "auth_date=1700000000\nfirst_name=Ada\nid=777\nusername=ada"
        );
    }

    #[test]
    fn accepts_fresh_signed_payload() {
        let login = signed_login(1_700_000_000);
        assert_eq!(login.verify(TOKEN, 1_700_000_060), Ok(()));
    }

    #[test]
    fn rejects_tampered_payload() {
        let mut login = signed_login(1_700_000_000);
        login.id = 778;
        assert_eq!(
            login.verify(TOKEN, 1_700_000_060),
            Err(TelegramAuthError::BadSignature)
        );
    }

    #[test]
    fn rejects_other_bot_token() {
        let login = signed_login(1_700_000_000);
        assert_eq!(
            login.verify("999:other", 1_700_000_060),
            Err(TelegramAuthError::BadSignature)
        );
    }

    #[test]
    fn rejects_stale_payload() {
        let login = signed_login(1_700_000_000);
        assert_eq!(
            login.verify(TOKEN, 1_700_000_000 + MAX_AUTH_AGE_SECS + 1),
            Err(TelegramAuthError::Expired)
        );
    }

    #[test]
    fn signature_is_sha256_hex() {
        assert_eq!(sign(TOKEN, "id=1").len(), 64);
    }
}
