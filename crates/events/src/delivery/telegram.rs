//! Telegram Bot API client.
//!
//! [`TelegramBot`] calls `sendMessage` over HTTPS. It sits behind the
//! [`Messenger`] trait so the bot channel can be exercised without the
//! network.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::DeliveryError;

/// Default Bot API endpoint.
const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// HTTP request timeout for a single call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends plain-text messages to a chat.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError>;
}

/// Envelope every Bot API response shares.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

// ---------------------------------------------------------------------------
// TelegramBot
// ---------------------------------------------------------------------------

/// Bot API client bound to one bot token.
pub struct TelegramBot {
    client: reqwest::Client,
    endpoint: String,
}

impl TelegramBot {
    /// Create a client for `token` against the public Bot API.
    pub fn new(token: &str) -> Result<Self, DeliveryError> {
        Self::with_api_base(DEFAULT_API_BASE, token)
    }

    /// Create a client against a custom API base (self-hosted Bot API
    /// server or a local stub).
    pub fn with_api_base(api_base: &str, token: &str) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let endpoint = format!("{}/bot{token}/sendMessage", api_base.trim_end_matches('/'));
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Messenger for TelegramBot {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();

        // The Bot API explains most failures in `description`; fall back to
        // the bare status when the body is not the usual envelope.
        match response.json::<ApiResponse>().await {
            Ok(api) if api.ok && status.is_success() => Ok(()),
            Ok(api) => Err(match api.description {
                Some(desc) => DeliveryError::BotApi(desc),
                None => DeliveryError::HttpStatus(status.as_u16()),
            }),
            Err(_) if status.is_success() => Ok(()),
            Err(_) => Err(DeliveryError::HttpStatus(status.as_u16())),
        }
    }
}

// ---------------------------------------------------------------------------
// DisabledMessenger
// ---------------------------------------------------------------------------

/// Stand-in used when no bot token is configured. Every send fails, so bot
/// notifications stay queued until attempts run out.
pub struct DisabledMessenger;

#[async_trait]
impl Messenger for DisabledMessenger {
    async fn send_message(&self, _chat_id: i64, _text: &str) -> Result<(), DeliveryError> {
        Err(DeliveryError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn endpoint_includes_token() {
        let bot = TelegramBot::with_api_base("http://localhost:8081/", "123:abc").unwrap();
        assert_eq!(bot.endpoint, "http://localhost:8081/bot123:abc/sendMessage");
    }

    #[test]
    fn new_does_not_panic() {
        let _bot = TelegramBot::new("123:abc").unwrap();
    }

    #[tokio::test]
    async fn disabled_messenger_refuses() {
        let result = DisabledMessenger.send_message(1, "hi").await;
        assert_matches!(result, Err(DeliveryError::NotConfigured));
    }

    #[test]
    fn api_response_parses_error_envelope() {
        let api: ApiResponse =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"chat not found"}"#)
                .unwrap();
        assert!(!api.ok);
        assert_eq!(api.description.as_deref(), Some("chat not found"));
    }
}
