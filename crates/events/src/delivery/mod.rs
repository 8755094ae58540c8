//! Delivery channels for queued notifications.
//!
//! Each channel implements [`DeliveryChannel`]; the dispatcher looks the
//! channel up by the name stored on the notification row.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tutor_db::models::notification::PendingDelivery;

pub mod bot;
pub mod email;
pub mod in_app;
pub mod telegram;

use bot::BotChannel;
use email::EmailChannel;
use in_app::InAppChannel;
use telegram::Messenger;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for notification delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The Bot API returned a non-2xx status without a description.
    #[error("Bot API returned HTTP {0}")]
    HttpStatus(u16),

    /// The Bot API rejected the call with a description.
    #[error("Bot API error: {0}")]
    BotApi(String),

    /// The recipient has no address on this channel.
    #[error("Recipient has no address for channel {0}")]
    NoRecipient(&'static str),

    /// No bot token was configured.
    #[error("Messaging bot is not configured")]
    NotConfigured,

    /// The row names a channel with no registered implementation.
    #[error("No delivery channel registered for '{0}'")]
    UnknownChannel(String),
}

// ---------------------------------------------------------------------------
// Channel trait
// ---------------------------------------------------------------------------

/// A way of getting a stored notification in front of its recipient.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Channel name as stored in `notifications.channel`.
    fn name(&self) -> &'static str;

    async fn deliver(&self, notification: &PendingDelivery) -> Result<(), DeliveryError>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Channel implementations keyed by channel name.
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    channels: HashMap<&'static str, Arc<dyn DeliveryChannel>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the bot, in-app and email channels. Bot messages go
    /// through `messenger`.
    pub fn standard(messenger: Arc<dyn Messenger>) -> Self {
        Self::new()
            .with(Arc::new(BotChannel::new(messenger)))
            .with(Arc::new(InAppChannel))
            .with(Arc::new(EmailChannel))
    }

    /// Register a channel, replacing any previous one with the same name.
    pub fn with(mut self, channel: Arc<dyn DeliveryChannel>) -> Self {
        self.channels.insert(channel.name(), channel);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DeliveryChannel>> {
        self.channels.get(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::telegram::DisabledMessenger;
    use tutor_core::channels::{CHANNEL_BOT, CHANNEL_EMAIL, CHANNEL_IN_APP};

    #[test]
    fn standard_registry_covers_every_channel() {
        let registry = ChannelRegistry::standard(Arc::new(DisabledMessenger));
        for name in tutor_core::channels::VALID_CHANNELS {
            assert!(registry.get(name).is_some(), "missing channel {name}");
        }
        assert_eq!(registry.get(CHANNEL_BOT).unwrap().name(), CHANNEL_BOT);
        assert_eq!(registry.get(CHANNEL_IN_APP).unwrap().name(), CHANNEL_IN_APP);
        assert_eq!(registry.get(CHANNEL_EMAIL).unwrap().name(), CHANNEL_EMAIL);
        assert!(registry.get("sms").is_none());
    }

    #[test]
    fn delivery_error_display() {
        assert_eq!(
            DeliveryError::HttpStatus(502).to_string(),
            "Bot API returned HTTP 502"
        );
        assert_eq!(
            DeliveryError::NoRecipient("bot").to_string(),
            "Recipient has no address for channel bot"
        );
        assert_eq!(
            DeliveryError::UnknownChannel("sms".into()).to_string(),
            "No delivery channel registered for 'sms'"
        );
    }

    #[test]
    fn delivery_error_display_request() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = DeliveryError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }
}
