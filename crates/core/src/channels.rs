//! Well-known notification channel name constants.
//!
//! These must match the channel values stored in the `notifications.channel`
//! column and the channel names registered with the delivery layer.

/// Delivered as a Telegram bot message to the recipient's chat.
pub const CHANNEL_BOT: &str = "bot";

/// Stored only; the frontend polls the notifications table.
pub const CHANNEL_IN_APP: &str = "in_app";

/// Email delivery. Accepted but not sent anywhere yet.
pub const CHANNEL_EMAIL: &str = "email";

/// All valid channel values.
pub const VALID_CHANNELS: &[&str] = &[CHANNEL_BOT, CHANNEL_IN_APP, CHANNEL_EMAIL];

/// Pick the channel for a recipient: the bot when they have a Telegram
/// chat, otherwise in-app only.
pub fn preferred_channel(telegram_id: Option<i64>) -> &'static str {
    match telegram_id {
        Some(id) if id != 0 => CHANNEL_BOT,
        _ => CHANNEL_IN_APP,
    }
}
