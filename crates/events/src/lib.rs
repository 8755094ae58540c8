//! Notification queueing and delivery.
//!
//! - [`Notifier`] turns domain events into `pending` rows in the
//!   `notifications` table, choosing a channel per recipient.
//! - [`NotificationDispatcher`] drains that queue through the
//!   [`DeliveryChannel`] registered for each row's channel.
//! - [`delivery`] holds the channel implementations and the Telegram
//!   Bot API client.

pub mod delivery;
pub mod dispatcher;
pub mod notifier;

pub use delivery::telegram::{Messenger, TelegramBot};
pub use delivery::{ChannelRegistry, DeliveryChannel, DeliveryError};
pub use dispatcher::{DispatchReport, NotificationDispatcher};
pub use notifier::{Notifier, Outgoing};
