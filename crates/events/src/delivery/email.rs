//! Email channel placeholder.
//!
//! Users carry no email address yet, so this channel only records that a
//! delivery would have happened.

use async_trait::async_trait;
use tutor_core::channels::CHANNEL_EMAIL;
use tutor_db::models::notification::PendingDelivery;

use super::{DeliveryChannel, DeliveryError};

pub struct EmailChannel;

#[async_trait]
impl DeliveryChannel for EmailChannel {
    fn name(&self) -> &'static str {
        CHANNEL_EMAIL
    }

    async fn deliver(&self, notification: &PendingDelivery) -> Result<(), DeliveryError> {
        tracing::info!(
            notification_id = notification.id,
            user_id = notification.user_id,
            "Email delivery is not wired to a mail transport; marking as sent"
        );
        Ok(())
    }
}
