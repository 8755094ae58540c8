//! In-app channel.

use async_trait::async_trait;
use tutor_core::channels::CHANNEL_IN_APP;
use tutor_db::models::notification::PendingDelivery;

use super::{DeliveryChannel, DeliveryError};

/// The stored row is the delivery: users read it through the notification
/// inbox, so there is nothing to push.
pub struct InAppChannel;

#[async_trait]
impl DeliveryChannel for InAppChannel {
    fn name(&self) -> &'static str {
        CHANNEL_IN_APP
    }

    async fn deliver(&self, _notification: &PendingDelivery) -> Result<(), DeliveryError> {
        Ok(())
    }
}
