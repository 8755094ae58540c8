//! Messaging-bot channel.

use std::sync::Arc;

use async_trait::async_trait;
use tutor_core::channels::CHANNEL_BOT;
use tutor_core::notifications::bot_text;
use tutor_db::models::notification::PendingDelivery;

use super::telegram::Messenger;
use super::{DeliveryChannel, DeliveryError};

/// Sends `title + "\n\n" + message` to the recipient's Telegram chat.
pub struct BotChannel {
    messenger: Arc<dyn Messenger>,
}

impl BotChannel {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self { messenger }
    }
}

#[async_trait]
impl DeliveryChannel for BotChannel {
    fn name(&self) -> &'static str {
        CHANNEL_BOT
    }

    async fn deliver(&self, notification: &PendingDelivery) -> Result<(), DeliveryError> {
        let chat_id = notification
            .telegram_id
            .ok_or(DeliveryError::NoRecipient(CHANNEL_BOT))?;
        let text = bot_text(&notification.title, &notification.message);
        self.messenger.send_message(chat_id, &text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMessenger {
        sent: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push((chat_id, text.to_string()));
            Ok(())
        }
    }

    fn pending(telegram_id: Option<i64>) -> PendingDelivery {
        PendingDelivery {
            id: 1,
            user_id: 7,
            channel: CHANNEL_BOT.to_string(),
            title: "Assignment graded".to_string(),
            message: "\"Essay\" was graded: 4 (4.2)".to_string(),
            attempts: 0,
            telegram_id,
        }
    }

    #[tokio::test]
    async fn sends_title_and_message() {
        let messenger = Arc::new(RecordingMessenger::default());
        let channel = BotChannel::new(messenger.clone());

        channel.deliver(&pending(Some(555))).await.unwrap();

        let sent = messenger.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 555);
        assert_eq!(sent[0].1, "Assignment graded\n\n\"Essay\" was graded: 4 (4.2)");
    }

    #[tokio::test]
    async fn missing_telegram_id_is_an_error() {
        let messenger = Arc::new(RecordingMessenger::default());
        let channel = BotChannel::new(messenger.clone());

        let result = channel.deliver(&pending(None)).await;
        assert_matches!(result, Err(DeliveryError::NoRecipient(CHANNEL_BOT)));
        assert!(messenger.sent.lock().unwrap().is_empty());
    }
}
