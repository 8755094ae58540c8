//! Chat thread and message models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutor_core::types::{DbId, MediaRef, Timestamp};

/// A row from the `chat_threads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatThread {
    pub id: DbId,
    pub kind: String,
    pub student_id: Option<DbId>,
    pub group_id: Option<DbId>,
    pub teacher_id: DbId,
    pub last_message_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `chat_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub thread_id: DbId,
    pub author_id: Option<DbId>,
    pub text: Option<String>,
    pub media_ids: Vec<MediaRef>,
    pub kind: String,
    pub edited_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Input for posting a message. `author_id` is `None` for system messages.
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub thread_id: DbId,
    pub author_id: Option<DbId>,
    pub text: Option<String>,
    pub media_ids: Vec<MediaRef>,
    pub kind: String,
}

/// DTO for posting a message from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct SendChatMessage {
    pub text: Option<String>,
    #[serde(default)]
    pub media_ids: Vec<MediaRef>,
}
