//! Repository for `chat_threads`, `chat_messages` and `chat_read_markers`.

use sqlx::PgPool;
use tutor_core::chat::{THREAD_KIND_GROUP, THREAD_KIND_STUDENT_TEACHER};
use tutor_core::types::{DbId, Timestamp};

use crate::models::chat::{ChatMessage, ChatThread, NewChatMessage};

/// Column list for `chat_threads` queries.
const THREAD_COLUMNS: &str =
    "id, kind, student_id, group_id, teacher_id, last_message_at, created_at, updated_at";

/// Column list for `chat_messages` queries.
const MESSAGE_COLUMNS: &str = "id, thread_id, author_id, text, media_ids, kind, edited_at, created_at";

/// Provides thread lookup and message storage.
pub struct ChatRepo;

impl ChatRepo {
    /// Return the direct thread between a student and a teacher, creating
    /// it on first use. Concurrent callers converge on the same row.
    pub async fn get_or_create_student_teacher(
        pool: &PgPool,
        student_id: DbId,
        teacher_id: DbId,
    ) -> Result<ChatThread, sqlx::Error> {
        sqlx::query(
            "INSERT INTO chat_threads (kind, student_id, teacher_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (student_id, teacher_id) WHERE kind = 'student_teacher' DO NOTHING",
        )
        .bind(THREAD_KIND_STUDENT_TEACHER)
        .bind(student_id)
        .bind(teacher_id)
        .execute(pool)
        .await?;

        let query = format!(
            "SELECT {THREAD_COLUMNS} FROM chat_threads
             WHERE kind = $1 AND student_id = $2 AND teacher_id = $3"
        );
        sqlx::query_as::<_, ChatThread>(&query)
            .bind(THREAD_KIND_STUDENT_TEACHER)
            .bind(student_id)
            .bind(teacher_id)
            .fetch_one(pool)
            .await
    }

    /// Return the thread of a group, creating it on first use.
    pub async fn get_or_create_group(
        pool: &PgPool,
        group_id: DbId,
        teacher_id: DbId,
    ) -> Result<ChatThread, sqlx::Error> {
        sqlx::query(
            "INSERT INTO chat_threads (kind, group_id, teacher_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (group_id) WHERE kind = 'group' DO NOTHING",
        )
        .bind(THREAD_KIND_GROUP)
        .bind(group_id)
        .bind(teacher_id)
        .execute(pool)
        .await?;

        let query =
            format!("SELECT {THREAD_COLUMNS} FROM chat_threads WHERE kind = $1 AND group_id = $2");
        sqlx::query_as::<_, ChatThread>(&query)
            .bind(THREAD_KIND_GROUP)
            .bind(group_id)
            .fetch_one(pool)
            .await
    }

    /// Find a thread by ID.
    pub async fn find_thread(pool: &PgPool, id: DbId) -> Result<Option<ChatThread>, sqlx::Error> {
        let query = format!("SELECT {THREAD_COLUMNS} FROM chat_threads WHERE id = $1");
        sqlx::query_as::<_, ChatThread>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Threads a user participates in, most recently active first.
    ///
    /// Covers direct threads on either side and the threads of live groups
    /// the user belongs to.
    pub async fn list_threads_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ChatThread>, sqlx::Error> {
        let query = format!(
            "SELECT {THREAD_COLUMNS} FROM chat_threads
             WHERE student_id = $1
                OR teacher_id = $1
                OR group_id IN (
                    SELECT gm.group_id FROM group_members gm
                    JOIN live_groups g ON g.id = gm.group_id
                    WHERE gm.user_id = $1
                )
             ORDER BY last_message_at DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, ChatThread>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    /// Append a message and bump the thread's `last_message_at` in one
    /// transaction.
    pub async fn insert_message(
        pool: &PgPool,
        input: &NewChatMessage,
    ) -> Result<ChatMessage, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO chat_messages (thread_id, author_id, text, media_ids, kind)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {MESSAGE_COLUMNS}"
        );
        let message = sqlx::query_as::<_, ChatMessage>(&query)
            .bind(input.thread_id)
            .bind(input.author_id)
            .bind(&input.text)
            .bind(&input.media_ids)
            .bind(&input.kind)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE chat_threads SET last_message_at = $2 WHERE id = $1")
            .bind(input.thread_id)
            .bind(message.created_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    /// Messages of a thread, newest first. `before` pages backwards from a
    /// creation timestamp.
    pub async fn list_messages(
        pool: &PgPool,
        thread_id: DbId,
        before: Option<Timestamp>,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM live_chat_messages
             WHERE thread_id = $1 AND ($2::timestamptz IS NULL OR created_at < $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(thread_id)
            .bind(before)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Find a message by ID. Excludes soft-deleted rows.
    pub async fn find_message(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ChatMessage>, sqlx::Error> {
        let query = format!("SELECT {MESSAGE_COLUMNS} FROM live_chat_messages WHERE id = $1");
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the text of a message. Only the author may edit.
    ///
    /// Returns `None` if the message does not exist, is deleted, or was
    /// written by someone else.
    pub async fn edit_message(
        pool: &PgPool,
        id: DbId,
        author_id: DbId,
        text: &str,
    ) -> Result<Option<ChatMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE chat_messages SET text = $3, edited_at = NOW()
             WHERE id = $1 AND author_id = $2 AND deleted_at IS NULL
             RETURNING {MESSAGE_COLUMNS}"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(id)
            .bind(author_id)
            .bind(text)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a message written by `author_id`.
    pub async fn soft_delete_message(
        pool: &PgPool,
        id: DbId,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE chat_messages SET deleted_at = NOW() \
             WHERE id = $1 AND author_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(author_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Read markers
    // -----------------------------------------------------------------------

    /// Move the user's read marker for a thread to now.
    pub async fn mark_read(pool: &PgPool, thread_id: DbId, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO chat_read_markers (thread_id, user_id, last_read_at)
             VALUES ($1, $2, NOW())
             ON CONFLICT (thread_id, user_id) DO UPDATE SET last_read_at = NOW()",
        )
        .bind(thread_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Messages by other participants newer than the user's read marker.
    pub async fn unread_count(
        pool: &PgPool,
        thread_id: DbId,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM live_chat_messages m
             WHERE m.thread_id = $1
               AND m.author_id IS DISTINCT FROM $2
               AND m.created_at > COALESCE(
                   (SELECT last_read_at FROM chat_read_markers
                     WHERE thread_id = $1 AND user_id = $2),
                   '-infinity'::timestamptz
               )",
        )
        .bind(thread_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
