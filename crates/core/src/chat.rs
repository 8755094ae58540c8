//! Chat thread and message rules.

use crate::coursework::validate_media_refs;
use crate::error::CoreError;
use crate::types::{DbId, MediaRef};

/// One-to-one thread between a student and their teacher.
pub const THREAD_KIND_STUDENT_TEACHER: &str = "student_teacher";

/// Shared thread for a whole group.
pub const THREAD_KIND_GROUP: &str = "group";

pub const MESSAGE_KIND_MESSAGE: &str = "message";
pub const MESSAGE_KIND_SYSTEM: &str = "system";
/// Marker posted into a thread when a teacher grades an assignment.
pub const MESSAGE_KIND_GRADE: &str = "grade";

/// Maximum length of a chat message.
pub const MAX_MESSAGE_LENGTH: usize = 4_000;

/// Validate the body of a chat message: text, media or both.
pub fn validate_message_content(text: Option<&str>, media: &[MediaRef]) -> Result<(), CoreError> {
    validate_media_refs(media)?;
    let text = text.map(str::trim).filter(|t| !t.is_empty());
    match text {
        None if media.is_empty() => Err(CoreError::Validation(
            "A message needs text or at least one attachment".to_string(),
        )),
        Some(t) if t.chars().count() > MAX_MESSAGE_LENGTH => Err(CoreError::Validation(format!(
            "Message exceeds maximum length of {MAX_MESSAGE_LENGTH} characters"
        ))),
        _ => Ok(()),
    }
}

/// Who may read and post in a thread.
///
/// `is_group_member` is only consulted for group threads.
pub fn can_access_thread(
    kind: &str,
    student_id: Option<DbId>,
    teacher_id: DbId,
    user_id: DbId,
    is_group_member: bool,
) -> bool {
    if user_id == teacher_id {
        return true;
    }
    match kind {
        THREAD_KIND_STUDENT_TEACHER => student_id == Some(user_id),
        THREAD_KIND_GROUP => is_group_member,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teacher_always_has_access() {
        assert!(can_access_thread(THREAD_KIND_GROUP, None, 1, 1, false));
        assert!(can_access_thread(THREAD_KIND_STUDENT_TEACHER, Some(2), 1, 1, false));
    }

    #[test]
    fn student_teacher_thread_only_admits_its_student() {
        assert!(can_access_thread(THREAD_KIND_STUDENT_TEACHER, Some(2), 1, 2, false));
        assert!(!can_access_thread(THREAD_KIND_STUDENT_TEACHER, Some(2), 1, 3, true));
    }

    #[test]
    fn group_thread_requires_membership() {
        assert!(can_access_thread(THREAD_KIND_GROUP, None, 1, 5, true));
        assert!(!can_access_thread(THREAD_KIND_GROUP, None, 1, 5, false));
    }

    #[test]
    fn message_content_rules() {
        assert!(validate_message_content(Some("hello"), &[]).is_ok());
        assert!(validate_message_content(None, &["photo".to_string()]).is_ok());
        assert!(validate_message_content(Some(" "), &[]).is_err());
        assert!(validate_message_content(Some(&"a".repeat(MAX_MESSAGE_LENGTH + 1)), &[]).is_err());
    }
}
