//! Notification vocabulary and message templates.
//!
//! Templates are fixed per notification type; the delivery layer only ever
//! sees the rendered title and message.

use crate::types::Timestamp;

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

pub const NOTIFICATION_NEW_ASSIGNMENT: &str = "new_assignment";
pub const NOTIFICATION_DEADLINE_REMINDER: &str = "deadline_reminder";
pub const NOTIFICATION_OVERDUE: &str = "overdue";
pub const NOTIFICATION_GRADE_RECEIVED: &str = "grade_received";
pub const NOTIFICATION_NEW_MESSAGE: &str = "new_message";
pub const NOTIFICATION_GROUP_INVITE: &str = "group_invite";
pub const NOTIFICATION_SUBMISSION_RECEIVED: &str = "submission_received";

/// All valid notification types.
pub const VALID_NOTIFICATION_TYPES: &[&str] = &[
    NOTIFICATION_NEW_ASSIGNMENT,
    NOTIFICATION_DEADLINE_REMINDER,
    NOTIFICATION_OVERDUE,
    NOTIFICATION_GRADE_RECEIVED,
    NOTIFICATION_NEW_MESSAGE,
    NOTIFICATION_GROUP_INVITE,
    NOTIFICATION_SUBMISSION_RECEIVED,
];

/* --------------------------------------------------------------------------
Statuses and limits
-------------------------------------------------------------------------- */

pub const NOTIFICATION_STATUS_PENDING: &str = "pending";
pub const NOTIFICATION_STATUS_SENT: &str = "sent";
pub const NOTIFICATION_STATUS_READ: &str = "read";

/// A pending notification is retried by the dispatch pass until it has
/// been attempted this many times.
pub const MAX_DELIVERY_ATTEMPTS: i32 = 5;

/// Delivered or read notifications older than this are purged.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Characters of a chat message shown in a `new_message` notification.
pub const PREVIEW_CHARS: usize = 80;

/* --------------------------------------------------------------------------
Templates
-------------------------------------------------------------------------- */

/// Rendered title and body of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub notification_type: &'static str,
    pub title: String,
    pub message: String,
}

fn format_due(due: Timestamp) -> String {
    due.format("%d.%m.%Y %H:%M UTC").to_string()
}

pub fn new_assignment(assignment_title: &str, due_date: Timestamp) -> NotificationContent {
    NotificationContent {
        notification_type: NOTIFICATION_NEW_ASSIGNMENT,
        title: "New assignment".to_string(),
        message: format!(
            "You have a new assignment: {assignment_title}\nDue: {}",
            format_due(due_date)
        ),
    }
}

pub fn deadline_reminder(assignment_title: &str, due_date: Timestamp) -> NotificationContent {
    NotificationContent {
        notification_type: NOTIFICATION_DEADLINE_REMINDER,
        title: "Deadline reminder".to_string(),
        message: format!(
            "The assignment \"{assignment_title}\" is due {}",
            format_due(due_date)
        ),
    }
}

pub fn overdue(assignment_title: &str) -> NotificationContent {
    NotificationContent {
        notification_type: NOTIFICATION_OVERDUE,
        title: "Assignment overdue".to_string(),
        message: format!("Your assignment is overdue: {assignment_title}"),
    }
}

pub fn grade_received(
    assignment_title: &str,
    grade: &str,
    score: Option<f64>,
) -> NotificationContent {
    let score_part = score
        .map(|s| format!(" ({s:.1})"))
        .unwrap_or_default();
    NotificationContent {
        notification_type: NOTIFICATION_GRADE_RECEIVED,
        title: "Assignment graded".to_string(),
        message: format!("\"{assignment_title}\" was graded: {grade}{score_part}"),
    }
}

pub fn submission_received(
    student_name: &str,
    assignment_title: &str,
    is_late: bool,
) -> NotificationContent {
    let late = if is_late { " (late)" } else { "" };
    NotificationContent {
        notification_type: NOTIFICATION_SUBMISSION_RECEIVED,
        title: "Assignment submitted".to_string(),
        message: format!("{student_name} submitted \"{assignment_title}\"{late}"),
    }
}

pub fn new_message(author_name: &str, preview: &str) -> NotificationContent {
    NotificationContent {
        notification_type: NOTIFICATION_NEW_MESSAGE,
        title: format!("New message from {author_name}"),
        message: preview.to_string(),
    }
}

pub fn group_invite(group_name: &str) -> NotificationContent {
    NotificationContent {
        notification_type: NOTIFICATION_GROUP_INVITE,
        title: "Added to a group".to_string(),
        message: format!("You were added to the group \"{group_name}\""),
    }
}

/// Text sent through the messaging bot for a stored notification.
pub fn bot_text(title: &str, message: &str) -> String {
    format!("{title}\n\n{message}")
}

/// Short preview of a chat message for notifications and thread listings.
pub fn message_preview(text: Option<&str>, media_count: usize) -> String {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) if t.chars().count() > PREVIEW_CHARS => {
            let cut: String = t.chars().take(PREVIEW_CHARS).collect();
            format!("{cut}...")
        }
        Some(t) => t.to_string(),
        None if media_count > 0 => format!("[{media_count} attachment(s)]"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn due() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).unwrap()
    }

    #[test]
    fn every_template_uses_a_known_type() {
        let contents = [
            new_assignment("A", due()),
            deadline_reminder("A", due()),
            overdue("A"),
            grade_received("A", "5", Some(4.8)),
            submission_received("Ann", "A", false),
            new_message("Ann", "hi"),
            group_invite("G"),
        ];
        for c in contents {
            assert!(VALID_NOTIFICATION_TYPES.contains(&c.notification_type));
            assert!(!c.title.is_empty());
        }
    }

    #[test]
    fn new_assignment_includes_due_date() {
        let c = new_assignment("Fractions", due());
        assert!(c.message.contains("Fractions"));
        assert!(c.message.contains("14.03.2026 18:30"));
    }

    #[test]
    fn grade_message_formats_score() {
        let c = grade_received("Essay", "4", Some(4.2));
        assert_eq!(c.message, "\"Essay\" was graded: 4 (4.2)");
        let c = grade_received("Essay", "needs_revision", None);
        assert_eq!(c.message, "\"Essay\" was graded: needs_revision");
    }

    #[test]
    fn late_submission_is_flagged() {
        assert!(submission_received("Ann", "Essay", true).message.ends_with("(late)"));
        assert!(!submission_received("Ann", "Essay", false).message.contains("late"));
    }

    #[test]
    fn bot_text_joins_with_blank_line() {
        assert_eq!(bot_text("Title", "Body"), "Title\n\nBody");
    }

    #[test]
    fn preview_truncates_long_text() {
        let long = "a".repeat(PREVIEW_CHARS + 10);
        let p = message_preview(Some(&long), 0);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn preview_of_media_only_message() {
        assert_eq!(message_preview(None, 2), "[2 attachment(s)]");
        assert_eq!(message_preview(Some("  "), 0), "");
    }
}
