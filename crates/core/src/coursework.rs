//! Assignment lifecycle rules.
//!
//! Covers the status vocabularies of assignments, per-student targets and
//! submissions, the target state machine, lateness, attempt numbering and
//! the input checks shared by the DB and API layers. Nothing in here does
//! I/O, so every rule is unit-testable.

use crate::error::CoreError;
use crate::types::{DbId, MediaRef, Timestamp};

/* --------------------------------------------------------------------------
Assignment
-------------------------------------------------------------------------- */

/// Accepting submissions.
pub const ASSIGNMENT_STATUS_ACTIVE: &str = "active";

/// Closed by the teacher; visible but no longer accepts submissions.
pub const ASSIGNMENT_STATUS_ARCHIVED: &str = "archived";

/// All valid assignment status values.
pub const VALID_ASSIGNMENT_STATUSES: &[&str] =
    &[ASSIGNMENT_STATUS_ACTIVE, ASSIGNMENT_STATUS_ARCHIVED];

/// Maximum length for an assignment title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for an assignment description.
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

/// Maximum number of media references on a single submission or draft.
pub const MAX_MEDIA_REFS: usize = 20;

/// Who an assignment is addressed to. Exactly one audience per assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Distributed to every member of the group at creation time.
    Group(DbId),
    /// A single student.
    Student(DbId),
}

/* --------------------------------------------------------------------------
Assignment target
-------------------------------------------------------------------------- */

pub const TARGET_STATUS_PENDING: &str = "pending";
pub const TARGET_STATUS_SUBMITTED: &str = "submitted";
pub const TARGET_STATUS_GRADED: &str = "graded";
pub const TARGET_STATUS_OVERDUE: &str = "overdue";

/// All valid target status values.
pub const VALID_TARGET_STATUSES: &[&str] = &[
    TARGET_STATUS_PENDING,
    TARGET_STATUS_SUBMITTED,
    TARGET_STATUS_GRADED,
    TARGET_STATUS_OVERDUE,
];

/// Statuses a student may submit from. Must stay in sync with
/// [`state_machine::valid_transitions`].
pub const SUBMITTABLE_STATUSES: &[&str] = &[
    TARGET_STATUS_PENDING,
    TARGET_STATUS_SUBMITTED,
    TARGET_STATUS_OVERDUE,
];

/* --------------------------------------------------------------------------
Submission
-------------------------------------------------------------------------- */

/// Handed in, not yet looked at by the teacher.
pub const SUBMISSION_STATUS_SUBMITTED: &str = "submitted";

/// Mirrors the feedback of a graded target.
pub const SUBMISSION_STATUS_REVIEWED: &str = "reviewed";

/* --------------------------------------------------------------------------
Group membership
-------------------------------------------------------------------------- */

pub const GROUP_ROLE_STUDENT: &str = "student";
pub const GROUP_ROLE_ASSISTANT: &str = "assistant";

/// All valid roles a user can hold inside a group.
pub const VALID_GROUP_ROLES: &[&str] = &[GROUP_ROLE_STUDENT, GROUP_ROLE_ASSISTANT];

/* --------------------------------------------------------------------------
State machine
-------------------------------------------------------------------------- */

/// Target status transitions.
///
/// ```text
/// pending   -> submitted | overdue
/// overdue   -> submitted            (late hand-in)
/// submitted -> submitted | graded   (resubmission, grading)
/// graded    -> graded               (re-grade by the teacher)
/// ```
pub mod state_machine {
    use super::*;

    /// Returns the set of statuses reachable from `from`.
    pub fn valid_transitions(from: &str) -> &'static [&'static str] {
        match from {
            TARGET_STATUS_PENDING => &[TARGET_STATUS_SUBMITTED, TARGET_STATUS_OVERDUE],
            TARGET_STATUS_OVERDUE => &[TARGET_STATUS_SUBMITTED],
            TARGET_STATUS_SUBMITTED => &[TARGET_STATUS_SUBMITTED, TARGET_STATUS_GRADED],
            TARGET_STATUS_GRADED => &[TARGET_STATUS_GRADED],
            _ => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: &str, to: &str) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a transition, returning [`CoreError::InvalidState`] otherwise.
    pub fn validate_transition(from: &str, to: &str) -> Result<(), CoreError> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(CoreError::InvalidState(format!(
                "Invalid transition: {from} -> {to}"
            )))
        }
    }
}

/* --------------------------------------------------------------------------
Rules
-------------------------------------------------------------------------- */

/// A hand-in is late when it happens strictly after the due date.
pub fn is_late(at: Timestamp, due_date: Timestamp) -> bool {
    at > due_date
}

/// Attempt number for a new submission given how many already exist.
pub fn next_attempt(prior_submissions: i64) -> i32 {
    i32::try_from(prior_submissions.max(0) + 1).unwrap_or(i32::MAX)
}

/// Check that a student may submit against a target in `status` for an
/// assignment in `assignment_status`.
pub fn ensure_submittable(status: &str, assignment_status: &str) -> Result<(), CoreError> {
    if assignment_status == ASSIGNMENT_STATUS_ARCHIVED {
        return Err(CoreError::InvalidState(
            "Assignment is archived and no longer accepts submissions".to_string(),
        ));
    }
    if status == TARGET_STATUS_GRADED {
        return Err(CoreError::InvalidState(
            "Assignment already graded".to_string(),
        ));
    }
    state_machine::validate_transition(status, TARGET_STATUS_SUBMITTED)
}

/// Check that a target in `status` can receive its first grade.
pub fn ensure_gradable(status: &str) -> Result<(), CoreError> {
    if status != TARGET_STATUS_SUBMITTED {
        return Err(CoreError::InvalidState(format!(
            "Assignment not submitted yet (status: {status})"
        )));
    }
    Ok(())
}

/// Check that a target in `status` can be re-graded.
pub fn ensure_regradable(status: &str) -> Result<(), CoreError> {
    if status != TARGET_STATUS_GRADED {
        return Err(CoreError::InvalidState(format!(
            "Only graded assignments can be re-graded (status: {status})"
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Resolve the audience of a new assignment. Exactly one of the two ids
/// must be present.
pub fn resolve_audience(
    group_id: Option<DbId>,
    student_id: Option<DbId>,
) -> Result<Audience, CoreError> {
    match (group_id, student_id) {
        (Some(group_id), None) => Ok(Audience::Group(group_id)),
        (None, Some(student_id)) => Ok(Audience::Student(student_id)),
        (Some(_), Some(_)) => Err(CoreError::Validation(
            "An assignment targets either a group or a single student, not both".to_string(),
        )),
        (None, None) => Err(CoreError::Validation(
            "Either group_id or student_id is required".to_string(),
        )),
    }
}

/// Validate an assignment title.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional assignment description.
pub fn validate_description(description: Option<&str>) -> Result<(), CoreError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LENGTH => Err(CoreError::Validation(
            format!("Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"),
        )),
        _ => Ok(()),
    }
}

/// Validate an assignment status value.
pub fn validate_assignment_status(status: &str) -> Result<(), CoreError> {
    if VALID_ASSIGNMENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid assignment status '{status}'. Must be one of: {}",
            VALID_ASSIGNMENT_STATUSES.join(", ")
        )))
    }
}

/// Validate a target status filter value.
pub fn validate_target_status(status: &str) -> Result<(), CoreError> {
    if VALID_TARGET_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid target status '{status}'. Must be one of: {}",
            VALID_TARGET_STATUSES.join(", ")
        )))
    }
}

/// Validate a group member role.
pub fn validate_group_role(role: &str) -> Result<(), CoreError> {
    if VALID_GROUP_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid group role '{role}'. Must be one of: {}",
            VALID_GROUP_ROLES.join(", ")
        )))
    }
}

/// Validate media references attached to a submission, draft or feedback.
pub fn validate_media_refs(media: &[MediaRef]) -> Result<(), CoreError> {
    if media.len() > MAX_MEDIA_REFS {
        return Err(CoreError::Validation(format!(
            "At most {MAX_MEDIA_REFS} attachments are allowed"
        )));
    }
    if media.iter().any(|m| m.trim().is_empty()) {
        return Err(CoreError::Validation(
            "Attachment references must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// A submission must carry text, at least one attachment, or both.
pub fn validate_submission_content(
    text: Option<&str>,
    media: &[MediaRef],
) -> Result<(), CoreError> {
    validate_media_refs(media)?;
    let has_text = text.is_some_and(|t| !t.trim().is_empty());
    if !has_text && media.is_empty() {
        return Err(CoreError::Validation(
            "A submission needs text or at least one attachment".to_string(),
        ));
    }
    Ok(())
}
