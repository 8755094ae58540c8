//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Reads use the `live_*` views;
//! multi-row state transitions run in a single transaction and guard on
//! the current status, reporting a lost race as `None` / `false`.

pub mod assignment_repo;
pub mod assignment_target_repo;
pub mod chat_repo;
pub mod draft_repo;
pub mod feedback_repo;
pub mod group_repo;
pub mod invite_code_repo;
pub mod notification_repo;
pub mod submission_repo;
pub mod user_repo;

pub use assignment_repo::AssignmentRepo;
pub use assignment_target_repo::AssignmentTargetRepo;
pub use chat_repo::ChatRepo;
pub use draft_repo::DraftRepo;
pub use feedback_repo::FeedbackRepo;
pub use group_repo::GroupRepo;
pub use invite_code_repo::InviteCodeRepo;
pub use notification_repo::NotificationRepo;
pub use submission_repo::SubmissionRepo;
pub use user_repo::UserRepo;
