//! Integration tests for the scheduled jobs.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tutor_core::coursework::TARGET_STATUS_OVERDUE;
use tutor_core::notifications::{NOTIFICATION_DEADLINE_REMINDER, NOTIFICATION_OVERDUE};
use tutor_db::models::assignment::CreateAssignment;
use tutor_db::models::assignment_target::AssignmentTarget;
use tutor_db::models::user::CreateUser;
use tutor_db::repositories::{AssignmentRepo, AssignmentTargetRepo, NotificationRepo, UserRepo};
use tutor_events::Notifier;
use tutor_worker::jobs::{deadline_reminders, notification_retention, overdue_sweep};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn user(pool: &PgPool, role: &str, name: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            telegram_id: None,
            username: None,
            first_name: name.to_string(),
            last_name: String::new(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn assign(pool: &PgPool, teacher_id: i64, student_id: i64, due_in: Duration) -> AssignmentTarget {
    let input = CreateAssignment {
        title: "Essay".to_string(),
        description: None,
        subject: None,
        grade: None,
        level: None,
        group_id: None,
        student_id: Some(student_id),
        due_date: Utc::now() + due_in,
    };
    let (_, mut targets) = AssignmentRepo::create_with_targets(pool, teacher_id, &input, &[student_id])
        .await
        .unwrap();
    targets.remove(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sweep_notifies_each_flipped_target_once(pool: PgPool) {
    let teacher = user(&pool, "teacher", "T").await;
    let student = user(&pool, "student", "Ann").await;
    let target = assign(&pool, teacher, student, -Duration::minutes(5)).await;
    let notifier = Notifier::new(pool.clone());

    let flipped = overdue_sweep::run_once(&pool, &notifier, Utc::now()).await.unwrap();
    assert_eq!(flipped.len(), 1);
    let again = overdue_sweep::run_once(&pool, &notifier, Utc::now()).await.unwrap();
    assert!(again.is_empty());

    let reloaded = AssignmentTargetRepo::find_by_id(&pool, target.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, TARGET_STATUS_OVERDUE);

    let inbox = NotificationRepo::list_for_user(&pool, student, false, 10, 0)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].notification_type, NOTIFICATION_OVERDUE);
    assert_eq!(inbox[0].payload["target_id"], target.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reminders_only_for_targets_inside_window(pool: PgPool) {
    let teacher = user(&pool, "teacher", "T").await;
    let soon = user(&pool, "student", "Ann").await;
    let later = user(&pool, "student", "Bob").await;
    assign(&pool, teacher, soon, Duration::hours(2)).await;
    assign(&pool, teacher, later, Duration::days(4)).await;
    let notifier = Notifier::new(pool.clone());

    let sent = deadline_reminders::run_once(&pool, &notifier, Utc::now(), Duration::hours(24))
        .await
        .unwrap();
    assert_eq!(sent, 1);
    let repeat = deadline_reminders::run_once(&pool, &notifier, Utc::now(), Duration::hours(24))
        .await
        .unwrap();
    assert_eq!(repeat, 0);

    let inbox = NotificationRepo::list_for_user(&pool, soon, false, 10, 0)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].notification_type, NOTIFICATION_DEADLINE_REMINDER);
    assert!(NotificationRepo::list_for_user(&pool, later, false, 10, 0)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_retention_uses_configured_days(pool: PgPool) {
    let student = user(&pool, "student", "Ann").await;
    let notifier = Notifier::new(pool.clone());
    notifier
        .notify(
            student,
            tutor_core::notifications::overdue("Essay"),
            serde_json::json!({}),
        )
        .await;
    NotificationRepo::mark_all_read(&pool, student).await.unwrap();

    let kept = notification_retention::run_once(&pool, Utc::now(), 30).await.unwrap();
    assert_eq!(kept, 0);
    let purged = notification_retention::run_once(&pool, Utc::now() + Duration::days(31), 30)
        .await
        .unwrap();
    assert_eq!(purged, 1);
}
