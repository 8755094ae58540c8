//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tutor_core::coursework::GROUP_ROLE_STUDENT;
use tutor_core::roles::{ROLE_STUDENT, ROLE_TEACHER};
use tutor_core::types::{DbId, Timestamp};
use tutor_db::models::assignment::{Assignment, CreateAssignment};
use tutor_db::models::assignment_target::AssignmentTarget;
use tutor_db::models::group::{CreateGroup, Group};
use tutor_db::models::submission::NewSubmission;
use tutor_db::models::user::{CreateUser, User};
use tutor_db::repositories::{AssignmentRepo, GroupRepo, UserRepo};

pub async fn create_user(pool: &PgPool, telegram_id: Option<i64>, role: &str, name: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            telegram_id,
            username: Some(name.to_lowercase()),
            first_name: name.to_string(),
            last_name: "Test".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn teacher(pool: &PgPool) -> User {
    create_user(pool, Some(1000), ROLE_TEACHER, "Teacher").await
}

pub async fn student(pool: &PgPool, name: &str) -> User {
    create_user(pool, None, ROLE_STUDENT, name).await
}

pub async fn group_with_students(pool: &PgPool, teacher_id: DbId, students: &[DbId]) -> Group {
    let group = GroupRepo::create(
        pool,
        teacher_id,
        &CreateGroup {
            name: "Algebra 7A".to_string(),
            subject: Some("math".to_string()),
            grade: Some(7),
            level: None,
        },
    )
    .await
    .unwrap();
    for id in students {
        GroupRepo::add_member(pool, group.id, *id, GROUP_ROLE_STUDENT)
            .await
            .unwrap();
    }
    group
}

pub fn new_assignment(
    group_id: Option<DbId>,
    student_id: Option<DbId>,
    due_date: Timestamp,
) -> CreateAssignment {
    CreateAssignment {
        title: "Fractions".to_string(),
        description: Some("Exercises 1-10".to_string()),
        subject: Some("math".to_string()),
        grade: Some(7),
        level: None,
        group_id,
        student_id,
        due_date,
    }
}

/// An individual assignment for `student_id` due in `due_in`.
pub async fn individual_assignment(
    pool: &PgPool,
    teacher_id: DbId,
    student_id: DbId,
    due_in: Duration,
) -> (Assignment, AssignmentTarget) {
    let input = new_assignment(None, Some(student_id), Utc::now() + due_in);
    let (assignment, mut targets) =
        AssignmentRepo::create_with_targets(pool, teacher_id, &input, &[student_id])
            .await
            .unwrap();
    (assignment, targets.remove(0))
}

pub fn submission(target: &AssignmentTarget, text: &str, is_late: bool) -> NewSubmission {
    NewSubmission {
        assignment_target_id: target.id,
        student_id: target.student_id,
        text: Some(text.to_string()),
        media_ids: Vec::new(),
        is_late,
        submitted_at: Utc::now(),
    }
}
