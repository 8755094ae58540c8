//! Integration tests for soft-delete behaviour.
//!
//! Soft-deleted rows must disappear from every read that goes through the
//! `live_*` views, and a second delete must report `false`.

mod common;

use chrono::Duration;
use sqlx::PgPool;
use tutor_db::repositories::{
    AssignmentRepo, AssignmentTargetRepo, GroupRepo, SubmissionRepo, UserRepo,
};

use common::*;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_assignment_hides_its_targets(pool: PgPool) {
    let t = teacher(&pool).await;
    let s = student(&pool, "Ann").await;
    let (assignment, target) = individual_assignment(&pool, t.id, s.id, Duration::days(1)).await;

    assert!(AssignmentRepo::soft_delete(&pool, assignment.id).await.unwrap());
    assert!(!AssignmentRepo::soft_delete(&pool, assignment.id).await.unwrap());

    assert!(AssignmentRepo::find_by_id(&pool, assignment.id)
        .await
        .unwrap()
        .is_none());
    assert!(AssignmentTargetRepo::find_by_id(&pool, target.id)
        .await
        .unwrap()
        .is_none());
    assert!(AssignmentTargetRepo::list_for_student(&pool, s.id, None)
        .await
        .unwrap()
        .is_empty());

    let result = SubmissionRepo::submit(&pool, &submission(&target, "x", false))
        .await
        .unwrap();
    assert!(result.is_none(), "targets of deleted assignments are not submittable");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_group_is_hidden(pool: PgPool) {
    let t = teacher(&pool).await;
    let s = student(&pool, "Ann").await;
    let group = group_with_students(&pool, t.id, &[s.id]).await;

    assert!(GroupRepo::soft_delete(&pool, group.id).await.unwrap());
    assert!(GroupRepo::find_by_id(&pool, group.id).await.unwrap().is_none());
    assert!(GroupRepo::list_for_teacher(&pool, t.id).await.unwrap().is_empty());
    assert!(GroupRepo::list_for_member(&pool, s.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_user_is_hidden(pool: PgPool) {
    let t = teacher(&pool).await;
    let s = student(&pool, "Ann").await;
    let group = group_with_students(&pool, t.id, &[s.id]).await;

    assert!(UserRepo::soft_delete(&pool, s.id).await.unwrap());
    assert!(UserRepo::find_by_id(&pool, s.id).await.unwrap().is_none());
    assert!(GroupRepo::member_ids(&pool, group.id).await.unwrap().is_empty());
}
