use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    tutor_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "invite_codes",
        "groups",
        "group_members",
        "assignments",
        "assignment_targets",
        "submissions",
        "drafts",
        "feedback",
        "notifications",
        "chat_threads",
        "chat_messages",
        "chat_read_markers",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Every soft-deletable table has a matching `live_*` view.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_live_views_exist(pool: PgPool) {
    let views = [
        "live_users",
        "live_groups",
        "live_assignments",
        "live_assignment_targets",
        "live_chat_messages",
    ];
    for view in views {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM information_schema.views WHERE table_name = $1)",
        )
        .bind(view)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(exists.0, "view {view} is missing");
    }
}

/// An assignment must target exactly one of a group or a student.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_single_audience_check(pool: PgPool) {
    let teacher: (i64,) = sqlx::query_as(
        "INSERT INTO users (first_name, last_name, role) VALUES ('T', 'T', 'teacher') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let result = sqlx::query(
        "INSERT INTO assignments (title, teacher_id, due_date) VALUES ('x', $1, NOW())",
    )
    .bind(teacher.0)
    .execute(&pool)
    .await;
    assert!(result.is_err(), "assignment without an audience must be rejected");
}
