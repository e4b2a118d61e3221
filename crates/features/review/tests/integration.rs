use cmt_database::Database;
use cmt_domain::events::{DecisionRecorded, ReviewerAssigned};
use cmt_domain::model::Verdict;
use cmt_event_bus::{EventBus, EventReceiverExt};
use cmt_review::ReviewError;
use cmt_review::service::{self, ReviewInput, Viewer};

const CHAIR: &str = "user:test_chair";
const REVIEWER: &str = "user:test_reviewer";
const AUTHOR: &str = "user:test_author";

const REVIEWER_VIEW: Viewer<'static> = Viewer { id: REVIEWER, is_chair: true };
const CHAIR_VIEW: Viewer<'static> = Viewer { id: CHAIR, is_chair: true };
const AUTHOR_VIEW: Viewer<'static> = Viewer { id: AUTHOR, is_chair: false };

struct Harness {
    db: Database,
    events: EventBus,
}

async fn harness(name: &str) -> Harness {
    let db = Database::builder()
        .url("mem://")
        .session("review_test", name)
        .init()
        .await
        .expect("connect to mem://");

    for (id, role) in [(CHAIR, "Chair"), (REVIEWER, "Chair"), (AUTHOR, "Author")] {
        db.query("CREATE type::record($id) CONTENT { email: $email, password_digest: 'x', full_name: 'Test', affiliation: NONE, role: $role, created_at: time::now() }")
            .bind(("id", id.to_owned()))
            .bind(("email", format!("{}@example.org", id.replace(':', "_"))))
            .bind(("role", role.to_owned()))
            .await
            .expect("seed user")
            .check()
            .expect("seed user ok");
    }

    Harness { db, events: EventBus::new() }
}

async fn seed_submission(db: &Database, key: &str, conference: &str, status: &str) -> String {
    let id = format!("submission:{key}");
    db.query(
        "CREATE type::record($id) CONTENT {
            conference: type::record($conference),
            track: NONE,
            title: 'A Study of Things',
            abstract_text: 'We study things.',
            pdf_path: NONE,
            original_file_name: NONE,
            number: NONE,
            status: $status,
            submitted_by: type::record($author),
            submitted_at: NONE,
            created_at: time::now(),
        }",
    )
    .bind(("id", id.clone()))
    .bind(("conference", conference.to_owned()))
    .bind(("status", status.to_owned()))
    .bind(("author", AUTHOR.to_owned()))
    .await
    .expect("seed submission")
    .check()
    .expect("seed submission ok");
    id
}

async fn submission_status(db: &Database, id: &str) -> String {
    let mut response = db
        .query("SELECT VALUE status FROM type::record($id)")
        .bind(("id", id.to_owned()))
        .await
        .expect("status query");
    response.take::<Option<String>>(0).expect("status").expect("submission exists")
}

fn review(score: i64) -> ReviewInput {
    ReviewInput {
        score_overall: score,
        confidence: 4,
        strengths: Some("Clear problem statement".to_owned()),
        weaknesses: None,
        comments_to_author: Some("Tighten section 3".to_owned()),
        comments_to_chair: None,
    }
}

#[tokio::test]
async fn assign_moves_submission_under_review_and_publishes() {
    let h = harness("assign").await;
    let submission = seed_submission(&h.db, "s_assign", "conference:c_assign", "Submitted").await;

    let mut rx = h.events.subscribe::<ReviewerAssigned>().expect("subscribe");

    let assignment =
        service::assign_reviewer(&h.db, &h.events, &submission, REVIEWER).await.expect("assign");

    assert_eq!(assignment.submission.to_string(), submission);
    assert_eq!(assignment.reviewer.to_string(), REVIEWER);
    assert_eq!(submission_status(&h.db, &submission).await, "UnderReview");

    let event = rx.next().await.expect("event");
    assert_eq!(event.submission_id, submission);
    assert_eq!(event.reviewer_id, REVIEWER);
    assert_eq!(event.assignment_id, assignment.id.to_string());
}

#[tokio::test]
async fn assign_same_reviewer_twice_returns_existing_assignment() {
    let h = harness("dup").await;
    let submission = seed_submission(&h.db, "s_dup", "conference:c_dup", "Submitted").await;

    let first =
        service::assign_reviewer(&h.db, &h.events, &submission, REVIEWER).await.expect("first");
    let second =
        service::assign_reviewer(&h.db, &h.events, &submission, REVIEWER).await.expect("second");

    assert_eq!(first.id, second.id);

    let assignments =
        service::list_by_conference(&h.db, "conference:c_dup").await.expect("list");
    assert_eq!(assignments.len(), 1);
}

#[tokio::test]
async fn assign_rejects_drafts_and_non_chair_reviewers() {
    let h = harness("gates").await;
    let draft = seed_submission(&h.db, "s_draft", "conference:c_gates", "Draft").await;
    let submitted = seed_submission(&h.db, "s_ok", "conference:c_gates", "Submitted").await;

    let err = service::assign_reviewer(&h.db, &h.events, &draft, REVIEWER).await.unwrap_err();
    assert!(matches!(err, ReviewError::Conflict { .. }));

    let err = service::assign_reviewer(&h.db, &h.events, &submitted, AUTHOR).await.unwrap_err();
    assert!(matches!(err, ReviewError::Validation { .. }));

    let err = service::assign_reviewer(&h.db, &h.events, &submitted, "user:missing")
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::NotFound { .. }));
}

#[tokio::test]
async fn review_upsert_rewrites_in_place() {
    let h = harness("upsert").await;
    let submission = seed_submission(&h.db, "s_rev", "conference:c_rev", "Submitted").await;
    let assignment =
        service::assign_reviewer(&h.db, &h.events, &submission, REVIEWER).await.expect("assign");
    let assignment_id = assignment.id.to_string();

    let first = service::upsert_review(&h.db, &assignment_id, REVIEWER_VIEW, review(7))
        .await
        .expect("write");
    assert_eq!(first.score_overall, 7);

    let second = service::upsert_review(&h.db, &assignment_id, REVIEWER_VIEW, review(9))
        .await
        .expect("rewrite");
    assert_eq!(second.id, first.id);
    assert_eq!(second.score_overall, 9);

    let read = service::get_review(&h.db, &assignment_id, REVIEWER_VIEW).await.expect("read");
    assert_eq!(read.score_overall, 9);
    assert_eq!(read.strengths.as_deref(), Some("Clear problem statement"));
}

#[tokio::test]
async fn review_access_is_gated() {
    let h = harness("review_gates").await;
    let submission = seed_submission(&h.db, "s_gate", "conference:c_gate", "Submitted").await;
    let assignment =
        service::assign_reviewer(&h.db, &h.events, &submission, REVIEWER).await.expect("assign");
    let assignment_id = assignment.id.to_string();

    let err = service::get_review(&h.db, &assignment_id, REVIEWER_VIEW).await.unwrap_err();
    assert!(matches!(err, ReviewError::NotFound { .. }));

    let err = service::upsert_review(&h.db, &assignment_id, AUTHOR_VIEW, review(5))
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::Forbidden { .. }));

    service::upsert_review(&h.db, &assignment_id, REVIEWER_VIEW, review(5))
        .await
        .expect("write");

    assert!(service::get_review(&h.db, &assignment_id, CHAIR_VIEW).await.is_ok());

    let err = service::get_review(&h.db, &assignment_id, AUTHOR_VIEW).await.unwrap_err();
    assert!(matches!(err, ReviewError::Forbidden { .. }));
}

#[tokio::test]
async fn review_scores_must_be_in_range() {
    let h = harness("scores").await;
    let submission = seed_submission(&h.db, "s_score", "conference:c_score", "Submitted").await;
    let assignment =
        service::assign_reviewer(&h.db, &h.events, &submission, REVIEWER).await.expect("assign");
    let assignment_id = assignment.id.to_string();

    let err = service::upsert_review(&h.db, &assignment_id, REVIEWER_VIEW, review(0))
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::Validation { .. }));

    let err = service::upsert_review(&h.db, &assignment_id, REVIEWER_VIEW, review(11))
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::Validation { .. }));

    let mut bad_confidence = review(5);
    bad_confidence.confidence = 6;
    let err = service::upsert_review(&h.db, &assignment_id, REVIEWER_VIEW, bad_confidence)
        .await
        .unwrap_err();
    assert!(matches!(err, ReviewError::Validation { .. }));
}

#[tokio::test]
async fn decision_updates_status_and_publishes() {
    let h = harness("decide").await;
    let submission =
        seed_submission(&h.db, "s_decide", "conference:c_decide", "UnderReview").await;

    let mut rx = h.events.subscribe::<DecisionRecorded>().expect("subscribe");

    let decision = service::record_decision(
        &h.db,
        &h.events,
        &submission,
        CHAIR,
        Verdict::Accepted,
        Some("Strong reviews".to_owned()),
    )
    .await
    .expect("decide");

    assert_eq!(decision.verdict, "Accepted");
    assert_eq!(decision.decided_by.to_string(), CHAIR);
    assert_eq!(submission_status(&h.db, &submission).await, "Accepted");

    let event = rx.next().await.expect("event");
    assert_eq!(event.submission_id, submission);
    assert_eq!(event.verdict, Verdict::Accepted);
}

#[tokio::test]
async fn decision_revision_reuses_the_row() {
    let h = harness("revise").await;
    let submission =
        seed_submission(&h.db, "s_revise", "conference:c_revise", "UnderReview").await;

    let first =
        service::record_decision(&h.db, &h.events, &submission, CHAIR, Verdict::Accepted, None)
            .await
            .expect("first");
    let second =
        service::record_decision(&h.db, &h.events, &submission, CHAIR, Verdict::Rejected, None)
            .await
            .expect("revise");

    assert_eq!(second.id, first.id);
    assert_eq!(second.verdict, "Rejected");
    assert_eq!(submission_status(&h.db, &submission).await, "Rejected");
}

#[tokio::test]
async fn decision_requires_review_to_have_started() {
    let h = harness("early").await;
    let draft = seed_submission(&h.db, "s_d", "conference:c_early", "Draft").await;
    let submitted = seed_submission(&h.db, "s_s", "conference:c_early", "Submitted").await;

    for id in [&draft, &submitted] {
        let err =
            service::record_decision(&h.db, &h.events, id, CHAIR, Verdict::Accepted, None)
                .await
                .unwrap_err();
        assert!(matches!(err, ReviewError::Conflict { .. }));
    }
}

#[tokio::test]
async fn decision_context_collects_reviews_and_decision() {
    let h = harness("context").await;
    let submission = seed_submission(&h.db, "s_ctx", "conference:c_ctx", "Submitted").await;

    let first =
        service::assign_reviewer(&h.db, &h.events, &submission, REVIEWER).await.expect("assign");
    service::assign_reviewer(&h.db, &h.events, &submission, CHAIR).await.expect("assign chair");

    service::upsert_review(&h.db, &first.id.to_string(), REVIEWER_VIEW, review(8))
        .await
        .expect("write");
    service::record_decision(&h.db, &h.events, &submission, CHAIR, Verdict::Accepted, None)
        .await
        .expect("decide");

    let context = service::decision_context(&h.db, &submission).await.expect("context");
    assert_eq!(context.submission.id.to_string(), submission);
    assert_eq!(context.assignments.len(), 2);

    let reviewed: Vec<_> =
        context.assignments.iter().filter(|pair| pair.review.is_some()).collect();
    assert_eq!(reviewed.len(), 1);
    assert_eq!(reviewed[0].review.as_ref().unwrap().score_overall, 8);

    assert_eq!(context.decision.as_ref().unwrap().verdict, "Accepted");
}

#[tokio::test]
async fn list_mine_pairs_assignments_with_submissions() {
    let h = harness("mine").await;
    let first = seed_submission(&h.db, "s_m1", "conference:c_mine", "Submitted").await;
    let second = seed_submission(&h.db, "s_m2", "conference:c_mine", "Submitted").await;

    service::assign_reviewer(&h.db, &h.events, &first, REVIEWER).await.expect("assign");
    service::assign_reviewer(&h.db, &h.events, &second, REVIEWER).await.expect("assign");
    service::assign_reviewer(&h.db, &h.events, &first, CHAIR).await.expect("assign other");

    let mine = service::list_mine(&h.db, REVIEWER).await.expect("mine");
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|d| d.assignment.reviewer.to_string() == REVIEWER));
    assert!(mine.iter().all(|d| d.submission.title == "A Study of Things"));

    let all = service::list_by_conference(&h.db, "conference:c_mine").await.expect("all");
    assert_eq!(all.len(), 3);
}
