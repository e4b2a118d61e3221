use cmt_database::Database;
use cmt_domain::events::SubmissionReceived;
use cmt_event_bus::{EventBus, EventReceiverExt};
use cmt_storage::Storage;
use cmt_submission::service::{self, AuthorInput, SubmissionInput, Viewer};
use cmt_submission::SubmissionError;

const AUTHOR: &str = "user:test_author";
const OTHER: &str = "user:someone_else";

const AUTHOR_VIEW: Viewer<'static> = Viewer { id: AUTHOR, is_chair: false };
const CHAIR_VIEW: Viewer<'static> = Viewer { id: "user:test_chair", is_chair: true };
const STRANGER_VIEW: Viewer<'static> = Viewer { id: OTHER, is_chair: false };

struct Harness {
    db: Database,
    storage: Storage,
    events: EventBus,
    _dir: tempfile::TempDir,
}

async fn harness(name: &str) -> Harness {
    let db = Database::builder()
        .url("mem://")
        .session("submission_test", name)
        .init()
        .await
        .expect("connect to mem://");

    let dir = tempfile::tempdir().expect("tempdir");
    let storage =
        Storage::builder().root(dir.path()).create(false).connect().await.expect("storage");

    Harness { db, storage, events: EventBus::new(), _dir: dir }
}

async fn seed_conference(db: &Database, key: &str) -> String {
    let id = format!("conference:{key}");
    db.query("CREATE type::record($id) CONTENT { name: 'Conf', is_active: true, created_by: user:test_chair, created_at: time::now() }")
        .bind(("id", id.clone()))
        .await
        .expect("seed conference")
        .check()
        .expect("seed ok");
    id
}

fn draft(conference: &str) -> SubmissionInput {
    SubmissionInput {
        conference: conference.to_owned(),
        track: None,
        title: "A Study of Things".to_owned(),
        abstract_text: "We study things.".to_owned(),
        authors: vec![AuthorInput {
            full_name: "Ada Lovelace".to_owned(),
            email: "ada@example.org".to_owned(),
            affiliation: None,
            is_corresponding: true,
        }],
    }
}

#[tokio::test]
async fn create_draft_with_authors() {
    let h = harness("draft").await;
    let conference = seed_conference(&h.db, "c_draft").await;

    let detail =
        service::create_submission(&h.db, AUTHOR, draft(&conference)).await.expect("create");

    assert_eq!(detail.submission.status, "Draft");
    assert!(detail.submission.number.is_none());
    assert!(detail.submission.pdf_path.is_none());
    assert_eq!(detail.authors.len(), 1);
    assert_eq!(detail.authors[0].email, "ada@example.org");
}

#[tokio::test]
async fn create_rejects_missing_conference_and_empty_authors() {
    let h = harness("invalid").await;

    let err = service::create_submission(&h.db, AUTHOR, draft("conference:missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmissionError::NotFound { .. }));

    let conference = seed_conference(&h.db, "c_invalid").await;
    let mut input = draft(&conference);
    input.authors.clear();
    let err = service::create_submission(&h.db, AUTHOR, input).await.unwrap_err();
    assert!(matches!(err, SubmissionError::Validation { .. }));
}

#[tokio::test]
async fn upload_assigns_number_and_stores_renamed_file() {
    let h = harness("upload").await;
    let conference = seed_conference(&h.db, "c_upload").await;

    let mut rx = h.events.subscribe::<SubmissionReceived>().expect("subscribe");

    let detail =
        service::create_submission(&h.db, AUTHOR, draft(&conference)).await.expect("create");
    let id = detail.submission.id.to_string();

    let updated = service::upload_pdf(
        &h.db,
        &h.storage,
        &h.events,
        &id,
        AUTHOR_VIEW,
        "paper-final.pdf",
        b"%PDF-1.7 fake",
    )
    .await
    .expect("upload");

    assert_eq!(updated.number.as_deref(), Some("001P"));
    assert_eq!(updated.status, "Submitted");
    assert_eq!(updated.pdf_path.as_deref(), Some("paper-final_001P.pdf"));
    assert_eq!(updated.original_file_name.as_deref(), Some("paper-final.pdf"));
    assert!(updated.submitted_at.is_some());

    let event = rx.next().await.expect("event");
    assert_eq!(event.submission_id, id);
    assert_eq!(event.number, "001P");

    let (name, data) =
        service::download_pdf(&h.db, &h.storage, &id, CHAIR_VIEW).await.expect("download");
    assert_eq!(name, "paper-final.pdf");
    assert_eq!(data, b"%PDF-1.7 fake");
}

#[tokio::test]
async fn numbers_increment_per_conference() {
    let h = harness("numbers").await;
    let first_conf = seed_conference(&h.db, "c_num_a").await;
    let second_conf = seed_conference(&h.db, "c_num_b").await;

    for (conf, expected) in
        [(&first_conf, "001P"), (&first_conf, "002P"), (&second_conf, "001P")]
    {
        let detail =
            service::create_submission(&h.db, AUTHOR, draft(conf)).await.expect("create");
        let updated = service::upload_pdf(
            &h.db,
            &h.storage,
            &h.events,
            &detail.submission.id.to_string(),
            AUTHOR_VIEW,
            "paper.pdf",
            b"pdf",
        )
        .await
        .expect("upload");
        assert_eq!(updated.number.as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn second_upload_is_a_conflict() {
    let h = harness("reupload").await;
    let conference = seed_conference(&h.db, "c_re").await;

    let detail =
        service::create_submission(&h.db, AUTHOR, draft(&conference)).await.expect("create");
    let id = detail.submission.id.to_string();

    service::upload_pdf(&h.db, &h.storage, &h.events, &id, AUTHOR_VIEW, "a.pdf", b"pdf")
        .await
        .expect("first upload");
    let err = service::upload_pdf(&h.db, &h.storage, &h.events, &id, AUTHOR_VIEW, "a.pdf", b"pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, SubmissionError::Conflict { .. }));
}

#[tokio::test]
async fn ownership_gates_reads_and_deletes() {
    let h = harness("ownership").await;
    let conference = seed_conference(&h.db, "c_own").await;

    let detail =
        service::create_submission(&h.db, AUTHOR, draft(&conference)).await.expect("create");
    let id = detail.submission.id.to_string();

    let err = service::get_submission(&h.db, &id, STRANGER_VIEW).await.unwrap_err();
    assert!(matches!(err, SubmissionError::Forbidden { .. }));

    // Chairs and the submitter both pass.
    service::get_submission(&h.db, &id, CHAIR_VIEW).await.expect("chair read");
    service::get_submission(&h.db, &id, AUTHOR_VIEW).await.expect("owner read");

    let err = service::delete_submission(&h.db, &h.storage, &id, STRANGER_VIEW).await.unwrap_err();
    assert!(matches!(err, SubmissionError::Forbidden { .. }));
}

#[tokio::test]
async fn delete_removes_rows_and_stored_file() {
    let h = harness("delete").await;
    let conference = seed_conference(&h.db, "c_del").await;

    let detail =
        service::create_submission(&h.db, AUTHOR, draft(&conference)).await.expect("create");
    let id = detail.submission.id.to_string();
    service::upload_pdf(&h.db, &h.storage, &h.events, &id, AUTHOR_VIEW, "a.pdf", b"pdf")
        .await
        .expect("upload");

    service::delete_submission(&h.db, &h.storage, &id, AUTHOR_VIEW).await.expect("delete");

    let err = service::get_submission(&h.db, &id, CHAIR_VIEW).await.unwrap_err();
    assert!(matches!(err, SubmissionError::NotFound { .. }));

    let authors = service::list_authors(&h.db, &id).await.expect("authors");
    assert!(authors.is_empty());

    let namespace = h.storage.namespace("c_del").expect("namespace");
    assert!(!namespace.exists("a_001P.pdf").expect("exists check"));
}

#[tokio::test]
async fn listings_are_scoped() {
    let h = harness("listing").await;
    let conference = seed_conference(&h.db, "c_list").await;

    service::create_submission(&h.db, AUTHOR, draft(&conference)).await.expect("create mine");
    service::create_submission(&h.db, OTHER, draft(&conference)).await.expect("create other");

    let mine = service::list_mine(&h.db, AUTHOR).await.expect("mine");
    assert_eq!(mine.len(), 1);

    let all = service::list_by_conference(&h.db, &conference).await.expect("all");
    assert_eq!(all.len(), 2);
}
