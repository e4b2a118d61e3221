use cmt_conference::service::{self, ConferenceInput, TrackInput};
use cmt_conference::{ConferenceError, init};
use cmt_database::Database;

const CHAIR: &str = "user:test_chair";

async fn test_db(name: &str) -> Database {
    Database::builder()
        .url("mem://")
        .session("conference_test", name)
        .init()
        .await
        .expect("connect to mem://")
}

fn conference(name: &str, acronym: Option<&str>) -> ConferenceInput {
    ConferenceInput {
        name: name.to_owned(),
        short_name: None,
        acronym: acronym.map(str::to_owned),
        description: None,
        logo_url: None,
        start_date: Some("2026-09-01".to_owned()),
        end_date: Some("2026-09-03".to_owned()),
        submission_deadline: Some("2026-06-01".to_owned()),
        is_active: true,
    }
}

#[test]
fn init_creates_slice() {
    let slice = init().expect("init should succeed");
    assert_eq!(slice.id, std::any::TypeId::of::<cmt_conference::Conference>());
}

#[tokio::test]
async fn create_assigns_slug_from_acronym() {
    let db = test_db("create").await;

    let created = service::create_conference(&db, CHAIR, conference("Intl Conf", Some("ICINSE-2025")))
        .await
        .expect("create");

    assert_eq!(created.slug.as_deref(), Some("icinse2025"));
    assert!(created.id.to_string().starts_with("conference:"));

    let by_slug = service::get_conference_by_slug(&db, "icinse2025")
        .await
        .expect("lookup")
        .expect("reachable by slug");
    assert_eq!(by_slug.id, created.id);
}

#[tokio::test]
async fn duplicate_acronym_probes_suffixes() {
    let db = test_db("probe").await;

    let first = service::create_conference(&db, CHAIR, conference("First", Some("ICSE")))
        .await
        .expect("first");
    let second = service::create_conference(&db, CHAIR, conference("Second", Some("ICSE")))
        .await
        .expect("second");
    let third = service::create_conference(&db, CHAIR, conference("Third", Some("icse")))
        .await
        .expect("third");

    assert_eq!(first.slug.as_deref(), Some("icse"));
    assert_eq!(second.slug.as_deref(), Some("icse1"));
    assert_eq!(third.slug.as_deref(), Some("icse2"));
}

#[tokio::test]
async fn empty_acronym_leaves_slug_unset() {
    let db = test_db("no_slug").await;

    let created = service::create_conference(&db, CHAIR, conference("Nameless", Some("---")))
        .await
        .expect("create");
    assert!(created.slug.is_none());

    let missing = service::get_conference_by_slug(&db, "").await.expect("lookup");
    assert!(missing.is_none());
}

#[tokio::test]
async fn update_recomputes_slug_only_on_acronym_change() {
    let db = test_db("update").await;

    let created = service::create_conference(&db, CHAIR, conference("Conf", Some("ICSE")))
        .await
        .expect("create");
    let id = created.id.to_string();

    // Same acronym, renamed conference: slug untouched.
    let mut renamed = conference("Conf Renamed", Some("ICSE"));
    renamed.description = Some("now with description".to_owned());
    let updated = service::update_conference(&db, &id, renamed).await.expect("rename");
    assert_eq!(updated.slug.as_deref(), Some("icse"));
    assert_eq!(updated.name, "Conf Renamed");

    // New acronym: slug recomputed.
    let updated = service::update_conference(&db, &id, conference("Conf Renamed", Some("FSE-27")))
        .await
        .expect("reacronym");
    assert_eq!(updated.slug.as_deref(), Some("fse27"));
}

#[tokio::test]
async fn update_keeps_own_slug_without_suffix() {
    let db = test_db("keep_own").await;

    let created = service::create_conference(&db, CHAIR, conference("Conf", Some("ICSE")))
        .await
        .expect("create");
    let id = created.id.to_string();

    // Re-deriving the same slug for the same conference must not probe to icse1.
    let updated = service::update_conference(&db, &id, conference("Conf", Some("IC-SE")))
        .await
        .expect("update");
    assert_eq!(updated.slug.as_deref(), Some("icse"));
}

#[tokio::test]
async fn list_backfills_missing_slugs() {
    let db = test_db("backfill").await;

    // Legacy row written without a slug.
    db.query(
        "CREATE conference:legacy CONTENT {
            name: 'Legacy',
            acronym: 'LEG-99',
            is_active: true,
            created_by: user:someone,
            created_at: time::now(),
        }",
    )
    .await
    .expect("raw insert")
    .check()
    .expect("raw insert ok");

    let listed = service::list_conferences(&db).await.expect("list");
    let legacy = listed.iter().find(|c| c.name == "Legacy").expect("legacy listed");
    assert_eq!(legacy.slug.as_deref(), Some("leg99"));

    let by_slug = service::get_conference_by_slug(&db, "leg99").await.expect("lookup");
    assert!(by_slug.is_some(), "backfill must be persisted");
}

#[tokio::test]
async fn missing_conference_is_not_found() {
    let db = test_db("missing").await;

    let err = service::update_conference(&db, "conference:nope", conference("X", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ConferenceError::NotFound { .. }));

    let err = service::get_conference(&db, "track:wrong_table").await.unwrap_err();
    assert!(matches!(err, ConferenceError::NotFound { .. }));
}

#[tokio::test]
async fn track_crud_under_conference() {
    let db = test_db("tracks").await;

    let parent = service::create_conference(&db, CHAIR, conference("Conf", Some("TRK")))
        .await
        .expect("create conference");
    let conference_id = parent.id.to_string();

    let track = service::create_track(
        &db,
        &conference_id,
        TrackInput { name: "Security".to_owned(), description: None, is_active: true },
    )
    .await
    .expect("create track");

    service::create_track(
        &db,
        &conference_id,
        TrackInput { name: "Databases".to_owned(), description: None, is_active: true },
    )
    .await
    .expect("create second track");

    let tracks = service::list_tracks(&db, &conference_id).await.expect("list");
    let names: Vec<_> = tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Databases", "Security"]);

    let updated = service::update_track(
        &db,
        &track.id.to_string(),
        TrackInput { name: "Systems Security".to_owned(), description: None, is_active: false },
    )
    .await
    .expect("update track");
    assert_eq!(updated.name, "Systems Security");
    assert!(!updated.is_active);

    service::delete_track(&db, &track.id.to_string()).await.expect("delete track");
    let tracks = service::list_tracks(&db, &conference_id).await.expect("list after delete");
    assert_eq!(tracks.len(), 1);
}

#[tokio::test]
async fn deleting_conference_removes_its_tracks() {
    let db = test_db("cascade").await;

    let parent = service::create_conference(&db, CHAIR, conference("Conf", Some("DEL")))
        .await
        .expect("create conference");
    let conference_id = parent.id.to_string();

    service::create_track(
        &db,
        &conference_id,
        TrackInput { name: "Only".to_owned(), description: None, is_active: true },
    )
    .await
    .expect("create track");

    service::delete_conference(&db, &conference_id).await.expect("delete conference");

    assert!(service::get_conference(&db, &conference_id).await.expect("get").is_none());
    let mut response = db.query("SELECT * FROM track").await.expect("raw select");
    let leftovers = response.take::<Vec<surrealdb::types::Value>>(0).expect("rows");
    assert!(leftovers.is_empty(), "tracks must be deleted with the conference");
}
