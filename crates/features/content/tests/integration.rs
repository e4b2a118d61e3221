use cmt_content::ContentError;
use cmt_content::service::{
    self, AboutInput, CommitteeInput, HeroInput, NavigationInput, PageBlockInput,
};
use cmt_database::Database;

async fn harness(name: &str) -> Database {
    Database::builder()
        .url("mem://")
        .session("content_test", name)
        .init()
        .await
        .expect("connect to mem://")
}

fn hero(title: &str) -> HeroInput {
    HeroInput { title: title.to_owned(), subtitle: Some("Welcome".to_owned()) }
}

fn about(title: &str) -> AboutInput {
    AboutInput { title: title.to_owned(), ..AboutInput::default() }
}

fn nav(label: &str) -> NavigationInput {
    NavigationInput {
        label: label.to_owned(),
        url: format!("/{label}"),
        icon: None,
        is_active: true,
        parent: None,
    }
}

fn block(block_type: &str) -> PageBlockInput {
    PageBlockInput {
        block_type: block_type.to_owned(),
        is_active: true,
        ..PageBlockInput::default()
    }
}

fn member(name: &str) -> CommitteeInput {
    CommitteeInput {
        full_name: name.to_owned(),
        affiliation: Some("Example University".to_owned()),
        country: None,
        photo_url: None,
        short_bio: None,
        website_url: None,
        is_active: true,
    }
}

#[tokio::test]
async fn hero_readers_pick_the_latest_banner() {
    let db = harness("hero").await;

    assert!(service::get_hero(&db).await.expect("get").is_none());

    service::put_hero(&db, hero("First")).await.expect("first");
    service::put_hero(&db, hero("Second")).await.expect("second");

    let current = service::get_hero(&db).await.expect("get").expect("banner");
    assert_eq!(current.title, "Second");

    let err = service::put_hero(&db, hero("   ")).await.unwrap_err();
    assert!(matches!(err, ContentError::Validation { .. }));
}

#[tokio::test]
async fn about_pages_upsert_by_normalized_key() {
    let db = harness("about").await;

    let created = service::upsert_about(&db, " Past-Events ", about("Past Events"))
        .await
        .expect("create");
    assert_eq!(created.page_key, "past-events");

    let fetched = service::get_about(&db, "past-events").await.expect("get");
    assert_eq!(fetched.id, created.id);

    let mut replacement = about("Past Events, Revised");
    replacement.body = Some("Photos and proceedings.".to_owned());
    let updated =
        service::upsert_about(&db, "PAST-EVENTS", replacement).await.expect("update");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Past Events, Revised");

    service::upsert_about(&db, "about-organizer", about("The Organizer"))
        .await
        .expect("second page");
    let pages = service::list_about(&db).await.expect("list");
    let keys: Vec<_> = pages.iter().map(|p| p.page_key.as_str()).collect();
    assert_eq!(keys, ["about-organizer", "past-events"]);

    service::delete_about(&db, "past-events").await.expect("delete");
    let err = service::get_about(&db, "past-events").await.unwrap_err();
    assert!(matches!(err, ContentError::NotFound { .. }));
    let err = service::delete_about(&db, "past-events").await.unwrap_err();
    assert!(matches!(err, ContentError::NotFound { .. }));
}

#[tokio::test]
async fn navigation_appends_then_reorders() {
    let db = harness("nav").await;

    let home = service::create_navigation(&db, nav("home")).await.expect("home");
    let cfp = service::create_navigation(&db, nav("cfp")).await.expect("cfp");
    let venue = service::create_navigation(&db, nav("venue")).await.expect("venue");
    assert_eq!((home.display_order, cfp.display_order, venue.display_order), (1, 2, 3));

    let reversed =
        vec![venue.id.to_string(), cfp.id.to_string(), home.id.to_string()];
    service::reorder_navigation(&db, &reversed).await.expect("reorder");

    let items = service::list_navigation(&db).await.expect("list");
    let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, ["venue", "cfp", "home"]);
}

#[tokio::test]
async fn navigation_dropdown_children_detach_on_parent_delete() {
    let db = harness("nav_parent").await;

    let parent = service::create_navigation(&db, nav("program")).await.expect("parent");
    let mut child = nav("schedule");
    child.parent = Some(parent.id.to_string());
    let child = service::create_navigation(&db, child).await.expect("child");
    assert_eq!(child.parent.as_ref().map(ToString::to_string), Some(parent.id.to_string()));

    service::delete_navigation(&db, &parent.id.to_string()).await.expect("delete parent");

    let items = service::list_navigation(&db).await.expect("list");
    assert_eq!(items.len(), 1);
    assert!(items[0].parent.is_none());

    let mut orphan = nav("orphan");
    orphan.parent = Some("navigation_item:missing".to_owned());
    let err = service::create_navigation(&db, orphan).await.unwrap_err();
    assert!(matches!(err, ContentError::NotFound { .. }));

    let mut unlabeled = nav("x");
    unlabeled.label = String::new();
    let err = service::create_navigation(&db, unlabeled).await.unwrap_err();
    assert!(matches!(err, ContentError::Validation { .. }));
}

#[tokio::test]
async fn page_blocks_order_independently_per_page() {
    let db = harness("blocks").await;

    let banner = service::create_block(&db, "home", block("banner")).await.expect("banner");
    let cards = service::create_block(&db, "home", block("cards")).await.expect("cards");
    let other = service::create_block(&db, "venue", block("map")).await.expect("map");
    assert_eq!((banner.display_order, cards.display_order, other.display_order), (1, 2, 1));

    service::reorder_blocks(&db, "home", &[cards.id.to_string(), banner.id.to_string()])
        .await
        .expect("reorder");
    let blocks = service::list_blocks(&db, "home").await.expect("list");
    let types: Vec<_> = blocks.iter().map(|b| b.block_type.as_str()).collect();
    assert_eq!(types, ["cards", "banner"]);

    let err = service::reorder_blocks(&db, "home", &[other.id.to_string()]).await.unwrap_err();
    assert!(matches!(err, ContentError::NotFound { .. }));

    let mut renamed = block("hero");
    renamed.title = Some("Above the fold".to_owned());
    let updated =
        service::update_block(&db, &banner.id.to_string(), renamed).await.expect("update");
    assert_eq!(updated.block_type, "hero");
    assert_eq!(updated.page_key, "home");

    service::delete_block(&db, &banner.id.to_string()).await.expect("delete");
    let err = service::delete_block(&db, &banner.id.to_string()).await.unwrap_err();
    assert!(matches!(err, ContentError::NotFound { .. }));
}

#[tokio::test]
async fn committee_is_scoped_to_its_conference() {
    let db = harness("committee").await;
    db.query("CREATE conference:c_comm CONTENT { name: 'Conf', is_active: true, created_by: user:test_chair, created_at: time::now() }")
        .await
        .expect("seed conference")
        .check()
        .expect("seed ok");

    let err =
        service::create_committee(&db, "conference:missing", member("Ada")).await.unwrap_err();
    assert!(matches!(err, ContentError::NotFound { .. }));

    let first =
        service::create_committee(&db, "conference:c_comm", member("Ada Lovelace"))
            .await
            .expect("first");
    let second =
        service::create_committee(&db, "conference:c_comm", member("Alan Turing"))
            .await
            .expect("second");
    assert_eq!((first.display_order, second.display_order), (1, 2));

    let mut moved = member("Alan M. Turing");
    moved.country = Some("UK".to_owned());
    let updated =
        service::update_committee(&db, &second.id.to_string(), moved).await.expect("update");
    assert_eq!(updated.full_name, "Alan M. Turing");
    assert_eq!(updated.display_order, 2);

    service::delete_committee(&db, &first.id.to_string()).await.expect("delete");
    let members = service::list_committee(&db, "conference:c_comm").await.expect("list");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].full_name, "Alan M. Turing");
}
