use cmt_database::Database;
use cmt_domain::config::ApiConfig;
use cmt_domain::model::Role;
use cmt_identity::service::{self, NewUser};
use cmt_identity::{Identity, IdentityError, init};

const SALT: &str = "test-salt";

async fn test_db(name: &str) -> Database {
    Database::builder()
        .url("mem://")
        .session("identity_test", name)
        .init()
        .await
        .expect("connect to mem://")
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_owned(),
        password: "hunter2222".to_owned(),
        full_name: "Ada Lovelace".to_owned(),
        affiliation: Some("Analytical Engine Ltd".to_owned()),
    }
}

#[test]
fn init_creates_slice() {
    let slice = init(&ApiConfig::default()).expect("init should succeed");
    assert_eq!(slice.id, std::any::TypeId::of::<Identity>());
}

#[tokio::test]
async fn register_normalizes_email_and_defaults_to_author() {
    let db = test_db("register").await;

    let created = service::register(&db, SALT, new_user("  Ada@Example.ORG "))
        .await
        .expect("register");

    assert_eq!(created.email, "ada@example.org");
    assert_eq!(created.role, Role::Author.as_str());
    assert!(created.id.to_string().starts_with("user:"));
}

#[tokio::test]
async fn register_rejects_bad_payloads() {
    let db = test_db("register_bad").await;

    let mut no_at = new_user("not-an-email");
    no_at.email = "not-an-email".to_owned();
    let err = service::register(&db, SALT, no_at).await.unwrap_err();
    assert!(matches!(err, IdentityError::Validation { .. }));

    let mut short = new_user("a@b.c");
    short.password = "short".to_owned();
    let err = service::register(&db, SALT, short).await.unwrap_err();
    assert!(matches!(err, IdentityError::Validation { .. }));

    let mut unnamed = new_user("b@c.d");
    unnamed.full_name = "   ".to_owned();
    let err = service::register(&db, SALT, unnamed).await.unwrap_err();
    assert!(matches!(err, IdentityError::Validation { .. }));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let db = test_db("duplicate").await;

    service::register(&db, SALT, new_user("ada@example.org")).await.expect("first register");
    let err = service::register(&db, SALT, new_user("ADA@example.org")).await.unwrap_err();

    assert!(matches!(err, IdentityError::EmailTaken { .. }), "got {err}");
}

#[tokio::test]
async fn login_round_trip() {
    let db = test_db("login").await;
    service::register(&db, SALT, new_user("ada@example.org")).await.expect("register");

    let user = service::login(&db, SALT, "Ada@Example.org", "hunter2222")
        .await
        .expect("login with normalized email");
    assert_eq!(user.email, "ada@example.org");

    let err = service::login(&db, SALT, "ada@example.org", "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::InvalidCredentials { .. }));

    let err = service::login(&db, SALT, "nobody@example.org", "hunter2222")
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::InvalidCredentials { .. }));
}

#[tokio::test]
async fn change_role_promotes_to_chair() {
    let db = test_db("role").await;
    let created =
        service::register(&db, SALT, new_user("chair@example.org")).await.expect("register");

    let updated = service::change_role(&db, &created.id.to_string(), Role::Chair)
        .await
        .expect("promote");
    assert_eq!(updated.role, Role::Chair.as_str());

    let fetched = service::find_by_id(&db, &created.id.to_string())
        .await
        .expect("find")
        .expect("exists");
    assert_eq!(fetched.role, Role::Chair.as_str());
}

#[tokio::test]
async fn change_role_on_missing_account_is_not_found() {
    let db = test_db("role_missing").await;

    let err = service::change_role(&db, "user:does_not_exist", Role::Chair).await.unwrap_err();
    assert!(matches!(err, IdentityError::NotFound { .. }));
}

#[tokio::test]
async fn find_by_id_rejects_foreign_table_ids() {
    let db = test_db("guard").await;

    let err = service::find_by_id(&db, "conference:abc").await.unwrap_err();
    assert!(matches!(err, IdentityError::NotFound { .. }));
}

#[tokio::test]
async fn list_users_is_ordered_by_email() {
    let db = test_db("list").await;
    service::register(&db, SALT, new_user("zoe@example.org")).await.expect("register zoe");
    service::register(&db, SALT, new_user("ada@example.org")).await.expect("register ada");

    let users = service::list_users(&db).await.expect("list");
    let emails: Vec<_> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["ada@example.org", "zoe@example.org"]);
}
