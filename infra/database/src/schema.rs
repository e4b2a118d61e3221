//! Built-in schema migrations, one block per feature slice.
//!
//! Tables are schemaless; the schema the application relies on is carried by
//! the row structs in each feature crate. What the database must enforce on
//! its own are the uniqueness guarantees, so every invariant that would
//! otherwise race across concurrent requests lives here as a UNIQUE index.

use crate::migrations::Migration;

const ENGINE_0001: &str = "\
DEFINE TABLE OVERWRITE migration SCHEMALESS;
DEFINE INDEX OVERWRITE migration_key_idx ON migration FIELDS slice_key, version UNIQUE;
";

const IDENTITY_0001: &str = "\
DEFINE TABLE OVERWRITE user SCHEMALESS;
DEFINE INDEX OVERWRITE user_email_idx ON user FIELDS email UNIQUE;
";

const CONFERENCE_0001: &str = "\
DEFINE TABLE OVERWRITE conference SCHEMALESS;
DEFINE INDEX OVERWRITE conference_slug_idx ON conference FIELDS slug UNIQUE;
DEFINE TABLE OVERWRITE track SCHEMALESS;
";

const SUBMISSION_0001: &str = "\
DEFINE TABLE OVERWRITE submission SCHEMALESS;
DEFINE INDEX OVERWRITE submission_number_idx ON submission FIELDS conference, number UNIQUE;
DEFINE TABLE OVERWRITE submission_author SCHEMALESS;
";

const REVIEW_0001: &str = "\
DEFINE TABLE OVERWRITE review_assignment SCHEMALESS;
DEFINE INDEX OVERWRITE review_assignment_pair_idx ON review_assignment FIELDS submission, reviewer UNIQUE;
DEFINE TABLE OVERWRITE review SCHEMALESS;
DEFINE INDEX OVERWRITE review_assignment_idx ON review FIELDS assignment UNIQUE;
DEFINE TABLE OVERWRITE decision SCHEMALESS;
DEFINE INDEX OVERWRITE decision_submission_idx ON decision FIELDS submission UNIQUE;
";

const CONTENT_0001: &str = "\
DEFINE TABLE OVERWRITE hero_content SCHEMALESS;
DEFINE TABLE OVERWRITE about_page SCHEMALESS;
DEFINE INDEX OVERWRITE about_page_key_idx ON about_page FIELDS page_key UNIQUE;
DEFINE TABLE OVERWRITE navigation_item SCHEMALESS;
DEFINE TABLE OVERWRITE page_block SCHEMALESS;
DEFINE TABLE OVERWRITE committee_member SCHEMALESS;
";

/// All migrations in application order. The engine block must run first so
/// the migration ledger exists before anything is recorded in it.
pub(crate) fn builtin_migrations() -> Vec<Migration> {
    vec![
        Migration::new("engine", "0001_init", ENGINE_0001),
        Migration::new("identity", "0001_init", IDENTITY_0001),
        Migration::new("conference", "0001_init", CONFERENCE_0001),
        Migration::new("submission", "0001_init", SUBMISSION_0001),
        Migration::new("review", "0001_init", REVIEW_0001),
        Migration::new("content", "0001_init", CONTENT_0001),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_block_runs_first() {
        let migrations = builtin_migrations();
        assert_eq!(migrations[0].slice_key, "engine");
    }

    #[test]
    fn test_migration_keys_are_unique() {
        let migrations = builtin_migrations();
        let mut keys: Vec<String> =
            migrations.iter().map(|m| format!("{}:{}", m.slice_key, m.version)).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), migrations.len());
    }
}
