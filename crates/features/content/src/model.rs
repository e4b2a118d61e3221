use surrealdb::types::{Datetime, RecordId, SurrealValue};

/// Landing-page hero row in the `hero_content` table. Readers pick the most
/// recently updated row, older rows stay as history.
#[derive(Debug, Clone, SurrealValue)]
pub struct HeroContentRecord {
    pub id: RecordId,
    pub title: String,
    pub subtitle: Option<String>,
    pub last_updated: Datetime,
}

/// Static page row in the `about_page` table, addressed by its unique
/// `page_key` ("about-organizer", "past-events", ...).
#[derive(Debug, Clone, SurrealValue)]
pub struct AboutPageRecord {
    pub id: RecordId,
    pub page_key: String,
    pub title: String,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
}

/// Menu entry row in the `navigation_item` table. A `parent` link makes the
/// entry a dropdown child.
#[derive(Debug, Clone, SurrealValue)]
pub struct NavigationItemRecord {
    pub id: RecordId,
    pub label: String,
    pub url: String,
    pub icon: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
    pub parent: Option<RecordId>,
}

/// Layout block row in the `page_block` table, grouped by `page_key` and
/// rendered in `display_order`.
#[derive(Debug, Clone, SurrealValue)]
pub struct PageBlockRecord {
    pub id: RecordId,
    pub page_key: String,
    pub block_type: String,
    pub display_order: i64,
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub css_class: Option<String>,
    pub is_active: bool,
}

/// Committee listing row in the `committee_member` table, owned by a
/// conference.
#[derive(Debug, Clone, SurrealValue)]
pub struct CommitteeMemberRecord {
    pub id: RecordId,
    pub conference: RecordId,
    pub full_name: String,
    pub affiliation: Option<String>,
    pub country: Option<String>,
    pub photo_url: Option<String>,
    pub short_bio: Option<String>,
    pub website_url: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
}
