use crate::error::ContentError;
use crate::model::{
    AboutPageRecord, CommitteeMemberRecord, HeroContentRecord, NavigationItemRecord,
    PageBlockRecord,
};
use cmt_database::Database;
use cmt_domain::constants::{
    ABOUT_PAGE, COMMITTEE_MEMBER, CONFERENCE, HERO_CONTENT, NAVIGATION_ITEM, PAGE_BLOCK,
};
use cmt_kernel::safe_nanoid;
use cmt_kernel::security::resource::ResourceGuard;
use surrealdb::types::RecordId;
use tracing::info;

/// Hero banner payload.
#[derive(Debug, Clone)]
pub struct HeroInput {
    pub title: String,
    pub subtitle: Option<String>,
}

/// About page payload; the page key travels separately.
#[derive(Debug, Clone, Default)]
pub struct AboutInput {
    pub title: String,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
}

/// Menu entry payload.
#[derive(Debug, Clone)]
pub struct NavigationInput {
    pub label: String,
    pub url: String,
    pub icon: Option<String>,
    pub is_active: bool,
    pub parent: Option<String>,
}

/// Layout block payload; the page key travels separately.
#[derive(Debug, Clone, Default)]
pub struct PageBlockInput {
    pub block_type: String,
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub css_class: Option<String>,
    pub is_active: bool,
}

/// Committee listing payload.
#[derive(Debug, Clone)]
pub struct CommitteeInput {
    pub full_name: String,
    pub affiliation: Option<String>,
    pub country: Option<String>,
    pub photo_url: Option<String>,
    pub short_bio: Option<String>,
    pub website_url: Option<String>,
    pub is_active: bool,
}

/// Fetches the most recently updated hero banner, if any was ever written.
///
/// # Errors
/// Fails when the query errors.
pub async fn get_hero(db: &Database) -> Result<Option<HeroContentRecord>, ContentError> {
    let mut response = db
        .query("SELECT * FROM hero_content ORDER BY last_updated DESC LIMIT 1")
        .await
        .map_err(db_error)?;
    response.take::<Option<HeroContentRecord>>(0).map_err(db_error)
}

/// Publishes a new hero banner. Older rows stay behind as history; readers
/// always pick the newest.
///
/// # Errors
/// Fails on an empty title or query errors.
pub async fn put_hero(db: &Database, input: HeroInput) -> Result<HeroContentRecord, ContentError> {
    let title = required(&input.title, "Hero title is required")?;

    let mut response = db
        .query(
            "CREATE type::record($id) CONTENT {
                title: $title,
                subtitle: $subtitle,
                last_updated: time::now(),
            }",
        )
        .bind(("id", format!("{HERO_CONTENT}:{}", safe_nanoid!())))
        .bind(("title", title))
        .bind(("subtitle", input.subtitle))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response.take::<Option<HeroContentRecord>>(0).map_err(db_error)?.ok_or_else(|| {
        ContentError::Internal { message: "CREATE returned no hero row".into(), context: None }
    })
}

/// Lists the about pages sorted by key.
///
/// # Errors
/// Fails when the query errors.
pub async fn list_about(db: &Database) -> Result<Vec<AboutPageRecord>, ContentError> {
    let mut response =
        db.query("SELECT * FROM about_page ORDER BY page_key").await.map_err(db_error)?;
    response.take::<Vec<AboutPageRecord>>(0).map_err(db_error)
}

/// Fetches one about page by its key.
///
/// # Errors
/// Fails when no page carries the key or the query errors.
pub async fn get_about(db: &Database, page_key: &str) -> Result<AboutPageRecord, ContentError> {
    let key = normalize_key(page_key)?;
    fetch_about(db, &key).await?.ok_or(ContentError::NotFound { message: key.into(), context: None })
}

/// Creates or replaces the about page behind a key.
///
/// # Errors
/// Fails on an empty key or title, a key collision that survived the
/// upsert, or query errors.
pub async fn upsert_about(
    db: &Database,
    page_key: &str,
    input: AboutInput,
) -> Result<AboutPageRecord, ContentError> {
    let key = normalize_key(page_key)?;
    let title = required(&input.title, "Page title is required")?;

    let mut response = match fetch_about(db, &key).await? {
        Some(existing) => db
            .query(
                "UPDATE type::record($id) SET
                    title = $title,
                    body = $body,
                    image_url = $image_url,
                    link_url = $link_url,
                    link_text = $link_text",
            )
            .bind(("id", existing.id.to_string()))
            .bind(("title", title))
            .bind(("body", input.body))
            .bind(("image_url", input.image_url))
            .bind(("link_url", input.link_url))
            .bind(("link_text", input.link_text))
            .await
            .map_err(db_error)?
            .check()
            .map_err(surrealdb::Error::from)
            .map_err(db_error)?,
        None => db
            .query(
                "CREATE type::record($id) CONTENT {
                    page_key: $page_key,
                    title: $title,
                    body: $body,
                    image_url: $image_url,
                    link_url: $link_url,
                    link_text: $link_text,
                }",
            )
            .bind(("id", format!("{ABOUT_PAGE}:{}", safe_nanoid!())))
            .bind(("page_key", key.clone()))
            .bind(("title", title))
            .bind(("body", input.body))
            .bind(("image_url", input.image_url))
            .bind(("link_url", input.link_url))
            .bind(("link_text", input.link_text))
            .await
            .map_err(db_error)?
            .check()
            .map_err(surrealdb::Error::from)
            .map_err(|err| {
                let err = db_error(err);
                if is_index_conflict(&err) {
                    ContentError::Conflict { message: key.clone().into(), context: None }
                } else {
                    err
                }
            })?,
    };

    response.take::<Option<AboutPageRecord>>(0).map_err(db_error)?.ok_or_else(|| {
        ContentError::Internal { message: "Upsert returned no page row".into(), context: None }
    })
}

/// Deletes the about page behind a key.
///
/// # Errors
/// Fails when no page carries the key or the query errors.
pub async fn delete_about(db: &Database, page_key: &str) -> Result<(), ContentError> {
    let key = normalize_key(page_key)?;

    let mut response = db
        .query("DELETE about_page WHERE page_key = $page_key RETURN BEFORE")
        .bind(("page_key", key.clone()))
        .await
        .map_err(db_error)?;
    let deleted = response.take::<Vec<AboutPageRecord>>(0).map_err(db_error)?;

    if deleted.is_empty() {
        return Err(ContentError::NotFound { message: key.into(), context: None });
    }
    info!(page_key = %key, "about page deleted");
    Ok(())
}

/// Lists the menu entries in display order.
///
/// # Errors
/// Fails when the query errors.
pub async fn list_navigation(db: &Database) -> Result<Vec<NavigationItemRecord>, ContentError> {
    let mut response = db
        .query("SELECT * FROM navigation_item ORDER BY display_order")
        .await
        .map_err(db_error)?;
    response.take::<Vec<NavigationItemRecord>>(0).map_err(db_error)
}

/// Appends a menu entry at the end of the current order.
///
/// # Errors
/// Fails on an empty label or url, a missing parent entry, or query errors.
pub async fn create_navigation(
    db: &Database,
    input: NavigationInput,
) -> Result<NavigationItemRecord, ContentError> {
    let label = required(&input.label, "Menu label is required")?;
    let url = required(&input.url, "Menu url is required")?;

    let parent = match &input.parent {
        None => None,
        Some(parent) => {
            let parent_id =
                ResourceGuard::verify(parent, NAVIGATION_ITEM).map_err(not_found)?;
            if !record_exists(db, &parent_id).await? {
                return Err(ContentError::NotFound { message: parent_id.into(), context: None });
            }
            Some(parent_id)
        },
    };

    let order = next_order(db, "SELECT VALUE display_order FROM navigation_item").await?;
    let mut response = db
        .query(
            "CREATE type::record($id) CONTENT {
                label: $label,
                url: $url,
                icon: $icon,
                display_order: $display_order,
                is_active: $is_active,
                parent: if $parent != NONE { type::record($parent) } else { NONE },
            }",
        )
        .bind(("id", format!("{NAVIGATION_ITEM}:{}", safe_nanoid!())))
        .bind(("label", label))
        .bind(("url", url))
        .bind(("icon", input.icon))
        .bind(("display_order", order))
        .bind(("is_active", input.is_active))
        .bind(("parent", parent))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response.take::<Option<NavigationItemRecord>>(0).map_err(db_error)?.ok_or_else(|| {
        ContentError::Internal { message: "CREATE returned no menu row".into(), context: None }
    })
}

/// Rewrites a menu entry keeping its position.
///
/// # Errors
/// Fails when the entry does not exist, the payload is invalid, or a query
/// errors.
pub async fn update_navigation(
    db: &Database,
    id: &str,
    input: NavigationInput,
) -> Result<NavigationItemRecord, ContentError> {
    let id = ResourceGuard::verify(id, NAVIGATION_ITEM).map_err(not_found)?;
    let label = required(&input.label, "Menu label is required")?;
    let url = required(&input.url, "Menu url is required")?;

    let parent = match &input.parent {
        None => None,
        Some(parent) => {
            Some(ResourceGuard::verify(parent, NAVIGATION_ITEM).map_err(not_found)?)
        },
    };

    let mut response = db
        .query(
            "UPDATE type::record($id) SET
                label = $label,
                url = $url,
                icon = $icon,
                is_active = $is_active,
                parent = if $parent != NONE { type::record($parent) } else { NONE }",
        )
        .bind(("id", id.clone()))
        .bind(("label", label))
        .bind(("url", url))
        .bind(("icon", input.icon))
        .bind(("is_active", input.is_active))
        .bind(("parent", parent))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response
        .take::<Option<NavigationItemRecord>>(0)
        .map_err(db_error)?
        .ok_or(ContentError::NotFound { message: id.into(), context: None })
}

/// Deletes a menu entry, detaching any dropdown children first.
///
/// # Errors
/// Fails when the entry does not exist or a query errors.
pub async fn delete_navigation(db: &Database, id: &str) -> Result<(), ContentError> {
    let id = ResourceGuard::verify(id, NAVIGATION_ITEM).map_err(not_found)?;

    let mut response = db
        .query(
            "UPDATE navigation_item SET parent = NONE WHERE parent = type::record($id);
            DELETE type::record($id) RETURN BEFORE",
        )
        .bind(("id", id.clone()))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;
    let deleted = response.take::<Option<NavigationItemRecord>>(1).map_err(db_error)?;

    if deleted.is_none() {
        return Err(ContentError::NotFound { message: id.into(), context: None });
    }
    Ok(())
}

/// Rewrites the display order of the menu to match the given id sequence.
///
/// # Errors
/// Fails when one of the ids does not exist or a query errors.
pub async fn reorder_navigation(db: &Database, ids: &[String]) -> Result<(), ContentError> {
    for (position, id) in ids.iter().enumerate() {
        let id = ResourceGuard::verify(id, NAVIGATION_ITEM).map_err(not_found)?;
        set_order(db, &id, to_order(position)?).await?;
    }
    Ok(())
}

/// Lists the blocks of a page in display order.
///
/// # Errors
/// Fails on an empty page key or query errors.
pub async fn list_blocks(
    db: &Database,
    page_key: &str,
) -> Result<Vec<PageBlockRecord>, ContentError> {
    let key = normalize_key(page_key)?;

    let mut response = db
        .query("SELECT * FROM page_block WHERE page_key = $page_key ORDER BY display_order")
        .bind(("page_key", key))
        .await
        .map_err(db_error)?;
    response.take::<Vec<PageBlockRecord>>(0).map_err(db_error)
}

/// Appends a block at the end of a page.
///
/// # Errors
/// Fails on an empty page key or block type, or query errors.
pub async fn create_block(
    db: &Database,
    page_key: &str,
    input: PageBlockInput,
) -> Result<PageBlockRecord, ContentError> {
    let key = normalize_key(page_key)?;
    let block_type = required(&input.block_type, "Block type is required")?;

    let mut response = db
        .query("SELECT VALUE display_order FROM page_block WHERE page_key = $page_key")
        .bind(("page_key", key.clone()))
        .await
        .map_err(db_error)?;
    let orders = response.take::<Vec<i64>>(0).map_err(db_error)?;
    let order = orders.into_iter().max().unwrap_or(0) + 1;

    let mut response = db
        .query(
            "CREATE type::record($id) CONTENT {
                page_key: $page_key,
                block_type: $block_type,
                display_order: $display_order,
                title: $title,
                body: $body,
                image_url: $image_url,
                link_url: $link_url,
                link_text: $link_text,
                css_class: $css_class,
                is_active: $is_active,
            }",
        )
        .bind(("id", format!("{PAGE_BLOCK}:{}", safe_nanoid!())))
        .bind(("page_key", key))
        .bind(("block_type", block_type))
        .bind(("display_order", order))
        .bind(("title", input.title))
        .bind(("body", input.body))
        .bind(("image_url", input.image_url))
        .bind(("link_url", input.link_url))
        .bind(("link_text", input.link_text))
        .bind(("css_class", input.css_class))
        .bind(("is_active", input.is_active))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response.take::<Option<PageBlockRecord>>(0).map_err(db_error)?.ok_or_else(|| {
        ContentError::Internal { message: "CREATE returned no block row".into(), context: None }
    })
}

/// Rewrites a block keeping its page and position.
///
/// # Errors
/// Fails when the block does not exist, the payload is invalid, or a query
/// errors.
pub async fn update_block(
    db: &Database,
    id: &str,
    input: PageBlockInput,
) -> Result<PageBlockRecord, ContentError> {
    let id = ResourceGuard::verify(id, PAGE_BLOCK).map_err(not_found)?;
    let block_type = required(&input.block_type, "Block type is required")?;

    let mut response = db
        .query(
            "UPDATE type::record($id) SET
                block_type = $block_type,
                title = $title,
                body = $body,
                image_url = $image_url,
                link_url = $link_url,
                link_text = $link_text,
                css_class = $css_class,
                is_active = $is_active",
        )
        .bind(("id", id.clone()))
        .bind(("block_type", block_type))
        .bind(("title", input.title))
        .bind(("body", input.body))
        .bind(("image_url", input.image_url))
        .bind(("link_url", input.link_url))
        .bind(("link_text", input.link_text))
        .bind(("css_class", input.css_class))
        .bind(("is_active", input.is_active))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response
        .take::<Option<PageBlockRecord>>(0)
        .map_err(db_error)?
        .ok_or(ContentError::NotFound { message: id.into(), context: None })
}

/// Deletes a block.
///
/// # Errors
/// Fails when the block does not exist or a query errors.
pub async fn delete_block(db: &Database, id: &str) -> Result<(), ContentError> {
    let id = ResourceGuard::verify(id, PAGE_BLOCK).map_err(not_found)?;

    let mut response = db
        .query("DELETE type::record($id) RETURN BEFORE")
        .bind(("id", id.clone()))
        .await
        .map_err(db_error)?;
    let deleted = response.take::<Option<PageBlockRecord>>(0).map_err(db_error)?;

    if deleted.is_none() {
        return Err(ContentError::NotFound { message: id.into(), context: None });
    }
    Ok(())
}

/// Rewrites the display order of a page's blocks to match the given id
/// sequence. Ids from other pages are rejected.
///
/// # Errors
/// Fails when one of the ids does not exist on the page or a query errors.
pub async fn reorder_blocks(
    db: &Database,
    page_key: &str,
    ids: &[String],
) -> Result<(), ContentError> {
    let key = normalize_key(page_key)?;

    for (position, id) in ids.iter().enumerate() {
        let id = ResourceGuard::verify(id, PAGE_BLOCK).map_err(not_found)?;

        let mut response = db
            .query(
                "UPDATE type::record($id) SET display_order = $display_order
                    WHERE page_key = $page_key",
            )
            .bind(("id", id.clone()))
            .bind(("display_order", to_order(position)?))
            .bind(("page_key", key.clone()))
            .await
            .map_err(db_error)?
            .check()
            .map_err(surrealdb::Error::from)
            .map_err(db_error)?;
        let updated = response.take::<Option<PageBlockRecord>>(0).map_err(db_error)?;

        if updated.is_none() {
            return Err(ContentError::NotFound { message: id.into(), context: None });
        }
    }
    Ok(())
}

/// Lists the committee of a conference in display order.
///
/// # Errors
/// Fails when the id belongs to a different table or the query errors.
pub async fn list_committee(
    db: &Database,
    conference_id: &str,
) -> Result<Vec<CommitteeMemberRecord>, ContentError> {
    let conference_id = ResourceGuard::verify(conference_id, CONFERENCE).map_err(not_found)?;

    let mut response = db
        .query(
            "SELECT * FROM committee_member
                WHERE conference = type::record($conference)
                ORDER BY display_order",
        )
        .bind(("conference", conference_id))
        .await
        .map_err(db_error)?;
    response.take::<Vec<CommitteeMemberRecord>>(0).map_err(db_error)
}

/// Appends a committee member at the end of a conference's listing.
///
/// # Errors
/// Fails when the conference does not exist, the name is empty, or a query
/// errors.
pub async fn create_committee(
    db: &Database,
    conference_id: &str,
    input: CommitteeInput,
) -> Result<CommitteeMemberRecord, ContentError> {
    let conference_id = ResourceGuard::verify(conference_id, CONFERENCE).map_err(not_found)?;
    let full_name = required(&input.full_name, "Member name is required")?;

    if !record_exists(db, &conference_id).await? {
        return Err(ContentError::NotFound { message: conference_id.into(), context: None });
    }

    let mut response = db
        .query(
            "SELECT VALUE display_order FROM committee_member
                WHERE conference = type::record($conference)",
        )
        .bind(("conference", conference_id.clone()))
        .await
        .map_err(db_error)?;
    let orders = response.take::<Vec<i64>>(0).map_err(db_error)?;
    let order = orders.into_iter().max().unwrap_or(0) + 1;

    let mut response = db
        .query(
            "CREATE type::record($id) CONTENT {
                conference: type::record($conference),
                full_name: $full_name,
                affiliation: $affiliation,
                country: $country,
                photo_url: $photo_url,
                short_bio: $short_bio,
                website_url: $website_url,
                display_order: $display_order,
                is_active: $is_active,
            }",
        )
        .bind(("id", format!("{COMMITTEE_MEMBER}:{}", safe_nanoid!())))
        .bind(("conference", conference_id))
        .bind(("full_name", full_name))
        .bind(("affiliation", input.affiliation))
        .bind(("country", input.country))
        .bind(("photo_url", input.photo_url))
        .bind(("short_bio", input.short_bio))
        .bind(("website_url", input.website_url))
        .bind(("display_order", order))
        .bind(("is_active", input.is_active))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response.take::<Option<CommitteeMemberRecord>>(0).map_err(db_error)?.ok_or_else(|| {
        ContentError::Internal { message: "CREATE returned no member row".into(), context: None }
    })
}

/// Rewrites a committee member keeping their conference and position.
///
/// # Errors
/// Fails when the member does not exist, the name is empty, or a query
/// errors.
pub async fn update_committee(
    db: &Database,
    id: &str,
    input: CommitteeInput,
) -> Result<CommitteeMemberRecord, ContentError> {
    let id = ResourceGuard::verify(id, COMMITTEE_MEMBER).map_err(not_found)?;
    let full_name = required(&input.full_name, "Member name is required")?;

    let mut response = db
        .query(
            "UPDATE type::record($id) SET
                full_name = $full_name,
                affiliation = $affiliation,
                country = $country,
                photo_url = $photo_url,
                short_bio = $short_bio,
                website_url = $website_url,
                is_active = $is_active",
        )
        .bind(("id", id.clone()))
        .bind(("full_name", full_name))
        .bind(("affiliation", input.affiliation))
        .bind(("country", input.country))
        .bind(("photo_url", input.photo_url))
        .bind(("short_bio", input.short_bio))
        .bind(("website_url", input.website_url))
        .bind(("is_active", input.is_active))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response
        .take::<Option<CommitteeMemberRecord>>(0)
        .map_err(db_error)?
        .ok_or(ContentError::NotFound { message: id.into(), context: None })
}

/// Deletes a committee member.
///
/// # Errors
/// Fails when the member does not exist or a query errors.
pub async fn delete_committee(db: &Database, id: &str) -> Result<(), ContentError> {
    let id = ResourceGuard::verify(id, COMMITTEE_MEMBER).map_err(not_found)?;

    let mut response = db
        .query("DELETE type::record($id) RETURN BEFORE")
        .bind(("id", id.clone()))
        .await
        .map_err(db_error)?;
    let deleted = response.take::<Option<CommitteeMemberRecord>>(0).map_err(db_error)?;

    if deleted.is_none() {
        return Err(ContentError::NotFound { message: id.into(), context: None });
    }
    Ok(())
}

async fn fetch_about(db: &Database, key: &str) -> Result<Option<AboutPageRecord>, ContentError> {
    let mut response = db
        .query("SELECT * FROM about_page WHERE page_key = $page_key LIMIT 1")
        .bind(("page_key", key.to_owned()))
        .await
        .map_err(db_error)?;
    response.take::<Option<AboutPageRecord>>(0).map_err(db_error)
}

async fn record_exists(db: &Database, id: &str) -> Result<bool, ContentError> {
    let mut response = db
        .query("SELECT VALUE id FROM type::record($id)")
        .bind(("id", id.to_owned()))
        .await
        .map_err(db_error)?;
    let found = response.take::<Option<RecordId>>(0).map_err(db_error)?;
    Ok(found.is_some())
}

async fn next_order(db: &Database, query: &str) -> Result<i64, ContentError> {
    let mut response = db.query(query).await.map_err(db_error)?;
    let orders = response.take::<Vec<i64>>(0).map_err(db_error)?;
    Ok(orders.into_iter().max().unwrap_or(0) + 1)
}

async fn set_order(db: &Database, id: &str, order: i64) -> Result<(), ContentError> {
    let mut response = db
        .query("UPDATE type::record($id) SET display_order = $display_order")
        .bind(("id", id.to_owned()))
        .bind(("display_order", order))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;
    let updated = response.take::<Option<NavigationItemRecord>>(0).map_err(db_error)?;

    if updated.is_none() {
        return Err(ContentError::NotFound { message: id.to_owned().into(), context: None });
    }
    Ok(())
}

fn normalize_key(page_key: &str) -> Result<String, ContentError> {
    let key = page_key.trim().to_lowercase();
    if key.is_empty() {
        return Err(ContentError::Validation {
            message: "A page key is required".into(),
            context: None,
        });
    }
    Ok(key)
}

fn required(value: &str, message: &'static str) -> Result<String, ContentError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ContentError::Validation { message: message.into(), context: None });
    }
    Ok(value.to_owned())
}

fn to_order(position: usize) -> Result<i64, ContentError> {
    i64::try_from(position + 1).map_err(|_| ContentError::Validation {
        message: "Too many entries to reorder".into(),
        context: None,
    })
}

fn not_found(err: impl std::fmt::Display) -> ContentError {
    ContentError::NotFound { message: err.to_string().into(), context: None }
}

fn db_error(err: impl std::fmt::Display) -> ContentError {
    ContentError::Database { message: err.to_string().into(), context: None }
}

fn is_index_conflict(err: &ContentError) -> bool {
    matches!(err, ContentError::Database { message, .. } if message.contains("index"))
}
