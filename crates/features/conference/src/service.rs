use crate::error::ConferenceError;
use crate::model::{ConferenceRecord, TrackRecord};
use crate::slug::{generate_slug, resolve_conflict};
use cmt_database::Database;
use cmt_domain::constants::{CONFERENCE, TRACK, USER};
use cmt_kernel::safe_nanoid;
use cmt_kernel::security::resource::ResourceGuard;
use std::collections::HashSet;
use surrealdb::types::{RecordId, SurrealValue};
use tracing::{info, warn};

/// Writable conference fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct ConferenceInput {
    pub name: String,
    pub short_name: Option<String>,
    pub acronym: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub submission_deadline: Option<String>,
    pub is_active: bool,
}

/// Writable track fields.
#[derive(Debug, Clone)]
pub struct TrackInput {
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, SurrealValue)]
struct SlugRow {
    id: RecordId,
    slug: String,
}

/// Resolves a unique slug against the conference table.
///
/// `exclude_id` lets a conference keep its own current slug on update.
///
/// # Errors
/// Fails when the lookup query errors.
pub async fn ensure_unique_slug(
    db: &Database,
    base: &str,
    exclude_id: Option<&str>,
) -> Result<String, ConferenceError> {
    let mut response = db
        .query("SELECT id, slug FROM conference WHERE slug != NONE AND string::starts_with(slug, $base)")
        .bind(("base", base.to_owned()))
        .await
        .map_err(db_error)?;
    let rows = response.take::<Vec<SlugRow>>(0).map_err(db_error)?;

    let taken: HashSet<String> = rows
        .into_iter()
        .filter(|row| exclude_id.is_none_or(|own| row.id.to_string() != own))
        .map(|row| row.slug)
        .collect();

    Ok(resolve_conflict(base, |candidate| taken.contains(candidate)))
}

/// Creates a conference, deriving its slug from the acronym.
///
/// On a slug index collision the slug is recomputed and the insert retried
/// once before giving up.
///
/// # Errors
/// Fails on invalid payloads, unresolvable slug conflicts, or query errors.
pub async fn create_conference(
    db: &Database,
    created_by: &str,
    input: ConferenceInput,
) -> Result<ConferenceRecord, ConferenceError> {
    validate_conference(&input)?;
    let created_by = ResourceGuard::verify(created_by, USER).map_err(validation)?;

    let base = generate_slug(input.acronym.as_deref());
    let slug = if base.is_empty() { None } else { Some(ensure_unique_slug(db, &base, None).await?) };

    let id = format!("{CONFERENCE}:{}", safe_nanoid!());
    match insert_conference(db, &id, &created_by, &input, slug).await {
        Ok(record) => Ok(record),
        Err(err) if is_index_conflict(&err) && !base.is_empty() => {
            warn!(slug = %base, "slug raced, recomputing");
            let slug = Some(ensure_unique_slug(db, &base, None).await?);
            insert_conference(db, &id, &created_by, &input, slug).await.map_err(|retry| {
                if is_index_conflict(&retry) {
                    ConferenceError::SlugConflict { message: base.into(), context: None }
                } else {
                    retry
                }
            })
        },
        Err(err) => Err(err),
    }
}

async fn insert_conference(
    db: &Database,
    id: &str,
    created_by: &str,
    input: &ConferenceInput,
    slug: Option<String>,
) -> Result<ConferenceRecord, ConferenceError> {
    let mut response = db
        .query(
            "CREATE type::record($id) CONTENT {
                name: $name,
                short_name: $short_name,
                acronym: $acronym,
                description: $description,
                logo_url: $logo_url,
                slug: $slug,
                start_date: $start_date,
                end_date: $end_date,
                submission_deadline: $submission_deadline,
                is_active: $is_active,
                created_by: type::record($created_by),
                created_at: time::now(),
            }",
        )
        .bind(("id", id.to_owned()))
        .bind(("name", input.name.trim().to_owned()))
        .bind(("short_name", input.short_name.clone()))
        .bind(("acronym", input.acronym.clone()))
        .bind(("description", input.description.clone()))
        .bind(("logo_url", input.logo_url.clone()))
        .bind(("slug", slug))
        .bind(("start_date", input.start_date.clone()))
        .bind(("end_date", input.end_date.clone()))
        .bind(("submission_deadline", input.submission_deadline.clone()))
        .bind(("is_active", input.is_active))
        .bind(("created_by", created_by.to_owned()))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response.take::<Option<ConferenceRecord>>(0).map_err(db_error)?.ok_or_else(|| {
        ConferenceError::Internal { message: "CREATE returned no conference row".into(), context: None }
    })
}

/// Lists every conference, backfilling slugs for legacy rows that miss one.
///
/// # Errors
/// Fails when a query errors.
pub async fn list_conferences(db: &Database) -> Result<Vec<ConferenceRecord>, ConferenceError> {
    let mut response =
        db.query("SELECT * FROM conference ORDER BY name").await.map_err(db_error)?;
    let mut conferences = response.take::<Vec<ConferenceRecord>>(0).map_err(db_error)?;

    for conference in &mut conferences {
        if conference.slug.is_some() {
            continue;
        }
        let base = generate_slug(conference.acronym.as_deref());
        if base.is_empty() {
            continue;
        }

        let own_id = conference.id.to_string();
        let slug = ensure_unique_slug(db, &base, Some(&own_id)).await?;
        db.query("UPDATE type::record($id) SET slug = $slug")
            .bind(("id", own_id.clone()))
            .bind(("slug", slug.clone()))
            .await
            .map_err(db_error)?
            .check()
            .map_err(surrealdb::Error::from)
            .map_err(db_error)?;

        info!(conference = %own_id, slug = %slug, "backfilled missing slug");
        conference.slug = Some(slug);
    }

    Ok(conferences)
}

/// Fetches a conference by record id, `None` when it does not exist.
///
/// # Errors
/// Fails when the id belongs to a different table or the query errors.
pub async fn get_conference(
    db: &Database,
    id: &str,
) -> Result<Option<ConferenceRecord>, ConferenceError> {
    let id = ResourceGuard::verify(id, CONFERENCE).map_err(not_found)?;

    let mut response = db
        .query("SELECT * FROM type::record($id)")
        .bind(("id", id))
        .await
        .map_err(db_error)?;
    response.take::<Option<ConferenceRecord>>(0).map_err(db_error)
}

/// Fetches a conference by slug, `None` when no conference carries it.
///
/// # Errors
/// Fails when the query errors.
pub async fn get_conference_by_slug(
    db: &Database,
    slug: &str,
) -> Result<Option<ConferenceRecord>, ConferenceError> {
    let mut response = db
        .query("SELECT * FROM conference WHERE slug = $slug LIMIT 1")
        .bind(("slug", slug.to_owned()))
        .await
        .map_err(db_error)?;
    response.take::<Option<ConferenceRecord>>(0).map_err(db_error)
}

/// Updates a conference, recomputing the slug only when the acronym changed.
///
/// # Errors
/// Fails when the conference does not exist, the payload is invalid, or a
/// query errors.
pub async fn update_conference(
    db: &Database,
    id: &str,
    input: ConferenceInput,
) -> Result<ConferenceRecord, ConferenceError> {
    validate_conference(&input)?;

    let existing = get_conference(db, id)
        .await?
        .ok_or_else(|| not_found_by_id(id))?;
    let own_id = existing.id.to_string();

    let slug = if input.acronym == existing.acronym {
        existing.slug
    } else {
        let base = generate_slug(input.acronym.as_deref());
        if base.is_empty() { None } else { Some(ensure_unique_slug(db, &base, Some(&own_id)).await?) }
    };

    let mut response = db
        .query(
            "UPDATE type::record($id) SET
                name = $name,
                short_name = $short_name,
                acronym = $acronym,
                description = $description,
                logo_url = $logo_url,
                slug = $slug,
                start_date = $start_date,
                end_date = $end_date,
                submission_deadline = $submission_deadline,
                is_active = $is_active",
        )
        .bind(("id", own_id))
        .bind(("name", input.name.trim().to_owned()))
        .bind(("short_name", input.short_name))
        .bind(("acronym", input.acronym))
        .bind(("description", input.description))
        .bind(("logo_url", input.logo_url))
        .bind(("slug", slug))
        .bind(("start_date", input.start_date))
        .bind(("end_date", input.end_date))
        .bind(("submission_deadline", input.submission_deadline))
        .bind(("is_active", input.is_active))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response
        .take::<Option<ConferenceRecord>>(0)
        .map_err(db_error)?
        .ok_or_else(|| not_found_by_id(id))
}

/// Deletes a conference along with its tracks.
///
/// # Errors
/// Fails when the conference does not exist or a query errors.
pub async fn delete_conference(db: &Database, id: &str) -> Result<(), ConferenceError> {
    let existing = get_conference(db, id).await?.ok_or_else(|| not_found_by_id(id))?;
    let own_id = existing.id.to_string();

    db.query("DELETE track WHERE conference = type::record($id); DELETE type::record($id)")
        .bind(("id", own_id.clone()))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    info!(conference = %own_id, "conference deleted");
    Ok(())
}

/// Lists the tracks of a conference ordered by name.
///
/// # Errors
/// Fails when the id belongs to a different table or the query errors.
pub async fn list_tracks(
    db: &Database,
    conference_id: &str,
) -> Result<Vec<TrackRecord>, ConferenceError> {
    let conference_id = ResourceGuard::verify(conference_id, CONFERENCE).map_err(not_found)?;

    let mut response = db
        .query("SELECT * FROM track WHERE conference = type::record($conference) ORDER BY name")
        .bind(("conference", conference_id))
        .await
        .map_err(db_error)?;
    response.take::<Vec<TrackRecord>>(0).map_err(db_error)
}

/// Creates a track under an existing conference.
///
/// # Errors
/// Fails when the conference does not exist, the payload is invalid, or a
/// query errors.
pub async fn create_track(
    db: &Database,
    conference_id: &str,
    input: TrackInput,
) -> Result<TrackRecord, ConferenceError> {
    validate_track(&input)?;
    let conference = get_conference(db, conference_id)
        .await?
        .ok_or_else(|| not_found_by_id(conference_id))?;

    let id = format!("{TRACK}:{}", safe_nanoid!());
    let mut response = db
        .query(
            "CREATE type::record($id) CONTENT {
                conference: type::record($conference),
                name: $name,
                description: $description,
                is_active: $is_active,
                created_at: time::now(),
            }",
        )
        .bind(("id", id))
        .bind(("conference", conference.id.to_string()))
        .bind(("name", input.name.trim().to_owned()))
        .bind(("description", input.description))
        .bind(("is_active", input.is_active))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response.take::<Option<TrackRecord>>(0).map_err(db_error)?.ok_or_else(|| {
        ConferenceError::Internal { message: "CREATE returned no track row".into(), context: None }
    })
}

/// Updates a track.
///
/// # Errors
/// Fails when the track does not exist, the payload is invalid, or a query
/// errors.
pub async fn update_track(
    db: &Database,
    track_id: &str,
    input: TrackInput,
) -> Result<TrackRecord, ConferenceError> {
    validate_track(&input)?;
    let track_id = ResourceGuard::verify(track_id, TRACK).map_err(not_found)?;

    let mut response = db
        .query(
            "UPDATE type::record($id) SET
                name = $name,
                description = $description,
                is_active = $is_active",
        )
        .bind(("id", track_id.clone()))
        .bind(("name", input.name.trim().to_owned()))
        .bind(("description", input.description))
        .bind(("is_active", input.is_active))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response
        .take::<Option<TrackRecord>>(0)
        .map_err(db_error)?
        .ok_or(ConferenceError::NotFound { message: track_id.into(), context: None })
}

/// Deletes a track.
///
/// # Errors
/// Fails when the track does not exist or a query errors.
pub async fn delete_track(db: &Database, track_id: &str) -> Result<(), ConferenceError> {
    let track_id = ResourceGuard::verify(track_id, TRACK).map_err(not_found)?;

    let mut response = db
        .query("DELETE type::record($id) RETURN BEFORE")
        .bind(("id", track_id.clone()))
        .await
        .map_err(db_error)?;
    let deleted = response.take::<Option<TrackRecord>>(0).map_err(db_error)?;

    if deleted.is_none() {
        return Err(ConferenceError::NotFound { message: track_id.into(), context: None });
    }
    Ok(())
}

fn validate_conference(input: &ConferenceInput) -> Result<(), ConferenceError> {
    if input.name.trim().is_empty() {
        return Err(ConferenceError::Validation {
            message: "Conference name is required".into(),
            context: None,
        });
    }
    Ok(())
}

fn validate_track(input: &TrackInput) -> Result<(), ConferenceError> {
    if input.name.trim().is_empty() {
        return Err(ConferenceError::Validation {
            message: "Track name is required".into(),
            context: None,
        });
    }
    Ok(())
}

fn validation(err: impl std::fmt::Display) -> ConferenceError {
    ConferenceError::Validation { message: err.to_string().into(), context: None }
}

fn not_found(err: impl std::fmt::Display) -> ConferenceError {
    ConferenceError::NotFound { message: err.to_string().into(), context: None }
}

fn not_found_by_id(id: &str) -> ConferenceError {
    ConferenceError::NotFound { message: id.to_owned().into(), context: None }
}

fn db_error(err: impl std::fmt::Display) -> ConferenceError {
    ConferenceError::Database { message: err.to_string().into(), context: None }
}

fn is_index_conflict(err: &ConferenceError) -> bool {
    matches!(err, ConferenceError::Database { message, .. } if message.contains("index"))
}
