use crate::model::{
    AboutPageRecord, CommitteeMemberRecord, HeroContentRecord, NavigationItemRecord,
    PageBlockRecord,
};
use crate::service::{
    self, AboutInput, CommitteeInput, HeroInput, NavigationInput, PageBlockInput,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use cmt_derive::{api_handler, api_model};
use cmt_domain::constants::CONTENT_TAG;
use cmt_identity::RequireChair;
use cmt_kernel::server::{ApiError, ApiState};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_model]
/// Hero banner payload
pub struct HeroRequest {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
}

#[api_model]
/// About page payload, keyed by the path
pub struct AboutRequest {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub link_text: Option<String>,
}

#[api_model]
/// Menu entry payload
pub struct NavigationRequest {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Parent entry record id for dropdown children
    #[serde(default)]
    pub parent: Option<String>,
}

#[api_model]
/// Layout block payload, keyed by the path
pub struct PageBlockRequest {
    pub block_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub link_text: Option<String>,
    #[serde(default)]
    pub css_class: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[api_model]
/// Committee member payload
pub struct CommitteeRequest {
    pub full_name: String,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub short_bio: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[api_model]
/// Ordered id list for reordering
pub struct ReorderRequest {
    /// Record ids in the desired display order
    pub ids: Vec<String>,
}

#[api_model]
/// Public view of the hero banner
pub struct HeroResponse {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub last_updated: String,
}

#[api_model]
/// Public view of an about page
pub struct AboutResponse {
    pub id: String,
    pub page_key: String,
    pub title: String,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
}

#[api_model]
/// Public view of a menu entry
pub struct NavigationResponse {
    pub id: String,
    pub label: String,
    pub url: String,
    pub icon: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
    pub parent: Option<String>,
}

#[api_model]
/// Public view of a layout block
pub struct PageBlockResponse {
    pub id: String,
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

#[api_model]
/// Public view of a committee member
pub struct CommitteeResponse {
    pub id: String,
    pub conference: String,
    pub full_name: String,
    pub affiliation: Option<String>,
    pub country: Option<String>,
    pub photo_url: Option<String>,
    pub short_bio: Option<String>,
    pub website_url: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

impl From<HeroContentRecord> for HeroResponse {
    fn from(record: HeroContentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title,
            subtitle: record.subtitle,
            last_updated: record.last_updated.to_string(),
        }
    }
}

impl From<AboutPageRecord> for AboutResponse {
    fn from(record: AboutPageRecord) -> Self {
        Self {
            id: record.id.to_string(),
            page_key: record.page_key,
            title: record.title,
            body: record.body,
            image_url: record.image_url,
            link_url: record.link_url,
            link_text: record.link_text,
        }
    }
}

impl From<NavigationItemRecord> for NavigationResponse {
    fn from(record: NavigationItemRecord) -> Self {
        Self {
            id: record.id.to_string(),
            label: record.label,
            url: record.url,
            icon: record.icon,
            display_order: record.display_order,
            is_active: record.is_active,
            parent: record.parent.map(|p| p.to_string()),
        }
    }
}

impl From<PageBlockRecord> for PageBlockResponse {
    fn from(record: PageBlockRecord) -> Self {
        Self {
            id: record.id.to_string(),
            page_key: record.page_key,
            block_type: record.block_type,
            display_order: record.display_order,
            title: record.title,
            body: record.body,
            image_url: record.image_url,
            link_url: record.link_url,
            link_text: record.link_text,
            css_class: record.css_class,
            is_active: record.is_active,
        }
    }
}

impl From<CommitteeMemberRecord> for CommitteeResponse {
    fn from(record: CommitteeMemberRecord) -> Self {
        Self {
            id: record.id.to_string(),
            conference: record.conference.to_string(),
            full_name: record.full_name,
            affiliation: record.affiliation,
            country: record.country,
            photo_url: record.photo_url,
            short_bio: record.short_bio,
            website_url: record.website_url,
            display_order: record.display_order,
            is_active: record.is_active,
        }
    }
}

#[api_handler(
    get,
    path = "/content/hero",
    responses(
        (status = OK, description = "The current hero banner", body = HeroResponse),
        (status = NOT_FOUND, description = "No banner published yet"),
    ),
    tag = CONTENT_TAG,
)]
async fn get_hero_handler(State(state): State<ApiState>) -> Result<Json<HeroResponse>, ApiError> {
    let hero = service::get_hero(&state.database)
        .await?
        .ok_or_else(|| ApiError::not_found("No hero banner published"))?;
    Ok(Json(HeroResponse::from(hero)))
}

#[api_handler(
    put,
    path = "/content/hero",
    request_body = HeroRequest,
    responses(
        (status = OK, description = "Banner published, chairs only", body = HeroResponse),
        (status = FORBIDDEN, description = "Chair role required"),
    ),
    tag = CONTENT_TAG,
)]
async fn put_hero_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Json(payload): Json<HeroRequest>,
) -> Result<Json<HeroResponse>, ApiError> {
    let input = HeroInput { title: payload.title, subtitle: payload.subtitle };
    let hero = service::put_hero(&state.database, input).await?;
    Ok(Json(HeroResponse::from(hero)))
}

#[api_handler(
    get,
    path = "/content/about",
    responses((status = OK, description = "All about pages", body = [AboutResponse])),
    tag = CONTENT_TAG,
)]
async fn list_about_handler(
    State(state): State<ApiState>,
) -> Result<Json<Vec<AboutResponse>>, ApiError> {
    let pages = service::list_about(&state.database).await?;
    Ok(Json(pages.into_iter().map(AboutResponse::from).collect()))
}

#[api_handler(
    get,
    path = "/content/about/{key}",
    params(("key" = String, Path, description = "Page key")),
    responses(
        (status = OK, description = "The about page", body = AboutResponse),
        (status = NOT_FOUND, description = "No page behind the key"),
    ),
    tag = CONTENT_TAG,
)]
async fn get_about_handler(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<Json<AboutResponse>, ApiError> {
    let page = service::get_about(&state.database, &key).await?;
    Ok(Json(AboutResponse::from(page)))
}

#[api_handler(
    put,
    path = "/content/about/{key}",
    request_body = AboutRequest,
    params(("key" = String, Path, description = "Page key")),
    responses(
        (status = OK, description = "Page created or replaced, chairs only", body = AboutResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid payload"),
    ),
    tag = CONTENT_TAG,
)]
async fn upsert_about_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(key): Path<String>,
    Json(payload): Json<AboutRequest>,
) -> Result<Json<AboutResponse>, ApiError> {
    let input = AboutInput {
        title: payload.title,
        body: payload.body,
        image_url: payload.image_url,
        link_url: payload.link_url,
        link_text: payload.link_text,
    };
    let page = service::upsert_about(&state.database, &key, input).await?;
    Ok(Json(AboutResponse::from(page)))
}

#[api_handler(
    delete,
    path = "/content/about/{key}",
    params(("key" = String, Path, description = "Page key")),
    responses(
        (status = NO_CONTENT, description = "Page deleted, chairs only"),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No page behind the key"),
    ),
    tag = CONTENT_TAG,
)]
async fn delete_about_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    service::delete_about(&state.database, &key).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[api_handler(
    get,
    path = "/content/navigation",
    responses((status = OK, description = "Menu entries in display order", body = [NavigationResponse])),
    tag = CONTENT_TAG,
)]
async fn list_navigation_handler(
    State(state): State<ApiState>,
) -> Result<Json<Vec<NavigationResponse>>, ApiError> {
    let items = service::list_navigation(&state.database).await?;
    Ok(Json(items.into_iter().map(NavigationResponse::from).collect()))
}

#[api_handler(
    post,
    path = "/content/navigation",
    request_body = NavigationRequest,
    responses(
        (status = CREATED, description = "Entry appended, chairs only", body = NavigationResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such parent entry"),
    ),
    tag = CONTENT_TAG,
)]
async fn create_navigation_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Json(payload): Json<NavigationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let item = service::create_navigation(&state.database, navigation_input(payload)).await?;
    Ok((StatusCode::CREATED, Json(NavigationResponse::from(item))))
}

#[api_handler(
    put,
    path = "/content/navigation/{id}",
    request_body = NavigationRequest,
    params(("id" = String, Path, description = "Menu entry record id")),
    responses(
        (status = OK, description = "Entry updated, chairs only", body = NavigationResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such entry"),
    ),
    tag = CONTENT_TAG,
)]
async fn update_navigation_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
    Json(payload): Json<NavigationRequest>,
) -> Result<Json<NavigationResponse>, ApiError> {
    let item =
        service::update_navigation(&state.database, &id, navigation_input(payload)).await?;
    Ok(Json(NavigationResponse::from(item)))
}

#[api_handler(
    delete,
    path = "/content/navigation/{id}",
    params(("id" = String, Path, description = "Menu entry record id")),
    responses(
        (status = NO_CONTENT, description = "Entry deleted, children detached, chairs only"),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such entry"),
    ),
    tag = CONTENT_TAG,
)]
async fn delete_navigation_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service::delete_navigation(&state.database, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[api_handler(
    put,
    path = "/content/navigation/order",
    request_body = ReorderRequest,
    responses(
        (status = NO_CONTENT, description = "Menu reordered, chairs only"),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "An id does not exist"),
    ),
    tag = CONTENT_TAG,
)]
async fn reorder_navigation_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Json(payload): Json<ReorderRequest>,
) -> Result<StatusCode, ApiError> {
    service::reorder_navigation(&state.database, &payload.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[api_handler(
    get,
    path = "/content/pages/{key}/blocks",
    params(("key" = String, Path, description = "Page key")),
    responses((status = OK, description = "Blocks of the page in display order", body = [PageBlockResponse])),
    tag = CONTENT_TAG,
)]
async fn list_blocks_handler(
    State(state): State<ApiState>,
    Path(key): Path<String>,
) -> Result<Json<Vec<PageBlockResponse>>, ApiError> {
    let blocks = service::list_blocks(&state.database, &key).await?;
    Ok(Json(blocks.into_iter().map(PageBlockResponse::from).collect()))
}

#[api_handler(
    post,
    path = "/content/pages/{key}/blocks",
    request_body = PageBlockRequest,
    params(("key" = String, Path, description = "Page key")),
    responses(
        (status = CREATED, description = "Block appended, chairs only", body = PageBlockResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid payload"),
    ),
    tag = CONTENT_TAG,
)]
async fn create_block_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(key): Path<String>,
    Json(payload): Json<PageBlockRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let block = service::create_block(&state.database, &key, block_input(payload)).await?;
    Ok((StatusCode::CREATED, Json(PageBlockResponse::from(block))))
}

#[api_handler(
    put,
    path = "/content/blocks/{id}",
    request_body = PageBlockRequest,
    params(("id" = String, Path, description = "Block record id")),
    responses(
        (status = OK, description = "Block updated, chairs only", body = PageBlockResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such block"),
    ),
    tag = CONTENT_TAG,
)]
async fn update_block_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
    Json(payload): Json<PageBlockRequest>,
) -> Result<Json<PageBlockResponse>, ApiError> {
    let block = service::update_block(&state.database, &id, block_input(payload)).await?;
    Ok(Json(PageBlockResponse::from(block)))
}

#[api_handler(
    delete,
    path = "/content/blocks/{id}",
    params(("id" = String, Path, description = "Block record id")),
    responses(
        (status = NO_CONTENT, description = "Block deleted, chairs only"),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such block"),
    ),
    tag = CONTENT_TAG,
)]
async fn delete_block_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service::delete_block(&state.database, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[api_handler(
    put,
    path = "/content/pages/{key}/blocks/order",
    request_body = ReorderRequest,
    params(("key" = String, Path, description = "Page key")),
    responses(
        (status = NO_CONTENT, description = "Blocks reordered, chairs only"),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "An id does not exist on the page"),
    ),
    tag = CONTENT_TAG,
)]
async fn reorder_blocks_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(key): Path<String>,
    Json(payload): Json<ReorderRequest>,
) -> Result<StatusCode, ApiError> {
    service::reorder_blocks(&state.database, &key, &payload.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[api_handler(
    get,
    path = "/conferences/{id}/committee",
    params(("id" = String, Path, description = "Conference record id")),
    responses((status = OK, description = "Committee of the conference in display order", body = [CommitteeResponse])),
    tag = CONTENT_TAG,
)]
async fn list_committee_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CommitteeResponse>>, ApiError> {
    let members = service::list_committee(&state.database, &id).await?;
    Ok(Json(members.into_iter().map(CommitteeResponse::from).collect()))
}

#[api_handler(
    post,
    path = "/conferences/{id}/committee",
    request_body = CommitteeRequest,
    params(("id" = String, Path, description = "Conference record id")),
    responses(
        (status = CREATED, description = "Member appended, chairs only", body = CommitteeResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such conference"),
    ),
    tag = CONTENT_TAG,
)]
async fn create_committee_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
    Json(payload): Json<CommitteeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let member =
        service::create_committee(&state.database, &id, committee_input(payload)).await?;
    Ok((StatusCode::CREATED, Json(CommitteeResponse::from(member))))
}

#[api_handler(
    put,
    path = "/content/committee/{id}",
    request_body = CommitteeRequest,
    params(("id" = String, Path, description = "Committee member record id")),
    responses(
        (status = OK, description = "Member updated, chairs only", body = CommitteeResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such member"),
    ),
    tag = CONTENT_TAG,
)]
async fn update_committee_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
    Json(payload): Json<CommitteeRequest>,
) -> Result<Json<CommitteeResponse>, ApiError> {
    let member = service::update_committee(&state.database, &id, committee_input(payload)).await?;
    Ok(Json(CommitteeResponse::from(member)))
}

#[api_handler(
    delete,
    path = "/content/committee/{id}",
    params(("id" = String, Path, description = "Committee member record id")),
    responses(
        (status = NO_CONTENT, description = "Member deleted, chairs only"),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such member"),
    ),
    tag = CONTENT_TAG,
)]
async fn delete_committee_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service::delete_committee(&state.database, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn navigation_input(payload: NavigationRequest) -> NavigationInput {
    NavigationInput {
        label: payload.label,
        url: payload.url,
        icon: payload.icon,
        is_active: payload.is_active,
        parent: payload.parent,
    }
}

fn block_input(payload: PageBlockRequest) -> PageBlockInput {
    PageBlockInput {
        block_type: payload.block_type,
        title: payload.title,
        body: payload.body,
        image_url: payload.image_url,
        link_url: payload.link_url,
        link_text: payload.link_text,
        css_class: payload.css_class,
        is_active: payload.is_active,
    }
}

fn committee_input(payload: CommitteeRequest) -> CommitteeInput {
    CommitteeInput {
        full_name: payload.full_name,
        affiliation: payload.affiliation,
        country: payload.country,
        photo_url: payload.photo_url,
        short_bio: payload.short_bio,
        website_url: payload.website_url,
        is_active: payload.is_active,
    }
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(get_hero_handler))
        .routes(routes!(put_hero_handler))
        .routes(routes!(list_about_handler))
        .routes(routes!(get_about_handler))
        .routes(routes!(upsert_about_handler))
        .routes(routes!(delete_about_handler))
        .routes(routes!(list_navigation_handler))
        .routes(routes!(create_navigation_handler))
        .routes(routes!(update_navigation_handler))
        .routes(routes!(delete_navigation_handler))
        .routes(routes!(reorder_navigation_handler))
        .routes(routes!(list_blocks_handler))
        .routes(routes!(create_block_handler))
        .routes(routes!(update_block_handler))
        .routes(routes!(delete_block_handler))
        .routes(routes!(reorder_blocks_handler))
        .routes(routes!(list_committee_handler))
        .routes(routes!(create_committee_handler))
        .routes(routes!(update_committee_handler))
        .routes(routes!(delete_committee_handler))
}
