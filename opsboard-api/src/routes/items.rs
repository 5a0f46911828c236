/// Team-scoped item endpoints
///
/// Every route here resolves the active team from the `X-Current-Team-ID`
/// header before touching any item row. Clients must send the header on
/// each request; there is no fallback team.
///
/// # Endpoints
///
/// - `POST /v1/items` - Create an item in the active team
/// - `GET /v1/items` - List accessible items (paginated)
/// - `GET /v1/items/:id` - Get a single item
/// - `PATCH /v1/items/:id` - Update title/description
/// - `DELETE /v1/items/:id` - Delete an item
///
/// # Access Rules
///
/// Non-superusers see only items they own within the active team. Owner
/// and team are fixed at creation; updates cannot move an item between
/// teams or reassign it. Lookups are scoped to the active team first, so
/// an item outside the team yields 404 rather than leaking that it exists.

use crate::{
    app::AppState,
    context::{resolve_team_context, CurrentUser},
    error::{ApiError, ApiResult},
    routes::double_option,
};
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use opsboard_shared::{
    auth::authorization::{check_item_access, ItemAction},
    models::item::{CreateItem, Item, UpdateItem},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Public view of an item record
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub team_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            owner_id: item.owner_id,
            team_id: item.team_id,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Create item request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Update item request
///
/// Absent fields are left unchanged. `description` may be set to null to
/// clear it. Owner and team are never updatable.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<Option<String>>,
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct Pagination {
    /// Number of rows to skip
    #[serde(default)]
    pub offset: i64,

    /// Maximum rows to return
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// Paginated item list response
#[derive(Debug, Serialize)]
pub struct ItemListResponse {
    pub data: Vec<ItemResponse>,
    pub count: i64,
}

/// Create an item in the active team
///
/// The authenticated user becomes the owner; the team comes from the
/// request's team context.
///
/// # Endpoint
///
/// ```text
/// POST /v1/items
/// Authorization: Bearer <access_token>
/// X-Current-Team-ID: <team_uuid>
/// Content-Type: application/json
///
/// { "title": "Rotate staging credentials", "description": "before Friday" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or malformed team header
/// - `403 Forbidden`: Not a member of the team
/// - `404 Not Found`: Unknown team
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_item(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    Json(req): Json<CreateItemRequest>,
) -> ApiResult<Json<ItemResponse>> {
    req.validate()?;

    let team = resolve_team_context(&state.db, &current.0, &headers).await?;

    let item = Item::create(
        &state.db,
        CreateItem {
            title: req.title,
            description: req.description,
        },
        current.0.id,
        team.id,
    )
    .await?;

    Ok(Json(ItemResponse::from(item)))
}

/// List items accessible to the current user
///
/// Non-superusers get only their own items within the active team.
/// Superusers get every item in the system, still subject to carrying a
/// valid team context.
///
/// # Endpoint
///
/// ```text
/// GET /v1/items?offset=0&limit=100
/// Authorization: Bearer <access_token>
/// X-Current-Team-ID: <team_uuid>
/// ```
pub async fn list_items(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<ItemListResponse>> {
    let team = resolve_team_context(&state.db, &current.0, &headers).await?;

    let limit = page.limit.clamp(1, 500);
    let offset = page.offset.max(0);

    let (items, count) = if current.0.is_superuser {
        let items = Item::list_all(&state.db, limit, offset).await?;
        let count = Item::count_all(&state.db).await?;
        (items, count)
    } else {
        let items =
            Item::list_by_owner_and_team(&state.db, current.0.id, team.id, limit, offset).await?;
        let count = Item::count_by_owner_and_team(&state.db, current.0.id, team.id).await?;
        (items, count)
    };

    Ok(Json(ItemListResponse {
        data: items.into_iter().map(ItemResponse::from).collect(),
        count,
    }))
}

/// Get a single item
///
/// The lookup is scoped to the active team, so requesting an item that
/// lives in another team returns 404 before any ownership check runs.
///
/// # Endpoint
///
/// ```text
/// GET /v1/items/:id
/// Authorization: Bearer <access_token>
/// X-Current-Team-ID: <team_uuid>
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Item exists in the team but is owned by someone else
/// - `404 Not Found`: No such item in the active team
pub async fn get_item(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
) -> ApiResult<Json<ItemResponse>> {
    let team = resolve_team_context(&state.db, &current.0, &headers).await?;

    let item = Item::find_by_team(&state.db, team.id, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    check_item_access(&current.0, &item, &team, ItemAction::Read)?;

    Ok(Json(ItemResponse::from(item)))
}

/// Update an item's title or description
///
/// # Endpoint
///
/// ```text
/// PATCH /v1/items/:id
/// Authorization: Bearer <access_token>
/// X-Current-Team-ID: <team_uuid>
/// Content-Type: application/json
///
/// { "title": "New title", "description": null }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Item is owned by someone else
/// - `404 Not Found`: No such item in the active team
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_item(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
    Json(req): Json<UpdateItemRequest>,
) -> ApiResult<Json<ItemResponse>> {
    req.validate()?;

    let team = resolve_team_context(&state.db, &current.0, &headers).await?;

    let item = Item::find_by_team(&state.db, team.id, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    check_item_access(&current.0, &item, &team, ItemAction::Update)?;

    let updated = Item::update(
        &state.db,
        item.id,
        UpdateItem {
            title: req.title,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(Json(ItemResponse::from(updated)))
}

/// Delete an item
///
/// # Endpoint
///
/// ```text
/// DELETE /v1/items/:id
/// Authorization: Bearer <access_token>
/// X-Current-Team-ID: <team_uuid>
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Item is owned by someone else
/// - `404 Not Found`: No such item in the active team
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let team = resolve_team_context(&state.db, &current.0, &headers).await?;

    let item = Item::find_by_team(&state.db, team.id, item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    check_item_access(&current.0, &item, &team, ItemAction::Delete)?;

    Item::delete(&state.db, item.id).await?;

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
