//! Host item endpoints.
//!
//! These handlers only honour `enableUserData`; whether it was forced off is
//! decided by the Disable UserData layer in front of them.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::debug;
use userdata_core::{ItemQuery, QueryParams};
use userdata_model::{CatalogItem, ItemDto, ItemId, ItemKind, QueryResult, UserId};

use crate::{
    errors::{AppError, AppResult},
    handlers::HostQuery,
    infra::app_state::AppState,
    middleware::ENABLE_USER_DATA,
};

/// Listing arguments shared by every item endpoint.
#[derive(Debug, Clone)]
struct ItemRequest {
    user: Option<UserId>,
    enable_user_data: bool,
    query: ItemQuery,
}

impl ItemRequest {
    fn parse(path_user: Option<&str>, params: &QueryParams) -> AppResult<Self> {
        let user = match path_user.or_else(|| params.first("userId")) {
            Some(raw) => Some(UserId::parse(raw)?),
            None => None,
        };

        let parent_id = params.first("parentId").map(ItemId::parse).transpose()?;

        let query = ItemQuery {
            parent_id,
            include_item_types: parse_kinds(params, "includeItemTypes"),
            exclude_item_types: parse_kinds(params, "excludeItemTypes"),
            recursive: params.parse_bool("recursive").unwrap_or(false),
            start_index: params.parse_first("startIndex").unwrap_or(0),
            limit: params.parse_first("limit"),
        };

        Ok(Self {
            user,
            enable_user_data: params.parse_bool(ENABLE_USER_DATA).unwrap_or(true),
            query,
        })
    }

    fn require_user(&self) -> AppResult<UserId> {
        self.user
            .ok_or_else(|| AppError::bad_request("userId is required"))
    }
}

/// Item types named by `name`. Types this host does not model are skipped.
fn parse_kinds(params: &QueryParams, name: &str) -> Vec<ItemKind> {
    params
        .split_values(name)
        .filter_map(|raw| match raw.parse::<ItemKind>() {
            Ok(kind) => Some(kind),
            Err(err) => {
                debug!(parameter = name, error = %err, "ignoring item type");
                None
            }
        })
        .collect()
}

fn to_dtos(
    state: &AppState,
    request: &ItemRequest,
    items: &[CatalogItem],
) -> Vec<ItemDto> {
    let user = request.user.filter(|_| request.enable_user_data);
    items
        .iter()
        .map(|item| {
            let user_data = user.map(|user| {
                state.catalog.user_data(user, item.id).unwrap_or_default()
            });
            ItemDto::from_item(item, user_data)
        })
        .collect()
}

async fn list_items(
    state: AppState,
    path_user: Option<String>,
    params: QueryParams,
) -> AppResult<Json<QueryResult<ItemDto>>> {
    let request = ItemRequest::parse(path_user.as_deref(), &params)?;
    let items = state.catalog.query(&request.query);
    debug!(
        count = items.len(),
        enable_user_data = request.enable_user_data,
        "listing items"
    );
    Ok(Json(QueryResult::new(to_dtos(&state, &request, &items))))
}

async fn list_resume(
    state: AppState,
    path_user: Option<String>,
    params: QueryParams,
) -> AppResult<Json<QueryResult<ItemDto>>> {
    let request = ItemRequest::parse(path_user.as_deref(), &params)?;
    let user = request.require_user()?;
    let items = state.catalog.resume_items(user, &request.query);
    Ok(Json(QueryResult::new(to_dtos(&state, &request, &items))))
}

async fn list_latest(
    state: AppState,
    path_user: Option<String>,
    params: QueryParams,
) -> AppResult<Json<Vec<ItemDto>>> {
    let request = ItemRequest::parse(path_user.as_deref(), &params)?;
    let items = state.catalog.latest_items(&request.query);
    Ok(Json(to_dtos(&state, &request, &items)))
}

/// `GET /Items`
pub async fn get_items_handler(
    State(state): State<AppState>,
    HostQuery(params): HostQuery,
) -> AppResult<Json<QueryResult<ItemDto>>> {
    list_items(state, None, params).await
}

/// `GET /Users/{userId}/Items`
pub async fn get_user_items_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    HostQuery(params): HostQuery,
) -> AppResult<Json<QueryResult<ItemDto>>> {
    list_items(state, Some(user_id), params).await
}

/// `GET /UserItems/Resume`
pub async fn get_resume_items_handler(
    State(state): State<AppState>,
    HostQuery(params): HostQuery,
) -> AppResult<Json<QueryResult<ItemDto>>> {
    list_resume(state, None, params).await
}

/// `GET /Users/{userId}/Items/Resume`
pub async fn get_user_resume_items_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    HostQuery(params): HostQuery,
) -> AppResult<Json<QueryResult<ItemDto>>> {
    list_resume(state, Some(user_id), params).await
}

/// `GET /Shows/NextUp`
pub async fn get_next_up_handler(
    State(state): State<AppState>,
    HostQuery(params): HostQuery,
) -> AppResult<Json<QueryResult<ItemDto>>> {
    let request = ItemRequest::parse(None, &params)?;
    let user = request.require_user()?;
    let series_id = params.first("seriesId").map(ItemId::parse).transpose()?;

    let items = state.catalog.next_up(user, series_id, request.query.limit);
    Ok(Json(QueryResult::new(to_dtos(&state, &request, &items))))
}

/// `GET /Items/Latest`
pub async fn get_latest_items_handler(
    State(state): State<AppState>,
    HostQuery(params): HostQuery,
) -> AppResult<Json<Vec<ItemDto>>> {
    list_latest(state, None, params).await
}

/// `GET /Users/{userId}/Items/Latest`
pub async fn get_user_latest_items_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    HostQuery(params): HostQuery,
) -> AppResult<Json<Vec<ItemDto>>> {
    list_latest(state, Some(user_id), params).await
}
