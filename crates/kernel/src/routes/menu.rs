//! Menu API routes.
//!
//! REST endpoints for reading the navigation tree and editing menu nodes.
//! Access control is applied by the gateway in front of the kernel.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::menu::{FlatEntry, MenuTreeNode, ReorderUpdate};
use crate::models::{CreateMenuNode, MenuNode, UpdateMenuNode};
use crate::state::AppState;

/// Create the menu router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/menu", get(get_tree))
        .route("/api/menu/flat", get(get_flat))
        .route("/api/menu/reorder", post(reorder))
        .route("/api/menu/item", post(create_node))
        .route(
            "/api/menu/item/{id}",
            get(get_node).put(update_node).delete(delete_node),
        )
        .route("/api/menu/item/{id}/breadcrumb", get(get_breadcrumb))
}

// -------------------------------------------------------------------------
// Request types
// -------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct TreeQuery {
    #[serde(default)]
    active_only: bool,
}

#[derive(Debug, Deserialize)]
struct ReorderRequest {
    updates: Vec<ReorderUpdate>,
}

// -------------------------------------------------------------------------
// Handlers
// -------------------------------------------------------------------------

async fn get_tree(
    State(state): State<AppState>,
    Query(query): Query<TreeQuery>,
) -> AppResult<Json<Vec<MenuTreeNode>>> {
    Ok(Json(state.menus().tree(query.active_only).await?))
}

async fn get_flat(
    State(state): State<AppState>,
    Query(query): Query<TreeQuery>,
) -> AppResult<Json<Vec<FlatEntry>>> {
    Ok(Json(state.menus().flat(query.active_only).await?))
}

async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MenuNode>> {
    Ok(Json(state.menus().get(id).await?))
}

async fn create_node(
    State(state): State<AppState>,
    Json(input): Json<CreateMenuNode>,
) -> AppResult<(StatusCode, Json<MenuNode>)> {
    let node = state.menus().create(input).await?;
    Ok((StatusCode::CREATED, Json(node)))
}

async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateMenuNode>,
) -> AppResult<Json<MenuNode>> {
    Ok(Json(state.menus().update(id, input).await?))
}

async fn delete_node(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.menus().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_breadcrumb(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<MenuNode>>> {
    Ok(Json(state.menus().breadcrumb(id).await?))
}

async fn reorder(
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> AppResult<StatusCode> {
    state.menus().reorder(&request.updates).await?;
    Ok(StatusCode::NO_CONTENT)
}
