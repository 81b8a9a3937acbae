//! HTTP handlers for inventory management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::cache::CacheScope;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::{AssignItemInput, CreateItemInput, InventoryService};
use crate::AppState;
use shared::models::{AssignmentView, InventoryAssignment, InventoryItem, InventoryMovement};

/// Create a catalogue item
pub async fn create_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<InventoryItem>> {
    let service = InventoryService::new(state.db);
    let item = service.create_item(input).await?;
    state
        .cache
        .invalidate(&[CacheScope::Inventory, CacheScope::Dashboard]);
    Ok(Json(item))
}

/// List catalogue items
pub async fn list_items(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = InventoryService::new(state.db);
    let items = service.list_items().await?;
    Ok(Json(items))
}

/// Assign an item instance to a unit
pub async fn assign_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AssignItemInput>,
) -> AppResult<Json<InventoryAssignment>> {
    let service = InventoryService::new(state.db);
    let assignment = service.assign_item(current_user.0.user_id, input).await?;
    state
        .cache
        .invalidate(&[CacheScope::Inventory, CacheScope::Dashboard]);
    Ok(Json(assignment))
}

/// List a unit's assignments
pub async fn list_unit_assignments(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryAssignment>>> {
    let service = InventoryService::new(state.db);
    let assignments = service.list_unit_assignments(unit_id).await?;
    Ok(Json(assignments))
}

/// List the movement ledger for an item
pub async fn list_item_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryMovement>>> {
    let service = InventoryService::new(state.db);
    let movements = service.list_movements(item_id).await?;
    Ok(Json(movements))
}

/// List a unit's checkout-eligible assignments (re-used by the checkout
/// wizard's checklist step)
pub async fn list_eligible_assignments(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<Vec<AssignmentView>>> {
    let service = InventoryService::new(state.db);
    let assignments = service.list_eligible_assignments(unit_id).await?;
    Ok(Json(assignments))
}
