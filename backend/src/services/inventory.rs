//! Inventory service for the item catalogue, unit assignments and the
//! movement ledger
//!
//! Store quantities only ever change through guarded atomic updates; the
//! movement ledger is append-only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{
    AssignmentView, InventoryAssignment, InventoryItem, InventoryMovement, ItemStatus,
    MovementDirection,
};

/// Inventory service for managing items, assignments and movements
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Database row for an inventory item
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    item_name: String,
    category: String,
    quantity: i32,
    status: String,
    assignable_on_booking: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ItemRow {
    fn into_model(self) -> AppResult<InventoryItem> {
        let status = ItemStatus::parse(&self.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown item status: {}", self.status)))?;
        Ok(InventoryItem {
            id: self.id,
            item_name: self.item_name,
            category: self.category,
            quantity: self.quantity,
            status,
            assignable_on_booking: self.assignable_on_booking,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database row for an assignment
#[derive(Debug, sqlx::FromRow)]
struct AssignmentRow {
    id: Uuid,
    inventory_item_id: Uuid,
    unit_id: Uuid,
    property_id: Uuid,
    serial_number: Option<String>,
    notes: Option<String>,
    is_active: bool,
    assigned_at: DateTime<Utc>,
    returned_at: Option<DateTime<Utc>>,
}

impl From<AssignmentRow> for InventoryAssignment {
    fn from(row: AssignmentRow) -> Self {
        InventoryAssignment {
            id: row.id,
            inventory_item_id: row.inventory_item_id,
            unit_id: row.unit_id,
            property_id: row.property_id,
            serial_number: row.serial_number,
            notes: row.notes,
            is_active: row.is_active,
            assigned_at: row.assigned_at,
            returned_at: row.returned_at,
        }
    }
}

/// Database row for the eligible-assignment checklist view
#[derive(Debug, sqlx::FromRow)]
struct AssignmentViewRow {
    id: Uuid,
    inventory_item_id: Uuid,
    item_name: String,
    category: String,
    item_status: String,
    serial_number: Option<String>,
    notes: Option<String>,
    assigned_at: DateTime<Utc>,
}

impl AssignmentViewRow {
    fn into_model(self) -> AppResult<AssignmentView> {
        let item_status = ItemStatus::parse(&self.item_status).ok_or_else(|| {
            AppError::Internal(format!("Unknown item status: {}", self.item_status))
        })?;
        Ok(AssignmentView {
            id: self.id,
            inventory_item_id: self.inventory_item_id,
            item_name: self.item_name,
            category: self.category,
            item_status,
            serial_number: self.serial_number,
            notes: self.notes,
            assigned_at: self.assigned_at,
        })
    }
}

/// Database row for a movement ledger entry
#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: Uuid,
    inventory_item_id: Uuid,
    from_unit_id: Option<Uuid>,
    to_unit_id: Option<Uuid>,
    moved_by: Uuid,
    direction: String,
    quantity: i32,
    cost: Option<Decimal>,
    notes: Option<String>,
    moved_at: DateTime<Utc>,
}

impl MovementRow {
    fn into_model(self) -> AppResult<InventoryMovement> {
        let direction = MovementDirection::parse(&self.direction).ok_or_else(|| {
            AppError::Internal(format!("Unknown movement direction: {}", self.direction))
        })?;
        Ok(InventoryMovement {
            id: self.id,
            inventory_item_id: self.inventory_item_id,
            from_unit_id: self.from_unit_id,
            to_unit_id: self.to_unit_id,
            moved_by: self.moved_by,
            direction,
            quantity: self.quantity,
            cost: self.cost,
            notes: self.notes,
            moved_at: self.moved_at,
        })
    }
}

/// Input for creating a catalogue item
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub item_name: String,
    pub category: String,
    pub quantity: i32,
    pub assignable_on_booking: Option<bool>,
}

/// Input for assigning an item instance to a unit
#[derive(Debug, Deserialize)]
pub struct AssignItemInput {
    pub inventory_item_id: Uuid,
    pub unit_id: Uuid,
    pub serial_number: Option<String>,
    pub notes: Option<String>,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a catalogue item
    pub async fn create_item(&self, input: CreateItemInput) -> AppResult<InventoryItem> {
        if input.item_name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "item_name".to_string(),
                message: "Item name is required".to_string(),
            });
        }
        if input.quantity < 0 {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity cannot be negative".to_string(),
            });
        }

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO inventory_items (item_name, category, quantity, status, assignable_on_booking)
            VALUES ($1, $2, $3, 'active', $4)
            RETURNING id, item_name, category, quantity, status, assignable_on_booking,
                      created_at, updated_at
            "#,
        )
        .bind(input.item_name.trim())
        .bind(&input.category)
        .bind(input.quantity)
        .bind(input.assignable_on_booking.unwrap_or(true))
        .fetch_one(&self.db)
        .await?;

        row.into_model()
    }

    /// List catalogue items
    pub async fn list_items(&self) -> AppResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, item_name, category, quantity, status, assignable_on_booking,
                   created_at, updated_at
            FROM inventory_items
            ORDER BY category, item_name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|row| row.into_model()).collect()
    }

    /// Assign an item instance to a unit.
    ///
    /// Takes one unit out of store stock and records a `to_unit` movement,
    /// all in one transaction.
    pub async fn assign_item(
        &self,
        moved_by: Uuid,
        input: AssignItemInput,
    ) -> AppResult<InventoryAssignment> {
        let mut tx = self.db.begin().await?;

        let item = sqlx::query_as::<_, (String, String)>(
            "SELECT item_name, status FROM inventory_items WHERE id = $1 FOR UPDATE",
        )
        .bind(input.inventory_item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        if item.1 == ItemStatus::Retired.as_str() {
            return Err(AppError::Conflict {
                resource: "inventory_item".to_string(),
                message: format!("{} is retired and cannot be assigned", item.0),
            });
        }

        let property_id =
            sqlx::query_scalar::<_, Uuid>("SELECT property_id FROM units WHERE id = $1")
                .bind(input.unit_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Unit".to_string()))?;

        // Guarded decrement; never lets the store count go negative
        let decremented = sqlx::query(
            "UPDATE inventory_items SET quantity = quantity - 1, updated_at = NOW() \
             WHERE id = $1 AND quantity > 0",
        )
        .bind(input.inventory_item_id)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            return Err(AppError::InsufficientInventory(format!(
                "{} is out of stock",
                item.0
            )));
        }

        let assignment = sqlx::query_as::<_, AssignmentRow>(
            r#"
            INSERT INTO inventory_assignments (inventory_item_id, unit_id, property_id, serial_number, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, inventory_item_id, unit_id, property_id, serial_number, notes,
                      is_active, assigned_at, returned_at
            "#,
        )
        .bind(input.inventory_item_id)
        .bind(input.unit_id)
        .bind(property_id)
        .bind(&input.serial_number)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO inventory_movements (inventory_item_id, from_unit_id, to_unit_id, moved_by, direction, quantity, notes)
            VALUES ($1, NULL, $2, $3, $4, 1, $5)
            "#,
        )
        .bind(input.inventory_item_id)
        .bind(input.unit_id)
        .bind(moved_by)
        .bind(MovementDirection::ToUnit.as_str())
        .bind(&input.notes)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            assignment_id = %assignment.id,
            unit_id = %input.unit_id,
            "Inventory item assigned to unit"
        );

        Ok(assignment.into())
    }

    /// List a unit's assignments, most recent first (active and historical)
    pub async fn list_unit_assignments(
        &self,
        unit_id: Uuid,
    ) -> AppResult<Vec<InventoryAssignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT id, inventory_item_id, unit_id, property_id, serial_number, notes,
                   is_active, assigned_at, returned_at
            FROM inventory_assignments
            WHERE unit_id = $1
            ORDER BY assigned_at DESC
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|row| row.into()).collect())
    }

    /// Assignments eligible for checkout inspection at a unit: active, and
    /// the catalogue item is flagged assignable-on-booking. Most recently
    /// assigned first. An empty list is a valid result.
    pub async fn list_eligible_assignments(&self, unit_id: Uuid) -> AppResult<Vec<AssignmentView>> {
        let rows = sqlx::query_as::<_, AssignmentViewRow>(
            r#"
            SELECT a.id, a.inventory_item_id, i.item_name, i.category,
                   i.status AS item_status, a.serial_number, a.notes, a.assigned_at
            FROM inventory_assignments a
            JOIN inventory_items i ON i.id = a.inventory_item_id
            WHERE a.unit_id = $1 AND a.is_active = TRUE AND i.assignable_on_booking = TRUE
            ORDER BY a.assigned_at DESC
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|row| row.into_model()).collect()
    }

    /// List the movement ledger for an item, most recent first
    pub async fn list_movements(&self, item_id: Uuid) -> AppResult<Vec<InventoryMovement>> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM inventory_items WHERE id = $1)")
                .bind(item_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Inventory item".to_string()));
        }

        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, inventory_item_id, from_unit_id, to_unit_id, moved_by, direction,
                   quantity, cost, notes, moved_at
            FROM inventory_movements
            WHERE inventory_item_id = $1
            ORDER BY moved_at DESC
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|row| row.into_model()).collect()
    }
}
