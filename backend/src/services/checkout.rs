//! Guest checkout service
//!
//! `complete_checkout` is the one multi-entity write in the platform: it
//! reconciles a checked-in booking, the unit's inspected inventory and the
//! financial summary in a single database transaction. Either every row
//! below commits, or none do.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{
    append_assignment_note, movement_note, total_damage_cost, BookingStatus, BookingSummary,
    CheckoutItem, CheckoutReport, CheckoutReportDetail, CompleteCheckoutInput, ItemCondition,
    ReportStatus, UnitStatus,
};
use shared::validation;

/// Checkout service owning the checkout transaction and report reads
#[derive(Clone)]
pub struct CheckoutService {
    db: PgPool,
}

/// Database row for a checkout report
#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    id: Uuid,
    booking_id: Uuid,
    guest_id: Uuid,
    checkout_date: NaiveDate,
    inspector: String,
    total_damage_cost: Decimal,
    deposit_deduction: Decimal,
    notes: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl ReportRow {
    fn into_model(self) -> AppResult<CheckoutReport> {
        let status = ReportStatus::parse(&self.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown report status: {}", self.status)))?;
        Ok(CheckoutReport {
            id: self.id,
            booking_id: self.booking_id,
            guest_id: self.guest_id,
            checkout_date: self.checkout_date,
            inspector: self.inspector,
            total_damage_cost: self.total_damage_cost,
            deposit_deduction: self.deposit_deduction,
            notes: self.notes,
            status,
            created_at: self.created_at,
        })
    }
}

/// Database row for a checkout line item
#[derive(Debug, sqlx::FromRow)]
struct ItemLineRow {
    id: Uuid,
    report_id: Uuid,
    assignment_id: Uuid,
    condition: String,
    damage_cost: Decimal,
    notes: Option<String>,
}

impl ItemLineRow {
    fn into_model(self) -> AppResult<CheckoutItem> {
        let condition = ItemCondition::parse(&self.condition).ok_or_else(|| {
            AppError::Internal(format!("Unknown item condition: {}", self.condition))
        })?;
        Ok(CheckoutItem {
            id: self.id,
            report_id: self.report_id,
            assignment_id: self.assignment_id,
            condition,
            damage_cost: self.damage_cost,
            notes: self.notes,
        })
    }
}

/// Database row for the report's booking projection
#[derive(Debug, sqlx::FromRow)]
struct ReportBookingRow {
    id: Uuid,
    guest_id: Uuid,
    guest_name: String,
    property_id: Uuid,
    property_name: String,
    unit_id: Uuid,
    unit_name: String,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    number_of_guests: i32,
    total_amount: Decimal,
    status: String,
}

impl ReportBookingRow {
    fn into_model(self) -> AppResult<BookingSummary> {
        let status = BookingStatus::parse(&self.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown booking status: {}", self.status)))?;
        Ok(BookingSummary {
            id: self.id,
            guest_id: self.guest_id,
            guest_name: self.guest_name,
            property_id: self.property_id,
            property_name: self.property_name,
            unit_id: self.unit_id,
            unit_name: self.unit_name,
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            number_of_guests: self.number_of_guests,
            total_amount: self.total_amount,
            status,
        })
    }
}

/// Assignment fields the checkout loop needs
#[derive(Debug, sqlx::FromRow)]
struct AssignmentGuardRow {
    inventory_item_id: Uuid,
    unit_id: Uuid,
    notes: Option<String>,
    is_active: bool,
}

impl CheckoutService {
    /// Create a new CheckoutService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Complete a guest checkout atomically.
    ///
    /// The booking row is locked and its status checked first, so two
    /// concurrent checkouts of the same booking serialize and the second one
    /// fails with a conflict instead of double-processing inventory or guest
    /// counters. Assignments not listed in the input stay active at the
    /// unit.
    pub async fn complete_checkout(
        &self,
        moved_by: Uuid,
        input: CompleteCheckoutInput,
    ) -> AppResult<CheckoutReportDetail> {
        if let Err(message) = validation::validate_inspector(&input.inspector) {
            return Err(AppError::Validation {
                field: "inspector".to_string(),
                message: message.to_string(),
            });
        }
        if let Err(message) = validation::validate_deposit_deduction(input.deposit_deduction) {
            return Err(AppError::Validation {
                field: "deposit_deduction".to_string(),
                message: message.to_string(),
            });
        }
        for item in &input.checkout_items {
            if let Err(message) = validation::validate_checkout_item(item) {
                return Err(AppError::Validation {
                    field: format!("checkout_items[{}]", item.assignment_id),
                    message: message.to_string(),
                });
            }
        }

        let mut tx = self.db.begin().await?;

        // The per-item loop can be long; give the transaction a generous
        // per-statement budget instead of the pool default
        sqlx::query("SET LOCAL statement_timeout = '60s'")
            .execute(&mut *tx)
            .await?;

        // Lock the booking for the duration of the transaction
        let booking = sqlx::query_as::<_, (Uuid, Uuid, String)>(
            "SELECT guest_id, unit_id, status FROM bookings WHERE id = $1 FOR UPDATE",
        )
        .bind(input.booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking".to_string()))?;

        let (booking_guest_id, unit_id, booking_status) = booking;

        // Double-checkout guard: only a checked-in booking can be checked out
        if booking_status != BookingStatus::CheckedIn.as_str() {
            return Err(AppError::Conflict {
                resource: "booking".to_string(),
                message: format!(
                    "Booking is {}; only checked-in bookings can be checked out",
                    booking_status
                ),
            });
        }

        if booking_guest_id != input.guest_id {
            return Err(AppError::Validation {
                field: "guest_id".to_string(),
                message: "Guest does not match the booking".to_string(),
            });
        }

        let total_damage = total_damage_cost(&input.checkout_items);

        let report = sqlx::query_as::<_, ReportRow>(
            r#"
            INSERT INTO checkout_reports (
                booking_id, guest_id, checkout_date, inspector,
                total_damage_cost, deposit_deduction, notes, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'completed')
            RETURNING id, booking_id, guest_id, checkout_date, inspector,
                      total_damage_cost, deposit_deduction, notes, status, created_at
            "#,
        )
        .bind(input.booking_id)
        .bind(input.guest_id)
        .bind(input.checkout_date)
        .bind(input.inspector.trim())
        .bind(total_damage)
        .bind(input.deposit_deduction)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(input.checkout_items.len());
        for item in &input.checkout_items {
            // A missing assignment aborts the whole checkout; skipping it
            // silently would leave the report claiming an inspection that
            // never happened
            let assignment = sqlx::query_as::<_, AssignmentGuardRow>(
                "SELECT inventory_item_id, unit_id, notes, is_active \
                 FROM inventory_assignments WHERE id = $1 FOR UPDATE",
            )
            .bind(item.assignment_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Inventory assignment {}", item.assignment_id))
            })?;

            // Closed assignments are historical records; a second checkout
            // attempt must not double-process them
            if !assignment.is_active {
                return Err(AppError::Conflict {
                    resource: "inventory_assignment".to_string(),
                    message: format!(
                        "Inventory assignment {} was already returned",
                        item.assignment_id
                    ),
                });
            }

            let line = sqlx::query_as::<_, ItemLineRow>(
                r#"
                INSERT INTO checkout_items (report_id, assignment_id, condition, damage_cost, notes)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, report_id, assignment_id, condition, damage_cost, notes
                "#,
            )
            .bind(report.id)
            .bind(item.assignment_id)
            .bind(item.condition.as_str())
            .bind(item.damage_cost)
            .bind(&item.notes)
            .fetch_one(&mut *tx)
            .await?;
            items.push(line.into_model()?);

            // Close the assignment, appending the checkout note to whatever
            // was already recorded on it
            let merged_notes =
                append_assignment_note(assignment.notes.as_deref(), item.notes.as_deref());
            sqlx::query(
                "UPDATE inventory_assignments \
                 SET is_active = FALSE, returned_at = NOW(), notes = $1 \
                 WHERE id = $2",
            )
            .bind(&merged_notes)
            .bind(item.assignment_id)
            .execute(&mut *tx)
            .await?;

            // Only items coming back in good condition return to store stock
            if item.condition.restocks() {
                sqlx::query(
                    "UPDATE inventory_items SET quantity = quantity + 1, updated_at = NOW() \
                     WHERE id = $1",
                )
                .bind(assignment.inventory_item_id)
                .execute(&mut *tx)
                .await?;
            }

            let cost = (!item.condition.restocks()).then_some(item.damage_cost);
            sqlx::query(
                r#"
                INSERT INTO inventory_movements (inventory_item_id, from_unit_id, to_unit_id, moved_by, direction, quantity, cost, notes)
                VALUES ($1, $2, NULL, $3, $4, 1, $5, $6)
                "#,
            )
            .bind(assignment.inventory_item_id)
            .bind(assignment.unit_id)
            .bind(moved_by)
            .bind(item.condition.movement_direction().as_str())
            .bind(cost)
            .bind(movement_note(item))
            .execute(&mut *tx)
            .await?;
        }

        // The actual checkout date overwrites the planned one
        let updated = sqlx::query(
            "UPDATE bookings SET status = 'checked_out', check_out_date = $1, updated_at = NOW() \
             WHERE id = $2 AND status = 'checked_in'",
        )
        .bind(input.checkout_date)
        .bind(input.booking_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() != 1 {
            return Err(AppError::Conflict {
                resource: "booking".to_string(),
                message: "Booking was checked out concurrently".to_string(),
            });
        }

        // The unit becomes bookable again immediately, whatever the
        // inspection found
        sqlx::query("UPDATE units SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(UnitStatus::Available.as_str())
            .bind(unit_id)
            .execute(&mut *tx)
            .await?;

        let guest_updated = sqlx::query(
            "UPDATE guests SET total_stays = total_stays + 1, last_stay = $1, updated_at = NOW() \
             WHERE id = $2",
        )
        .bind(input.checkout_date)
        .bind(input.guest_id)
        .execute(&mut *tx)
        .await?;

        if guest_updated.rows_affected() != 1 {
            return Err(AppError::NotFound("Guest".to_string()));
        }

        tx.commit().await?;

        tracing::info!(
            report_id = %report.id,
            booking_id = %input.booking_id,
            items = items.len(),
            total_damage = %total_damage,
            "Checkout completed"
        );

        let booking = self.report_booking(input.booking_id).await?;
        Ok(CheckoutReportDetail {
            report: report.into_model()?,
            items,
            booking,
        })
    }

    /// Get a checkout report with its line items and booking projection
    pub async fn get_report(&self, report_id: Uuid) -> AppResult<CheckoutReportDetail> {
        let report = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, booking_id, guest_id, checkout_date, inspector,
                   total_damage_cost, deposit_deduction, notes, status, created_at
            FROM checkout_reports
            WHERE id = $1
            "#,
        )
        .bind(report_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Checkout report".to_string()))?;

        let items = sqlx::query_as::<_, ItemLineRow>(
            r#"
            SELECT id, report_id, assignment_id, condition, damage_cost, notes
            FROM checkout_items
            WHERE report_id = $1
            ORDER BY id
            "#,
        )
        .bind(report_id)
        .fetch_all(&self.db)
        .await?;

        let booking = self.report_booking(report.booking_id).await?;

        Ok(CheckoutReportDetail {
            report: report.into_model()?,
            items: items
                .into_iter()
                .map(|row| row.into_model())
                .collect::<AppResult<Vec<_>>>()?,
            booking,
        })
    }

    /// List checkout reports, most recent first
    pub async fn list_reports(&self) -> AppResult<Vec<CheckoutReport>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, booking_id, guest_id, checkout_date, inspector,
                   total_damage_cost, deposit_deduction, notes, status, created_at
            FROM checkout_reports
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|row| row.into_model()).collect()
    }

    /// Booking projection shown on a checkout report
    async fn report_booking(&self, booking_id: Uuid) -> AppResult<BookingSummary> {
        let row = sqlx::query_as::<_, ReportBookingRow>(
            r#"
            SELECT b.id, b.guest_id, g.full_name AS guest_name,
                   b.property_id, p.name AS property_name,
                   b.unit_id, u.name AS unit_name,
                   b.check_in_date, b.check_out_date, b.number_of_guests,
                   b.total_amount, b.status
            FROM bookings b
            JOIN guests g ON g.id = b.guest_id
            JOIN properties p ON p.id = b.property_id
            JOIN units u ON u.id = b.unit_id
            WHERE b.id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking".to_string()))?;

        row.into_model()
    }
}
