//! Booking lifecycle service
//!
//! Unit status is derived from the booking status and written in the same
//! transaction as every booking write, so the two can never drift.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{unit_status_for_booking, Booking, BookingStatus, BookingSummary};

/// Booking service for managing stays and their unit status side effects
#[derive(Clone)]
pub struct BookingService {
    db: PgPool,
}

/// Database row for a booking
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    guest_id: Uuid,
    property_id: Uuid,
    unit_id: Uuid,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    number_of_guests: i32,
    total_amount: Decimal,
    source: Option<String>,
    purpose: Option<String>,
    payment_method: Option<String>,
    special_requests: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const BOOKING_COLUMNS: &str = "id, guest_id, property_id, unit_id, check_in_date, check_out_date, \
     number_of_guests, total_amount, source, purpose, payment_method, special_requests, status, \
     created_at, updated_at";

impl BookingRow {
    fn into_model(self) -> AppResult<Booking> {
        let status = BookingStatus::parse(&self.status)
            .ok_or_else(|| AppError::Internal(format!("Unknown booking status: {}", self.status)))?;
        Ok(Booking {
            id: self.id,
            guest_id: self.guest_id,
            property_id: self.property_id,
            unit_id: self.unit_id,
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            number_of_guests: self.number_of_guests,
            total_amount: self.total_amount,
            source: self.source,
            purpose: self.purpose,
            payment_method: self.payment_method,
            special_requests: self.special_requests,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database row for a booking summary projection
#[derive(Debug, sqlx::FromRow)]
struct BookingSummaryRow {
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

impl BookingSummaryRow {
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

/// Input for creating a booking
#[derive(Debug, Deserialize)]
pub struct CreateBookingInput {
    pub guest_id: Uuid,
    pub property_id: Uuid,
    pub unit_id: Uuid,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub number_of_guests: i32,
    pub total_amount: Decimal,
    pub source: Option<String>,
    pub purpose: Option<String>,
    pub payment_method: Option<String>,
    pub special_requests: Option<String>,
    /// Defaults to pending
    pub status: Option<BookingStatus>,
}

/// Input for updating a booking's status
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusInput {
    pub status: BookingStatus,
}

impl BookingService {
    /// Create a new BookingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a booking and sync the unit's status
    pub async fn create_booking(&self, input: CreateBookingInput) -> AppResult<Booking> {
        if input.number_of_guests <= 0 {
            return Err(AppError::Validation {
                field: "number_of_guests".to_string(),
                message: "Number of guests must be positive".to_string(),
            });
        }
        if input.total_amount < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "total_amount".to_string(),
                message: "Total amount cannot be negative".to_string(),
            });
        }
        if input.check_out_date < input.check_in_date {
            return Err(AppError::Validation {
                field: "check_out_date".to_string(),
                message: "Checkout date cannot be before the check-in date".to_string(),
            });
        }

        let status = input.status.unwrap_or(BookingStatus::Pending);
        if !matches!(
            status,
            BookingStatus::Pending | BookingStatus::Reserved | BookingStatus::Confirmed
        ) {
            return Err(AppError::Validation {
                field: "status".to_string(),
                message: "New bookings must be pending, reserved, or confirmed".to_string(),
            });
        }

        // Validate the unit exists in the given property and fits the party
        let unit = sqlx::query_as::<_, (Uuid, i32)>(
            "SELECT id, max_guests FROM units WHERE id = $1 AND property_id = $2",
        )
        .bind(input.unit_id)
        .bind(input.property_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Unit".to_string()))?;

        if input.number_of_guests > unit.1 {
            return Err(AppError::Validation {
                field: "number_of_guests".to_string(),
                message: format!("Unit sleeps at most {} guests", unit.1),
            });
        }

        // Blacklisted guests cannot book
        let blacklisted =
            sqlx::query_scalar::<_, bool>("SELECT blacklisted FROM guests WHERE id = $1")
                .bind(input.guest_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Guest".to_string()))?;

        if blacklisted {
            return Err(AppError::Conflict {
                resource: "guest".to_string(),
                message: "Guest is blacklisted and cannot book".to_string(),
            });
        }

        // At most one live booking per unit and check-in day
        let occupied = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE unit_id = $1 AND check_in_date = $2 \
             AND status IN ('pending', 'reserved', 'checked_in'))",
        )
        .bind(input.unit_id)
        .bind(input.check_in_date)
        .fetch_one(&self.db)
        .await?;

        if occupied {
            return Err(AppError::Conflict {
                resource: "unit".to_string(),
                message: "Unit already has a live booking for this check-in date".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            INSERT INTO bookings (
                guest_id, property_id, unit_id, check_in_date, check_out_date,
                number_of_guests, total_amount, source, purpose, payment_method,
                special_requests, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(input.guest_id)
        .bind(input.property_id)
        .bind(input.unit_id)
        .bind(input.check_in_date)
        .bind(input.check_out_date)
        .bind(input.number_of_guests)
        .bind(input.total_amount)
        .bind(&input.source)
        .bind(&input.purpose)
        .bind(&input.payment_method)
        .bind(&input.special_requests)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        // Sync the unit status to the booking status in the same transaction
        sqlx::query("UPDATE units SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(unit_status_for_booking(status).as_str())
            .bind(input.unit_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(booking_id = %row.id, status = status.as_str(), "Booking created");

        row.into_model()
    }

    /// Update a booking's status and sync the unit's status
    pub async fn update_status(
        &self,
        booking_id: Uuid,
        input: UpdateBookingStatusInput,
    ) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        let current = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT unit_id, status FROM bookings WHERE id = $1 FOR UPDATE",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking".to_string()))?;

        let current_status = BookingStatus::parse(&current.1)
            .ok_or_else(|| AppError::Internal(format!("Unknown booking status: {}", current.1)))?;

        if !current_status.can_transition_to(input.status) {
            return Err(AppError::InvalidStateTransition(format!(
                "Cannot move a booking from {} to {}",
                current_status, input.status
            )));
        }

        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            UPDATE bookings SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(input.status.as_str())
        .bind(booking_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE units SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(unit_status_for_booking(input.status).as_str())
            .bind(current.0)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            booking_id = %booking_id,
            from = current_status.as_str(),
            to = input.status.as_str(),
            "Booking status updated"
        );

        row.into_model()
    }

    /// Get a booking by ID
    pub async fn get_booking(&self, booking_id: Uuid) -> AppResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking".to_string()))?;

        row.into_model()
    }

    /// List all bookings with guest/property/unit projections
    pub async fn list_bookings(&self) -> AppResult<Vec<BookingSummary>> {
        let rows = sqlx::query_as::<_, BookingSummaryRow>(
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
            ORDER BY b.check_in_date DESC, b.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|row| row.into_model()).collect()
    }

    /// List checked-in bookings awaiting checkout, soonest planned checkout
    /// first
    pub async fn list_for_checkout(&self) -> AppResult<Vec<BookingSummary>> {
        let rows = sqlx::query_as::<_, BookingSummaryRow>(
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
            WHERE b.status = 'checked_in'
            ORDER BY b.check_out_date ASC, b.created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|row| row.into_model()).collect()
    }
}
