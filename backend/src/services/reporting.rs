//! Reporting service for the back-office dashboard and data export

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_properties: i64,
    pub total_units: i64,
    pub available_units: i64,
    pub occupied_units: i64,
    pub checked_in_bookings: i64,
    pub active_assignments: i64,
    pub reports_this_month: i64,
    pub damage_cost_this_month: Decimal,
}

/// Checkout report summary row for CSV export
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CheckoutReportExportRow {
    pub report_id: Uuid,
    pub checkout_date: NaiveDate,
    pub inspector: String,
    pub guest_name: String,
    pub property_name: String,
    pub unit_name: String,
    pub item_count: i64,
    pub total_damage_cost: Decimal,
    pub deposit_deduction: Decimal,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get dashboard metrics
    pub async fn get_dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let month_start = Utc::now()
            .date_naive()
            .with_day(1)
            .unwrap_or_else(|| Utc::now().date_naive());

        let total_properties =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM properties")
                .fetch_one(&self.db)
                .await?;

        let total_units = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM units")
            .fetch_one(&self.db)
            .await?;

        let available_units =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM units WHERE status = 'available'")
                .fetch_one(&self.db)
                .await?;

        let occupied_units =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM units WHERE status = 'occupied'")
                .fetch_one(&self.db)
                .await?;

        let checked_in_bookings = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE status = 'checked_in'",
        )
        .fetch_one(&self.db)
        .await?;

        let active_assignments = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_assignments WHERE is_active = TRUE",
        )
        .fetch_one(&self.db)
        .await?;

        let reports_this_month = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM checkout_reports WHERE checkout_date >= $1",
        )
        .bind(month_start)
        .fetch_one(&self.db)
        .await?;

        let damage_cost_this_month = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_damage_cost), 0) FROM checkout_reports \
             WHERE checkout_date >= $1",
        )
        .bind(month_start)
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            total_properties,
            total_units,
            available_units,
            occupied_units,
            checked_in_bookings,
            active_assignments,
            reports_this_month,
            damage_cost_this_month,
        })
    }

    /// Checkout report summaries for export, most recent first
    pub async fn export_checkout_reports(&self) -> AppResult<Vec<CheckoutReportExportRow>> {
        let rows = sqlx::query_as::<_, CheckoutReportExportRow>(
            r#"
            SELECT r.id AS report_id, r.checkout_date, r.inspector,
                   g.full_name AS guest_name, p.name AS property_name, u.name AS unit_name,
                   COUNT(ci.id) AS item_count,
                   r.total_damage_cost, r.deposit_deduction
            FROM checkout_reports r
            JOIN bookings b ON b.id = r.booking_id
            JOIN guests g ON g.id = r.guest_id
            JOIN properties p ON p.id = b.property_id
            JOIN units u ON u.id = b.unit_id
            LEFT JOIN checkout_items ci ON ci.report_id = r.id
            GROUP BY r.id, r.checkout_date, r.inspector, g.full_name, p.name, u.name,
                     r.total_damage_cost, r.deposit_deduction
            ORDER BY r.checkout_date DESC, r.id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
