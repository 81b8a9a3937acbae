//! HTTP handlers for the guest checkout workflow

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::cache;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::booking::BookingService;
use crate::services::checkout::CheckoutService;
use crate::services::reporting::ReportingService;
use crate::AppState;
use shared::models::{BookingSummary, CheckoutReport, CheckoutReportDetail, CompleteCheckoutInput};

/// List checked-in bookings awaiting checkout
pub async fn list_checkout_bookings(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<BookingSummary>>> {
    let service = BookingService::new(state.db);
    let bookings = service.list_for_checkout().await?;
    Ok(Json(bookings))
}

/// Complete a guest checkout
pub async fn complete_checkout(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CompleteCheckoutInput>,
) -> AppResult<Json<CheckoutReportDetail>> {
    let service = CheckoutService::new(state.db);
    let detail = service
        .complete_checkout(current_user.0.user_id, input)
        .await?;
    // A checkout touches bookings, units, guests and inventory at once;
    // every dependent view is dirty
    state.cache.invalidate(cache::CHECKOUT_SCOPES);
    Ok(Json(detail))
}

/// Get a checkout report with its line items
pub async fn get_checkout_report(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(report_id): Path<Uuid>,
) -> AppResult<Json<CheckoutReportDetail>> {
    let service = CheckoutService::new(state.db);
    let detail = service.get_report(report_id).await?;
    Ok(Json(detail))
}

/// List checkout reports
pub async fn list_checkout_reports(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<CheckoutReport>>> {
    let service = CheckoutService::new(state.db);
    let reports = service.list_reports().await?;
    Ok(Json(reports))
}

/// Export checkout report summaries as CSV
pub async fn export_checkout_reports(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let data = service.export_checkout_reports().await?;
    let csv = ReportingService::export_to_csv(&data)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"checkout_reports.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
