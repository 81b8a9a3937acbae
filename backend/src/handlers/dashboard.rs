//! Dashboard handler

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::reporting::{DashboardMetrics, ReportingService};
use crate::AppState;

/// Get dashboard metrics
pub async fn get_dashboard(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.db);
    let metrics = service.get_dashboard_metrics().await?;
    Ok(Json(metrics))
}
