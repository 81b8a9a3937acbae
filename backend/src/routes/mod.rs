//! Route definitions for the Property Rental Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - booking management
        .nest("/bookings", booking_routes())
        // Protected routes - guest checkout workflow
        .nest("/checkout", checkout_routes())
        // Protected routes - inventory management
        .nest("/inventory", inventory_routes())
        // Protected routes - dashboard
        .nest("/dashboard", dashboard_routes())
}

/// Booking management routes (protected)
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_bookings).post(handlers::create_booking),
        )
        .route("/:booking_id", get(handlers::get_booking))
        .route("/:booking_id/status", put(handlers::update_booking_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Guest checkout routes (protected)
fn checkout_routes() -> Router<AppState> {
    Router::new()
        // Checked-in bookings awaiting checkout
        .route("/bookings", get(handlers::list_checkout_bookings))
        // Eligible inventory checklist for a unit
        .route(
            "/units/:unit_id/assignments",
            get(handlers::list_eligible_assignments),
        )
        // The atomic checkout transaction
        .route("/complete", post(handlers::complete_checkout))
        // Reports
        .route("/reports", get(handlers::list_checkout_reports))
        .route("/reports/export", get(handlers::export_checkout_reports))
        .route("/reports/:report_id", get(handlers::get_checkout_report))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inventory management routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(handlers::list_items).post(handlers::create_item))
        .route("/items/:item_id/movements", get(handlers::list_item_movements))
        .route("/assignments", post(handlers::assign_item))
        .route(
            "/units/:unit_id/assignments",
            get(handlers::list_unit_assignments),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Dashboard routes (protected)
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route_layer(middleware::from_fn(auth_middleware))
}
