//! HTTP handlers for booking management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::cache::CacheScope;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::booking::{BookingService, CreateBookingInput, UpdateBookingStatusInput};
use crate::AppState;
use shared::models::{Booking, BookingSummary};

/// Create a booking
pub async fn create_booking(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateBookingInput>,
) -> AppResult<Json<Booking>> {
    let service = BookingService::new(state.db);
    let booking = service.create_booking(input).await?;
    state
        .cache
        .invalidate(&[CacheScope::Bookings, CacheScope::Dashboard]);
    Ok(Json(booking))
}

/// List all bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<BookingSummary>>> {
    let service = BookingService::new(state.db);
    let bookings = service.list_bookings().await?;
    Ok(Json(bookings))
}

/// Get a booking by ID
pub async fn get_booking(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<Booking>> {
    let service = BookingService::new(state.db);
    let booking = service.get_booking(booking_id).await?;
    Ok(Json(booking))
}

/// Update a booking's status
pub async fn update_booking_status(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(booking_id): Path<Uuid>,
    Json(input): Json<UpdateBookingStatusInput>,
) -> AppResult<Json<Booking>> {
    let service = BookingService::new(state.db);
    let booking = service.update_status(booking_id, input).await?;
    state
        .cache
        .invalidate(&[CacheScope::Bookings, CacheScope::Dashboard]);
    Ok(Json(booking))
}
