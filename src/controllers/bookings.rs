use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::controllers::error::AppError;
use crate::models::{Booking, MealPreference, NewBooking, SeatId};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/book", post(create_booking))
        .route("/bookings/{seat_id}", get(get_booking))
        .route("/meal", post(update_meal))
        .route("/cancel/{seat_id}", delete(cancel_booking))
}

/* ---------- BOOK ---------- */

// POST /api/book
#[derive(Debug, Deserialize, Validate)]
pub struct BookRequest {
    pub seat_id: SeatId,
    pub passenger_name: String,
    #[validate(length(min = 1, max = 60))]
    pub pickup_station: String,
    #[validate(length(min = 1, max = 60))]
    pub drop_station: String,
    #[validate(length(max = 60))]
    pub meal_preference: Option<String>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let meal_preference = MealPreference::parse_optional(req.meal_preference.as_deref())?;
    let booking = state.registry.create_booking(NewBooking {
        seat_id: req.seat_id,
        passenger_name: req.passenger_name,
        pickup_station: req.pickup_station,
        drop_station: req.drop_station,
        meal_preference,
    })?;

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings/{seat_id}
async fn get_booking(
    State(state): State<Arc<AppState>>,
    seat_id: Result<Path<SeatId>, PathRejection>,
) -> Result<Json<Booking>, AppError> {
    let Path(seat_id) = seat_id?;
    Ok(Json(state.registry.get_booking(seat_id)?))
}

/* ---------- MEAL ---------- */

// POST /api/meal, `null` clears the preference
#[derive(Debug, Deserialize, Validate)]
pub struct MealRequest {
    pub seat_id: SeatId,
    #[validate(length(max = 60))]
    pub meal_preference: Option<String>,
}

async fn update_meal(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MealRequest>, JsonRejection>,
) -> Result<Json<Booking>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let meal = MealPreference::parse_optional(req.meal_preference.as_deref())?;
    Ok(Json(state.registry.update_meal(req.seat_id, meal)?))
}

/* ---------- CANCEL ---------- */

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub status: &'static str,
    pub seat_id: SeatId,
    pub passenger_name: String,
}

// DELETE /api/cancel/{seat_id}
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    seat_id: Result<Path<SeatId>, PathRejection>,
) -> Result<Json<CancelResponse>, AppError> {
    let Path(seat_id) = seat_id?;
    let cancelled = state.registry.cancel_booking(seat_id)?;

    Ok(Json(CancelResponse {
        status: "cancelled",
        seat_id,
        passenger_name: cancelled.passenger_name,
    }))
}
