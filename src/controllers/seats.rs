use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::models::{SeatView, Station};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seats", get(list_seats))
        .route("/stations", get(list_stations))
}

// GET /api/seats
async fn list_seats(State(state): State<Arc<AppState>>) -> Json<Vec<SeatView>> {
    Json(state.registry.list_seats())
}

// GET /api/stations
async fn list_stations(State(state): State<Arc<AppState>>) -> Json<Vec<Station>> {
    Json(state.registry.route().stations().to_vec())
}
