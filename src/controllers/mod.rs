pub mod error;
pub mod seats;
pub mod bookings;
pub mod estimator;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(seats::routes())
        .merge(bookings::routes())
        .merge(estimator::routes())
}
