//! Probability preview for a hypothetical booking. Advisory only: nothing
//! here reads or writes the seat registry.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::controllers::error::AppError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/estimate", post(estimate_confirmation))
}

#[derive(Debug, Deserialize, Validate)]
pub struct EstimateRequest {
    #[validate(range(min = 0, max = 365))]
    pub days_in_advance: i64,
    pub is_weekend: bool,
    #[validate(range(min = 1))]
    pub price: i64,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub probability: f64,
    pub percent: String,
    pub days_in_advance: i64,
    pub is_weekend: bool,
    pub price: i64,
    pub model_accuracy: f64,
}

// POST /api/estimate
async fn estimate_confirmation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> Result<Json<EstimateResponse>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let estimator = state
        .estimator
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("confirmation estimator is disabled".to_string()))?;

    let probability = estimator.estimate(req.days_in_advance, req.is_weekend, req.price)?;
    tracing::debug!(
        "Confirmation estimate {:.3} (days_in_advance={}, is_weekend={}, price={})",
        probability, req.days_in_advance, req.is_weekend, req.price
    );

    Ok(Json(EstimateResponse {
        probability,
        percent: format!("{:.1}", probability * 100.0),
        days_in_advance: req.days_in_advance,
        is_weekend: req.is_weekend,
        price: req.price,
        model_accuracy: estimator.holdout_accuracy(),
    }))
}
