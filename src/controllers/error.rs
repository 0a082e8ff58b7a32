use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{BookingError, ErrorKind};
use crate::services::estimator::EstimatorError;

/// Everything a handler can fail with, rendered as `{"error", "code"}`.
#[derive(Debug)]
pub enum AppError {
    Booking(BookingError),
    Estimator(EstimatorError),
    Validation(String),
    Unavailable(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Booking(err) => match err.kind() {
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, ErrorKind::NotFound.code()),
                ErrorKind::InvalidInput => (StatusCode::BAD_REQUEST, ErrorKind::InvalidInput.code()),
                ErrorKind::Conflict => (StatusCode::CONFLICT, ErrorKind::Conflict.code()),
            },
            AppError::Estimator(EstimatorError::InvalidInput(_)) | AppError::Validation(_) => {
                (StatusCode::BAD_REQUEST, ErrorKind::InvalidInput.code())
            }
            AppError::Estimator(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            AppError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match self {
            AppError::Booking(BookingError::Conflict(seat_id)) => {
                tracing::info!("Booking conflict on seat {}", seat_id);
                "seat already booked".to_string()
            }
            AppError::Booking(err) => err.to_string(),
            AppError::Estimator(EstimatorError::InvalidInput(msg)) => msg,
            AppError::Estimator(err) => {
                tracing::error!("Estimator failure: {}", err);
                "Internal Server Error".to_string()
            }
            AppError::Validation(msg) | AppError::Unavailable(msg) => msg,
        };

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError::Booking(err)
    }
}

impl From<EstimatorError> for AppError {
    fn from(err: EstimatorError) -> Self {
        AppError::Estimator(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_booking_error_kind_has_a_distinct_status() {
        let statuses: Vec<StatusCode> = [
            BookingError::SeatNotFound(40),
            BookingError::invalid("bad"),
            BookingError::Conflict(5),
        ]
        .into_iter()
        .map(|e| AppError::from(e).into_response().status())
        .collect();

        assert_eq!(
            statuses,
            vec![StatusCode::NOT_FOUND, StatusCode::BAD_REQUEST, StatusCode::CONFLICT]
        );
    }

    #[test]
    fn estimator_input_errors_are_bad_requests() {
        let response = AppError::from(EstimatorError::InvalidInput("price must be positive".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(EstimatorError::EmptyDataset).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
