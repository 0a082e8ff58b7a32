use crate::models::SeatId;

/// Failure of a registry operation. Every variant leaves the registry
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("seat {0} does not exist")]
    SeatNotFound(SeatId),
    #[error("no active booking for seat {0}")]
    BookingNotFound(SeatId),
    #[error("{0}")]
    InvalidInput(String),
    #[error("seat {0} is already booked")]
    Conflict(SeatId),
}

/// Stable classification the transport layer maps to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Conflict,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Conflict => "seat_already_booked",
        }
    }
}

impl BookingError {
    pub fn invalid(message: impl Into<String>) -> Self {
        BookingError::InvalidInput(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::SeatNotFound(_) | BookingError::BookingNotFound(_) => ErrorKind::NotFound,
            BookingError::InvalidInput(_) => ErrorKind::InvalidInput,
            BookingError::Conflict(_) => ErrorKind::Conflict,
        }
    }
}
