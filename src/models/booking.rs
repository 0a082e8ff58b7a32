use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::BookingError;
use crate::models::SeatId;

pub const MAX_PASSENGER_NAME_LEN: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MealPreference {
    Veg,
    NonVeg,
    Jain,
}

impl MealPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            MealPreference::Veg => "veg",
            MealPreference::NonVeg => "non_veg",
            MealPreference::Jain => "jain",
        }
    }

    /// Parses an optional wire value; absence means no preference.
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, BookingError> {
        value.map(|v| v.parse::<Self>()).transpose()
    }
}

impl fmt::Display for MealPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealPreference {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "veg" | "vegetarian" => Ok(MealPreference::Veg),
            "non_veg" | "non-veg" | "nonveg" | "non-vegetarian" | "non_vegetarian" => Ok(MealPreference::NonVeg),
            "jain" => Ok(MealPreference::Jain),
            _ => Err(BookingError::invalid(format!(
                "unknown meal preference '{}', expected veg, non_veg or jain",
                s.trim()
            ))),
        }
    }
}

/// An active booking. Only `meal_preference` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub booking_id: Uuid,
    pub seat_id: SeatId,
    pub seat_label: String,
    pub passenger_name: String,
    pub pickup_station: String,
    pub drop_station: String,
    pub meal_preference: Option<MealPreference>,
    pub booked_at: DateTime<Utc>,
}

/// Input of a booking request; stations are given by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub seat_id: SeatId,
    pub passenger_name: String,
    pub pickup_station: String,
    pub drop_station: String,
    pub meal_preference: Option<MealPreference>,
}

impl NewBooking {
    pub fn new(
        seat_id: SeatId,
        passenger_name: impl Into<String>,
        pickup_station: impl Into<String>,
        drop_station: impl Into<String>,
    ) -> Self {
        Self {
            seat_id,
            passenger_name: passenger_name.into(),
            pickup_station: pickup_station.into(),
            drop_station: drop_station.into(),
            meal_preference: None,
        }
    }

    pub fn with_meal(mut self, meal: MealPreference) -> Self {
        self.meal_preference = Some(meal);
        self
    }
}

/// Trims the name and checks it is non-empty and within the length limit.
pub fn normalize_passenger_name(raw: &str) -> Result<String, BookingError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(BookingError::invalid("passenger_name must not be empty"));
    }
    if name.chars().count() > MAX_PASSENGER_NAME_LEN {
        return Err(BookingError::invalid(format!(
            "passenger_name must be at most {} characters",
            MAX_PASSENGER_NAME_LEN
        )));
    }
    Ok(name.to_string())
}
