//! registry.rs
//!
//! In-memory seat/booking table for a single route.
//!
//! The table maps a seat id to at most one active booking. All mutations go
//! through a single `RwLock`: create holds the write lock across the
//! "is the seat free" check and the insert, so two racing requests for the
//! same seat can never both succeed. Readers copy a snapshot under the read
//! lock and never observe a half-applied change.

use chrono::Utc;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RouteConfig;
use crate::error::BookingError;
use crate::models::booking::normalize_passenger_name;
use crate::models::seat::SEAT_TYPE_SLEEPER;
use crate::models::{Booking, MealPreference, NewBooking, Route, Seat, SeatId, SeatStatus, SeatView};

/// Demo passengers loaded when `SEED_DEMO_BOOKINGS` is on.
const DEMO_BOOKINGS: [(SeatId, &str, MealPreference); 5] = [
    (2, "Riya Shah", MealPreference::Veg),
    (7, "Aarav Mehta", MealPreference::Jain),
    (16, "Neha Patel", MealPreference::Veg),
    (23, "Kabir Desai", MealPreference::NonVeg),
    (29, "Ishita Joshi", MealPreference::Veg),
];

#[derive(Debug)]
pub struct SeatRegistry {
    route: Route,
    seats: Vec<Seat>,
    bookings: RwLock<BTreeMap<SeatId, Booking>>,
}

impl SeatRegistry {
    pub fn new(route: Route, seat_count: u32) -> Self {
        Self {
            route,
            seats: Seat::layout(seat_count),
            bookings: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn from_config(config: &RouteConfig) -> Result<Self, BookingError> {
        let route = Route::new(config.stations.iter().cloned())?;
        Ok(Self::new(route, config.seat_count))
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn booked_count(&self) -> usize {
        self.read().len()
    }

    /// Seat map in id order, taken from one consistent snapshot.
    pub fn list_seats(&self) -> Vec<SeatView> {
        let bookings = self.read();
        self.seats
            .iter()
            .map(|seat| {
                let booking = bookings.get(&seat.id);
                SeatView {
                    seat_id: seat.id,
                    seat_label: seat.label.clone(),
                    seat_type: SEAT_TYPE_SLEEPER,
                    deck: seat.deck,
                    status: if booking.is_some() { SeatStatus::Booked } else { SeatStatus::Available },
                    is_booked: booking.is_some(),
                    passenger_name: booking.map(|b| b.passenger_name.clone()),
                }
            })
            .collect()
    }

    pub fn get_booking(&self, seat_id: SeatId) -> Result<Booking, BookingError> {
        self.seat(seat_id)?;
        self.read()
            .get(&seat_id)
            .cloned()
            .ok_or(BookingError::BookingNotFound(seat_id))
    }

    pub fn create_booking(&self, request: NewBooking) -> Result<Booking, BookingError> {
        let seat = self.seat(request.seat_id)?;
        let passenger_name = normalize_passenger_name(&request.passenger_name)?;
        let (pickup, drop) = self.route.leg(&request.pickup_station, &request.drop_station)?;

        let booking = Booking {
            booking_id: Uuid::new_v4(),
            seat_id: seat.id,
            seat_label: seat.label.clone(),
            passenger_name,
            pickup_station: pickup.name.clone(),
            drop_station: drop.name.clone(),
            meal_preference: request.meal_preference,
            booked_at: Utc::now(),
        };

        // Check and insert under the same write guard.
        let mut bookings = self.write();
        match bookings.entry(seat.id) {
            Entry::Occupied(_) => {
                warn!("Seat {} is already booked, rejecting booking for {}", seat.id, booking.passenger_name);
                Err(BookingError::Conflict(seat.id))
            }
            Entry::Vacant(slot) => {
                slot.insert(booking.clone());
                info!(
                    "Seat {} ({}) booked for {}: {} -> {}",
                    booking.seat_id, booking.seat_label, booking.passenger_name, booking.pickup_station, booking.drop_station
                );
                Ok(booking)
            }
        }
    }

    /// Replaces the meal preference of the active booking; `None` clears it.
    pub fn update_meal(&self, seat_id: SeatId, meal: Option<MealPreference>) -> Result<Booking, BookingError> {
        self.seat(seat_id)?;
        let mut bookings = self.write();
        let booking = bookings
            .get_mut(&seat_id)
            .ok_or(BookingError::BookingNotFound(seat_id))?;
        booking.meal_preference = meal;
        debug!("Seat {} meal preference set to {:?}", seat_id, meal);
        Ok(booking.clone())
    }

    /// Removes the booking and frees the seat; returns what was removed.
    pub fn cancel_booking(&self, seat_id: SeatId) -> Result<Booking, BookingError> {
        self.seat(seat_id)?;
        let cancelled = self
            .write()
            .remove(&seat_id)
            .ok_or(BookingError::BookingNotFound(seat_id))?;
        info!("Booking on seat {} for {} cancelled", seat_id, cancelled.passenger_name);
        Ok(cancelled)
    }

    /// Loads the fixed demo passengers into an empty registry. Seats outside
    /// the layout are skipped. Returns how many bookings were created.
    pub fn seed_demo_bookings(&self) -> Result<usize, BookingError> {
        if self.booked_count() > 0 {
            return Ok(0);
        }

        let origin = self.route.origin().name.clone();
        let terminus = self.route.terminus().name.clone();
        let mut seeded = 0;
        for (seat_id, name, meal) in DEMO_BOOKINGS {
            if seat_id as usize > self.seats.len() {
                continue;
            }
            let request = NewBooking::new(seat_id, name, origin.as_str(), terminus.as_str()).with_meal(meal);
            match self.create_booking(request) {
                Ok(_) => seeded += 1,
                Err(BookingError::Conflict(_)) => {}
                Err(e) => return Err(e),
            }
        }
        info!("Seeded {} demo bookings", seeded);
        Ok(seeded)
    }

    fn seat(&self, seat_id: SeatId) -> Result<&Seat, BookingError> {
        // Ids are 1-based and contiguous.
        seat_id
            .checked_sub(1)
            .and_then(|idx| self.seats.get(idx as usize))
            .ok_or(BookingError::SeatNotFound(seat_id))
    }

    // Critical sections never panic mid-update, so a poisoned lock still
    // guards a consistent table.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<SeatId, Booking>> {
        self.bookings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<SeatId, Booking>> {
        self.bookings.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SeatRegistry {
    fn default() -> Self {
        Self::new(Route::ahmedabad_mumbai(), crate::config::DEFAULT_SEAT_COUNT)
    }
}
