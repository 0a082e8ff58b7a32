use proptest::prelude::*;

use bus_booking::config::DEFAULT_STATIONS;
use bus_booking::error::ErrorKind;
use bus_booking::models::{MealPreference, NewBooking};
use bus_booking::services::registry::SeatRegistry;

fn meal() -> impl Strategy<Value = Option<MealPreference>> {
    prop_oneof![
        Just(None),
        Just(Some(MealPreference::Veg)),
        Just(Some(MealPreference::NonVeg)),
        Just(Some(MealPreference::Jain)),
    ]
}

proptest! {
    #[test]
    fn backwards_or_zero_length_trips_are_invalid(
        seat_id in 1u32..=30,
        pickup in 0usize..DEFAULT_STATIONS.len(),
        drop in 0usize..DEFAULT_STATIONS.len(),
        name in "[A-Za-z ]{0,20}",
        meal in meal(),
    ) {
        prop_assume!(drop <= pickup);
        let registry = SeatRegistry::default();

        let mut request = NewBooking::new(seat_id, name, DEFAULT_STATIONS[pickup], DEFAULT_STATIONS[drop]);
        request.meal_preference = meal;

        let err = registry.create_booking(request).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidInput);
        prop_assert_eq!(registry.booked_count(), 0);
    }

    #[test]
    fn forward_trips_book_and_cancel_cleanly(
        seat_id in 1u32..=30,
        pickup in 0usize..DEFAULT_STATIONS.len(),
        drop in 0usize..DEFAULT_STATIONS.len(),
        meal in meal(),
    ) {
        prop_assume!(pickup < drop);
        let registry = SeatRegistry::default();

        let mut request = NewBooking::new(seat_id, "Asha", DEFAULT_STATIONS[pickup], DEFAULT_STATIONS[drop]);
        request.meal_preference = meal;

        let booking = registry.create_booking(request).unwrap();
        prop_assert_eq!(booking.pickup_station.as_str(), DEFAULT_STATIONS[pickup]);
        prop_assert_eq!(booking.drop_station.as_str(), DEFAULT_STATIONS[drop]);
        prop_assert_eq!(booking.meal_preference, meal);

        registry.cancel_booking(seat_id).unwrap();
        prop_assert!(registry.list_seats().iter().all(|s| !s.is_booked));
    }
}
