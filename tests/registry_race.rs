use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Barrier;

use bus_booking::error::{BookingError, ErrorKind};
use bus_booking::models::NewBooking;
use bus_booking::services::registry::SeatRegistry;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_bookings_for_one_seat_produce_exactly_one_winner() {
    for round in 0..20 {
        let registry = Arc::new(SeatRegistry::default());
        let contenders = 8;
        let barrier = Arc::new(Barrier::new(contenders));

        let attempts = (0..contenders).map(|i| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                registry.create_booking(NewBooking::new(5, format!("Passenger {}", i), "Ahmedabad", "Mumbai"))
            })
        });

        let results: Vec<_> = join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1, "round {}", round);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == BookingError::Conflict(5) && e.kind() == ErrorKind::Conflict));

        assert_eq!(registry.booked_count(), 1);
        let stored = registry.get_booking(5).unwrap();
        assert_eq!(&stored, winners[0]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_on_distinct_seats_all_succeed() {
    let registry = Arc::new(SeatRegistry::default());

    let attempts = (1..=30u32).map(|seat_id| {
        let registry = registry.clone();
        tokio::spawn(async move {
            registry.create_booking(NewBooking::new(seat_id, format!("Passenger {}", seat_id), "Surat", "Mumbai"))
        })
    });

    for joined in join_all(attempts).await {
        assert!(joined.unwrap().is_ok());
    }
    assert!(registry.list_seats().iter().all(|s| s.is_booked));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_see_a_partial_commit() {
    let registry = Arc::new(SeatRegistry::default());

    let writer = {
        let registry = registry.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                registry.create_booking(NewBooking::new(17, "Nisha", "Ahmedabad", "Vapi")).unwrap();
                registry.cancel_booking(17).unwrap();
            }
        })
    };

    let reader = {
        let registry = registry.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                for seat in registry.list_seats() {
                    // Status, flag and passenger always move together.
                    assert_eq!(seat.is_booked, seat.passenger_name.is_some());
                }
                tokio::task::yield_now().await;
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
    assert_eq!(registry.booked_count(), 0);
}
