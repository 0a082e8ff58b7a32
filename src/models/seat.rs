use serde::Serialize;

pub type SeatId = u32;

pub const SEAT_TYPE_SLEEPER: &str = "sleeper";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Booked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Deck {
    Upper,
    Lower,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub id: SeatId,
    pub label: String,
    pub deck: Deck,
}

impl Seat {
    /// Builds the fixed layout: the first half of the seats is the upper deck
    /// (`U01`, `U02`, ...), the rest the lower deck (`L01`, ...).
    pub fn layout(seat_count: u32) -> Vec<Seat> {
        let upper = seat_count.div_ceil(2);
        (1..=seat_count)
            .map(|id| {
                let (deck, prefix, position) = if id <= upper {
                    (Deck::Upper, 'U', id)
                } else {
                    (Deck::Lower, 'L', id - upper)
                };
                Seat {
                    id,
                    label: format!("{}{:02}", prefix, position),
                    deck,
                }
            })
            .collect()
    }
}

/// One row of the seat map, status derived from the booking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatView {
    pub seat_id: SeatId,
    pub seat_label: String,
    pub seat_type: &'static str,
    pub deck: Deck,
    pub status: SeatStatus,
    pub is_booked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passenger_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_seat_layout_has_two_decks_of_fifteen() {
        let seats = Seat::layout(30);
        assert_eq!(seats.len(), 30);
        assert_eq!(seats[0].label, "U01");
        assert_eq!(seats[14].label, "U15");
        assert_eq!(seats[15].label, "L01");
        assert_eq!(seats[29].label, "L15");
        assert_eq!(seats.iter().filter(|s| s.deck == Deck::Upper).count(), 15);
    }
}
