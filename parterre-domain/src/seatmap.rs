//! The fixed venue layout. Rows and prices are seeded once at boot and
//! treated as constants at runtime.

use crate::seat::{Seat, SeatStatus, Tier};

pub const ROWS: [char; 10] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];
pub const SEATS_PER_ROW: i32 = 10;

pub fn tier_for_row(row: char) -> Tier {
    match row {
        'A' | 'B' => Tier::Vip,
        'C' | 'D' | 'E' => Tier::Premium,
        _ => Tier::Standard,
    }
}

/// Price in currency minor units.
pub fn price_for_tier(tier: Tier) -> i32 {
    match tier {
        Tier::Vip => 15_000,
        Tier::Premium => 9_000,
        Tier::Standard => 4_500,
    }
}

pub fn generate() -> Vec<Seat> {
    let mut seats = Vec::with_capacity(ROWS.len() * SEATS_PER_ROW as usize);
    for row in ROWS {
        let tier = tier_for_row(row);
        for number in 1..=SEATS_PER_ROW {
            seats.push(Seat {
                seat_id: format!("{}{}", row, number),
                row: row.to_string(),
                number,
                tier,
                price: price_for_tier(tier),
                status: SeatStatus::Available,
                user_id: None,
            });
        }
    }
    seats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_full_inventory() {
        let seats = generate();
        assert_eq!(seats.len(), 100);
        assert!(seats.iter().all(|s| s.status == SeatStatus::Available));
        assert!(seats.iter().all(|s| s.user_id.is_none()));
    }

    #[test]
    fn seat_ids_are_unique() {
        let seats = generate();
        let mut ids: Vec<&str> = seats.iter().map(|s| s.seat_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), seats.len());
    }

    #[test]
    fn tiers_follow_row_bands() {
        assert_eq!(tier_for_row('A'), Tier::Vip);
        assert_eq!(tier_for_row('C'), Tier::Premium);
        assert_eq!(tier_for_row('J'), Tier::Standard);

        let seats = generate();
        let a1 = seats.iter().find(|s| s.seat_id == "A1").unwrap();
        assert_eq!(a1.price, 15_000);
        let f6 = seats.iter().find(|s| s.seat_id == "F6").unwrap();
        assert_eq!(f6.tier, Tier::Standard);
    }
}
