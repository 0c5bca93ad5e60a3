use std::collections::HashMap;

use parterre_domain::{Seat, SeatState, SeatStatus, SeatView, ViewState};

/// One hot-store entry: decoded value plus remaining TTL in seconds.
#[derive(Debug, Clone)]
pub struct HotEntry {
    pub state: SeatState,
    pub ttl: i64,
}

pub fn overlay_from_entries(entries: Vec<(String, String, i64)>) -> HashMap<String, HotEntry> {
    entries
        .into_iter()
        .filter_map(|(seat_id, raw, ttl)| {
            SeatState::parse(&raw).map(|state| (seat_id, HotEntry { state, ttl }))
        })
        .collect()
}

/// Per-seat overlay of the hot store onto the ledger records.
///
/// The ledger wins on `booked`; a hot SOLD marker also reads as booked; a
/// LOCKED entry reads as locked with its holder and remaining TTL; anything
/// else is available.
pub fn merge(seats: Vec<Seat>, overlay: &HashMap<String, HotEntry>) -> Vec<SeatView> {
    seats
        .into_iter()
        .map(|seat| {
            let (state, locked_by, ttl) = if seat.status == SeatStatus::Booked {
                (ViewState::Booked, None, None)
            } else {
                match overlay.get(&seat.seat_id) {
                    Some(HotEntry {
                        state: SeatState::Sold,
                        ..
                    }) => (ViewState::Booked, None, None),
                    Some(HotEntry {
                        state: SeatState::Locked(holder),
                        ttl,
                    }) => (
                        ViewState::Locked,
                        Some(holder.clone()),
                        Some((*ttl).max(0)),
                    ),
                    None => (ViewState::Available, None, None),
                }
            };

            SeatView {
                id: seat.seat_id,
                row: seat.row,
                number: seat.number,
                tier: seat.tier,
                price: seat.price,
                state,
                locked_by,
                ttl,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parterre_domain::Tier;

    fn seat(id: &str, status: SeatStatus) -> Seat {
        Seat {
            seat_id: id.to_string(),
            row: id[..1].to_string(),
            number: id[1..].parse().unwrap(),
            tier: Tier::Standard,
            price: 4_500,
            status,
            user_id: None,
        }
    }

    fn entry(state: SeatState, ttl: i64) -> HotEntry {
        HotEntry { state, ttl }
    }

    #[test]
    fn ledger_booked_wins_over_any_overlay() {
        let mut overlay = HashMap::new();
        overlay.insert("C3".to_string(), entry(SeatState::locked("u-1"), 120));

        let views = merge(vec![seat("C3", SeatStatus::Booked)], &overlay);
        assert_eq!(views[0].state, ViewState::Booked);
        assert_eq!(views[0].locked_by, None);
        assert_eq!(views[0].ttl, None);
    }

    #[test]
    fn hot_sold_marker_reads_as_booked() {
        let mut overlay = HashMap::new();
        overlay.insert("D4".to_string(), entry(SeatState::Sold, -1));

        let views = merge(vec![seat("D4", SeatStatus::Available)], &overlay);
        assert_eq!(views[0].state, ViewState::Booked);
    }

    #[test]
    fn locked_entry_carries_holder_and_ttl() {
        let mut overlay = HashMap::new();
        overlay.insert("E5".to_string(), entry(SeatState::locked("u-42"), 287));

        let views = merge(vec![seat("E5", SeatStatus::Available)], &overlay);
        assert_eq!(views[0].state, ViewState::Locked);
        assert_eq!(views[0].locked_by.as_deref(), Some("u-42"));
        assert_eq!(views[0].ttl, Some(287));
    }

    #[test]
    fn no_overlay_means_available() {
        let views = merge(vec![seat("F6", SeatStatus::Available)], &HashMap::new());
        assert_eq!(views[0].state, ViewState::Available);
        assert_eq!(views[0].locked_by, None);
    }

    #[test]
    fn never_available_while_sold_anywhere() {
        // Per-seat property: a seat with a SOLD key or a booked record must
        // not surface as available, whichever store reported it.
        let mut overlay = HashMap::new();
        overlay.insert("A1".to_string(), entry(SeatState::Sold, -1));

        let views = merge(
            vec![seat("A1", SeatStatus::Available), seat("A2", SeatStatus::Booked)],
            &overlay,
        );
        assert!(views.iter().all(|v| v.state == ViewState::Booked));
    }

    #[test]
    fn garbage_hot_values_are_dropped_from_overlay() {
        let overlay = overlay_from_entries(vec![
            ("A1".to_string(), "LOCKED:u-9".to_string(), 10),
            ("A2".to_string(), "corrupted".to_string(), 10),
        ]);
        assert!(overlay.contains_key("A1"));
        assert!(!overlay.contains_key("A2"));
    }

    #[test]
    fn expired_but_unreaped_ttl_clamps_to_zero() {
        let mut overlay = HashMap::new();
        overlay.insert("B2".to_string(), entry(SeatState::locked("u-1"), -2));

        let views = merge(vec![seat("B2", SeatStatus::Available)], &overlay);
        assert_eq!(views[0].ttl, Some(0));
    }
}
