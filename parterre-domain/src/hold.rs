/// Value encoding for `seat:{seat_id}` keys in the hot state store.
///
/// A locked seat carries its holder inline (`LOCKED:{user_id}`) so the
/// release and purchase scripts can compare ownership without a second
/// lookup. A sold seat is the bare marker `SOLD` with no TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatState {
    Locked(String),
    Sold,
}

const LOCKED_PREFIX: &str = "LOCKED:";
const SOLD_VALUE: &str = "SOLD";

impl SeatState {
    pub fn locked(user_id: &str) -> SeatState {
        SeatState::Locked(user_id.to_string())
    }

    pub fn parse(raw: &str) -> Option<SeatState> {
        if raw == SOLD_VALUE {
            return Some(SeatState::Sold);
        }
        raw.strip_prefix(LOCKED_PREFIX)
            .filter(|holder| !holder.is_empty())
            .map(|holder| SeatState::Locked(holder.to_string()))
    }

    pub fn encode(&self) -> String {
        match self {
            SeatState::Locked(user_id) => format!("{}{}", LOCKED_PREFIX, user_id),
            SeatState::Sold => SOLD_VALUE.to_string(),
        }
    }

    pub fn is_locked_by(&self, user_id: &str) -> bool {
        matches!(self, SeatState::Locked(holder) if holder == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locked_with_holder() {
        let state = SeatState::parse("LOCKED:u-42").unwrap();
        assert_eq!(state, SeatState::Locked("u-42".to_string()));
        assert!(state.is_locked_by("u-42"));
        assert!(!state.is_locked_by("u-99"));
    }

    #[test]
    fn parses_sold_marker() {
        assert_eq!(SeatState::parse("SOLD"), Some(SeatState::Sold));
    }

    #[test]
    fn rejects_garbage_values() {
        assert_eq!(SeatState::parse(""), None);
        assert_eq!(SeatState::parse("LOCKED:"), None);
        assert_eq!(SeatState::parse("sold"), None);
        assert_eq!(SeatState::parse("HELD:u-1"), None);
    }

    #[test]
    fn encode_round_trips() {
        for state in [SeatState::locked("u-7"), SeatState::Sold] {
            assert_eq!(SeatState::parse(&state.encode()), Some(state));
        }
    }
}
