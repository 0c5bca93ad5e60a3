use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Vip,
    Premium,
    Standard,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Vip => "vip",
            Tier::Premium => "premium",
            Tier::Standard => "standard",
        }
    }

    pub fn parse(raw: &str) -> Option<Tier> {
        match raw {
            "vip" => Some(Tier::Vip),
            "premium" => Some(Tier::Premium),
            "standard" => Some(Tier::Standard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Booked,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Booked => "booked",
        }
    }
}

/// A seat record as kept in the durable store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub seat_id: String,
    pub row: String,
    pub number: i32,
    pub tier: Tier,
    pub price: i32,
    pub status: SeatStatus,
    pub user_id: Option<String>,
}

/// Merged durable + hot view of one seat, as served to polling clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub id: String,
    pub row: String,
    pub number: i32,
    pub tier: Tier,
    pub price: i32,
    pub state: ViewState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    Available,
    Locked,
    Booked,
}
