//! Shared value types for the timetable model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Seconds from service-day midnight. Negative values and values past
/// 24h are legal (overnight trips, corrections across midnight).
pub type Time = i32;

/// One arrival/departure pair at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopTime {
    pub arrival: Time,
    pub departure: Time,
}

impl StopTime {
    pub fn new(arrival: Time, departure: Time) -> Self {
        Self { arrival, departure }
    }

    pub fn shifted(self, delta: Time) -> Self {
        Self {
            arrival: self.arrival + delta,
            departure: self.departure + delta,
        }
    }
}

/// Direction of travel along a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Unknown,
    Outbound,
    Inbound,
}

/// Real-time status of a trip within one timetable version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RealTimeState {
    /// Times come straight from the static schedule.
    #[default]
    Scheduled,
    /// Times were adjusted by a real-time update.
    Updated,
    /// The whole trip is canceled for this service date.
    Canceled,
    /// The trip does not exist in the static schedule.
    Added,
    /// The trip was rerouted to a different stop sequence.
    Modified,
}

/// Boarding/alighting rule at one stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PickDrop {
    #[default]
    Scheduled,
    None,
    CallAgency,
    CoordinateWithDriver,
}

impl PickDrop {
    /// Whether a passenger can use this stop at all.
    pub fn is_routable(self) -> bool {
        !matches!(self, PickDrop::None)
    }
}

/// Expected occupancy of the vehicle when leaving a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OccupancyStatus {
    #[default]
    NoData,
    Empty,
    ManySeatsAvailable,
    FewSeatsAvailable,
    StandingRoomOnly,
    CrushedStandingRoomOnly,
    Full,
    NotAcceptingPassengers,
}

/// Identifier scoped to the feed that produced it, so ids from different
/// feeds never collide. Displayed and parsed as `feed:id`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeedScopedId {
    pub feed_id: String,
    pub id: String,
}

impl FeedScopedId {
    pub fn new(feed_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            feed_id: feed_id.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for FeedScopedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.feed_id, self.id)
    }
}

impl FromStr for FeedScopedId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (feed_id, id) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidData(format!("feed-scoped id without ':': {s}")))?;
        if feed_id.is_empty() || id.is_empty() {
            return Err(Error::InvalidData(format!(
                "feed-scoped id with empty part: {s}"
            )));
        }
        Ok(Self::new(feed_id, id))
    }
}
