//! External identities the timetable references but does not own

use serde::{Deserialize, Serialize};

use super::types::{Direction, FeedScopedId};

/// One scheduled journey of a vehicle. Owned by the transit schedule
/// index; timetables only hold references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: FeedScopedId,
    pub route: FeedScopedId,
    pub direction: Direction,
    pub headsign: Option<String>,
}

impl Trip {
    pub fn new(id: FeedScopedId, route: FeedScopedId, direction: Direction) -> Self {
        Self {
            id,
            route,
            direction,
            headsign: None,
        }
    }
}

/// The ordered stop sequence shared by a family of trips. One timetable
/// exists per (pattern, service date); the `None` date is the scheduled
/// default covering all dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripPattern {
    pub id: FeedScopedId,
    pub route: FeedScopedId,
    pub stops: Vec<FeedScopedId>,
}

impl TripPattern {
    pub fn new(id: FeedScopedId, route: FeedScopedId, stops: Vec<FeedScopedId>) -> Self {
        Self { id, route, stops }
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }
}
