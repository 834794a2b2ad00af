use thiserror::Error;

use crate::model::types::FeedScopedId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("trip times for trip {0} added twice, use add_or_replace to overwrite")]
    DuplicateTrip(FeedScopedId),
    #[error("cannot build a timetable without a trip pattern")]
    MissingPattern,
    #[error("builder was poisoned by a failed bulk update and must be discarded")]
    PoisonedBuilder,
    #[error("time at stop {stop} of trip {trip} decreases along the trip")]
    DecreasingTimes { trip: FeedScopedId, stop: usize },
    #[error("departure before arrival at stop {stop} of trip {trip}")]
    NegativeDwell { trip: FeedScopedId, stop: usize },
    #[error("trip {trip} has {actual} stop times but its pattern has {expected} stops")]
    StopCountMismatch {
        trip: FeedScopedId,
        expected: usize,
        actual: usize,
    },
    #[error("invalid frequency entry: {0}")]
    InvalidFrequency(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
}
