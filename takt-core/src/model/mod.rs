//! Data model for the versioned transit timetable

pub mod pattern;
pub mod timetable;
pub mod types;

pub use pattern::{Trip, TripPattern};
pub use timetable::{FrequencyEntry, Timetable, TimetableBuilder, TripTimes};
pub use types::{
    Direction, FeedScopedId, OccupancyStatus, PickDrop, RealTimeState, StopTime, Time,
};
