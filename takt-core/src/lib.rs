//! Versioned in-memory transit timetable model.
//!
//! The crate holds, per trip pattern and service date, the authoritative
//! set of vehicle arrival/departure times, and produces new immutable
//! versions of that data as real-time updates arrive. Route search reads
//! a published [`Timetable`] without locking; all mutation is staged in a
//! [`TimetableBuilder`] and becomes visible through one atomic snapshot
//! swap in the [`snapshot`] module.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod realtime;
pub mod snapshot;

pub use error::Error;
pub use model::{
    Direction, FeedScopedId, FrequencyEntry, RealTimeState, StopTime, Time, Timetable,
    TimetableBuilder, Trip, TripPattern, TripTimes,
};
pub use snapshot::{SnapshotPublisher, TimetableSnapshot};
