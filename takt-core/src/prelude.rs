// Re-export key components
pub use crate::error::Error;
pub use crate::loading::{ScheduledPattern, load_scheduled};
pub use crate::model::{
    FrequencyEntry, Timetable, TimetableBuilder, Trip, TripPattern, TripTimes,
};
pub use crate::realtime::{TripUpdate, apply_update_cycle};
pub use crate::snapshot::{SnapshotPublisher, TimetableSnapshot};

// Core value types
pub use crate::model::types::{
    Direction, FeedScopedId, OccupancyStatus, PickDrop, RealTimeState, StopTime, Time,
};
