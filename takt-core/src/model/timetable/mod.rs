//! Versioned timetable snapshots
//!
//! A [`Timetable`] binds one [`TripPattern`] and service date to the
//! trip times and frequency entries in effect for that date. It is
//! immutable once built; every change goes through a [`TimetableBuilder`]
//! that stages a private working copy and produces a fresh version, so a
//! reference handed to a reader is never mutated underneath it.

pub mod builder;
pub mod frequency;
pub mod trip_times;

pub use builder::TimetableBuilder;
pub use frequency::FrequencyEntry;
pub use trip_times::TripTimes;

use std::sync::Arc;

use chrono::NaiveDate;

use crate::model::pattern::TripPattern;
use crate::model::types::{Direction, FeedScopedId, Time};

/// Immutable set of trip times and frequency entries for one pattern on
/// one service date. A `None` date is the pattern's scheduled default
/// covering all dates; real-time updates materialize date-specific
/// versions.
#[derive(Debug, Clone)]
pub struct Timetable {
    pattern: Arc<TripPattern>,
    service_date: Option<NaiveDate>,
    /// Sorted by [`TripTimes::departure_order`], unique per trip id.
    trip_times: Vec<Arc<TripTimes>>,
    /// Insertion order of the builder, which is semantically meaningful.
    frequencies: Vec<FrequencyEntry>,
}

impl Timetable {
    pub(crate) fn from_parts(
        pattern: Arc<TripPattern>,
        service_date: Option<NaiveDate>,
        trip_times: Vec<Arc<TripTimes>>,
        frequencies: Vec<FrequencyEntry>,
    ) -> Self {
        Self {
            pattern,
            service_date,
            trip_times,
            frequencies,
        }
    }

    pub fn builder() -> TimetableBuilder {
        TimetableBuilder::new()
    }

    /// A builder seeded with this timetable's contents, for the next
    /// real-time cycle. `self` stays untouched.
    pub fn copy_on_write(&self) -> TimetableBuilder {
        TimetableBuilder::seeded_from(self)
    }

    pub fn pattern(&self) -> &Arc<TripPattern> {
        &self.pattern
    }

    pub fn service_date(&self) -> Option<NaiveDate> {
        self.service_date
    }

    /// Trip times in canonical order, ready for ordered iteration and
    /// binary search by departure.
    pub fn trip_times(&self) -> &[Arc<TripTimes>] {
        &self.trip_times
    }

    pub fn frequency_entries(&self) -> &[FrequencyEntry] {
        &self.frequencies
    }

    pub fn trip_count(&self) -> usize {
        self.trip_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trip_times.is_empty() && self.frequencies.is_empty()
    }

    pub fn trip_times_for(&self, trip: &FeedScopedId) -> Option<&Arc<TripTimes>> {
        self.trip_times.iter().find(|tt| tt.trip_id() == trip)
    }

    /// Index of the first trip whose scheduled first-stop departure is at
    /// or after `time`, or `None` when every trip departs earlier. Binary
    /// search over the sorted trip times.
    pub fn first_departure_at_or_after(&self, time: Time) -> Option<usize> {
        let idx = self
            .trip_times
            .partition_point(|tt| tt.first_scheduled_departure().is_none_or(|d| d < time));
        (idx < self.trip_times.len()).then_some(idx)
    }

    /// Direction shared by this timetable's trips, derived from a
    /// representative trip (first scheduled, else first frequency entry).
    pub fn direction(&self) -> Direction {
        self.trip_times
            .first()
            .map(|tt| tt.trip().direction)
            .or_else(|| self.frequencies.first().map(|f| f.trip_times.trip().direction))
            .unwrap_or(Direction::Unknown)
    }
}
