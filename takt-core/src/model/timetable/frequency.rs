//! Headway-based service entries

use std::sync::Arc;

use crate::Error;
use crate::model::types::Time;

use super::trip_times::TripTimes;

/// Repeating departures between `start_time` and `end_time` every
/// `headway` seconds. The wrapped trip times give the within-headway
/// stop-time offsets; they do not participate in the per-trip uniqueness
/// of a timetable, so several entries may share one trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub start_time: Time,
    pub end_time: Time,
    pub headway: u32,
    pub exact_times: bool,
    pub trip_times: Arc<TripTimes>,
}

impl FrequencyEntry {
    /// # Errors
    ///
    /// `end_time` must be after `start_time` and `headway` non-zero.
    pub fn new(
        start_time: Time,
        end_time: Time,
        headway: u32,
        exact_times: bool,
        trip_times: Arc<TripTimes>,
    ) -> Result<Self, Error> {
        if end_time <= start_time {
            return Err(Error::InvalidFrequency(format!(
                "end time {end_time} not after start time {start_time}"
            )));
        }
        if headway == 0 {
            return Err(Error::InvalidFrequency("zero headway".to_string()));
        }
        Ok(Self {
            start_time,
            end_time,
            headway,
            exact_times,
            trip_times,
        })
    }

    /// Same window and headway, new representative trip times. Used by the
    /// builder's bulk update to keep frequency entries in lock-step with
    /// the plain trip times.
    pub fn with_trip_times(&self, trip_times: Arc<TripTimes>) -> Self {
        Self {
            start_time: self.start_time,
            end_time: self.end_time,
            headway: self.headway,
            exact_times: self.exact_times,
            trip_times,
        }
    }

    /// Number of departures the entry generates.
    pub fn departure_count(&self) -> u32 {
        ((self.end_time - self.start_time) as u32).div_ceil(self.headway)
    }

    /// Earliest headway departure at or after `time`, if any remains
    /// within the window. Expansion into concrete boardings is left to the
    /// search layer.
    pub fn next_departure_after(&self, time: Time) -> Option<Time> {
        if time <= self.start_time {
            return Some(self.start_time);
        }
        let elapsed = (time - self.start_time) as u32;
        let steps = elapsed.div_ceil(self.headway);
        let departure = self.start_time + (steps * self.headway) as Time;
        (departure < self.end_time).then_some(departure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pattern::Trip;
    use crate::model::types::{Direction, FeedScopedId, StopTime};

    fn rep_times() -> Arc<TripTimes> {
        let trip = Arc::new(Trip::new(
            FeedScopedId::new("f", "shuttle"),
            FeedScopedId::new("f", "route-9"),
            Direction::Outbound,
        ));
        Arc::new(TripTimes::new(trip, vec![StopTime::new(0, 0), StopTime::new(300, 300)]).unwrap())
    }

    #[test]
    fn rejects_empty_window_and_zero_headway() {
        assert!(FrequencyEntry::new(3600, 3600, 600, false, rep_times()).is_err());
        assert!(FrequencyEntry::new(0, 3600, 0, false, rep_times()).is_err());
    }

    #[test]
    fn counts_departures_including_partial_tail() {
        let entry = FrequencyEntry::new(0, 3000, 900, false, rep_times()).unwrap();
        // 0, 900, 1800, 2700
        assert_eq!(entry.departure_count(), 4);
    }

    #[test]
    fn next_departure_snaps_to_headway_grid() {
        let entry = FrequencyEntry::new(3600, 7200, 600, true, rep_times()).unwrap();
        assert_eq!(entry.next_departure_after(0), Some(3600));
        assert_eq!(entry.next_departure_after(3601), Some(4200));
        assert_eq!(entry.next_departure_after(4200), Some(4200));
        assert_eq!(entry.next_departure_after(7000), None);
    }
}
