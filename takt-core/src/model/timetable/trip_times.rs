//! Per-stop times of a single trip
//!
//! A `TripTimes` is immutable once it leaves a builder. Every correction
//! path (delay, cancellation, reroute) produces a new value that is handed
//! back to a `TimetableBuilder`; readers holding the old value are never
//! affected.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::Error;
use crate::model::pattern::Trip;
use crate::model::types::{FeedScopedId, OccupancyStatus, PickDrop, RealTimeState, StopTime, Time};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripTimes {
    trip: Arc<Trip>,
    /// Static schedule, fixed for the lifetime of the value.
    scheduled: Vec<StopTime>,
    /// Real-time row, equal to `scheduled` until an update touches it.
    realtime: Vec<StopTime>,
    timepoints: Vec<bool>,
    pickups: Vec<PickDrop>,
    dropoffs: Vec<PickDrop>,
    occupancies: Vec<OccupancyStatus>,
    state: RealTimeState,
}

impl TripTimes {
    /// Build scheduled trip times from the static schedule. Real-time rows
    /// start out identical to the scheduled ones and all per-stop flags take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Rejects rows where a departure precedes its arrival or where times
    /// decrease along the trip.
    pub fn new(trip: Arc<Trip>, scheduled: Vec<StopTime>) -> Result<Self, Error> {
        validate_rows(&trip.id, &scheduled)?;
        let stop_count = scheduled.len();
        Ok(Self {
            trip,
            realtime: scheduled.clone(),
            scheduled,
            timepoints: vec![false; stop_count],
            pickups: vec![PickDrop::default(); stop_count],
            dropoffs: vec![PickDrop::default(); stop_count],
            occupancies: vec![OccupancyStatus::default(); stop_count],
            state: RealTimeState::Scheduled,
        })
    }

    /// Replace the per-stop flags, consuming `self`.
    ///
    /// # Errors
    ///
    /// All four vectors must have one entry per stop.
    pub fn with_stop_flags(
        mut self,
        timepoints: Vec<bool>,
        pickups: Vec<PickDrop>,
        dropoffs: Vec<PickDrop>,
        occupancies: Vec<OccupancyStatus>,
    ) -> Result<Self, Error> {
        let expected = self.stop_count();
        for actual in [
            timepoints.len(),
            pickups.len(),
            dropoffs.len(),
            occupancies.len(),
        ] {
            if actual != expected {
                return Err(Error::StopCountMismatch {
                    trip: self.trip.id.clone(),
                    expected,
                    actual,
                });
            }
        }
        self.timepoints = timepoints;
        self.pickups = pickups;
        self.dropoffs = dropoffs;
        self.occupancies = occupancies;
        Ok(self)
    }

    /// Mark a trip as coming from a real-time feed rather than the static
    /// schedule (state `Added`), consuming `self`.
    pub fn marked_added(mut self) -> Self {
        self.state = RealTimeState::Added;
        self
    }

    pub fn trip(&self) -> &Arc<Trip> {
        &self.trip
    }

    pub fn trip_id(&self) -> &FeedScopedId {
        &self.trip.id
    }

    pub fn state(&self) -> RealTimeState {
        self.state
    }

    pub fn is_canceled(&self) -> bool {
        self.state == RealTimeState::Canceled
    }

    pub fn stop_count(&self) -> usize {
        self.scheduled.len()
    }

    pub fn scheduled_times(&self) -> &[StopTime] {
        &self.scheduled
    }

    pub fn realtime_times(&self) -> &[StopTime] {
        &self.realtime
    }

    pub fn scheduled_time(&self, stop: usize) -> Option<StopTime> {
        self.scheduled.get(stop).copied()
    }

    pub fn arrival(&self, stop: usize) -> Option<Time> {
        self.realtime.get(stop).map(|st| st.arrival)
    }

    pub fn departure(&self, stop: usize) -> Option<Time> {
        self.realtime.get(stop).map(|st| st.departure)
    }

    /// First-stop departure of the static schedule, the primary sort key of
    /// a built timetable.
    pub fn first_scheduled_departure(&self) -> Option<Time> {
        self.scheduled.first().map(|st| st.departure)
    }

    /// First-stop departure with real-time corrections applied.
    pub fn first_departure(&self) -> Option<Time> {
        self.realtime.first().map(|st| st.departure)
    }

    pub fn last_arrival(&self) -> Option<Time> {
        self.realtime.last().map(|st| st.arrival)
    }

    pub fn timepoint(&self, stop: usize) -> bool {
        self.timepoints.get(stop).copied().unwrap_or(false)
    }

    pub fn pickup(&self, stop: usize) -> PickDrop {
        self.pickups.get(stop).copied().unwrap_or_default()
    }

    pub fn dropoff(&self, stop: usize) -> PickDrop {
        self.dropoffs.get(stop).copied().unwrap_or_default()
    }

    pub fn occupancy(&self, stop: usize) -> OccupancyStatus {
        self.occupancies.get(stop).copied().unwrap_or_default()
    }

    /// A copy of this trip marked canceled. Times are kept so presentation
    /// layers can still show what would have run.
    pub fn canceled_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.state = RealTimeState::Canceled;
        copy
    }

    /// A copy with a fresh real-time row (state `Updated`). The scheduled
    /// row is untouched.
    ///
    /// # Errors
    ///
    /// The new row must have one entry per stop and consistent times.
    pub fn with_updated_times(&self, realtime: Vec<StopTime>) -> Result<Self, Error> {
        if realtime.len() != self.stop_count() {
            return Err(Error::StopCountMismatch {
                trip: self.trip.id.clone(),
                expected: self.stop_count(),
                actual: realtime.len(),
            });
        }
        validate_rows(&self.trip.id, &realtime)?;
        let mut copy = self.clone();
        copy.realtime = realtime;
        copy.state = RealTimeState::Updated;
        Ok(copy)
    }

    /// A copy with every time (scheduled and real-time) moved by `delta`
    /// seconds. Used for schedule-wide corrections such as timezone or
    /// calendar shifts; the real-time state is unchanged.
    pub fn shifted(&self, delta: Time) -> Self {
        let mut copy = self.clone();
        copy.scheduled = copy.scheduled.iter().map(|st| st.shifted(delta)).collect();
        copy.realtime = copy.realtime.iter().map(|st| st.shifted(delta)).collect();
        copy
    }

    /// Canonical ordering of trip times within a timetable: first scheduled
    /// departure, then trip id as a tie-break. Deterministic across rebuilds
    /// from the same logical input.
    pub fn departure_order(a: &Self, b: &Self) -> Ordering {
        a.first_scheduled_departure()
            .cmp(&b.first_scheduled_departure())
            .then_with(|| a.trip.id.cmp(&b.trip.id))
    }
}

fn validate_rows(trip: &FeedScopedId, rows: &[StopTime]) -> Result<(), Error> {
    for (stop, st) in rows.iter().enumerate() {
        if st.departure < st.arrival {
            return Err(Error::NegativeDwell {
                trip: trip.clone(),
                stop,
            });
        }
        if stop > 0 && st.arrival < rows[stop - 1].departure {
            return Err(Error::DecreasingTimes {
                trip: trip.clone(),
                stop,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Direction;

    fn trip(id: &str) -> Arc<Trip> {
        Arc::new(Trip::new(
            FeedScopedId::new("f", id),
            FeedScopedId::new("f", "route-1"),
            Direction::Inbound,
        ))
    }

    fn times(rows: &[(Time, Time)]) -> Vec<StopTime> {
        rows.iter().map(|&(a, d)| StopTime::new(a, d)).collect()
    }

    #[test]
    fn rejects_departure_before_arrival() {
        let err = TripTimes::new(trip("t1"), times(&[(100, 90)])).unwrap_err();
        assert!(matches!(err, Error::NegativeDwell { stop: 0, .. }));
    }

    #[test]
    fn rejects_decreasing_times_along_the_trip() {
        let err = TripTimes::new(trip("t1"), times(&[(0, 100), (50, 60)])).unwrap_err();
        assert!(matches!(err, Error::DecreasingTimes { stop: 1, .. }));
    }

    #[test]
    fn realtime_row_starts_equal_to_scheduled() {
        let tt = TripTimes::new(trip("t1"), times(&[(0, 10), (100, 110)])).unwrap();
        assert_eq!(tt.scheduled_times(), tt.realtime_times());
        assert_eq!(tt.state(), RealTimeState::Scheduled);
        assert_eq!(tt.first_departure(), Some(10));
        assert_eq!(tt.last_arrival(), Some(100));
    }

    #[test]
    fn updated_times_leave_schedule_untouched() {
        let tt = TripTimes::new(trip("t1"), times(&[(0, 10), (100, 110)])).unwrap();
        let updated = tt
            .with_updated_times(times(&[(60, 70), (160, 170)]))
            .unwrap();
        assert_eq!(updated.state(), RealTimeState::Updated);
        assert_eq!(updated.first_departure(), Some(70));
        assert_eq!(updated.first_scheduled_departure(), Some(10));
        assert_eq!(updated.scheduled_times(), tt.scheduled_times());
    }

    #[test]
    fn updated_times_reject_wrong_stop_count() {
        let tt = TripTimes::new(trip("t1"), times(&[(0, 10), (100, 110)])).unwrap();
        let err = tt.with_updated_times(times(&[(60, 70)])).unwrap_err();
        assert!(matches!(
            err,
            Error::StopCountMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn canceled_copy_keeps_times() {
        let tt = TripTimes::new(trip("t1"), times(&[(0, 10)])).unwrap();
        let canceled = tt.canceled_copy();
        assert!(canceled.is_canceled());
        assert_eq!(canceled.scheduled_times(), tt.scheduled_times());
        assert!(!tt.is_canceled());
    }

    #[test]
    fn shift_moves_both_rows() {
        let tt = TripTimes::new(trip("t1"), times(&[(0, 0), (300, 300)])).unwrap();
        let shifted = tt.shifted(60);
        assert_eq!(shifted.first_scheduled_departure(), Some(60));
        assert_eq!(shifted.arrival(1), Some(360));
    }

    #[test]
    fn departure_order_breaks_ties_on_trip_id() {
        let a = TripTimes::new(trip("a"), times(&[(0, 100)])).unwrap();
        let b = TripTimes::new(trip("b"), times(&[(0, 100)])).unwrap();
        assert_eq!(TripTimes::departure_order(&a, &b), Ordering::Less);
        assert_eq!(TripTimes::departure_order(&b, &a), Ordering::Greater);
    }
}
