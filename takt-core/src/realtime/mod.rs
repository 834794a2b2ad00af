//! Application of one real-time update cycle
//!
//! One cycle for one (pattern, date): seed a builder from the currently
//! published timetable, apply every update through the replace path,
//! build and publish. The pipeline calling this must serialize cycles per
//! pattern/date; a failed cycle leaves the previous version authoritative.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::Error;
use crate::model::{FeedScopedId, FrequencyEntry, Timetable, TripPattern, TripTimes};
use crate::snapshot::SnapshotPublisher;

/// One feed event within an update cycle.
#[derive(Debug, Clone)]
pub enum TripUpdate {
    /// New or corrected trip times, replacing any earlier version of the
    /// trip. Re-announcements within one cycle are expected and last out.
    AddOrReplace(Arc<TripTimes>),
    /// Keep the trip visible but mark it canceled.
    Cancel(FeedScopedId),
    /// Drop the trip from the timetable entirely.
    Remove(FeedScopedId),
    AddFrequency(FrequencyEntry),
}

/// Apply one update cycle and publish the resulting timetable version.
///
/// Seeds from the published timetable for (pattern, date) — falling back
/// to the pattern's scheduled default, then to an empty builder for
/// patterns that exist only to carry real-time additions.
///
/// # Errors
///
/// Build failures propagate; nothing is published in that case.
pub fn apply_update_cycle(
    publisher: &SnapshotPublisher,
    pattern: &Arc<TripPattern>,
    date: NaiveDate,
    updates: Vec<TripUpdate>,
) -> Result<Arc<Timetable>, Error> {
    let snapshot = publisher.latest();
    let mut builder = match snapshot.resolve(&pattern.id, Some(date)) {
        Some(current) => current.copy_on_write(),
        None => {
            let mut b = Timetable::builder();
            b.with_pattern(Arc::clone(pattern));
            b
        }
    };
    builder.with_service_date(date);

    for update in updates {
        match update {
            TripUpdate::AddOrReplace(trip_times) => {
                builder.add_or_replace(trip_times);
            }
            TripUpdate::Cancel(trip) => {
                match builder.trip_times_for(&trip).map(|tt| tt.canceled_copy()) {
                    Some(canceled) => {
                        builder.add_or_replace(Arc::new(canceled));
                    }
                    None => {
                        warn!("skipping cancellation of unknown trip {trip}");
                    }
                }
            }
            TripUpdate::Remove(trip) => {
                builder.remove_trip(&trip);
            }
            TripUpdate::AddFrequency(entry) => {
                builder.add_frequency_entry(entry);
            }
        }
    }

    let published = publisher.publish(builder.build()?);
    debug!(
        "applied update cycle for pattern {} on {date}: {} trips now published",
        pattern.id,
        published.trip_count()
    );
    Ok(published)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, RealTimeState, StopTime, Trip};

    fn pattern() -> Arc<TripPattern> {
        Arc::new(TripPattern::new(
            FeedScopedId::new("f", "p1"),
            FeedScopedId::new("f", "route-1"),
            vec![FeedScopedId::new("f", "sa"), FeedScopedId::new("f", "sb")],
        ))
    }

    fn trip_times(id: &str, departure: i32) -> Arc<TripTimes> {
        let trip = Arc::new(Trip::new(
            FeedScopedId::new("f", id),
            FeedScopedId::new("f", "route-1"),
            Direction::Inbound,
        ));
        Arc::new(
            TripTimes::new(
                trip,
                vec![
                    StopTime::new(departure, departure),
                    StopTime::new(departure + 600, departure + 600),
                ],
            )
            .unwrap(),
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn publisher_with_default() -> SnapshotPublisher {
        let publisher = SnapshotPublisher::new();
        let mut b = Timetable::builder();
        b.with_pattern(pattern());
        b.add(trip_times("t1", 28800)).unwrap();
        publisher.publish(b.build().unwrap());
        publisher
    }

    #[test]
    fn a_cycle_materializes_a_dated_timetable_from_the_default() {
        let publisher = publisher_with_default();
        let published = apply_update_cycle(
            &publisher,
            &pattern(),
            date(),
            vec![TripUpdate::AddOrReplace(trip_times("t2", 29400))],
        )
        .unwrap();

        assert_eq!(published.service_date(), Some(date()));
        assert_eq!(published.trip_count(), 2);
        // scheduled default still published unchanged
        let snapshot = publisher.latest();
        let default = snapshot.resolve(&FeedScopedId::new("f", "p1"), None).unwrap();
        assert_eq!(default.trip_count(), 1);
        assert!(default.service_date().is_none());
    }

    #[test]
    fn cancel_keeps_the_trip_but_flags_it() {
        let publisher = publisher_with_default();
        let published = apply_update_cycle(
            &publisher,
            &pattern(),
            date(),
            vec![TripUpdate::Cancel(FeedScopedId::new("f", "t1"))],
        )
        .unwrap();

        let tt = published
            .trip_times_for(&FeedScopedId::new("f", "t1"))
            .unwrap();
        assert!(tt.is_canceled());
        assert_eq!(tt.state(), RealTimeState::Canceled);
    }

    #[test]
    fn cancel_of_an_unknown_trip_is_skipped() {
        let publisher = publisher_with_default();
        let published = apply_update_cycle(
            &publisher,
            &pattern(),
            date(),
            vec![TripUpdate::Cancel(FeedScopedId::new("f", "ghost"))],
        )
        .unwrap();
        assert_eq!(published.trip_count(), 1);
        assert!(!published.trip_times()[0].is_canceled());
    }

    #[test]
    fn consecutive_cycles_seed_from_the_dated_version() {
        let publisher = publisher_with_default();
        apply_update_cycle(
            &publisher,
            &pattern(),
            date(),
            vec![TripUpdate::AddOrReplace(trip_times("t2", 29400))],
        )
        .unwrap();
        let second = apply_update_cycle(
            &publisher,
            &pattern(),
            date(),
            vec![TripUpdate::Remove(FeedScopedId::new("f", "t1"))],
        )
        .unwrap();

        assert_eq!(second.trip_count(), 1);
        assert_eq!(second.trip_times()[0].trip_id().id, "t2");
        assert_eq!(publisher.latest().version(), 3);
    }
}
