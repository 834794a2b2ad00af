//! Initial timetable construction from scheduled data
//!
//! Feed parsing lives upstream; this module takes already-parsed
//! scheduled patterns, builds one default timetable per pattern and
//! publishes them all as the first snapshot generation.

use std::sync::Arc;

use log::info;
use rayon::prelude::*;

use crate::Error;
use crate::model::{FrequencyEntry, Timetable, TimetableBuilder, TripPattern, TripTimes};
use crate::snapshot::SnapshotPublisher;

/// Scheduled input for one pattern: every trip running it plus its
/// headway-based services.
#[derive(Debug, Clone)]
pub struct ScheduledPattern {
    pub pattern: Arc<TripPattern>,
    pub trips: Vec<Arc<TripTimes>>,
    pub frequencies: Vec<FrequencyEntry>,
}

/// Build and publish the scheduled default timetable of every pattern.
///
/// # Errors
///
/// Fails when a trip's stop-time count disagrees with its pattern's stop
/// count, or when a pattern carries duplicate trips.
pub fn load_scheduled(patterns: Vec<ScheduledPattern>) -> Result<SnapshotPublisher, Error> {
    let timetables: Vec<Timetable> = patterns
        .into_par_iter()
        .map(build_scheduled_timetable)
        .collect::<Result<_, _>>()?;

    let (trips, frequencies) = timetables.iter().fold((0, 0), |(t, f), tt| {
        (t + tt.trip_count(), f + tt.frequency_entries().len())
    });
    info!(
        "loaded {} scheduled timetables ({trips} trips, {frequencies} frequency entries)",
        timetables.len()
    );

    let publisher = SnapshotPublisher::new();
    publisher.publish_all(timetables);
    Ok(publisher)
}

fn build_scheduled_timetable(scheduled: ScheduledPattern) -> Result<Timetable, Error> {
    let expected = scheduled.pattern.stop_count();
    for tt in scheduled
        .trips
        .iter()
        .chain(scheduled.frequencies.iter().map(|f| &f.trip_times))
    {
        if tt.stop_count() != expected {
            return Err(Error::StopCountMismatch {
                trip: tt.trip_id().clone(),
                expected,
                actual: tt.stop_count(),
            });
        }
    }

    let mut builder = TimetableBuilder::new();
    builder.with_pattern(scheduled.pattern);
    builder.add_all(scheduled.trips)?;
    for entry in scheduled.frequencies {
        builder.add_frequency_entry(entry);
    }
    builder.build()
}
