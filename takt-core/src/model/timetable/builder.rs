//! Mutable staging for the next timetable version

use std::sync::Arc;

use chrono::NaiveDate;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use itertools::Itertools;

use crate::Error;
use crate::model::pattern::TripPattern;
use crate::model::types::{Direction, FeedScopedId};

use super::Timetable;
use super::frequency::FrequencyEntry;
use super::trip_times::TripTimes;

/// Accumulates trip times and frequency entries for one (pattern, service
/// date) and produces an immutable [`Timetable`] on [`build`].
///
/// The builder exclusively owns its working state: seeding copies `Arc`
/// references out of the source timetable but never its ordering structure,
/// so the source stays valid for readers that already hold it. The builder
/// itself is single-writer; callers serialize updates per pattern/date.
///
/// [`build`]: TimetableBuilder::build
#[derive(Debug, Clone, Default)]
pub struct TimetableBuilder {
    pattern: Option<Arc<TripPattern>>,
    service_date: Option<NaiveDate>,
    /// Keyed by trip id, which is what enforces per-trip uniqueness.
    trip_times: HashMap<FeedScopedId, Arc<TripTimes>>,
    frequencies: Vec<FrequencyEntry>,
    poisoned: bool,
}

impl TimetableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing timetable: same pattern and date, all its
    /// trip times and frequency entries. The source is not mutated.
    pub fn seeded_from(timetable: &Timetable) -> Self {
        Self {
            pattern: Some(Arc::clone(timetable.pattern())),
            service_date: timetable.service_date(),
            trip_times: timetable
                .trip_times()
                .iter()
                .map(|tt| (tt.trip_id().clone(), Arc::clone(tt)))
                .collect(),
            frequencies: timetable.frequency_entries().to_vec(),
            poisoned: false,
        }
    }

    pub fn with_pattern(&mut self, pattern: Arc<TripPattern>) -> &mut Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_service_date(&mut self, service_date: NaiveDate) -> &mut Self {
        self.service_date = Some(service_date);
        self
    }

    pub fn pattern(&self) -> Option<&Arc<TripPattern>> {
        self.pattern.as_ref()
    }

    pub fn service_date(&self) -> Option<NaiveDate> {
        self.service_date
    }

    /// Insert new trip times.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateTrip`] when the builder already holds times for
    /// the same trip. That is a programming error on the calling side; a
    /// real-time pipeline expecting repeats must use
    /// [`add_or_replace`](Self::add_or_replace) instead. The first value
    /// stays in place.
    pub fn add(&mut self, trip_times: Arc<TripTimes>) -> Result<&mut Self, Error> {
        match self.trip_times.entry(trip_times.trip_id().clone()) {
            Entry::Occupied(occupied) => Err(Error::DuplicateTrip(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                vacant.insert(trip_times);
                Ok(self)
            }
        }
    }

    /// Insert or overwrite the entry for this trip. The real-time update
    /// path, where re-announcing a trip within one cycle is expected.
    pub fn add_or_replace(&mut self, trip_times: Arc<TripTimes>) -> &mut Self {
        self.trip_times
            .insert(trip_times.trip_id().clone(), trip_times);
        self
    }

    /// [`add`](Self::add) every member, failing on the first duplicate.
    /// Members added before the failure remain applied; callers needing
    /// atomicity discard the builder on error.
    pub fn add_all(
        &mut self,
        trip_times: impl IntoIterator<Item = Arc<TripTimes>>,
    ) -> Result<&mut Self, Error> {
        for tt in trip_times {
            self.add(tt)?;
        }
        Ok(self)
    }

    /// Remove by the trip identity of the given value. Absent trips are a
    /// no-op.
    pub fn remove(&mut self, trip_times: &TripTimes) -> &mut Self {
        self.trip_times.remove(trip_times.trip_id());
        self
    }

    pub fn remove_all<'a>(
        &mut self,
        trip_times: impl IntoIterator<Item = &'a TripTimes>,
    ) -> &mut Self {
        for tt in trip_times {
            self.remove(tt);
        }
        self
    }

    /// Remove by bare trip id, the form cancellation handlers hold.
    pub fn remove_trip(&mut self, trip: &FeedScopedId) -> &mut Self {
        self.trip_times.remove(trip);
        self
    }

    pub fn contains_trip(&self, trip: &FeedScopedId) -> bool {
        self.trip_times.contains_key(trip)
    }

    pub fn trip_times_for(&self, trip: &FeedScopedId) -> Option<&Arc<TripTimes>> {
        self.trip_times.get(trip)
    }

    pub fn trip_count(&self) -> usize {
        self.trip_times.len()
    }

    /// Apply `transform` to every trip times value and, in the same pass,
    /// to every frequency entry's representative trip times. Windows and
    /// headways of the frequency entries are preserved.
    ///
    /// All outputs are computed before any are committed, so a failed
    /// transform never leaves a half-updated working set. The builder is
    /// still poisoned on failure and must be discarded;
    /// [`build`](Self::build) will refuse it.
    ///
    /// # Errors
    ///
    /// The first error returned by `transform`.
    pub fn update_all<F>(&mut self, mut transform: F) -> Result<(), Error>
    where
        F: FnMut(&TripTimes) -> Result<TripTimes, Error>,
    {
        let result = (|| {
            let mut new_times = HashMap::with_capacity(self.trip_times.len());
            for (id, tt) in &self.trip_times {
                new_times.insert(id.clone(), Arc::new(transform(tt)?));
            }
            let mut new_frequencies = Vec::with_capacity(self.frequencies.len());
            for entry in &self.frequencies {
                let transformed = Arc::new(transform(&entry.trip_times)?);
                new_frequencies.push(entry.with_trip_times(transformed));
            }
            Ok::<_, Error>((new_times, new_frequencies))
        })();
        match result {
            Ok((new_times, new_frequencies)) => {
                self.trip_times = new_times;
                self.frequencies = new_frequencies;
                Ok(())
            }
            Err(err) => {
                self.poisoned = true;
                Err(err)
            }
        }
    }

    /// Append a frequency entry. Entries are not unique per trip and their
    /// insertion order is kept through [`build`](Self::build).
    pub fn add_frequency_entry(&mut self, entry: FrequencyEntry) -> &mut Self {
        self.frequencies.push(entry);
        self
    }

    pub fn frequencies(&self) -> &[FrequencyEntry] {
        &self.frequencies
    }

    /// Direction shared by the trips of this timetable, derived from a
    /// representative trip: any scheduled trip first, else the first
    /// frequency entry, else [`Direction::Unknown`]. All trips of a pattern
    /// are assumed to share their direction; this is a caller contract and
    /// not verified per trip.
    pub fn direction(&self) -> Direction {
        self.representative_trip_times()
            .map_or(Direction::Unknown, |tt| tt.trip().direction)
    }

    fn representative_trip_times(&self) -> Option<&TripTimes> {
        self.trip_times
            .values()
            .next()
            .map(Arc::as_ref)
            .or_else(|| self.frequencies.first().map(|f| f.trip_times.as_ref()))
    }

    /// Produce the immutable timetable: trip times leave the identity map
    /// and are sorted into the canonical order, frequency entries keep
    /// their insertion order.
    ///
    /// # Errors
    ///
    /// [`Error::MissingPattern`] when no pattern was set and
    /// [`Error::PoisonedBuilder`] after a failed [`update_all`](Self::update_all).
    pub fn build(self) -> Result<Timetable, Error> {
        if self.poisoned {
            return Err(Error::PoisonedBuilder);
        }
        let pattern = self.pattern.ok_or(Error::MissingPattern)?;
        let trip_times: Vec<Arc<TripTimes>> = self
            .trip_times
            .into_values()
            .sorted_by(|a, b| TripTimes::departure_order(a, b))
            .collect();
        Ok(Timetable::from_parts(
            pattern,
            self.service_date,
            trip_times,
            self.frequencies,
        ))
    }
}
