//! Atomic publication of timetable versions
//!
//! Readers resolve timetables out of an immutable [`TimetableSnapshot`]
//! and keep iterating it for as long as they hold the `Arc`, while the
//! [`SnapshotPublisher`] installs new snapshots behind them. The swap is a
//! single pointer write under a lock that readers only touch to clone an
//! `Arc`; superseded snapshots stay alive until their last reader drops.
//!
//! The publisher does not serialize writers per pattern/date. That
//! guarantee belongs to the ingestion pipeline driving the builders.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDate;
use hashbrown::HashMap;
use log::debug;

use crate::model::{FeedScopedId, Timetable};

/// One immutable generation of all published timetables: per pattern the
/// scheduled default, plus any date-specific versions materialized by
/// real-time updates.
#[derive(Debug, Clone, Default)]
pub struct TimetableSnapshot {
    scheduled: HashMap<FeedScopedId, Arc<Timetable>>,
    dated: HashMap<FeedScopedId, HashMap<NaiveDate, Arc<Timetable>>>,
    version: u64,
}

impl TimetableSnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The timetable in effect for `pattern` on `date`: the date-specific
    /// version when one was published, else the scheduled default.
    pub fn resolve(
        &self,
        pattern: &FeedScopedId,
        date: Option<NaiveDate>,
    ) -> Option<&Arc<Timetable>> {
        if let Some(date) = date
            && let Some(dated) = self.dated.get(pattern).and_then(|m| m.get(&date))
        {
            return Some(dated);
        }
        self.scheduled.get(pattern)
    }

    pub fn scheduled_timetables(&self) -> impl Iterator<Item = &Arc<Timetable>> {
        self.scheduled.values()
    }

    pub fn timetable_count(&self) -> usize {
        self.scheduled.len() + self.dated.values().map(HashMap::len).sum::<usize>()
    }

    fn insert(&mut self, timetable: Arc<Timetable>) {
        let pattern = timetable.pattern().id.clone();
        match timetable.service_date() {
            Some(date) => {
                self.dated
                    .entry(pattern)
                    .or_default()
                    .insert(date, timetable);
            }
            None => {
                self.scheduled.insert(pattern, timetable);
            }
        }
    }
}

/// Owner of the currently visible [`TimetableSnapshot`]. Reads are an
/// `Arc` clone under a read lock; publishing builds the successor
/// snapshot off to the side and swaps it in with one write.
#[derive(Debug, Default)]
pub struct SnapshotPublisher {
    current: RwLock<Arc<TimetableSnapshot>>,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest published snapshot. The returned `Arc` stays valid and
    /// unchanged for as long as the caller holds it, whatever gets
    /// published afterwards.
    pub fn latest(&self) -> Arc<TimetableSnapshot> {
        // A poisoned lock means a writer panicked mid-swap; the Arc it
        // guards is still a complete snapshot, so recover it.
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Publish one new timetable version, superseding any earlier version
    /// for the same pattern and date. Returns the shared handle to it.
    pub fn publish(&self, timetable: Timetable) -> Arc<Timetable> {
        let timetable = Arc::new(timetable);
        self.install(std::iter::once(Arc::clone(&timetable)));
        timetable
    }

    /// Publish a batch of timetables as one snapshot generation, so
    /// readers observe either none or all of them.
    pub fn publish_all(&self, timetables: impl IntoIterator<Item = Timetable>) {
        self.install(timetables.into_iter().map(Arc::new));
    }

    fn install(&self, timetables: impl Iterator<Item = Arc<Timetable>>) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut next = TimetableSnapshot::clone(&guard);
        next.version += 1;
        for timetable in timetables {
            next.insert(timetable);
        }
        debug!(
            "published snapshot version {} with {} timetables",
            next.version,
            next.timetable_count()
        );
        *guard = Arc::new(next);
    }
}
