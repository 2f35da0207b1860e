//! Grouping of classified slot records into per-venue availability.
//!
//! Venue identity is the [`VenueKey`]: records sharing a key merge into one
//! [`VenueAvailability`] whose descriptive fields come from the first record
//! seen. Venues keep first-occurrence order, and within a venue a
//! [`TimeSlot`] equal on all four fields to one already kept is dropped.

use std::collections::{HashMap, HashSet};

use futsal_core::{
    time_range_label, MatchKind, RawSlotRecord, TimeSlot, VenueAvailability, VenueInfo, VenueKey,
};

struct VenueEntry {
    venue: VenueAvailability,
    seen: HashSet<TimeSlot>,
}

/// Order-preserving accumulator keyed by [`VenueKey`].
#[derive(Default)]
pub struct Aggregator {
    index: HashMap<VenueKey, usize>,
    entries: Vec<VenueEntry>,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a venue without adding any slot, returning its position.
    ///
    /// A venue already present keeps its original descriptive fields.
    pub fn observe_venue(&mut self, info: &VenueInfo) -> usize {
        if let Some(&idx) = self.index.get(&info.key) {
            return idx;
        }
        let idx = self.entries.len();
        self.index.insert(info.key.clone(), idx);
        self.entries.push(VenueEntry {
            venue: VenueAvailability::from_info(info),
            seen: HashSet::new(),
        });
        idx
    }

    /// Adds one classified record. Returns `true` if a new slot was kept.
    ///
    /// Records classified [`MatchKind::None`] are discarded without
    /// registering their venue.
    pub fn push(&mut self, record: &RawSlotRecord, verdict: MatchKind) -> bool {
        if !verdict.is_match() {
            return false;
        }

        let idx = self.observe_venue(&record.venue);
        let slot = TimeSlot {
            date: record.date.clone(),
            time: time_range_label(&record.start_time, &record.end_time),
            price: record.price,
            match_type: verdict,
        };

        let entry = &mut self.entries[idx];
        if entry.seen.insert(slot.clone()) {
            entry.venue.available_times.push(slot);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Venues in first-occurrence order.
    #[must_use]
    pub fn finish(self) -> Vec<VenueAvailability> {
        self.entries.into_iter().map(|entry| entry.venue).collect()
    }
}

/// Groups classified records into venues in one pass.
pub fn group<I>(records: I) -> Vec<VenueAvailability>
where
    I: IntoIterator<Item = (RawSlotRecord, MatchKind)>,
{
    let mut aggregator = Aggregator::new();
    for (record, verdict) in records {
        aggregator.push(&record, verdict);
    }
    aggregator.finish()
}
