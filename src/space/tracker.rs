//! Footprint tracking for one pipeline run

use tracing::debug;

use super::SpaceProfile;

/// Records table and index allocations as they happen
#[derive(Debug)]
pub struct SpaceTracker {
    /// Current table allocation
    table: usize,

    /// Maximum table allocation seen
    peak: usize,

    /// Current index allocation
    index: usize,

    /// Reallocations observed
    growth_events: usize,

    /// Keep a growth timeline
    profile_enabled: bool,

    timeline: Vec<(usize, usize)>,
}

impl SpaceTracker {
    /// Create new tracker
    pub fn new(profile_enabled: bool) -> Self {
        Self {
            table: 0,
            peak: 0,
            index: 0,
            growth_events: 0,
            profile_enabled,
            timeline: Vec::new(),
        }
    }

    /// Initial table allocation, before any row is written
    pub fn allocate_table(&mut self, bytes: usize) {
        self.table = bytes;
        self.update_peak();
    }

    /// Table was reallocated while holding `rows` rows
    pub fn grow_table(&mut self, rows: usize, bytes: usize) {
        debug!(rows, from = self.table, to = bytes, "table grew");
        self.table = bytes;
        self.growth_events += 1;
        self.update_peak();

        if self.profile_enabled {
            self.timeline.push((rows, bytes));
        }
    }

    /// Table was trimmed to its final length
    pub fn trim_table(&mut self, bytes: usize) {
        self.table = bytes;
    }

    /// Index allocation after the fold
    pub fn allocate_index(&mut self, bytes: usize) {
        self.index = bytes;
    }

    fn update_peak(&mut self) {
        self.peak = self.peak.max(self.table);
    }

    /// Largest table allocation so far
    pub fn peak_table_bytes(&self) -> usize {
        self.peak
    }

    /// Reallocations so far
    pub fn growth_events(&self) -> usize {
        self.growth_events
    }

    /// Snapshot the tracked footprint
    pub fn profile(&self) -> SpaceProfile {
        SpaceProfile {
            peak_table_bytes: self.peak,
            table_bytes: self.table,
            index_bytes: self.index,
            growth_events: self.growth_events,
            timeline: self.timeline.clone(),
        }
    }
}
