//! Byte footprint accounting
//!
//! Tracks what the table and index allocate during one run

mod tracker;

pub use tracker::SpaceTracker;

/// Footprint report for a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpaceProfile {
    /// Largest table allocation seen while materializing
    pub peak_table_bytes: usize,

    /// Table allocation after trimming to its length
    pub table_bytes: usize,

    /// Allocation of the key index
    pub index_bytes: usize,

    /// Number of times the table was reallocated
    pub growth_events: usize,

    /// Growth snapshots `(rows, bytes)`, only filled when profiling
    pub timeline: Vec<(usize, usize)>,
}

impl SpaceProfile {
    /// Bytes held once the run completes
    pub fn resident_bytes(&self) -> usize {
        self.table_bytes + self.index_bytes
    }

    /// Generate report
    pub fn report(&self) -> String {
        let mut out = format!(
            "Table: {} bytes (peak {} bytes, {} growth events)\nIndex: {} bytes\nResident: {} bytes",
            self.table_bytes,
            self.peak_table_bytes,
            self.growth_events,
            self.index_bytes,
            self.resident_bytes()
        );
        for (rows, bytes) in &self.timeline {
            out.push_str(&format!("\n  grew at {} rows -> {} bytes", rows, bytes));
        }
        out
    }
}
