//! # Trailing-group dataset indexer
//!
//! Reads line-oriented dataset files whose records end in two equal-length
//! groups (numeric values and string keys) and builds a key index over them.
//!
//! ## Pipeline
//!
//! 1. **Line Reader**: lazily split each line on a single-character delimiter
//! 2. **Record Materializer**: locate the count field, pair the trailing
//!    groups, append rows to a columnar table under a growth policy
//! 3. **Index Builder**: fold the table into `key -> (position, value)`,
//!    last write wins
//!
//! ## Usage Example
//!
//! ```no_run
//! use dataset_index::{Pipeline, PipelineConfig};
//!
//! let result = Pipeline::new(PipelineConfig::default()).run("dataset.txt")?;
//! println!("{}", result.index);
//! # Ok::<(), dataset_index::PipelineError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod reader; // Lazy line-to-fields reader
pub mod record; // Record layout and trailing-group split
pub mod table; // Columnar table and materializer
pub mod index; // Key index builder
pub mod space; // Footprint accounting

// Re-exports for convenience
pub use index::{IndexEntry, KeyIndex};
pub use reader::{FieldLine, LineReader, ReadError, TrimMode};
pub use record::{FormatError, GroupOrder, RecordLayout};
pub use space::{SpaceProfile, SpaceTracker};
pub use table::{
    CapacityError, GrowthPolicy, MaterializeError, Materializer, Overflow, Row, Table,
};

use std::path::Path;

use thiserror::Error;
use tracing::info;

/// Configuration for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Field delimiter
    pub delimiter: char,

    /// Line trimming policy
    pub trim: TrimMode,

    /// Count field position and trailing-group order
    pub layout: RecordLayout,

    /// Table sizing strategy
    pub growth: GrowthPolicy,

    /// Keep a growth timeline in the space profile
    pub profile_space: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delimiter: ' ',
            trim: TrimMode::Terminator,
            layout: RecordLayout::default(),
            growth: GrowthPolicy::Amortized,
            profile_space: false,
        }
    }
}

impl PipelineConfig {
    /// Use a different field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Use a different trimming policy
    pub fn with_trim(mut self, trim: TrimMode) -> Self {
        self.trim = trim;
        self
    }

    /// Use a different record layout
    pub fn with_layout(mut self, layout: RecordLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Use a different growth policy
    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Enable or disable the growth timeline
    pub fn with_space_profiling(mut self, enabled: bool) -> Self {
        self.profile_space = enabled;
        self
    }
}

/// Output of a completed run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Materialized rows, trimmed to length
    pub table: Table,

    /// Key index folded from `table`
    pub index: KeyIndex,

    /// Byte footprint of the run
    pub space_profile: SpaceProfile,
}

/// Errors that terminate a run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input could not be opened or read
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Materialization failed
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}

/// Runs reader, materializer and index builder in sequence
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Index the file at `path`
    pub fn run(&self, path: impl AsRef<Path>) -> Result<PipelineResult, PipelineError> {
        let path = path.as_ref();
        let reader = LineReader::open(path, self.config.delimiter, self.config.trim)?;
        info!(path = %path.display(), "indexing dataset");
        self.run_lines(reader)
    }

    /// Index an already-open line source
    pub fn run_lines<I>(&self, lines: I) -> Result<PipelineResult, PipelineError>
    where
        I: IntoIterator<Item = Result<FieldLine, ReadError>>,
    {
        let mut tracker = SpaceTracker::new(self.config.profile_space);

        let materializer = Materializer::new(self.config.layout, self.config.growth);
        let table = materializer.materialize(lines, &mut tracker)?;

        let index = KeyIndex::build(&table);
        tracker.allocate_index(index.allocated_bytes());

        let space_profile = tracker.profile();
        info!(
            rows = table.len(),
            keys = index.len(),
            table_bytes = space_profile.table_bytes,
            index_bytes = space_profile.index_bytes,
            "dataset indexed"
        );

        Ok(PipelineResult {
            table,
            index,
            space_profile,
        })
    }
}
