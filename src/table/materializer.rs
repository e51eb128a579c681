use thiserror::Error;
use tracing::{debug, trace};

use super::{CapacityError, GrowthPolicy, Overflow, Table};
use crate::reader::{FieldLine, ReadError};
use crate::record::{FormatError, RecordLayout};
use crate::space::SpaceTracker;

/// Errors that stop materialization.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The line source failed.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// A line did not match the record layout.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The table could not be sized or ran out of fixed capacity.
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

/// Turns field lines into a [`Table`] under a layout and growth policy.
#[derive(Debug, Clone)]
pub struct Materializer {
    layout: RecordLayout,
    policy: GrowthPolicy,
}

impl Materializer {
    /// Create a materializer.
    pub fn new(layout: RecordLayout, policy: GrowthPolicy) -> Self {
        Self { layout, policy }
    }

    /// Record layout in use.
    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// Consume `lines` and build the trimmed table.
    ///
    /// Each line is fully validated before its rows are appended, so a
    /// failing line never leaves a partial record behind.
    pub fn materialize<I>(
        &self,
        lines: I,
        tracker: &mut SpaceTracker,
    ) -> Result<Table, MaterializeError>
    where
        I: IntoIterator<Item = Result<FieldLine, ReadError>>,
    {
        let mut table = match self.policy {
            GrowthPolicy::Amortized => Table::new(),
            GrowthPolicy::Preallocated {
                rows,
                key_bytes_per_row,
                ..
            } => Table::try_with_capacity(rows, rows.saturating_mul(key_bytes_per_row))?,
        };
        tracker.allocate_table(table.allocated_bytes());

        let mut parsed: Vec<f64> = Vec::new();
        for line in lines {
            let line = line?;
            self.append_line(&line, &mut table, &mut parsed, tracker)?;
        }

        table.shrink_to_fit();
        tracker.trim_table(table.allocated_bytes());
        debug!(
            rows = table.len(),
            bytes = table.allocated_bytes(),
            "table materialized"
        );
        Ok(table)
    }

    fn append_line(
        &self,
        line: &FieldLine,
        table: &mut Table,
        parsed: &mut Vec<f64>,
        tracker: &mut SpaceTracker,
    ) -> Result<(), MaterializeError> {
        let groups = self
            .layout
            .split(&line.fields)
            .map_err(|err| err.at_line(line.number))?;
        trace!(line = line.number, pairs = groups.len(), "record");
        if groups.is_empty() {
            return Ok(());
        }

        parsed.clear();
        for (i, text) in groups.values.iter().enumerate() {
            // Keys keep their exact text; values tolerate padding around the number.
            let value = text.trim().parse::<f64>().map_err(|_| FormatError::InvalidValue {
                line: line.number,
                field: groups.values_offset + i,
                text: text.clone(),
            })?;
            parsed.push(value);
        }

        let required = table.len() + groups.len();
        if let GrowthPolicy::Preallocated {
            rows,
            overflow: Overflow::Fail,
            ..
        } = self.policy
        {
            if required > rows {
                return Err(CapacityError::Exceeded {
                    capacity: rows,
                    required,
                }
                .into());
            }
        }

        let key_bytes = groups.keys.iter().map(String::len).sum();
        if table.ensure_capacity(groups.len(), key_bytes) {
            tracker.grow_table(table.len(), table.allocated_bytes());
        }

        for (key, value) in groups.keys.iter().zip(parsed.iter()) {
            table.push(key, *value);
        }
        Ok(())
    }
}
