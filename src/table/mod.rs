//! Columnar two-column table of `(key, value)` rows.
//!
//! Keys live in a single byte arena with an end-offset column beside a dense
//! `f64` column. Growth goes through [`Table::ensure_capacity`], which at
//! least doubles capacity so total copying stays linear in the row count.

mod materializer;

pub use materializer::{MaterializeError, Materializer};

use std::collections::TryReserveError;
use std::mem::size_of;

use thiserror::Error;

/// Smallest row capacity a growing table jumps to.
pub const MIN_GROWTH_ROWS: usize = 16;

/// Key bytes reserved per row when pre-sizing (fits a SHA-256 hex digest).
pub const DEFAULT_KEY_BYTES_PER_ROW: usize = 64;

/// Action taken when a pre-sized table runs out of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Grow geometrically.
    #[default]
    Grow,
    /// Stop with [`CapacityError::Exceeded`].
    Fail,
}

/// How the table is sized before the total row count is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrowthPolicy {
    /// Start empty and double on demand.
    #[default]
    Amortized,
    /// Reserve `rows` up front and track used length against it.
    Preallocated {
        /// Row capacity reserved before the first line.
        rows: usize,
        /// Key arena bytes reserved per row.
        key_bytes_per_row: usize,
        /// Behaviour once `rows` is exceeded.
        overflow: Overflow,
    },
}

impl GrowthPolicy {
    /// Pre-size for `rows` rows, growing past them if needed.
    pub fn preallocated(rows: usize) -> Self {
        GrowthPolicy::Preallocated {
            rows,
            key_bytes_per_row: DEFAULT_KEY_BYTES_PER_ROW,
            overflow: Overflow::Grow,
        }
    }

    /// Pre-size for exactly `rows` rows and fail beyond them.
    pub fn fixed(rows: usize) -> Self {
        GrowthPolicy::Preallocated {
            rows,
            key_bytes_per_row: DEFAULT_KEY_BYTES_PER_ROW,
            overflow: Overflow::Fail,
        }
    }
}

/// Row capacity exhausted under [`Overflow::Fail`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapacityError {
    /// More rows were needed than the table was sized for.
    #[error("table capacity exceeded: {required} rows required, capacity {capacity}")]
    Exceeded {
        /// Pre-sized row capacity.
        capacity: usize,
        /// Rows the input needed at the failing line.
        required: usize,
    },

    /// The allocator refused the pre-sized table.
    #[error("cannot reserve table for {rows} rows and {bytes} key bytes")]
    Allocation {
        /// Requested row capacity.
        rows: usize,
        /// Requested key arena bytes.
        bytes: usize,
    },
}

/// Borrowed table row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row<'a> {
    /// Key string.
    pub key: &'a str,
    /// Numeric value.
    pub value: f64,
}

/// Ordered `(key, value)` rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    key_arena: String,
    key_ends: Vec<usize>,
    values: Vec<f64>,
    growth_events: usize,
}

impl Table {
    /// Empty table with no allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-sized for `rows` rows and `key_bytes` arena bytes.
    ///
    /// Fails instead of aborting when the allocator cannot satisfy the request.
    pub fn try_with_capacity(rows: usize, key_bytes: usize) -> Result<Self, CapacityError> {
        let mut table = Self::new();
        let refused = |_: TryReserveError| CapacityError::Allocation {
            rows,
            bytes: key_bytes,
        };
        table.values.try_reserve_exact(rows).map_err(refused)?;
        table.key_ends.try_reserve_exact(rows).map_err(refused)?;
        table.key_arena.try_reserve_exact(key_bytes).map_err(refused)?;
        Ok(table)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no rows were materialized.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rows the table holds without reallocating.
    pub fn row_capacity(&self) -> usize {
        self.values.capacity().min(self.key_ends.capacity())
    }

    /// Key arena bytes in use.
    pub fn key_bytes(&self) -> usize {
        self.key_arena.len()
    }

    /// Number of reallocations since construction.
    pub fn growth_events(&self) -> usize {
        self.growth_events
    }

    /// Allocated footprint of all three columns, in bytes.
    pub fn allocated_bytes(&self) -> usize {
        self.key_arena.capacity()
            + self.key_ends.capacity() * size_of::<usize>()
            + self.values.capacity() * size_of::<f64>()
    }

    /// Row at `position`.
    pub fn get(&self, position: usize) -> Option<Row<'_>> {
        let end = *self.key_ends.get(position)?;
        let start = match position {
            0 => 0,
            _ => self.key_ends[position - 1],
        };
        Some(Row {
            key: &self.key_arena[start..end],
            value: self.values[position],
        })
    }

    /// Rows in order.
    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        let starts = std::iter::once(0).chain(self.key_ends.iter().copied());
        starts
            .zip(self.key_ends.iter().copied())
            .zip(self.values.iter().copied())
            .map(move |((start, end), value)| Row {
                key: &self.key_arena[start..end],
                value,
            })
    }

    /// The value column.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Make room for `rows` more rows and `key_bytes` more key bytes.
    ///
    /// Returns true when a reallocation happened. Each exhausted column at
    /// least doubles.
    pub fn ensure_capacity(&mut self, rows: usize, key_bytes: usize) -> bool {
        let mut grew = false;

        let needed_rows = self.len() + rows;
        if needed_rows > self.row_capacity() {
            let target = needed_rows
                .max(self.row_capacity() * 2)
                .max(MIN_GROWTH_ROWS);
            self.values.reserve_exact(target - self.values.len());
            self.key_ends.reserve_exact(target - self.key_ends.len());
            grew = true;
        }

        let needed_bytes = self.key_arena.len() + key_bytes;
        if needed_bytes > self.key_arena.capacity() {
            let target = needed_bytes.max(self.key_arena.capacity() * 2);
            self.key_arena.reserve_exact(target - self.key_arena.len());
            grew = true;
        }

        if grew {
            self.growth_events += 1;
        }
        grew
    }

    /// Append one row. Reallocates through the standard library if
    /// [`Table::ensure_capacity`] was not called first.
    pub fn push(&mut self, key: &str, value: f64) {
        self.key_arena.push_str(key);
        self.key_ends.push(self.key_arena.len());
        self.values.push(value);
    }

    /// Release capacity beyond the current length.
    pub fn shrink_to_fit(&mut self) {
        self.key_arena.shrink_to_fit();
        self.key_ends.shrink_to_fit();
        self.values.shrink_to_fit();
    }

    /// BLAKE3 digest over the rows in order.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for row in self.iter() {
            hasher.update(&(row.key.len() as u64).to_le_bytes());
            hasher.update(row.key.as_bytes());
            hasher.update(&row.value.to_bits().to_le_bytes());
        }
        hasher.finalize()
    }
}
