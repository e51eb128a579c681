//! Record layout: where the count field lives and how the two trailing
//! groups are ordered.

use thiserror::Error;

/// Order of the two trailing groups at the end of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    /// `... v_1..v_N k_1..k_N`: the last N fields are keys.
    #[default]
    ValuesThenKeys,
    /// `... k_1..k_N v_1..v_N`: the last N fields are values.
    KeysThenValues,
}

/// Positional description of a record line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    /// Zero-based index of the count field N.
    pub count_field: usize,
    /// Order of the trailing key and value groups.
    pub order: GroupOrder,
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self {
            count_field: 3,
            order: GroupOrder::ValuesThenKeys,
        }
    }
}

/// Errors for lines that do not match the layout.
///
/// `line` is 0 until the materializer attaches the originating line number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// The line ends before the count field.
    #[error("line {line}: missing count field at index {index} ({found} fields)")]
    MissingCountField {
        /// 1-based line number.
        line: usize,
        /// Expected position of the count field.
        index: usize,
        /// Number of fields the line actually has.
        found: usize,
    },

    /// Count field is not an integer.
    #[error("line {line}: count field {text:?} is not an integer")]
    InvalidCount {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },

    /// Count field parsed to a negative number.
    #[error("line {line}: count field is negative ({count})")]
    NegativeCount {
        /// 1-based line number.
        line: usize,
        /// Parsed count.
        count: i64,
    },

    /// Line is too short for the claimed count.
    #[error("line {line}: count {count} needs {required} fields, found {found}")]
    InsufficientFields {
        /// 1-based line number.
        line: usize,
        /// Claimed count N.
        count: usize,
        /// Minimum field count for this N.
        required: usize,
        /// Number of fields present.
        found: usize,
    },

    /// A field of the value group is not a number.
    #[error("line {line}: value {text:?} at field {field} is not a number")]
    InvalidValue {
        /// 1-based line number.
        line: usize,
        /// Zero-based field index within the line.
        field: usize,
        /// Offending text.
        text: String,
    },
}

impl FormatError {
    /// Attach the originating line number.
    pub fn at_line(mut self, number: usize) -> Self {
        match &mut self {
            FormatError::MissingCountField { line, .. }
            | FormatError::InvalidCount { line, .. }
            | FormatError::NegativeCount { line, .. }
            | FormatError::InsufficientFields { line, .. }
            | FormatError::InvalidValue { line, .. } => *line = number,
        }
        self
    }
}

/// Borrowed view of the paired trailing groups of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingGroups<'a> {
    /// Key strings, in line order.
    pub keys: &'a [String],
    /// Unparsed numeric strings, in line order.
    pub values: &'a [String],
    /// Field index of `values[0]` within the line.
    pub values_offset: usize,
}

impl<'a> TrailingGroups<'a> {
    /// Number of pairs N.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when N = 0.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl RecordLayout {
    /// Layout with a custom count field position.
    pub fn with_count_field(mut self, count_field: usize) -> Self {
        self.count_field = count_field;
        self
    }

    /// Layout with a custom group order.
    pub fn with_order(mut self, order: GroupOrder) -> Self {
        self.order = order;
        self
    }

    /// Parse the count field of `fields`.
    pub fn count(&self, fields: &[String]) -> Result<usize, FormatError> {
        let text = fields
            .get(self.count_field)
            .ok_or(FormatError::MissingCountField {
                line: 0,
                index: self.count_field,
                found: fields.len(),
            })?;

        let count: i64 = text.parse().map_err(|_| FormatError::InvalidCount {
            line: 0,
            text: text.clone(),
        })?;

        usize::try_from(count).map_err(|_| FormatError::NegativeCount { line: 0, count })
    }

    /// Locate the key and value groups of a line.
    ///
    /// The `2N` trailing fields must lie strictly after the count field.
    pub fn split<'a>(&self, fields: &'a [String]) -> Result<TrailingGroups<'a>, FormatError> {
        let count = self.count(fields)?;

        let required = count
            .checked_mul(2)
            .and_then(|tail| tail.checked_add(self.count_field + 1))
            .unwrap_or(usize::MAX);
        if fields.len() < required {
            return Err(FormatError::InsufficientFields {
                line: 0,
                count,
                required,
                found: fields.len(),
            });
        }

        let start = fields.len() - 2 * count;
        let (first, second) = fields[start..].split_at(count);
        let groups = match self.order {
            GroupOrder::ValuesThenKeys => TrailingGroups {
                keys: second,
                values: first,
                values_offset: start,
            },
            GroupOrder::KeysThenValues => TrailingGroups {
                keys: first,
                values: second,
                values_offset: start + count,
            },
        };
        Ok(groups)
    }
}
