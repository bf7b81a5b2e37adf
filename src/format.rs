//! Fixed-width field formatting.
//!
//! Every record is composed from two primitives: [`pad_numeric`] for
//! zero-filled digit fields and [`pad_text`] for justified alphanumeric
//! fields. [`RecordBuilder`] strings them together and refuses to produce a
//! [`Record`] whose width is anything other than 94.

use crate::error::{NachaError, Result};
use crate::record::{Record, RecordType, RECORD_WIDTH};
use log::warn;

/// Justification for alphanumeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    /// Text first, trailing spaces. NACHA's default for alphanumeric fields.
    #[default]
    Left,
    /// Leading spaces, text last.
    Right,
}

/// Zero-fills `value` on the left to exactly `width` digits.
///
/// Fails with [`NachaError::FieldOverflow`] when the value needs more digits;
/// a numeric field is never truncated.
pub fn pad_numeric(field: &'static str, value: u64, width: usize) -> Result<String> {
    let digits = value.to_string();
    if digits.len() > width {
        return Err(NachaError::FieldOverflow {
            field,
            value,
            width,
        });
    }
    Ok(format!("{:0>width$}", digits, width = width))
}

/// Fits `value` into `width` characters, space-padded per `justify`.
///
/// Longer values are truncated to `width` with a warning. Characters outside
/// printable ASCII are written as spaces so byte and character widths agree.
pub fn pad_text(field: &'static str, value: &str, width: usize, justify: Justify) -> String {
    let value: String = if value.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        value.to_string()
    } else {
        warn!("{} '{}' contains non-ASCII characters", field, value);
        value
            .chars()
            .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { ' ' })
            .collect()
    };

    let fitted: String = if value.len() > width {
        let truncated: String = value.chars().take(width).collect();
        warn!(
            "{} '{}' truncated to {} characters: '{}'",
            field, value, width, truncated
        );
        truncated
    } else {
        value
    };

    match justify {
        Justify::Left => format!("{:<width$}", fitted, width = width),
        Justify::Right => format!("{:>width$}", fitted, width = width),
    }
}

/// Accumulates the fields of one record, left to right.
#[derive(Debug)]
pub struct RecordBuilder {
    record_type: RecordType,
    line: String,
}

impl RecordBuilder {
    /// Starts a record with its type code in position 1.
    pub fn new(record_type: RecordType) -> Self {
        let mut line = String::with_capacity(RECORD_WIDTH);
        line.push(record_type.code());
        RecordBuilder { record_type, line }
    }

    /// Appends a constant or pre-validated fixed-width value as-is.
    pub fn literal(mut self, value: &str) -> Self {
        self.line.push_str(value);
        self
    }

    /// Appends a zero-filled numeric field.
    pub fn numeric(mut self, field: &'static str, value: u64, width: usize) -> Result<Self> {
        self.line.push_str(&pad_numeric(field, value, width)?);
        Ok(self)
    }

    /// Appends a left-justified alphanumeric field.
    pub fn text(self, field: &'static str, value: &str, width: usize) -> Self {
        self.justified(field, value, width, Justify::Left)
    }

    /// Appends an alphanumeric field with explicit justification.
    pub fn justified(
        mut self,
        field: &'static str,
        value: &str,
        width: usize,
        justify: Justify,
    ) -> Self {
        self.line.push_str(&pad_text(field, value, width, justify));
        self
    }

    /// Appends `width` spaces.
    pub fn blank(mut self, width: usize) -> Self {
        self.line.push_str(&" ".repeat(width));
        self
    }

    /// Completes the record.
    ///
    /// # Panics
    ///
    /// Panics if the accumulated line is not exactly 94 bytes. Every layout
    /// in this crate sums to 94 ASCII characters, so this only fires on a
    /// layout bug or a non-ASCII literal.
    pub fn finish(self) -> Record {
        let width = self.line.len();
        assert_eq!(
            width, RECORD_WIDTH,
            "{:?} record is {} characters wide: {:?}",
            self.record_type, width, self.line
        );
        Record::new(self.record_type, self.line)
    }
}
