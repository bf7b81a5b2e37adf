//! Fixed-width NACHA records.
//!
//! A [`Record`] can only be produced by [`RecordBuilder`](crate::format::RecordBuilder),
//! which guarantees every line is exactly [`RECORD_WIDTH`] characters.

use std::fmt;

/// Width of every NACHA record line.
pub const RECORD_WIDTH: usize = 94;

/// Record type codes, the first character of every line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// Type 1: file header.
    FileHeader,
    /// Type 5: batch header.
    BatchHeader,
    /// Type 6: entry detail.
    EntryDetail,
    /// Type 7: addenda attached to the preceding entry detail.
    Addenda,
    /// Type 8: batch control.
    BatchControl,
    /// Type 9: file control.
    FileControl,
    /// All-nines line completing the final 10-record block.
    BlockFiller,
}

impl RecordType {
    /// The leading character written for this record type.
    pub fn code(self) -> char {
        match self {
            RecordType::FileHeader => '1',
            RecordType::BatchHeader => '5',
            RecordType::EntryDetail => '6',
            RecordType::Addenda => '7',
            RecordType::BatchControl => '8',
            RecordType::FileControl | RecordType::BlockFiller => '9',
        }
    }
}

/// A single 94-character line of a NACHA file.
///
/// Records are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    record_type: RecordType,
    line: String,
}

impl Record {
    pub(crate) fn new(record_type: RecordType, line: String) -> Self {
        Record { record_type, line }
    }

    /// The record's type tag.
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// The fixed-width line, without a line terminator.
    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// Returns the characters at 1-based inclusive positions `start..=end`,
    /// the way NACHA layouts number their fields.
    ///
    /// # Panics
    ///
    /// Panics if `start` is 0, `end` is past position 94, or `start` is
    /// more than one past `end`.
    pub fn field(&self, start: usize, end: usize) -> &str {
        &self.line[start - 1..end]
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_codes() {
        assert_eq!(RecordType::FileHeader.code(), '1');
        assert_eq!(RecordType::BatchHeader.code(), '5');
        assert_eq!(RecordType::EntryDetail.code(), '6');
        assert_eq!(RecordType::Addenda.code(), '7');
        assert_eq!(RecordType::BatchControl.code(), '8');
        assert_eq!(RecordType::FileControl.code(), '9');
        assert_eq!(RecordType::BlockFiller.code(), '9');
    }

    #[test]
    fn test_field_uses_one_based_positions() {
        let record = Record::new(RecordType::FileControl, "9000001".to_string());
        assert_eq!(record.field(1, 1), "9");
        assert_eq!(record.field(2, 7), "000001");
    }
}
