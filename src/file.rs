//! File header (type 1) and file control (type 9) records.

use crate::batch::DATE_FORMAT;
use crate::error::{NachaError, Result};
use crate::format::{Justify, RecordBuilder};
use crate::generator::GeneratorOptions;
use crate::identity::OriginIdentity;
use crate::record::{Record, RecordType, RECORD_WIDTH};
use crate::totals::RunningTotals;
use chrono::NaiveDateTime;

/// Records per block.
pub const BLOCKING_FACTOR: u64 = 10;

/// Number of 10-record blocks needed for `record_count` records.
pub fn block_count(record_count: u64) -> u64 {
    record_count.div_ceil(BLOCKING_FACTOR)
}

/// File ID modifiers are a single uppercase letter or digit.
pub(crate) fn validate_file_id_modifier(modifier: char) -> Result<()> {
    if modifier.is_ascii_uppercase() || modifier.is_ascii_digit() {
        Ok(())
    } else {
        Err(NachaError::InvalidFileIdModifier(modifier))
    }
}

/// Builds the file header record. Pure function of its arguments.
pub fn build_file_header(
    identity: &OriginIdentity,
    now: NaiveDateTime,
    options: &GeneratorOptions,
) -> Result<Record> {
    validate_file_id_modifier(options.file_id_modifier)?;

    Ok(RecordBuilder::new(RecordType::FileHeader)
        .literal("01")
        .justified(
            "immediate destination",
            identity.immediate_destination().as_str(),
            10,
            Justify::Right,
        )
        .literal(identity.immediate_origin())
        .literal(&now.format(DATE_FORMAT).to_string())
        .literal(&now.format("%H%M").to_string())
        .literal(&options.file_id_modifier.to_string())
        .literal("094")
        .numeric("blocking factor", BLOCKING_FACTOR, 2)?
        .literal("1")
        .text("immediate destination name", &options.destination_name, 23)
        .text("immediate origin name", identity.company_name(), 23)
        .text("reference code", &options.reference_code, 8)
        .finish())
}

/// Builds the file control record from file-scoped totals.
pub fn build_file_control(
    batch_count: u64,
    block_count: u64,
    totals: &RunningTotals,
) -> Result<Record> {
    Ok(RecordBuilder::new(RecordType::FileControl)
        .numeric("batch count", batch_count, 6)?
        .numeric("block count", block_count, 6)?
        .numeric("entry/addenda count", totals.entry_addenda_count(), 8)?
        .numeric("entry hash", totals.entry_hash(), 10)?
        .numeric("total debit", totals.total_debit().get(), 12)?
        .numeric("total credit", totals.total_credit().get(), 12)?
        .blank(39)
        .finish())
}

/// A line of nines used to pad the last block.
pub fn block_filler() -> Record {
    RecordBuilder::new(RecordType::BlockFiller)
        .literal(&"9".repeat(RECORD_WIDTH - 1))
        .finish()
}
