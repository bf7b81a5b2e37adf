//! NACHA file assembly.
//!
//! Emits records in the mandated order: file header, then for each batch a
//! batch header, its entries (with addenda) and a batch control, then the
//! file control. Each call works on its own [`RunningTotals`], so one
//! generator can serve concurrent callers without locking.

use crate::batch::{build_batch_control, build_batch_header, BatchSpec};
use crate::entry::{encode_entry, TraceNumber, Transaction};
use crate::error::{NachaError, Result};
use crate::file::{
    block_count, block_filler, build_file_control, build_file_header, validate_file_id_modifier,
    BLOCKING_FACTOR,
};
use crate::identity::OriginIdentity;
use crate::record::Record;
use crate::totals::RunningTotals;
use chrono::NaiveDateTime;
use log::{debug, info};
use std::io::Write;

/// File-level settings that are not part of the originator's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Distinguishes files created on the same day, `A`-`Z` or `0`-`9`.
    pub file_id_modifier: char,
    /// Immediate destination name in the file header.
    pub destination_name: String,
    /// Reference code in the file header, 8 characters.
    pub reference_code: String,
    /// Sequence part of the first trace number in the file.
    pub trace_seed: u64,
    /// Append all-nines lines until the line count is a multiple of 10.
    pub pad_blocks: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            file_id_modifier: 'A',
            destination_name: "LaSalle Bank N.A.".to_string(),
            reference_code: String::new(),
            trace_seed: 1,
            pad_blocks: false,
        }
    }
}

/// One batch: its header fields and its transactions in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub spec: BatchSpec,
    pub transactions: Vec<Transaction>,
}

impl Batch {
    pub fn new(spec: BatchSpec, transactions: Vec<Transaction>) -> Self {
        Batch { spec, transactions }
    }
}

/// Generates NACHA files for a single originator.
///
/// The generator holds no mutable state; totals live only for the duration
/// of one [`generate_records`](Self::generate_records) call.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use nacha_gen::{
///     Batch, BatchSpec, Cents, NachaGenerator, OriginIdentity, RoutingNumber, SecCode,
///     ServiceClass, Transaction,
/// };
///
/// let identity = OriginIdentity::new("071000505", "1234567890", "ACME CORP", "1234567890")?;
/// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let spec = BatchSpec::new(ServiceClass::Mixed, SecCode::Ppd, "PAYROLL", date, 1);
/// let tx = Transaction::credit(RoutingNumber::parse("071000505")?, "12345", Cents::new(100000));
///
/// let generator = NachaGenerator::new(identity);
/// let now = date.and_hms_opt(8, 0, 0).unwrap();
/// let file = generator.generate_file(&[Batch::new(spec, vec![tx])], now)?;
/// assert!(file.lines().all(|line| line.len() == 94));
/// # Ok::<(), nacha_gen::NachaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct NachaGenerator {
    identity: OriginIdentity,
    options: GeneratorOptions,
}

impl NachaGenerator {
    /// Creates a generator with default options.
    pub fn new(identity: OriginIdentity) -> Self {
        NachaGenerator {
            identity,
            options: GeneratorOptions::default(),
        }
    }

    /// Creates a generator with explicit options.
    pub fn with_options(identity: OriginIdentity, options: GeneratorOptions) -> Result<Self> {
        validate_file_id_modifier(options.file_id_modifier)?;
        Ok(NachaGenerator { identity, options })
    }

    pub fn identity(&self) -> &OriginIdentity {
        &self.identity
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Builds every record of the file in emission order.
    ///
    /// `now` supplies the file creation date/time and the batch descriptive
    /// date; a fixed `now` makes the output byte-for-byte reproducible.
    /// Any error aborts the whole file.
    pub fn generate_records(&self, batches: &[Batch], now: NaiveDateTime) -> Result<Vec<Record>> {
        if batches.is_empty() {
            return Err(NachaError::NoBatches);
        }

        let mut records = vec![build_file_header(&self.identity, now, &self.options)?];
        let mut file_totals = RunningTotals::new();
        let mut trace_sequence = self.options.trace_seed;
        let mut previous_batch = 0;

        for batch in batches {
            let spec = &batch.spec;
            if spec.batch_number <= previous_batch {
                return Err(NachaError::BatchNumberOrder {
                    batch_number: spec.batch_number,
                    previous: previous_batch,
                });
            }
            previous_batch = spec.batch_number;

            if batch.transactions.is_empty() {
                return Err(NachaError::EmptyBatch {
                    batch_number: spec.batch_number,
                });
            }

            records.push(build_batch_header(spec, &self.identity, now.date())?);

            let mut batch_totals = RunningTotals::new();
            for tx in &batch.transactions {
                spec.check_direction(tx.direction)?;
                let trace = TraceNumber::new(self.identity.originating_dfi(), trace_sequence)?;
                records.extend(encode_entry(tx, &trace, &mut batch_totals)?);
                trace_sequence += 1;
            }

            records.push(build_batch_control(spec, &self.identity, &batch_totals)?);
            file_totals.absorb(&batch_totals);

            debug!(
                "Batch {}: {} entries/addenda, hash {}, debit {}, credit {}",
                spec.batch_number,
                batch_totals.entry_addenda_count(),
                batch_totals.entry_hash(),
                batch_totals.total_debit(),
                batch_totals.total_credit()
            );
        }

        // The file control itself is part of the block count.
        let record_count = records.len() as u64 + 1;
        let blocks = block_count(record_count);
        records.push(build_file_control(
            batches.len() as u64,
            blocks,
            &file_totals,
        )?);

        if self.options.pad_blocks {
            let padded = blocks * BLOCKING_FACTOR;
            records.extend((record_count..padded).map(|_| block_filler()));
        }

        info!(
            "Generated NACHA file: {} batches, {} entries/addenda, {} blocks, debit {}, credit {}",
            batches.len(),
            file_totals.entry_addenda_count(),
            blocks,
            file_totals.total_debit(),
            file_totals.total_credit()
        );

        Ok(records)
    }

    /// Builds the file as newline-separated lines, without a trailing newline.
    pub fn generate_file(&self, batches: &[Batch], now: NaiveDateTime) -> Result<String> {
        let records = self.generate_records(batches, now)?;
        let lines: Vec<&str> = records.iter().map(Record::as_str).collect();
        Ok(lines.join("\n"))
    }

    /// Writes the file to `writer`, each line terminated by a newline.
    ///
    /// Nothing is written unless the whole file generated successfully.
    pub fn write_file<W: Write>(
        &self,
        batches: &[Batch],
        now: NaiveDateTime,
        mut writer: W,
    ) -> Result<()> {
        let records = self.generate_records(batches, now)?;
        for record in &records {
            writeln!(writer, "{}", record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Cents;
    use crate::batch::{SecCode, ServiceClass};
    use crate::identity::RoutingNumber;
    use crate::record::RecordType;
    use chrono::NaiveDate;

    fn generator() -> NachaGenerator {
        NachaGenerator::new(
            OriginIdentity::new("071000505", "1234567890", "ACME CORP", "1234567890").unwrap(),
        )
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn spec(batch_number: u32) -> BatchSpec {
        BatchSpec::new(
            ServiceClass::Mixed,
            SecCode::Ppd,
            "PAYROLL",
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            batch_number,
        )
    }

    fn credit(amount: u64) -> Transaction {
        Transaction::credit(
            RoutingNumber::parse("123456789").unwrap(),
            "9876543210",
            Cents::new(amount),
        )
    }

    #[test]
    fn test_record_order() {
        let batches = vec![Batch::new(spec(1), vec![credit(100), credit(200)])];
        let records = generator().generate_records(&batches, now()).unwrap();

        let types: Vec<RecordType> = records.iter().map(Record::record_type).collect();
        assert_eq!(
            types,
            vec![
                RecordType::FileHeader,
                RecordType::BatchHeader,
                RecordType::EntryDetail,
                RecordType::EntryDetail,
                RecordType::BatchControl,
                RecordType::FileControl,
            ]
        );
    }

    #[test]
    fn test_no_batches_is_an_error() {
        assert!(matches!(
            generator().generate_records(&[], now()),
            Err(NachaError::NoBatches)
        ));
    }

    #[test]
    fn test_empty_batch_is_an_error() {
        let batches = vec![
            Batch::new(spec(1), vec![credit(100)]),
            Batch::new(spec(2), vec![]),
        ];
        assert!(matches!(
            generator().generate_records(&batches, now()),
            Err(NachaError::EmptyBatch { batch_number: 2 })
        ));
    }

    #[test]
    fn test_batch_numbers_must_increase() {
        let batches = vec![
            Batch::new(spec(2), vec![credit(100)]),
            Batch::new(spec(2), vec![credit(100)]),
        ];
        assert!(matches!(
            generator().generate_records(&batches, now()),
            Err(NachaError::BatchNumberOrder {
                batch_number: 2,
                previous: 2
            })
        ));

        let batches = vec![Batch::new(spec(0), vec![credit(100)])];
        assert!(matches!(
            generator().generate_records(&batches, now()),
            Err(NachaError::BatchNumberOrder { .. })
        ));
    }

    #[test]
    fn test_service_class_mismatch_aborts() {
        let mut credits_only = spec(1);
        credits_only.service_class = ServiceClass::CreditsOnly;
        let debit = Transaction::debit(
            RoutingNumber::parse("123456789").unwrap(),
            "1",
            Cents::new(5),
        );
        let batches = vec![Batch::new(credits_only, vec![credit(1), debit])];

        assert!(matches!(
            generator().generate_records(&batches, now()),
            Err(NachaError::ServiceClassMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_file_id_modifier() {
        let identity =
            OriginIdentity::new("071000505", "1234567890", "ACME CORP", "1234567890").unwrap();
        let options = GeneratorOptions {
            file_id_modifier: 'a',
            ..GeneratorOptions::default()
        };
        assert!(matches!(
            NachaGenerator::with_options(identity, options),
            Err(NachaError::InvalidFileIdModifier('a'))
        ));
    }

    #[test]
    fn test_pad_blocks() {
        let identity =
            OriginIdentity::new("071000505", "1234567890", "ACME CORP", "1234567890").unwrap();
        let options = GeneratorOptions {
            pad_blocks: true,
            ..GeneratorOptions::default()
        };
        let generator = NachaGenerator::with_options(identity, options).unwrap();
        let batches = vec![Batch::new(spec(1), vec![credit(100), credit(200)])];

        let records = generator.generate_records(&batches, now()).unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[5].record_type(), RecordType::FileControl);
        assert!(records[6..]
            .iter()
            .all(|r| r.record_type() == RecordType::BlockFiller));
        assert_eq!(records[5].field(8, 13), "000001");
    }

    #[test]
    fn test_write_file_terminates_lines() {
        let batches = vec![Batch::new(spec(1), vec![credit(100)])];
        let mut output = Vec::new();
        generator().write_file(&batches, now(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 5);
        assert_eq!(
            text.strip_suffix('\n').unwrap(),
            generator().generate_file(&batches, now()).unwrap()
        );
    }
}
