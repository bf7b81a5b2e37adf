//! CSV transaction input.
//!
//! Rows are grouped into batches by their `batch` column. Batches are
//! returned in ascending batch number; entries keep their row order.
//! Unlike display fields in the generated file, a malformed row is never
//! skipped: it aborts the load so no partial file can be produced.

use crate::amount::Cents;
use crate::batch::{BatchSpec, SecCode, ServiceClass};
use crate::entry::{Direction, Transaction, TransactionCode};
use crate::error::{NachaError, Result};
use crate::generator::Batch;
use crate::identity::RoutingNumber;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;

/// Date format accepted in the `effective_date` column.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw transaction row as read from CSV.
#[derive(Debug, Deserialize)]
pub struct TransactionRecord {
    /// Batch number the row belongs to
    pub batch: u32,

    pub routing_number: String,

    pub account_number: String,

    /// Dollar amount, e.g. `1000.00`
    pub amount: String,

    /// `credit` or `debit`
    #[serde(rename = "type")]
    pub tx_type: String,

    #[serde(default)]
    pub id_number: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// Two-digit override such as `32` (savings credit)
    #[serde(default)]
    pub transaction_code: Option<String>,

    /// Payment-related information for a type 7 addenda
    #[serde(default)]
    pub addenda: Option<String>,

    #[serde(default)]
    pub sec_code: Option<String>,

    #[serde(default)]
    pub entry_description: Option<String>,

    /// `YYYY-MM-DD`
    #[serde(default)]
    pub effective_date: Option<String>,
}

/// Batch header values used when a row does not set its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDefaults {
    pub sec_code: SecCode,
    pub entry_description: String,
    pub effective_date: NaiveDate,
}

/// Batch-level fields as resolved for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BatchFields {
    sec_code: SecCode,
    entry_description: String,
    effective_date: NaiveDate,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl TransactionRecord {
    /// Converts the row into a transaction and the batch fields it implies.
    fn parse(&self, defaults: &BatchDefaults) -> Result<(Transaction, BatchFields)> {
        let routing_number = RoutingNumber::parse(self.routing_number.trim())?;
        let amount = Cents::from_dollars(&self.amount)?;
        let direction: Direction = self.tx_type.parse()?;

        let mut tx = Transaction::new(
            routing_number,
            self.account_number.trim(),
            amount,
            direction,
        );
        if let Some(id) = non_empty(&self.id_number) {
            tx = tx.with_id_number(id);
        }
        if let Some(name) = non_empty(&self.name) {
            tx = tx.with_name(name);
        }
        if let Some(code) = non_empty(&self.transaction_code) {
            tx = tx.with_transaction_code(code.parse::<TransactionCode>()?);
        }
        if let Some(info) = non_empty(&self.addenda) {
            tx = tx.with_addenda(info);
        }
        tx.resolved_code()?;

        let fields = BatchFields {
            sec_code: match non_empty(&self.sec_code) {
                Some(code) => code.parse()?,
                None => defaults.sec_code,
            },
            entry_description: non_empty(&self.entry_description)
                .map(str::to_string)
                .unwrap_or_else(|| defaults.entry_description.clone()),
            effective_date: match non_empty(&self.effective_date) {
                Some(date) => NaiveDate::parse_from_str(date, INPUT_DATE_FORMAT)
                    .map_err(|e| NachaError::UnknownCode {
                        kind: "effective date",
                        value: format!("{} ({})", date, e),
                    })?,
                None => defaults.effective_date,
            },
        };

        Ok((tx, fields))
    }
}

/// Reads CSV rows and groups them into batches.
///
/// The service class of each batch is derived from the directions of its
/// entries: 220 for credits only, 225 for debits only, 200 otherwise.
pub fn load_batches<R: Read>(reader: R, defaults: &BatchDefaults) -> Result<Vec<Batch>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut pending: BTreeMap<u32, (BatchFields, Vec<Transaction>)> = BTreeMap::new();

    for (row_idx, result) in csv_reader.deserialize::<TransactionRecord>().enumerate() {
        let row = row_idx + 2; // 1-indexed, accounting for header row
        let invalid = |message: String| NachaError::InvalidRecord { row, message };

        let record = result.map_err(|e| invalid(e.to_string()))?;
        if record.batch == 0 {
            return Err(invalid("batch number must be positive".to_string()));
        }

        let (tx, fields) = record.parse(defaults).map_err(|e| invalid(e.to_string()))?;

        match pending.get_mut(&record.batch) {
            Some((existing, transactions)) => {
                if *existing != fields {
                    return Err(invalid(format!(
                        "batch {} fields differ from earlier rows of the same batch",
                        record.batch
                    )));
                }
                transactions.push(tx);
            }
            None => {
                pending.insert(record.batch, (fields, vec![tx]));
            }
        }
        debug!("Row {}: queued for batch {}", row, record.batch);
    }

    let batches = pending
        .into_iter()
        .map(|(batch_number, (fields, transactions))| {
            let service_class =
                ServiceClass::for_directions(transactions.iter().map(|tx| tx.direction));
            let spec = BatchSpec::new(
                service_class,
                fields.sec_code,
                fields.entry_description,
                fields.effective_date,
                batch_number,
            );
            Batch::new(spec, transactions)
        })
        .collect();

    Ok(batches)
}
