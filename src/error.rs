//! Error types for NACHA file generation.
//!
//! Numeric and identity violations abort generation; no partial file is
//! ever produced. Text truncation is not an error (it is logged instead).

use thiserror::Error;

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, NachaError>;

/// Errors that can occur while building a NACHA file.
#[derive(Error, Debug)]
pub enum NachaError {
    /// A numeric value does not fit its fixed digit width
    #[error("{field} value {value} exceeds {width} digits")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        width: usize,
    },

    /// Routing number or company identifier is not the required digit string
    #[error("invalid {field} '{value}': expected {expected}")]
    InvalidIdentityFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Unrecognised SEC code, service class, transaction code or direction
    #[error("unknown {kind} '{value}'")]
    UnknownCode { kind: &'static str, value: String },

    /// File generation requested without any batches
    #[error("a NACHA file needs at least one batch")]
    NoBatches,

    /// Batch supplied without any transactions
    #[error("batch {batch_number} has no transactions")]
    EmptyBatch { batch_number: u32 },

    /// Batch numbers must be positive and strictly increasing within a file
    #[error("batch number {batch_number} must be greater than {previous}")]
    BatchNumberOrder { batch_number: u32, previous: u32 },

    /// Entry direction contradicts the batch service class
    #[error("batch {batch_number} is {service_class} but contains a {direction} entry")]
    ServiceClassMismatch {
        batch_number: u32,
        service_class: &'static str,
        direction: &'static str,
    },

    /// Transaction code override points the other way from the entry
    #[error("transaction code {code} cannot be used for a {direction} entry")]
    TransactionCodeMismatch {
        code: &'static str,
        direction: &'static str,
    },

    /// Prenotification entries must carry a zero amount
    #[error("prenote transaction code {code} requires a zero amount, got {amount} cents")]
    NonZeroPrenote { code: &'static str, amount: u64 },

    /// File ID modifier outside A-Z / 0-9
    #[error("file ID modifier '{0}' must be an uppercase letter or digit")]
    InvalidFileIdModifier(char),

    /// Amount text that is not a non-negative whole number of cents
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    /// Invalid row in the CSV transaction input
    #[error("Invalid transaction at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Failed to read input or write output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
}
