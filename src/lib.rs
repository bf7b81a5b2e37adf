//! # NACHA Generator
//!
//! Builds fixed-width NACHA ACH payment files from structured transaction
//! data: file header, batches of entry details with their controls, and the
//! file control, every line exactly 94 characters.
//!
//! ## Design Principles
//!
//! - **Integer cents**: amounts are `u64` cents, never floating point
//! - **Fail closed**: numeric overflow and malformed identifiers abort the file
//! - **Tolerant text**: over-long display fields are truncated with a warning
//! - **Deterministic output**: same inputs and clock produce identical bytes
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Local;
//! use nacha_gen::{
//!     Batch, BatchSpec, Cents, NachaGenerator, OriginIdentity, RoutingNumber, SecCode,
//!     ServiceClass, Transaction,
//! };
//!
//! let identity = OriginIdentity::new("071000505", "1234567890", "ACME CORP", "1234567890").unwrap();
//! let now = Local::now().naive_local();
//! let spec = BatchSpec::new(ServiceClass::CreditsOnly, SecCode::Ppd, "PAYROLL", now.date(), 1);
//! let payroll = vec![
//!     Transaction::credit(RoutingNumber::parse("123456789").unwrap(), "9876543210", Cents::new(100000))
//!         .with_name("JOHN DOE"),
//! ];
//!
//! let generator = NachaGenerator::new(identity);
//! generator
//!     .write_file(&[Batch::new(spec, payroll)], now, std::io::stdout())
//!     .unwrap();
//! ```

pub mod amount;
pub mod batch;
pub mod entry;
pub mod error;
pub mod file;
pub mod format;
pub mod generator;
pub mod identity;
pub mod input;
pub mod record;
pub mod totals;

pub use amount::Cents;
pub use batch::{BatchSpec, SecCode, ServiceClass};
pub use entry::{Direction, TraceNumber, Transaction, TransactionCode};
pub use error::{NachaError, Result};
pub use generator::{Batch, GeneratorOptions, NachaGenerator};
pub use identity::{OriginIdentity, RoutingNumber};
pub use input::{load_batches, BatchDefaults};
pub use record::{Record, RecordType, RECORD_WIDTH};
pub use totals::RunningTotals;
