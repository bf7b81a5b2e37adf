//! Running control totals for batches and files.
//!
//! One `RunningTotals` is kept per batch and one per file. The file value is
//! only ever built by absorbing finished batch values, so file totals always
//! equal the sum of their batches.

use crate::amount::Cents;
use crate::entry::Direction;

/// Entry hashes are reported as their 10 low-order digits.
const ENTRY_HASH_MODULUS: u64 = 10_000_000_000;

/// Counts and sums carried into batch and file control records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunningTotals {
    entry_addenda_count: u64,
    entry_hash: u64,
    total_debit: u64,
    total_credit: u64,
}

impl RunningTotals {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts for one entry detail and its addenda records.
    ///
    /// The hash accumulates in full; truncation happens in [`Self::entry_hash`].
    pub(crate) fn add_entry(
        &mut self,
        dfi_hash: u64,
        amount: Cents,
        direction: Direction,
        addenda_count: u64,
    ) {
        self.entry_addenda_count += 1 + addenda_count;
        self.entry_hash += dfi_hash;
        match direction {
            Direction::Credit => {
                self.total_credit = self.total_credit.saturating_add(amount.get())
            }
            Direction::Debit => self.total_debit = self.total_debit.saturating_add(amount.get()),
        }
    }

    /// Folds a finished batch into file-level totals.
    pub(crate) fn absorb(&mut self, batch: &RunningTotals) {
        self.entry_addenda_count += batch.entry_addenda_count;
        self.entry_hash += batch.entry_hash;
        self.total_debit = self.total_debit.saturating_add(batch.total_debit);
        self.total_credit = self.total_credit.saturating_add(batch.total_credit);
    }

    /// Number of entry detail plus addenda records.
    pub fn entry_addenda_count(&self) -> u64 {
        self.entry_addenda_count
    }

    /// Entry hash as written to control records (10 low-order digits).
    pub fn entry_hash(&self) -> u64 {
        self.entry_hash % ENTRY_HASH_MODULUS
    }

    /// Untruncated sum of DFI identifiers.
    pub fn raw_entry_hash(&self) -> u64 {
        self.entry_hash
    }

    pub fn total_debit(&self) -> Cents {
        Cents::new(self.total_debit)
    }

    pub fn total_credit(&self) -> Cents {
        Cents::new(self.total_credit)
    }
}
