//! Entry detail (type 6) and addenda (type 7) records.
//!
//! [`encode_entry`] is the only place [`RunningTotals`] are mutated.

use crate::amount::Cents;
use crate::error::{NachaError, Result};
use crate::format::{pad_numeric, RecordBuilder};
use crate::identity::RoutingNumber;
use crate::record::{Record, RecordType};
use crate::totals::RunningTotals;
use log::debug;
use std::fmt;
use std::str::FromStr;

const ACCOUNT_NUMBER_WIDTH: usize = 17;
const TRACE_SEQUENCE_WIDTH: usize = 7;

/// Whether an entry moves money to or from the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

impl FromStr for Direction {
    type Err = NachaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "credit" | "cr" => Ok(Direction::Credit),
            "debit" | "dr" => Ok(Direction::Debit),
            _ => Err(NachaError::UnknownCode {
                kind: "direction",
                value: s.to_string(),
            }),
        }
    }
}

/// Two-digit transaction codes for checking and savings accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionCode {
    /// 22
    CheckingCredit,
    /// 23
    CheckingCreditPrenote,
    /// 27
    CheckingDebit,
    /// 28
    CheckingDebitPrenote,
    /// 32
    SavingsCredit,
    /// 33
    SavingsCreditPrenote,
    /// 37
    SavingsDebit,
    /// 38
    SavingsDebitPrenote,
}

impl TransactionCode {
    const ALL: [TransactionCode; 8] = [
        TransactionCode::CheckingCredit,
        TransactionCode::CheckingCreditPrenote,
        TransactionCode::CheckingDebit,
        TransactionCode::CheckingDebitPrenote,
        TransactionCode::SavingsCredit,
        TransactionCode::SavingsCreditPrenote,
        TransactionCode::SavingsDebit,
        TransactionCode::SavingsDebitPrenote,
    ];

    /// Checking-account live entry for the direction.
    pub fn default_for(direction: Direction) -> Self {
        match direction {
            Direction::Credit => TransactionCode::CheckingCredit,
            Direction::Debit => TransactionCode::CheckingDebit,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            TransactionCode::CheckingCredit => "22",
            TransactionCode::CheckingCreditPrenote => "23",
            TransactionCode::CheckingDebit => "27",
            TransactionCode::CheckingDebitPrenote => "28",
            TransactionCode::SavingsCredit => "32",
            TransactionCode::SavingsCreditPrenote => "33",
            TransactionCode::SavingsDebit => "37",
            TransactionCode::SavingsDebitPrenote => "38",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            TransactionCode::CheckingCredit
            | TransactionCode::CheckingCreditPrenote
            | TransactionCode::SavingsCredit
            | TransactionCode::SavingsCreditPrenote => Direction::Credit,
            _ => Direction::Debit,
        }
    }

    /// Prenotifications are zero-dollar account verification entries.
    pub fn is_prenote(self) -> bool {
        matches!(
            self,
            TransactionCode::CheckingCreditPrenote
                | TransactionCode::CheckingDebitPrenote
                | TransactionCode::SavingsCreditPrenote
                | TransactionCode::SavingsDebitPrenote
        )
    }
}

impl FromStr for TransactionCode {
    type Err = NachaError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        TransactionCode::ALL
            .into_iter()
            .find(|code| code.code() == s)
            .ok_or_else(|| NachaError::UnknownCode {
                kind: "transaction code",
                value: s.to_string(),
            })
    }
}

/// One payment to or from a receiver's account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub routing_number: RoutingNumber,
    pub account_number: String,
    pub amount: Cents,
    pub direction: Direction,
    pub id_number: Option<String>,
    pub name: Option<String>,
    /// Overrides the checking-account default code.
    pub transaction_code: Option<TransactionCode>,
    /// Payment-related information carried in a single type 7 addenda.
    pub addenda: Option<String>,
}

impl Transaction {
    /// A transaction with only the required fields set.
    pub fn new(
        routing_number: RoutingNumber,
        account_number: impl Into<String>,
        amount: Cents,
        direction: Direction,
    ) -> Self {
        Transaction {
            routing_number,
            account_number: account_number.into(),
            amount,
            direction,
            id_number: None,
            name: None,
            transaction_code: None,
            addenda: None,
        }
    }

    pub fn credit(
        routing_number: RoutingNumber,
        account_number: impl Into<String>,
        amount: Cents,
    ) -> Self {
        Self::new(routing_number, account_number, amount, Direction::Credit)
    }

    pub fn debit(
        routing_number: RoutingNumber,
        account_number: impl Into<String>,
        amount: Cents,
    ) -> Self {
        Self::new(routing_number, account_number, amount, Direction::Debit)
    }

    pub fn with_id_number(mut self, id_number: impl Into<String>) -> Self {
        self.id_number = Some(id_number.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transaction_code(mut self, code: TransactionCode) -> Self {
        self.transaction_code = Some(code);
        self
    }

    pub fn with_addenda(mut self, info: impl Into<String>) -> Self {
        self.addenda = Some(info.into());
        self
    }

    /// The code written to the entry, after checking any override.
    pub fn resolved_code(&self) -> Result<TransactionCode> {
        let code = match self.transaction_code {
            Some(code) if code.direction() != self.direction => {
                return Err(NachaError::TransactionCodeMismatch {
                    code: code.code(),
                    direction: self.direction.as_str(),
                })
            }
            Some(code) => code,
            None => TransactionCode::default_for(self.direction),
        };

        if code.is_prenote() && !self.amount.is_zero() {
            return Err(NachaError::NonZeroPrenote {
                code: code.code(),
                amount: self.amount.get(),
            });
        }
        Ok(code)
    }
}

/// Originating DFI plus a 7-digit sequence, 15 characters in all.
///
/// Banks reassign trace numbers downstream; these are unique placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceNumber {
    odfi: String,
    sequence: u64,
}

impl TraceNumber {
    /// Fails with [`NachaError::FieldOverflow`] past sequence 9,999,999.
    pub fn new(odfi: &str, sequence: u64) -> Result<Self> {
        pad_numeric("trace sequence", sequence, TRACE_SEQUENCE_WIDTH)?;
        Ok(TraceNumber {
            odfi: odfi.to_string(),
            sequence,
        })
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl fmt::Display for TraceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:0>width$}",
            self.odfi,
            self.sequence,
            width = TRACE_SEQUENCE_WIDTH
        )
    }
}

/// Encodes one transaction as an entry detail record followed by its addenda.
///
/// Validation happens before `totals` is touched, so a failed entry leaves
/// the totals unchanged.
pub fn encode_entry(
    tx: &Transaction,
    trace: &TraceNumber,
    totals: &mut RunningTotals,
) -> Result<Vec<Record>> {
    let code = tx.resolved_code()?;

    let printable = tx
        .account_number
        .chars()
        .all(|c| c.is_ascii() && !c.is_ascii_control());
    if tx.account_number.is_empty()
        || tx.account_number.len() > ACCOUNT_NUMBER_WIDTH
        || !printable
    {
        return Err(NachaError::InvalidIdentityFormat {
            field: "account number",
            value: tx.account_number.clone(),
            expected: "1 to 17 printable ASCII characters",
        });
    }

    let addenda_indicator = if tx.addenda.is_some() { "1" } else { "0" };

    let entry = RecordBuilder::new(RecordType::EntryDetail)
        .literal(code.code())
        .literal(tx.routing_number.dfi_identifier())
        .literal(tx.routing_number.check_digit())
        .text("account number", &tx.account_number, ACCOUNT_NUMBER_WIDTH)
        .numeric("amount", tx.amount.get(), 10)?
        .text(
            "identification number",
            tx.id_number.as_deref().unwrap_or(""),
            15,
        )
        .text("individual name", tx.name.as_deref().unwrap_or(""), 22)
        .blank(2)
        .literal(addenda_indicator)
        .literal(&trace.to_string())
        .finish();

    let mut records = vec![entry];
    if let Some(info) = &tx.addenda {
        records.push(encode_addenda(info, 1, trace)?);
    }

    let addenda_count = (records.len() - 1) as u64;
    totals.add_entry(
        tx.routing_number.hash_value(),
        tx.amount,
        tx.direction,
        addenda_count,
    );

    debug!(
        "Encoded {} {} of {} to {} with trace {}",
        code.code(),
        tx.direction.as_str(),
        tx.amount,
        tx.routing_number,
        trace
    );

    Ok(records)
}

/// Builds a PPD/CCD style addenda (type code 05).
fn encode_addenda(info: &str, addenda_sequence: u64, trace: &TraceNumber) -> Result<Record> {
    Ok(RecordBuilder::new(RecordType::Addenda)
        .literal("05")
        .text("payment related information", info, 80)
        .numeric("addenda sequence number", addenda_sequence, 4)?
        .numeric("entry detail sequence number", trace.sequence(), 7)?
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routing(value: &str) -> RoutingNumber {
        RoutingNumber::parse(value).unwrap()
    }

    fn trace(sequence: u64) -> TraceNumber {
        TraceNumber::new("07100050", sequence).unwrap()
    }

    #[test]
    fn test_credit_entry_layout() {
        let tx = Transaction::credit(routing("123456789"), "9876543210", Cents::new(100000))
            .with_id_number("EMP001")
            .with_name("JOHN DOE");
        let mut totals = RunningTotals::new();

        let records = encode_entry(&tx, &trace(1), &mut totals).unwrap();
        assert_eq!(records.len(), 1);

        let entry = &records[0];
        assert_eq!(entry.as_str().len(), 94);
        assert_eq!(entry.field(1, 1), "6");
        assert_eq!(entry.field(2, 3), "22");
        assert_eq!(entry.field(4, 11), "12345678");
        assert_eq!(entry.field(12, 12), "9");
        assert_eq!(entry.field(13, 29), "9876543210       ");
        assert_eq!(entry.field(30, 39), "0000100000");
        assert_eq!(entry.field(40, 54), "EMP001         ");
        assert_eq!(entry.field(55, 76), "JOHN DOE              ");
        assert_eq!(entry.field(77, 78), "  ");
        assert_eq!(entry.field(79, 79), "0");
        assert_eq!(entry.field(80, 94), "071000500000001");

        assert_eq!(totals.entry_addenda_count(), 1);
        assert_eq!(totals.entry_hash(), 12_345_678);
        assert_eq!(totals.total_credit().get(), 100000);
        assert_eq!(totals.total_debit().get(), 0);
    }

    #[test]
    fn test_debit_defaults_to_27() {
        let tx = Transaction::debit(routing("071000505"), "42", Cents::new(1));
        let mut totals = RunningTotals::new();

        let records = encode_entry(&tx, &trace(2), &mut totals).unwrap();
        assert_eq!(records[0].field(2, 3), "27");
        assert_eq!(totals.total_debit().get(), 1);
        assert_eq!(totals.total_credit().get(), 0);
    }

    #[test]
    fn test_zero_amount_zero_fills() {
        let tx = Transaction::credit(routing("071000505"), "42", Cents::ZERO);
        let mut totals = RunningTotals::new();

        let records = encode_entry(&tx, &trace(1), &mut totals).unwrap();
        assert_eq!(records[0].field(30, 39), "0000000000");
    }

    #[test]
    fn test_savings_override() {
        let tx = Transaction::credit(routing("071000505"), "42", Cents::new(10))
            .with_transaction_code(TransactionCode::SavingsCredit);
        let mut totals = RunningTotals::new();

        let records = encode_entry(&tx, &trace(1), &mut totals).unwrap();
        assert_eq!(records[0].field(2, 3), "32");
    }

    #[test]
    fn test_override_must_match_direction() {
        let tx = Transaction::credit(routing("071000505"), "42", Cents::new(10))
            .with_transaction_code(TransactionCode::SavingsDebit);
        let mut totals = RunningTotals::new();

        let err = encode_entry(&tx, &trace(1), &mut totals).unwrap_err();
        assert!(matches!(err, NachaError::TransactionCodeMismatch { .. }));
        assert_eq!(totals, RunningTotals::new());
    }

    #[test]
    fn test_prenote_requires_zero_amount() {
        let tx = Transaction::debit(routing("071000505"), "42", Cents::new(10))
            .with_transaction_code(TransactionCode::CheckingDebitPrenote);
        let mut totals = RunningTotals::new();
        assert!(matches!(
            encode_entry(&tx, &trace(1), &mut totals),
            Err(NachaError::NonZeroPrenote { .. })
        ));

        let tx = Transaction::debit(routing("071000505"), "42", Cents::ZERO)
            .with_transaction_code(TransactionCode::CheckingDebitPrenote);
        let records = encode_entry(&tx, &trace(1), &mut totals).unwrap();
        assert_eq!(records[0].field(2, 3), "28");
    }

    #[test]
    fn test_amount_overflow_aborts() {
        let tx = Transaction::credit(routing("071000505"), "42", Cents::new(10_000_000_000));
        let mut totals = RunningTotals::new();

        assert!(matches!(
            encode_entry(&tx, &trace(1), &mut totals),
            Err(NachaError::FieldOverflow { field: "amount", .. })
        ));
        assert_eq!(totals, RunningTotals::new());
    }

    #[test]
    fn test_account_number_too_long() {
        let tx = Transaction::credit(
            routing("071000505"),
            "123456789012345678",
            Cents::new(10),
        );
        let mut totals = RunningTotals::new();

        assert!(matches!(
            encode_entry(&tx, &trace(1), &mut totals),
            Err(NachaError::InvalidIdentityFormat { .. })
        ));
    }

    #[test]
    fn test_account_number_must_be_ascii() {
        let mut totals = RunningTotals::new();

        for account in ["12\u{c9}45", "12\t45"] {
            let tx = Transaction::credit(routing("071000505"), account, Cents::new(10));
            assert!(matches!(
                encode_entry(&tx, &trace(1), &mut totals),
                Err(NachaError::InvalidIdentityFormat { field: "account number", .. })
            ));
        }
        assert_eq!(totals.entry_addenda_count(), 0);
    }

    #[test]
    fn test_long_name_is_truncated() {
        let tx = Transaction::credit(routing("071000505"), "42", Cents::new(10))
            .with_name("A VERY LONG RECEIVER NAME INDEED");
        let mut totals = RunningTotals::new();

        let records = encode_entry(&tx, &trace(1), &mut totals).unwrap();
        assert_eq!(records[0].field(55, 76), "A VERY LONG RECEIVER N");
    }

    #[test]
    fn test_addenda_record() {
        let tx = Transaction::credit(routing("071000505"), "42", Cents::new(10))
            .with_addenda("INVOICE 1001");
        let mut totals = RunningTotals::new();

        let records = encode_entry(&tx, &trace(17), &mut totals).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field(79, 79), "1");

        let addenda = &records[1];
        assert_eq!(addenda.record_type(), RecordType::Addenda);
        assert_eq!(addenda.as_str().len(), 94);
        assert_eq!(addenda.field(1, 3), "705");
        assert_eq!(addenda.field(4, 15), "INVOICE 1001");
        assert_eq!(addenda.field(84, 87), "0001");
        assert_eq!(addenda.field(88, 94), "0000017");

        assert_eq!(totals.entry_addenda_count(), 2);
    }

    #[test]
    fn test_trace_number_overflow() {
        assert!(TraceNumber::new("07100050", 9_999_999).is_ok());
        assert!(matches!(
            TraceNumber::new("07100050", 10_000_000),
            Err(NachaError::FieldOverflow { .. })
        ));
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!(
            "33".parse::<TransactionCode>().unwrap(),
            TransactionCode::SavingsCreditPrenote
        );
        assert!("99".parse::<TransactionCode>().is_err());
        assert_eq!(" Debit ".parse::<Direction>().unwrap(), Direction::Debit);
        assert!("refund".parse::<Direction>().is_err());
    }
}
