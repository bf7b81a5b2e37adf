//! Batch header (type 5) and batch control (type 8) records.

use crate::entry::Direction;
use crate::error::{NachaError, Result};
use crate::format::RecordBuilder;
use crate::identity::{OriginIdentity, COMPANY_NAME_WIDTH};
use crate::record::{Record, RecordType};
use crate::totals::RunningTotals;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// NACHA date fields are YYMMDD.
pub(crate) const DATE_FORMAT: &str = "%y%m%d";

/// Service class code: which directions a batch may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServiceClass {
    /// 200
    #[default]
    Mixed,
    /// 220
    CreditsOnly,
    /// 225
    DebitsOnly,
}

impl ServiceClass {
    pub fn code(self) -> &'static str {
        match self {
            ServiceClass::Mixed => "200",
            ServiceClass::CreditsOnly => "220",
            ServiceClass::DebitsOnly => "225",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ServiceClass::Mixed => "mixed",
            ServiceClass::CreditsOnly => "credits only",
            ServiceClass::DebitsOnly => "debits only",
        }
    }

    /// The narrowest class covering every direction given.
    pub fn for_directions<I: IntoIterator<Item = Direction>>(directions: I) -> Self {
        let (mut credits, mut debits) = (false, false);
        for direction in directions {
            match direction {
                Direction::Credit => credits = true,
                Direction::Debit => debits = true,
            }
        }
        match (credits, debits) {
            (true, false) => ServiceClass::CreditsOnly,
            (false, true) => ServiceClass::DebitsOnly,
            _ => ServiceClass::Mixed,
        }
    }

    pub fn permits(self, direction: Direction) -> bool {
        !matches!(
            (self, direction),
            (ServiceClass::CreditsOnly, Direction::Debit)
                | (ServiceClass::DebitsOnly, Direction::Credit)
        )
    }
}

impl FromStr for ServiceClass {
    type Err = NachaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "200" => Ok(ServiceClass::Mixed),
            "220" => Ok(ServiceClass::CreditsOnly),
            "225" => Ok(ServiceClass::DebitsOnly),
            other => Err(NachaError::UnknownCode {
                kind: "service class code",
                value: other.to_string(),
            }),
        }
    }
}

/// Standard Entry Class codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SecCode {
    /// Prearranged payment and deposit.
    #[default]
    Ppd,
    /// Corporate credit or debit.
    Ccd,
    /// Internet-initiated entry.
    Web,
    /// Telephone-initiated entry.
    Tel,
    /// Corporate trade exchange.
    Ctx,
}

impl SecCode {
    pub fn as_str(self) -> &'static str {
        match self {
            SecCode::Ppd => "PPD",
            SecCode::Ccd => "CCD",
            SecCode::Web => "WEB",
            SecCode::Tel => "TEL",
            SecCode::Ctx => "CTX",
        }
    }
}

impl FromStr for SecCode {
    type Err = NachaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "PPD" => Ok(SecCode::Ppd),
            "CCD" => Ok(SecCode::Ccd),
            "WEB" => Ok(SecCode::Web),
            "TEL" => Ok(SecCode::Tel),
            "CTX" => Ok(SecCode::Ctx),
            _ => Err(NachaError::UnknownCode {
                kind: "SEC code",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SecCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Batch-level identity, fixed for the life of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSpec {
    pub service_class: ServiceClass,
    pub sec_code: SecCode,
    /// Company entry description, up to 10 characters (e.g. `PAYROLL`).
    pub entry_description: String,
    pub effective_date: NaiveDate,
    /// Positive, strictly increasing within a file.
    pub batch_number: u32,
    /// `'1'` for a DFI bound by the NACHA rules.
    pub originator_status: char,
}

impl BatchSpec {
    pub fn new(
        service_class: ServiceClass,
        sec_code: SecCode,
        entry_description: impl Into<String>,
        effective_date: NaiveDate,
        batch_number: u32,
    ) -> Self {
        BatchSpec {
            service_class,
            sec_code,
            entry_description: entry_description.into(),
            effective_date,
            batch_number,
            originator_status: '1',
        }
    }

    /// Fails with [`NachaError::ServiceClassMismatch`] if the class forbids `direction`.
    pub fn check_direction(&self, direction: Direction) -> Result<()> {
        if self.service_class.permits(direction) {
            Ok(())
        } else {
            Err(NachaError::ServiceClassMismatch {
                batch_number: self.batch_number,
                service_class: self.service_class.describe(),
                direction: direction.as_str(),
            })
        }
    }
}

/// Builds the batch header record.
///
/// `descriptive_date` is the company descriptive date, normally the file
/// creation date.
pub fn build_batch_header(
    spec: &BatchSpec,
    identity: &OriginIdentity,
    descriptive_date: NaiveDate,
) -> Result<Record> {
    Ok(RecordBuilder::new(RecordType::BatchHeader)
        .literal(spec.service_class.code())
        .text("company name", identity.company_name(), COMPANY_NAME_WIDTH)
        .blank(20)
        .literal(identity.company_id())
        .literal(spec.sec_code.as_str())
        .text("company entry description", &spec.entry_description, 10)
        .literal(&descriptive_date.format(DATE_FORMAT).to_string())
        .literal(&spec.effective_date.format(DATE_FORMAT).to_string())
        .blank(3)
        .text(
            "originator status code",
            &spec.originator_status.to_string(),
            1,
        )
        .literal(identity.originating_dfi())
        .numeric("batch number", u64::from(spec.batch_number), 7)?
        .finish())
}

/// Builds the batch control record from batch-scoped totals.
pub fn build_batch_control(
    spec: &BatchSpec,
    identity: &OriginIdentity,
    totals: &RunningTotals,
) -> Result<Record> {
    Ok(RecordBuilder::new(RecordType::BatchControl)
        .literal(spec.service_class.code())
        .numeric("entry/addenda count", totals.entry_addenda_count(), 6)?
        .numeric("entry hash", totals.entry_hash(), 10)?
        .numeric("total debit", totals.total_debit().get(), 12)?
        .numeric("total credit", totals.total_credit().get(), 12)?
        .literal(identity.company_id())
        .blank(19)
        .blank(6)
        .literal(identity.originating_dfi())
        .numeric("batch number", u64::from(spec.batch_number), 7)?
        .finish())
}
