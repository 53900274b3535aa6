use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::domain::TickerRule;
use crate::ProviderId;

/// Validation and contract errors exposed by `ferrodcf-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker '{ticker}' {rule}")]
    InvalidTicker { ticker: String, rule: TickerRule },

    #[error("invalid source '{value}', expected one of inline, fixture, file")]
    InvalidSource { value: String },

    #[error("source chain cannot be empty")]
    EmptySourceChain,
    #[error("source '{source_id}' appears more than once in the source chain")]
    DuplicateSource { source_id: ProviderId },
    #[error("inline inputs cannot be mixed with looked-up snapshot sources")]
    InlineWithLookup,

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
}

/// Why an assumption set cannot be valued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DegenerateAssumptions {
    /// Growing-perpetuity denominator `terminal_wacc - terminal_growth` is zero.
    TerminalSpreadZero { rate: f64 },
    /// Reinvestment is `delta revenue / sales_to_capital`.
    ZeroSalesToCapital,
    /// Terminal reinvestment rate is `terminal_growth / terminal_wacc`.
    ZeroTerminalWacc,
    /// `1 / (1 + wacc)` is undefined or negative at or below -100%.
    DiscountRateTooLow { field: &'static str, value: f64 },
    NonFinite { field: &'static str },
}

impl Display for DegenerateAssumptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TerminalSpreadZero { rate } => write!(
                f,
                "terminal WACC equals terminal growth ({rate}%), terminal value is undefined"
            ),
            Self::ZeroSalesToCapital => {
                f.write_str("sales-to-capital ratio is zero, reinvestment is undefined")
            }
            Self::ZeroTerminalWacc => {
                f.write_str("terminal WACC is zero, terminal reinvestment rate is undefined")
            }
            Self::DiscountRateTooLow { field, value } => {
                write!(f, "{field} of {value}% must be greater than -100%")
            }
            Self::NonFinite { field } => write!(f, "assumption '{field}' must be finite"),
        }
    }
}

/// Why a financial snapshot cannot be valued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidSnapshot {
    NonPositiveShares { shares: f64 },
    /// Stage-1 margin is `ebit / revenue_ttm`.
    ZeroRevenue,
    NonFinite { field: &'static str },
}

impl Display for InvalidSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveShares { shares } => write!(
                f,
                "shares outstanding must be positive (got {shares}), value per share is undefined"
            ),
            Self::ZeroRevenue => {
                f.write_str("trailing revenue is zero, current operating margin is undefined")
            }
            Self::NonFinite { field } => write!(f, "snapshot field '{field}' must be finite"),
        }
    }
}

/// Coarse classification of valuation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuationErrorKind {
    DegenerateAssumptions,
    InvalidSnapshot,
}

/// Typed failure of a single projection run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValuationError {
    #[error("degenerate assumptions: {0}")]
    DegenerateAssumptions(DegenerateAssumptions),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(InvalidSnapshot),
}

impl ValuationError {
    pub const fn kind(&self) -> ValuationErrorKind {
        match self {
            Self::DegenerateAssumptions(_) => ValuationErrorKind::DegenerateAssumptions,
            Self::InvalidSnapshot(_) => ValuationErrorKind::InvalidSnapshot,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self.kind() {
            ValuationErrorKind::DegenerateAssumptions => "valuation.degenerate_assumptions",
            ValuationErrorKind::InvalidSnapshot => "valuation.invalid_snapshot",
        }
    }
}

impl From<DegenerateAssumptions> for ValuationError {
    fn from(value: DegenerateAssumptions) -> Self {
        Self::DegenerateAssumptions(value)
    }
}

impl From<InvalidSnapshot> for ValuationError {
    fn from(value: InvalidSnapshot) -> Self {
        Self::InvalidSnapshot(value)
    }
}
