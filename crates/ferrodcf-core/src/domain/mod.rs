//! # Domain Models
//!
//! Inputs and outputs of the valuation engine.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`FinancialSnapshot`] | Trailing financials of one company |
//! | [`ModelAssumptions`] | Growth, margin and cost-of-capital assumptions |
//! | [`YearProjection`] | One explicit projection year |
//! | [`TerminalValue`] | Perpetuity after the explicit horizon |
//! | [`ValuationResult`] | Aggregate result of a projection run |
//! | [`Stage`] | Stage label of a year or of the perpetuity |
//! | [`Symbol`] | Validated ticker |
//!
//! Percentages are plain numbers throughout (`9.5` means 9.5%); the engine
//! converts them to fractions internally.

mod assumptions;
mod projection;
mod snapshot;
mod symbol;

pub use assumptions::{
    fraction_to_percent, percent_to_fraction, ModelAssumptions, REBASED_STAGE1_GROWTH,
};
pub use projection::{Stage, StageSummary, TerminalValue, ValuationResult, YearProjection};
pub use snapshot::FinancialSnapshot;
pub use symbol::{Symbol, TickerRule, MAX_TICKER_LEN};
