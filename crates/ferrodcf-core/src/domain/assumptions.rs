use serde::{Deserialize, Serialize};

use crate::error::DegenerateAssumptions;
use crate::FinancialSnapshot;

/// Stage-1 growth applied after a snapshot is fetched for a company with revenue.
pub const REBASED_STAGE1_GROWTH: f64 = 10.0;

/// Relative tolerance under which terminal WACC and terminal growth count as
/// equal. Shifted percentages such as `4.1 - 1.0` land a few ulps off `3.1`.
const SPREAD_TOLERANCE: f64 = 1e-9;

/// Growth and cost-of-capital assumptions, all rates in plain percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelAssumptions {
    /// Revenue growth for years 1-5.
    pub stage1_growth: f64,
    /// Revenue growth for years 6-10.
    pub stage2_growth: f64,
    /// Operating margin from year 6 onward.
    pub target_margin: f64,
    pub terminal_growth: f64,
    pub initial_wacc: f64,
    pub terminal_wacc: f64,
    /// Revenue generated per unit of reinvested capital.
    pub sales_to_capital: f64,
}

impl Default for ModelAssumptions {
    fn default() -> Self {
        Self {
            stage1_growth: 12.0,
            stage2_growth: 8.0,
            target_margin: 29.0,
            terminal_growth: 2.5,
            initial_wacc: 9.5,
            terminal_wacc: 7.5,
            sales_to_capital: 2.2,
        }
    }
}

impl ModelAssumptions {
    /// Shifts both discount rates by `step` percentage points.
    pub fn with_discount_shift(self, step: f64) -> Self {
        Self {
            initial_wacc: self.initial_wacc + step,
            terminal_wacc: self.terminal_wacc + step,
            ..self
        }
    }

    /// Shifts the terminal growth rate by `step` percentage points.
    pub fn with_terminal_growth_shift(self, step: f64) -> Self {
        Self {
            terminal_growth: self.terminal_growth + step,
            ..self
        }
    }

    /// Starting point for a freshly fetched snapshot: companies with revenue
    /// start from a 10% stage-1 growth rate.
    pub fn rebased_for(self, snapshot: &FinancialSnapshot) -> Self {
        if snapshot.revenue_ttm > 0.0 {
            Self {
                stage1_growth: REBASED_STAGE1_GROWTH,
                ..self
            }
        } else {
            self
        }
    }

    /// Checks the preconditions of a projection run.
    pub fn validate(&self) -> Result<(), DegenerateAssumptions> {
        let fields = [
            ("stage1_growth", self.stage1_growth),
            ("stage2_growth", self.stage2_growth),
            ("target_margin", self.target_margin),
            ("terminal_growth", self.terminal_growth),
            ("initial_wacc", self.initial_wacc),
            ("terminal_wacc", self.terminal_wacc),
            ("sales_to_capital", self.sales_to_capital),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(DegenerateAssumptions::NonFinite { field });
        }

        if self.sales_to_capital == 0.0 {
            return Err(DegenerateAssumptions::ZeroSalesToCapital);
        }
        if spread_is_zero(self.terminal_wacc, self.terminal_growth) {
            return Err(DegenerateAssumptions::TerminalSpreadZero {
                rate: self.terminal_wacc,
            });
        }
        if self.terminal_wacc == 0.0 {
            return Err(DegenerateAssumptions::ZeroTerminalWacc);
        }

        // Fade-period rates lie between the two endpoints, so checking both
        // endpoints covers every year.
        for (field, value) in [
            ("initial_wacc", self.initial_wacc),
            ("terminal_wacc", self.terminal_wacc),
        ] {
            if value <= -100.0 {
                return Err(DegenerateAssumptions::DiscountRateTooLow { field, value });
            }
        }

        Ok(())
    }
}

fn spread_is_zero(wacc: f64, growth: f64) -> bool {
    (wacc - growth).abs() <= SPREAD_TOLERANCE * wacc.abs().max(1.0)
}

/// Converts a plain percentage (`9.5`) into a fraction (`0.095`).
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / 100.0
}

/// Converts a fraction (`0.095`) into a plain percentage (`9.5`).
pub fn fraction_to_percent(fraction: f64) -> f64 {
    fraction * 100.0
}
