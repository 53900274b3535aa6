use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Valuation stage of a projected year or of the perpetuity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "Stage 1")]
    Stage1,
    #[serde(rename = "Stage 2")]
    Stage2,
    #[serde(rename = "Stage 3")]
    Stage3,
    #[serde(rename = "Terminal")]
    Terminal,
}

impl Stage {
    pub const ALL: [Self; 4] = [Self::Stage1, Self::Stage2, Self::Stage3, Self::Terminal];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Stage1 => "Stage 1",
            Self::Stage2 => "Stage 2",
            Self::Stage3 => "Stage 3",
            Self::Terminal => "Terminal",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One explicit projection year.
///
/// `growth_rate` and `discount_rate` are the percentages actually applied in
/// that year; `discount_factor` is cumulative from year 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    pub year: u32,
    pub revenue: f64,
    pub ebit: f64,
    pub ebiat: f64,
    pub reinvestment: f64,
    pub fcff: f64,
    pub discount_factor: f64,
    pub pv: f64,
    pub stage: Stage,
    pub growth_rate: f64,
    pub discount_rate: f64,
}

/// Growing perpetuity beyond the explicit horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalValue {
    pub ebiat: f64,
    pub fcff: f64,
    /// Undiscounted value at the end of the explicit horizon.
    pub value: f64,
    pub present_value: f64,
    pub growth_rate: f64,
    pub discount_rate: f64,
}

/// Present value attributed to one stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: Stage,
    pub years: u32,
    pub present_value: f64,
}

/// Full outcome of one projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub projections: Vec<YearProjection>,
    pub pv_explicit: f64,
    pub pv_terminal: f64,
    pub terminal: TerminalValue,
    pub enterprise_value: f64,
    pub equity_value: f64,
    pub intrinsic_value: f64,
    /// Percent difference between intrinsic value and market price; `None`
    /// when the market price is not positive.
    pub upside: Option<f64>,
}

impl ValuationResult {
    /// Share of enterprise value coming from the explicit years, in percent.
    pub fn explicit_share_pct(&self) -> Option<f64> {
        share_pct(self.pv_explicit, self.enterprise_value)
    }

    /// Share of enterprise value coming from the terminal value, in percent.
    pub fn terminal_share_pct(&self) -> Option<f64> {
        share_pct(self.pv_terminal, self.enterprise_value)
    }

    pub fn last_year(&self) -> Option<&YearProjection> {
        self.projections.last()
    }

    /// Present value grouped by stage, in stage order, ending with the terminal row.
    pub fn stage_summaries(&self) -> Vec<StageSummary> {
        let mut summaries: Vec<StageSummary> = Vec::with_capacity(Stage::ALL.len());
        for projection in &self.projections {
            match summaries.last_mut() {
                Some(summary) if summary.stage == projection.stage => {
                    summary.years += 1;
                    summary.present_value += projection.pv;
                }
                _ => summaries.push(StageSummary {
                    stage: projection.stage,
                    years: 1,
                    present_value: projection.pv,
                }),
            }
        }
        summaries.push(StageSummary {
            stage: Stage::Terminal,
            years: 0,
            present_value: self.pv_terminal,
        });
        summaries
    }

    /// Years shown on the cash-flow chart: the first fifteen, then every tenth.
    pub fn condensed_projections(&self) -> impl Iterator<Item = &YearProjection> + '_ {
        self.projections
            .iter()
            .filter(|projection| projection.year <= 15 || projection.year % 10 == 0)
    }
}

fn share_pct(part: f64, whole: f64) -> Option<f64> {
    if whole == 0.0 {
        None
    } else {
        Some(part / whole * 100.0)
    }
}
