//! Stage layout and per-year rate selection.

use crate::Stage;

/// Last year of the high-growth stage.
pub const STAGE1_END: u32 = 5;
/// Last year of the target-margin stage.
pub const STAGE2_END: u32 = 10;
/// Length of the linear fade towards terminal assumptions.
pub const FADE_YEARS: u32 = 50;
/// Number of explicitly projected years.
pub const HORIZON_YEARS: u32 = STAGE2_END + FADE_YEARS;

/// Linear interpolation between `start` (at `t = 0`) and `end` (at `t = 1`).
pub fn interpolate(start: f64, end: f64, t: f64) -> f64 {
    start * (1.0 - t) + end * t
}

/// Stage a 1-based projection year belongs to.
///
/// Years past the horizon are reported as [`Stage::Terminal`].
pub const fn stage_for_year(year: u32) -> Stage {
    if year <= STAGE1_END {
        Stage::Stage1
    } else if year <= STAGE2_END {
        Stage::Stage2
    } else if year <= HORIZON_YEARS {
        Stage::Stage3
    } else {
        Stage::Terminal
    }
}

/// Elapsed fraction of the fade window; `1/50` in year 11, `1` in year 60.
pub fn fade_weight(year: u32) -> f64 {
    f64::from(year.saturating_sub(STAGE2_END)) / f64::from(FADE_YEARS)
}

/// Assumptions converted to fractions, plus the trailing margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rates {
    pub stage1_growth: f64,
    pub stage2_growth: f64,
    pub current_margin: f64,
    pub target_margin: f64,
    pub terminal_growth: f64,
    pub initial_wacc: f64,
    pub terminal_wacc: f64,
}

/// Growth, margin and discount rate applied in one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct YearPlan {
    pub stage: Stage,
    pub growth: f64,
    pub margin: f64,
    pub discount_rate: f64,
}

pub(crate) fn year_plan(year: u32, rates: &Rates) -> YearPlan {
    match stage_for_year(year) {
        Stage::Stage1 => YearPlan {
            stage: Stage::Stage1,
            growth: rates.stage1_growth,
            margin: rates.current_margin,
            discount_rate: rates.initial_wacc,
        },
        Stage::Stage2 => YearPlan {
            stage: Stage::Stage2,
            growth: rates.stage2_growth,
            margin: rates.target_margin,
            discount_rate: rates.initial_wacc,
        },
        Stage::Stage3 | Stage::Terminal => {
            let t = fade_weight(year);
            YearPlan {
                stage: Stage::Stage3,
                growth: interpolate(rates.stage2_growth, rates.terminal_growth, t),
                margin: rates.target_margin,
                discount_rate: interpolate(rates.initial_wacc, rates.terminal_wacc, t),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> Rates {
        Rates {
            stage1_growth: 0.12,
            stage2_growth: 0.08,
            current_margin: 0.3,
            target_margin: 0.25,
            terminal_growth: 0.02,
            initial_wacc: 0.10,
            terminal_wacc: 0.07,
        }
    }

    #[test]
    fn interpolate_hits_endpoints_and_midpoint() {
        assert_eq!(interpolate(0.08, 0.02, 0.0), 0.08);
        assert_eq!(interpolate(0.08, 0.02, 1.0), 0.02);
        assert!((interpolate(0.08, 0.02, 0.5) - 0.05).abs() < 1e-15);
    }

    #[test]
    fn stage_boundaries() {
        assert_eq!(stage_for_year(1), Stage::Stage1);
        assert_eq!(stage_for_year(5), Stage::Stage1);
        assert_eq!(stage_for_year(6), Stage::Stage2);
        assert_eq!(stage_for_year(10), Stage::Stage2);
        assert_eq!(stage_for_year(11), Stage::Stage3);
        assert_eq!(stage_for_year(60), Stage::Stage3);
        assert_eq!(stage_for_year(61), Stage::Terminal);
    }

    #[test]
    fn fade_weight_runs_from_first_step_to_one() {
        assert_eq!(fade_weight(10), 0.0);
        assert_eq!(fade_weight(11), 1.0 / 50.0);
        assert_eq!(fade_weight(60), 1.0);
    }

    #[test]
    fn stage_one_uses_trailing_margin_and_initial_wacc() {
        let plan = year_plan(3, &rates());
        assert_eq!(plan.growth, 0.12);
        assert_eq!(plan.margin, 0.3);
        assert_eq!(plan.discount_rate, 0.10);
    }

    #[test]
    fn stage_two_switches_to_target_margin() {
        let plan = year_plan(6, &rates());
        assert_eq!(plan.stage, Stage::Stage2);
        assert_eq!(plan.growth, 0.08);
        assert_eq!(plan.margin, 0.25);
        assert_eq!(plan.discount_rate, 0.10);
    }

    #[test]
    fn fade_reaches_terminal_rates_in_final_year() {
        let last = year_plan(HORIZON_YEARS, &rates());
        assert_eq!(last.stage, Stage::Stage3);
        assert_eq!(last.growth, 0.02);
        assert_eq!(last.discount_rate, 0.07);

        let first = year_plan(11, &rates());
        assert!(first.growth < 0.08 && first.growth > 0.02);
        assert!(first.discount_rate < 0.10 && first.discount_rate > 0.07);
    }
}
