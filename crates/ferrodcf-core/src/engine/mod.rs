//! # Projection Engine
//!
//! Four-stage discounted-cash-flow model:
//!
//! | Stage | Years | Growth | Margin | Discount rate |
//! |-------|-------|--------|--------|---------------|
//! | Stage 1 | 1-5 | stage-1 growth | trailing EBIT / revenue | initial WACC |
//! | Stage 2 | 6-10 | stage-2 growth | target margin | initial WACC |
//! | Stage 3 | 11-60 | fades to terminal growth | target margin | fades to terminal WACC |
//! | Terminal | 61+ | terminal growth | - | terminal WACC |
//!
//! Each year compounds revenue and the cumulative discount factor from the
//! previous year, so the projection is a single left fold over the horizon.
//!
//! ```rust
//! use ferrodcf_core::{engine, FinancialSnapshot, ModelAssumptions};
//!
//! let result = engine::project(&FinancialSnapshot::sample(), &ModelAssumptions::default())?;
//! assert_eq!(result.projections.len(), 60);
//! # Ok::<(), ferrodcf_core::ValuationError>(())
//! ```

mod schedule;
mod terminal;

pub use schedule::{
    fade_weight, interpolate, stage_for_year, FADE_YEARS, HORIZON_YEARS, STAGE1_END, STAGE2_END,
};

use crate::{
    fraction_to_percent, percent_to_fraction, FinancialSnapshot, ModelAssumptions, ValuationError,
    ValuationResult, YearProjection,
};

use self::schedule::{year_plan, Rates};

/// Running state threaded from one projected year to the next.
#[derive(Debug, Clone, Copy)]
struct Carry {
    revenue: f64,
    discount_factor: f64,
    ebiat: f64,
}

/// Projects the snapshot over the explicit horizon and values the company.
///
/// Pure: identical inputs always produce bit-identical results.
///
/// # Errors
///
/// - [`ValuationError::DegenerateAssumptions`] when terminal WACC equals
///   terminal growth, terminal WACC is zero, sales-to-capital is zero, a
///   discount rate is at or below -100%, or an assumption is not finite.
/// - [`ValuationError::InvalidSnapshot`] when shares outstanding are not
///   positive, trailing revenue is zero, or a field is not finite.
pub fn project(
    snapshot: &FinancialSnapshot,
    assumptions: &ModelAssumptions,
) -> Result<ValuationResult, ValuationError> {
    assumptions.validate()?;
    snapshot.validate()?;

    let rates = Rates {
        stage1_growth: percent_to_fraction(assumptions.stage1_growth),
        stage2_growth: percent_to_fraction(assumptions.stage2_growth),
        current_margin: snapshot.current_margin()?,
        target_margin: percent_to_fraction(assumptions.target_margin),
        terminal_growth: percent_to_fraction(assumptions.terminal_growth),
        initial_wacc: percent_to_fraction(assumptions.initial_wacc),
        terminal_wacc: percent_to_fraction(assumptions.terminal_wacc),
    };
    let retained = 1.0 - percent_to_fraction(snapshot.tax_rate);

    let opening = Carry {
        revenue: snapshot.revenue_ttm,
        discount_factor: 1.0,
        ebiat: 0.0,
    };
    let (closing, projections) = (1..=HORIZON_YEARS).fold(
        (opening, Vec::with_capacity(HORIZON_YEARS as usize)),
        |(carry, mut projections), year| {
            let plan = year_plan(year, &rates);

            let revenue = carry.revenue * (1.0 + plan.growth);
            let ebit = revenue * plan.margin;
            let ebiat = ebit * retained;
            let reinvestment = (revenue - carry.revenue) / assumptions.sales_to_capital;
            let fcff = ebiat - reinvestment;
            let discount_factor = carry.discount_factor * (1.0 / (1.0 + plan.discount_rate));

            projections.push(YearProjection {
                year,
                revenue,
                ebit,
                ebiat,
                reinvestment,
                fcff,
                discount_factor,
                pv: fcff * discount_factor,
                stage: plan.stage,
                growth_rate: fraction_to_percent(plan.growth),
                discount_rate: fraction_to_percent(plan.discount_rate),
            });

            let carry = Carry {
                revenue,
                discount_factor,
                ebiat,
            };
            (carry, projections)
        },
    );

    let pv_explicit = projections.iter().map(|projection| projection.pv).sum::<f64>();
    let terminal = terminal::perpetuity(
        closing.ebiat,
        closing.discount_factor,
        rates.terminal_growth,
        rates.terminal_wacc,
    );
    let pv_terminal = terminal.present_value;

    let enterprise_value = pv_explicit + pv_terminal;
    let equity_value = enterprise_value + snapshot.cash - snapshot.debt;
    let intrinsic_value = equity_value / snapshot.shares;
    let upside = (snapshot.price > 0.0).then(|| (intrinsic_value / snapshot.price - 1.0) * 100.0);

    tracing::debug!(
        ticker = %snapshot.ticker,
        enterprise_value,
        intrinsic_value,
        "valuation complete"
    );

    Ok(ValuationResult {
        projections,
        pv_explicit,
        pv_terminal,
        terminal,
        enterprise_value,
        equity_value,
        intrinsic_value,
        upside,
    })
}
