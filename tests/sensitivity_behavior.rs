//! Behaviour-driven tests for the sensitivity grid
//!
//! These tests verify HOW the grid perturbs assumptions and how it reports
//! cells that cannot be valued.

use approx::assert_relative_eq;
use ferrodcf_core::sensitivity::{GROWTH_STEPS, WACC_STEPS};
use ferrodcf_core::{
    engine, sensitivity_grid, DegenerateAssumptions, FinancialSnapshot, ModelAssumptions,
    ValuationError, ValuationErrorKind,
};
use ferrodcf_tests::{flat_assumptions, flat_snapshot};
use proptest::prelude::*;

// =============================================================================
// Sensitivity: Grid Layout
// =============================================================================

#[test]
fn when_grid_is_built_every_cell_matches_a_direct_revaluation() {
    // Given: The sample with default assumptions
    let snapshot = FinancialSnapshot::sample();
    let assumptions = ModelAssumptions::default();

    // When: The grid is computed
    let grid = sensitivity_grid(&snapshot, &assumptions).expect("all cells valid");

    // Then: values[g][w] equals a run with both WACCs and terminal growth shifted
    for (g, growth_step) in GROWTH_STEPS.iter().enumerate() {
        for (w, wacc_step) in WACC_STEPS.iter().enumerate() {
            let perturbed = ModelAssumptions {
                initial_wacc: assumptions.initial_wacc + wacc_step,
                terminal_wacc: assumptions.terminal_wacc + wacc_step,
                terminal_growth: assumptions.terminal_growth + growth_step,
                ..assumptions
            };
            let direct = engine::project(&snapshot, &perturbed).expect("valid cell");
            assert_eq!(grid.values[g][w], direct.intrinsic_value, "cell [{g}][{w}]");
        }
    }
}

#[test]
fn when_discount_rates_rise_value_falls_along_every_row() {
    let grid = sensitivity_grid(&FinancialSnapshot::sample(), &ModelAssumptions::default())
        .expect("all cells valid");

    for row in &grid.values {
        for pair in row.windows(2) {
            assert!(pair[1] < pair[0], "row {row:?} is not decreasing");
        }
    }
}

#[test]
fn when_terminal_growth_rises_value_rises_down_every_column() {
    let grid = sensitivity_grid(&FinancialSnapshot::sample(), &ModelAssumptions::default())
        .expect("all cells valid");

    for w in 0..WACC_STEPS.len() {
        assert!(grid.values[0][w] < grid.values[1][w]);
        assert!(grid.values[1][w] < grid.values[2][w]);
    }
}

#[test]
fn when_nothing_grows_the_center_cell_is_the_perpetuity_value() {
    // Given: A flat company valued at 10%
    let grid = sensitivity_grid(&flat_snapshot(), &flat_assumptions()).expect("all cells valid");

    // Then: The center reproduces 100 per share and the axes are absolute rates
    assert_relative_eq!(grid.center(), 100.0, max_relative = 1e-9);
    assert_eq!(grid.wacc_axis, [9.0, 9.5, 10.0, 10.5, 11.0]);
    assert_eq!(grid.growth_axis, [-0.5, 0.0, 0.5]);
}

#[test]
fn when_serialized_grid_exposes_steps_and_values() {
    let grid = sensitivity_grid(&FinancialSnapshot::sample(), &ModelAssumptions::default())
        .expect("all cells valid");

    let json = serde_json::to_value(&grid).expect("serializes");

    assert_eq!(json["wacc_steps"].as_array().map(Vec::len), Some(5));
    assert_eq!(json["growth_steps"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["values"][1][2].as_f64(), Some(grid.center()));
}

// =============================================================================
// Sensitivity: Failing Cells
// =============================================================================

#[test]
fn when_a_shifted_cell_hits_zero_spread_the_grid_fails() {
    // Given: Base assumptions valid on their own, but terminal WACC 7.5 - 1.0
    // meets the unshifted terminal growth of 6.5%
    let assumptions = ModelAssumptions {
        terminal_wacc: 7.5,
        terminal_growth: 6.5,
        ..ModelAssumptions::default()
    };
    engine::project(&FinancialSnapshot::sample(), &assumptions).expect("base case is valid");

    // When: The grid is computed
    let error = sensitivity_grid(&FinancialSnapshot::sample(), &assumptions)
        .expect_err("colliding cell must fail");

    // Then: The first colliding cell in row-major order is reported
    assert_eq!(error.kind(), ValuationErrorKind::DegenerateAssumptions);
    assert_eq!(error.growth_step, 0.0);
    assert_eq!(error.wacc_step, -1.0);
    assert!(error.to_string().contains("sensitivity cell"));
}

#[test]
fn when_a_shifted_wacc_lands_an_ulp_off_growth_the_grid_still_fails() {
    // Given: Terminal WACC 4.1 and growth 3.1; shifting WACC by -1.0 gives
    // 3.0999999999999996 rather than 3.1
    let assumptions = ModelAssumptions {
        terminal_wacc: 4.1,
        terminal_growth: 3.1,
        ..ModelAssumptions::default()
    };

    // When: The grid is computed
    let outcome = sensitivity_grid(&FinancialSnapshot::sample(), &assumptions);

    // Then: The near-collision is treated as a zero spread instead of a value
    let error = outcome.expect_err("collision within rounding must fail");
    assert!(matches!(
        error.source,
        ValuationError::DegenerateAssumptions(DegenerateAssumptions::TerminalSpreadZero { .. })
    ));
    assert_eq!(error.growth_step, 0.0);
    assert_eq!(error.wacc_step, -1.0);
}

#[test]
fn when_the_snapshot_is_invalid_the_grid_fails_with_its_kind() {
    let mut snapshot = FinancialSnapshot::sample();
    snapshot.shares = -1.0;

    let error = sensitivity_grid(&snapshot, &ModelAssumptions::default())
        .expect_err("negative shares must fail");

    assert_eq!(error.kind(), ValuationErrorKind::InvalidSnapshot);
    assert_eq!(error.growth_step, GROWTH_STEPS[0]);
    assert_eq!(error.wacc_step, WACC_STEPS[0]);
}

// =============================================================================
// Sensitivity: Generated Inputs
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn center_cell_equals_the_unshifted_valuation(
        stage1_growth in -10.0f64..30.0,
        target_margin in 5.0f64..40.0,
        terminal_growth in 0.0f64..3.0,
        initial_wacc in 7.0f64..14.0,
        spread in 2.0f64..6.0,
    ) {
        let snapshot = FinancialSnapshot::sample();
        let assumptions = ModelAssumptions {
            stage1_growth,
            target_margin,
            terminal_growth,
            initial_wacc,
            terminal_wacc: terminal_growth + spread,
            ..ModelAssumptions::default()
        };

        let grid = sensitivity_grid(&snapshot, &assumptions).expect("spread keeps every cell valid");
        let base = engine::project(&snapshot, &assumptions).expect("valid inputs");

        prop_assert_eq!(grid.center(), base.intrinsic_value);
    }
}
