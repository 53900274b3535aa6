//! Discount-rate / terminal-growth sensitivity grid.
//!
//! Each cell is an independent [`engine::project`] run with both discount
//! rates shifted by a column step and terminal growth shifted by a row step.
//! Cells share no state, so they are evaluated on the rayon pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValuationErrorKind;
use crate::{engine, FinancialSnapshot, ModelAssumptions, ValuationError};

/// Percentage-point shifts applied to initial and terminal WACC (columns).
pub const WACC_STEPS: [f64; 5] = [-1.0, -0.5, 0.0, 0.5, 1.0];
/// Percentage-point shifts applied to terminal growth (rows).
pub const GROWTH_STEPS: [f64; 3] = [-0.5, 0.0, 0.5];

const CENTER_ROW: usize = 1;
const CENTER_COLUMN: usize = 2;

/// Intrinsic value per share under perturbed assumptions.
///
/// `values[g][w]` is the result for `GROWTH_STEPS[g]` and `WACC_STEPS[w]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    pub wacc_steps: [f64; 5],
    pub growth_steps: [f64; 3],
    /// Initial WACC of each column, in percent.
    pub wacc_axis: [f64; 5],
    /// Terminal growth of each row, in percent.
    pub growth_axis: [f64; 3],
    pub values: [[f64; 5]; 3],
}

impl SensitivityGrid {
    /// Cell with both shifts at zero; equals the unperturbed intrinsic value.
    pub fn center(&self) -> f64 {
        self.values[CENTER_ROW][CENTER_COLUMN]
    }

    pub const fn is_center(growth_index: usize, wacc_index: usize) -> bool {
        growth_index == CENTER_ROW && wacc_index == CENTER_COLUMN
    }

    pub fn cell(&self, growth_index: usize, wacc_index: usize) -> Option<f64> {
        self.values
            .get(growth_index)
            .and_then(|row| row.get(wacc_index))
            .copied()
    }

    /// Lowest and highest value in the grid.
    pub fn range(&self) -> (f64, f64) {
        self.values
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), &value| {
                (low.min(value), high.max(value))
            })
    }
}

/// A grid cell whose perturbed assumptions could not be valued.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("sensitivity cell (wacc {wacc_step:+}pp, terminal growth {growth_step:+}pp) failed: {source}")]
pub struct SensitivityError {
    pub wacc_step: f64,
    pub growth_step: f64,
    #[source]
    pub source: ValuationError,
}

impl SensitivityError {
    pub const fn kind(&self) -> ValuationErrorKind {
        self.source.kind()
    }
}

/// Revalues the company for every combination of [`GROWTH_STEPS`] and
/// [`WACC_STEPS`].
///
/// # Errors
///
/// Any failing cell fails the whole grid. When several cells fail, the first
/// in row-major order is reported.
pub fn sensitivity_grid(
    snapshot: &FinancialSnapshot,
    assumptions: &ModelAssumptions,
) -> Result<SensitivityGrid, SensitivityError> {
    let cells = GROWTH_STEPS
        .iter()
        .flat_map(|&growth_step| WACC_STEPS.iter().map(move |&wacc_step| (growth_step, wacc_step)))
        .collect::<Vec<_>>();

    let outcomes = cells
        .par_iter()
        .map(|&(growth_step, wacc_step)| {
            let perturbed = assumptions
                .with_discount_shift(wacc_step)
                .with_terminal_growth_shift(growth_step);
            let outcome = engine::project(snapshot, &perturbed).map(|result| result.intrinsic_value);
            tracing::trace!(growth_step, wacc_step, ok = outcome.is_ok(), "sensitivity cell");
            outcome.map_err(|source| SensitivityError {
                wacc_step,
                growth_step,
                source,
            })
        })
        .collect::<Vec<_>>();

    let mut values = [[0.0; 5]; 3];
    for (index, outcome) in outcomes.into_iter().enumerate() {
        values[index / WACC_STEPS.len()][index % WACC_STEPS.len()] = outcome?;
    }

    Ok(SensitivityGrid {
        wacc_steps: WACC_STEPS,
        growth_steps: GROWTH_STEPS,
        wacc_axis: WACC_STEPS.map(|step| assumptions.initial_wacc + step),
        growth_axis: GROWTH_STEPS.map(|step| assumptions.terminal_growth + step),
        values,
    })
}
