//! Growing perpetuity after the explicit horizon.

use crate::{fraction_to_percent, TerminalValue};

/// Values the perpetuity from the final explicit year.
///
/// Terminal reinvestment uses the `growth / WACC` shortcut, i.e. return on
/// capital is approximated by the terminal cost of capital. Callers guarantee
/// `wacc != 0` and `wacc != growth`.
pub(crate) fn perpetuity(
    last_ebiat: f64,
    last_discount_factor: f64,
    growth: f64,
    wacc: f64,
) -> TerminalValue {
    let ebiat = last_ebiat * (1.0 + growth);
    let fcff = ebiat * (1.0 - growth / wacc);
    let value = fcff / (wacc - growth);

    TerminalValue {
        ebiat,
        fcff,
        value,
        present_value: value * last_discount_factor,
        growth_rate: fraction_to_percent(growth),
        discount_rate: fraction_to_percent(wacc),
    }
}
