// Shared fixtures for the behaviour tests
pub use ferrodcf_core::{
    engine, sensitivity_grid, FinancialSnapshot, ModelAssumptions, Symbol, ValuationErrorKind,
};

/// Snapshot with a flat 10% margin, no tax and no balance-sheet items.
pub fn flat_snapshot() -> FinancialSnapshot {
    FinancialSnapshot {
        ticker: Symbol::parse("FLAT").expect("valid ticker"),
        revenue_ttm: 1000.0,
        ebit: 100.0,
        tax_rate: 0.0,
        cash: 0.0,
        debt: 0.0,
        shares: 10.0,
        price: 100.0,
    }
}

/// No growth anywhere, margin unchanged and a constant 10% discount rate.
pub fn flat_assumptions() -> ModelAssumptions {
    ModelAssumptions {
        stage1_growth: 0.0,
        stage2_growth: 0.0,
        target_margin: 10.0,
        terminal_growth: 0.0,
        initial_wacc: 10.0,
        terminal_wacc: 10.0,
        sales_to_capital: 2.0,
    }
}
