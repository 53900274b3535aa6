use serde::{Deserialize, Serialize};

use crate::error::InvalidSnapshot;
use crate::{Symbol, ValidationError};

/// Trailing financial snapshot of one company.
///
/// Monetary fields share a single currency unit (typically millions) and
/// `tax_rate` is a plain percentage (`15.8` means 15.8%). Consistency of
/// units is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub ticker: Symbol,
    pub revenue_ttm: f64,
    pub ebit: f64,
    pub tax_rate: f64,
    pub cash: f64,
    pub debt: f64,
    pub shares: f64,
    pub price: f64,
}

impl FinancialSnapshot {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ticker: Symbol,
        revenue_ttm: f64,
        ebit: f64,
        tax_rate: f64,
        cash: f64,
        debt: f64,
        shares: f64,
        price: f64,
    ) -> Result<Self, ValidationError> {
        let snapshot = Self {
            ticker,
            revenue_ttm,
            ebit,
            tax_rate,
            cash,
            debt,
            shares,
            price,
        };

        if let Some(field) = snapshot.first_non_finite_field() {
            return Err(ValidationError::NonFiniteValue { field });
        }

        Ok(snapshot)
    }

    /// Initial dashboard snapshot (Apple, millions of USD).
    pub fn sample() -> Self {
        Self {
            ticker: Symbol::from_static("AAPL"),
            revenue_ttm: 391_000.0,
            ebit: 114_000.0,
            tax_rate: 15.8,
            cash: 161_000.0,
            debt: 108_000.0,
            shares: 15_200.0,
            price: 228.0,
        }
    }

    /// Trailing operating margin as a fraction.
    pub fn current_margin(&self) -> Result<f64, InvalidSnapshot> {
        if self.revenue_ttm == 0.0 {
            return Err(InvalidSnapshot::ZeroRevenue);
        }
        Ok(self.ebit / self.revenue_ttm)
    }

    /// Checks the preconditions of a projection run.
    pub fn validate(&self) -> Result<(), InvalidSnapshot> {
        if let Some(field) = self.first_non_finite_field() {
            return Err(InvalidSnapshot::NonFinite { field });
        }
        if self.shares <= 0.0 {
            return Err(InvalidSnapshot::NonPositiveShares {
                shares: self.shares,
            });
        }
        if self.revenue_ttm == 0.0 {
            return Err(InvalidSnapshot::ZeroRevenue);
        }
        Ok(())
    }

    pub fn market_cap(&self) -> f64 {
        self.price * self.shares
    }

    fn first_non_finite_field(&self) -> Option<&'static str> {
        [
            ("revenue_ttm", self.revenue_ttm),
            ("ebit", self.ebit),
            ("tax_rate", self.tax_rate),
            ("cash", self.cash),
            ("debt", self.debt),
            ("shares", self.shares),
            ("price", self.price),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(field, _)| field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_matches_dashboard_defaults() {
        let snapshot = FinancialSnapshot::sample();
        assert_eq!(snapshot.ticker.as_str(), "AAPL");
        assert_eq!(snapshot.revenue_ttm, 391_000.0);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn rejects_non_finite_fields_at_construction() {
        let ticker = Symbol::parse("ACME").expect("ticker");
        let err = FinancialSnapshot::new(ticker, 100.0, f64::NAN, 21.0, 0.0, 0.0, 1.0, 1.0)
            .expect_err("must fail");
        assert_eq!(err, ValidationError::NonFiniteValue { field: "ebit" });
    }

    #[test]
    fn validate_flags_shares_before_revenue() {
        let mut snapshot = FinancialSnapshot::sample();
        snapshot.shares = 0.0;
        snapshot.revenue_ttm = 0.0;
        assert!(matches!(
            snapshot.validate(),
            Err(InvalidSnapshot::NonPositiveShares { .. })
        ));
    }

    #[test]
    fn current_margin_is_ebit_over_revenue() {
        let snapshot = FinancialSnapshot::sample();
        let margin = snapshot.current_margin().expect("margin");
        assert!((margin - 114_000.0 / 391_000.0).abs() < 1e-15);
    }
}
