use std::collections::BTreeMap;

use crate::data_source::{SnapshotFuture, SnapshotRequest, SnapshotSource, SourceError};
use crate::{FinancialSnapshot, ProviderId, Symbol};

/// Deterministic in-memory snapshot catalogue.
///
/// The default catalogue holds a handful of large caps in millions of USD;
/// tests build their own with [`FixtureSource::with_snapshots`].
#[derive(Debug, Clone)]
pub struct FixtureSource {
    snapshots: BTreeMap<Symbol, FinancialSnapshot>,
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self::with_snapshots(builtin_catalog())
    }
}

impl FixtureSource {
    pub fn with_snapshots(snapshots: impl IntoIterator<Item = FinancialSnapshot>) -> Self {
        Self {
            snapshots: snapshots
                .into_iter()
                .map(|snapshot| (snapshot.ticker.clone(), snapshot))
                .collect(),
        }
    }

    pub fn tickers(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.snapshots.keys()
    }
}

impl SnapshotSource for FixtureSource {
    fn id(&self) -> ProviderId {
        ProviderId::Fixture
    }

    fn fetch<'a>(&'a self, req: SnapshotRequest) -> SnapshotFuture<'a> {
        Box::pin(async move {
            self.snapshots.get(&req.ticker).cloned().ok_or_else(|| {
                SourceError::data_unavailable(format!(
                    "fixture catalogue has no snapshot for '{}'",
                    req.ticker
                ))
            })
        })
    }
}

fn builtin_catalog() -> Vec<FinancialSnapshot> {
    [
        ("AAPL", 391_000.0, 114_000.0, 15.8, 161_000.0, 108_000.0, 15_200.0, 228.0),
        ("MSFT", 245_100.0, 109_400.0, 18.2, 75_500.0, 67_100.0, 7_430.0, 415.0),
        ("NVDA", 96_300.0, 62_100.0, 12.0, 34_800.0, 10_200.0, 24_500.0, 135.0),
        ("KO", 46_400.0, 13_400.0, 18.6, 13_400.0, 45_000.0, 4_310.0, 63.0),
    ]
    .into_iter()
    .map(
        |(ticker, revenue_ttm, ebit, tax_rate, cash, debt, shares, price)| FinancialSnapshot {
            ticker: Symbol::from_static(ticker),
            revenue_ttm,
            ebit,
            tax_rate,
            cash,
            debt,
            shares,
            price,
        },
    )
    .collect()
}
