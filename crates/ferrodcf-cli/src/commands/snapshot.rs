use ferrodcf_core::{FinancialSnapshot, SnapshotRequest, SnapshotRouter, SourceStrategy, Symbol};
use serde::Serialize;

use crate::cli::SnapshotArgs;
use crate::error::CliError;
use crate::output::{amount, per_share, percent, Table};

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SnapshotResponseData {
    snapshot: FinancialSnapshot,
    current_margin: Option<f64>,
    market_cap: f64,
}

pub async fn run(
    args: &SnapshotArgs,
    router: &SnapshotRouter,
    strategy: SourceStrategy,
) -> Result<CommandResult, CliError> {
    let request = SnapshotRequest::new(Symbol::parse(&args.ticker)?);

    match router.route_snapshot(&request, strategy).await {
        Ok(route) => {
            let snapshot = route.data;
            let ticker = snapshot.ticker.clone();
            let table = render(&snapshot);
            let data = SnapshotResponseData {
                current_margin: snapshot.current_margin().ok().map(|margin| margin * 100.0),
                market_cap: snapshot.market_cap(),
                snapshot,
            };
            Ok(CommandResult::ok(serde_json::to_value(data)?, route.source_chain)
                .with_ticker(ticker)
                .with_table(table)
                .with_errors(route.errors)
                .with_warnings(route.warnings)
                .with_latency(route.latency_ms))
        }
        Err(failure) => Ok(CommandResult::failed(failure.source_chain, failure.errors)
            .with_warnings(failure.warnings)
            .with_latency(failure.latency_ms)),
    }
}

fn render(snapshot: &FinancialSnapshot) -> String {
    let margin = snapshot
        .current_margin()
        .map(|margin| percent(margin * 100.0))
        .unwrap_or_else(|_| String::from("n/a"));

    let mut table = Table::new(&["field", "value"]).with_title(snapshot.ticker.to_string());
    for (label, value) in [
        ("Revenue (TTM)", amount(snapshot.revenue_ttm)),
        ("EBIT", amount(snapshot.ebit)),
        ("Operating margin", margin),
        ("Tax rate", percent(snapshot.tax_rate)),
        ("Cash", amount(snapshot.cash)),
        ("Debt", amount(snapshot.debt)),
        ("Shares outstanding", amount(snapshot.shares)),
        ("Price", per_share(snapshot.price)),
        ("Market cap", amount(snapshot.market_cap())),
    ] {
        table.push_row(vec![label.to_owned(), value]);
    }
    table.to_string()
}
