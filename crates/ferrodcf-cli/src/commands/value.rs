use ferrodcf_core::{
    engine, EnvelopeError, ModelAssumptions, StageSummary, Symbol, TerminalValue,
    ValuationResult, YearProjection,
};
use serde::Serialize;

use crate::cli::ValueArgs;
use crate::error::CliError;
use crate::output::{amount, per_share, percent, Table};

use super::{CommandResult, Inputs};

#[derive(Debug, Serialize)]
struct ValueResponseData {
    ticker: Symbol,
    assumptions: ModelAssumptions,
    intrinsic_value: f64,
    price: f64,
    upside: Option<f64>,
    pv_explicit: f64,
    pv_terminal: f64,
    enterprise_value: f64,
    cash: f64,
    debt: f64,
    equity_value: f64,
    shares: f64,
    explicit_share_pct: Option<f64>,
    terminal_share_pct: Option<f64>,
    terminal: TerminalValue,
    stages: Vec<StageSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    projections: Option<Vec<YearProjection>>,
}

pub fn run(args: &ValueArgs, inputs: &Inputs) -> Result<CommandResult, CliError> {
    let result = match engine::project(&inputs.snapshot, &inputs.assumptions) {
        Ok(result) => result,
        Err(error) => return Ok(inputs.failed(EnvelopeError::valuation(&error))),
    };

    let table = render(inputs, &result);
    let snapshot = &inputs.snapshot;
    let data = ValueResponseData {
        ticker: snapshot.ticker.clone(),
        assumptions: inputs.assumptions,
        intrinsic_value: result.intrinsic_value,
        price: snapshot.price,
        upside: result.upside,
        pv_explicit: result.pv_explicit,
        pv_terminal: result.pv_terminal,
        enterprise_value: result.enterprise_value,
        cash: snapshot.cash,
        debt: snapshot.debt,
        equity_value: result.equity_value,
        shares: snapshot.shares,
        explicit_share_pct: result.explicit_share_pct(),
        terminal_share_pct: result.terminal_share_pct(),
        terminal: result.terminal,
        stages: result.stage_summaries(),
        projections: args.with_projections.then(|| result.projections.clone()),
    };

    Ok(inputs.result(serde_json::to_value(data)?).with_table(table))
}

fn render(inputs: &Inputs, result: &ValuationResult) -> String {
    let snapshot = &inputs.snapshot;
    let upside = result
        .upside
        .map(percent)
        .unwrap_or_else(|| String::from("n/a"));

    let mut bridge =
        Table::new(&["item", "value"]).with_title(format!("{} valuation", snapshot.ticker));
    for (label, value) in [
        ("PV of explicit cash flows", amount(result.pv_explicit)),
        ("PV of terminal value", amount(result.pv_terminal)),
        ("Enterprise value", amount(result.enterprise_value)),
        ("+ Cash", amount(snapshot.cash)),
        ("- Debt", amount(snapshot.debt)),
        ("Equity value", amount(result.equity_value)),
        ("Shares outstanding", amount(snapshot.shares)),
        ("Intrinsic value per share", per_share(result.intrinsic_value)),
        ("Current price", per_share(snapshot.price)),
        ("Upside", upside),
    ] {
        bridge.push_row(vec![label.to_owned(), value]);
    }

    let mut stages = Table::new(&["stage", "years", "present value"]);
    for summary in result.stage_summaries() {
        stages.push_row(vec![
            summary.stage.to_string(),
            summary.years.to_string(),
            amount(summary.present_value),
        ]);
    }

    format!("{bridge}\n{stages}")
}
