use ferrodcf_core::{engine, EnvelopeError, Symbol, TerminalValue, YearProjection};
use serde::Serialize;

use crate::cli::ProjectArgs;
use crate::error::CliError;
use crate::output::{amount, percent, Table};

use super::{CommandResult, Inputs};

#[derive(Debug, Serialize)]
struct ProjectResponseData {
    ticker: Symbol,
    condensed: bool,
    projections: Vec<YearProjection>,
    terminal: TerminalValue,
}

pub fn run(args: &ProjectArgs, inputs: &Inputs) -> Result<CommandResult, CliError> {
    let result = match engine::project(&inputs.snapshot, &inputs.assumptions) {
        Ok(result) => result,
        Err(error) => return Ok(inputs.failed(EnvelopeError::valuation(&error))),
    };

    let projections = if args.all_years {
        result.projections.clone()
    } else {
        result.condensed_projections().copied().collect()
    };
    let table = render(&projections, &result.terminal);
    let data = ProjectResponseData {
        ticker: inputs.snapshot.ticker.clone(),
        condensed: !args.all_years,
        projections,
        terminal: result.terminal,
    };

    Ok(inputs.result(serde_json::to_value(data)?).with_table(table))
}

fn render(projections: &[YearProjection], terminal: &TerminalValue) -> String {
    let mut table = Table::new(&[
        "year",
        "stage",
        "growth",
        "wacc",
        "revenue",
        "ebit",
        "ebiat",
        "reinvestment",
        "fcff",
        "discount",
        "pv",
    ]);
    for projection in projections {
        table.push_row(vec![
            projection.year.to_string(),
            projection.stage.to_string(),
            percent(projection.growth_rate),
            percent(projection.discount_rate),
            amount(projection.revenue),
            amount(projection.ebit),
            amount(projection.ebiat),
            amount(projection.reinvestment),
            amount(projection.fcff),
            format!("{:.4}", projection.discount_factor),
            amount(projection.pv),
        ]);
    }
    table.push_row(vec![
        String::from("TV"),
        String::from("Terminal"),
        percent(terminal.growth_rate),
        percent(terminal.discount_rate),
        String::new(),
        String::new(),
        amount(terminal.ebiat),
        String::new(),
        amount(terminal.fcff),
        String::new(),
        amount(terminal.present_value),
    ]);
    table.to_string()
}
