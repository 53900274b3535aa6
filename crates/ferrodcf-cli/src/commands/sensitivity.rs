use ferrodcf_core::{sensitivity_grid, EnvelopeError, SensitivityGrid, Symbol};
use serde::Serialize;

use crate::error::CliError;
use crate::output::{per_share, percent, Table};

use super::{CommandResult, Inputs};

#[derive(Debug, Serialize)]
struct SensitivityResponseData {
    ticker: Symbol,
    price: f64,
    grid: SensitivityGrid,
}

pub fn run(inputs: &Inputs) -> Result<CommandResult, CliError> {
    let grid = match sensitivity_grid(&inputs.snapshot, &inputs.assumptions) {
        Ok(grid) => grid,
        Err(error) => return Ok(inputs.failed(EnvelopeError::sensitivity(&error))),
    };

    let table = render(&grid);
    let data = SensitivityResponseData {
        ticker: inputs.snapshot.ticker.clone(),
        price: inputs.snapshot.price,
        grid,
    };

    Ok(inputs.result(serde_json::to_value(data)?).with_table(table))
}

/// Highest terminal growth on top; the unperturbed cell is bracketed.
fn render(grid: &SensitivityGrid) -> String {
    let headers = std::iter::once(String::from("growth \\ wacc"))
        .chain(grid.wacc_axis.iter().map(|&wacc| percent(wacc)))
        .collect::<Vec<_>>();
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();

    let mut table = Table::new(&header_refs).with_title("intrinsic value per share");
    for (growth_index, row) in grid.values.iter().enumerate().rev() {
        let cells = row.iter().enumerate().map(|(wacc_index, &value)| {
            if SensitivityGrid::is_center(growth_index, wacc_index) {
                format!("[{}]", per_share(value))
            } else {
                per_share(value)
            }
        });
        table.push_row(
            std::iter::once(percent(grid.growth_axis[growth_index]))
                .chain(cells)
                .collect(),
        );
    }
    table.to_string()
}
