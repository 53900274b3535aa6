//! CLI argument definitions for ferrodcf.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `value` | Intrinsic value per share and the equity bridge |
//! | `project` | Year-by-year cash-flow projection |
//! | `sensitivity` | Value grid over WACC and terminal growth |
//! | `snapshot` | Look up a financial snapshot by ticker |
//!
//! # Inputs
//!
//! The snapshot comes from `--ticker` (looked up through the snapshot
//! sources), else from the `--case` file, else the built-in sample.
//! Assumptions start from the case file (or defaults) and are overridden
//! field by field with the assumption flags.
//!
//! # Examples
//!
//! ```bash
//! ferrodcf value --ticker MSFT --initial-wacc 9 --pretty
//! ferrodcf project --case acme.yaml --format table
//! ferrodcf sensitivity --terminal-growth 3
//! FERRODCF_DATA_DIR=./snapshots ferrodcf snapshot ACME --source file
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ferrodcf_core::config::{DATA_DIR_ENV, LOG_LEVEL_ENV};
use ferrodcf_core::AssumptionOverrides;

/// Multi-stage discounted-cash-flow valuation CLI.
#[derive(Debug, Parser)]
#[command(
    name = "ferrodcf",
    author,
    version,
    about = "Multi-stage discounted-cash-flow valuation",
    long_about = "Projects sixty years of free cash flow to the firm across a high-growth \
stage, a target-margin stage and a fifty-year fade, adds a growing perpetuity and bridges \
the result to an intrinsic value per share.\n\
\n\
Use 'ferrodcf <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Valuation case file (.json, .yaml or .yml) with snapshot and assumptions.
    #[arg(long, global = true, value_name = "FILE")]
    pub case: Option<PathBuf>,

    /// Look up the snapshot for this ticker instead of using the case file.
    #[arg(long, global = true)]
    pub ticker: Option<String>,

    /// Snapshot source selection.
    #[arg(long, global = true, value_enum, default_value_t = SourceSelector::Auto)]
    pub source: SourceSelector,

    /// Directory of `<TICKER>.json` snapshots for the file source.
    #[arg(long, global = true, env = DATA_DIR_ENV, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set (trace, debug, info, warn, error).
    #[arg(long, global = true, env = LOG_LEVEL_ENV, default_value = "warn")]
    pub log_level: String,

    #[command(flatten)]
    pub assumptions: AssumptionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width text for terminal display.
    Table,
    /// Single JSON envelope.
    Json,
}

/// Snapshot source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// File source (when a data directory is set), then the fixture catalogue.
    Auto,
    /// Built-in fixture catalogue only.
    Fixture,
    /// Data directory only.
    File,
}

/// Assumption overrides, all in percent except the sales-to-capital ratio.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct AssumptionArgs {
    /// Revenue growth for years 1-5.
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub stage1_growth: Option<f64>,

    /// Revenue growth for years 6-10.
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub stage2_growth: Option<f64>,

    /// Operating margin from year 6 onward.
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub target_margin: Option<f64>,

    /// Perpetual growth after year 60.
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub terminal_growth: Option<f64>,

    /// Discount rate for years 1-10.
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub initial_wacc: Option<f64>,

    /// Discount rate reached in year 60 and used for the perpetuity.
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub terminal_wacc: Option<f64>,

    /// Revenue generated per unit of reinvested capital.
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub sales_to_capital: Option<f64>,
}

impl From<AssumptionArgs> for AssumptionOverrides {
    fn from(args: AssumptionArgs) -> Self {
        Self {
            stage1_growth: args.stage1_growth,
            stage2_growth: args.stage2_growth,
            target_margin: args.target_margin,
            terminal_growth: args.terminal_growth,
            initial_wacc: args.initial_wacc,
            terminal_wacc: args.terminal_wacc,
            sales_to_capital: args.sales_to_capital,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Intrinsic value per share, upside and the equity bridge.
    ///
    /// # Examples
    ///
    ///   ferrodcf value
    ///   ferrodcf value --ticker MSFT --terminal-wacc 8
    Value(ValueArgs),

    /// Year-by-year projection table.
    ///
    /// Shows years 1-15 and every tenth year by default.
    Project(ProjectArgs),

    /// Intrinsic value under WACC shifts of -1..+1pp and terminal growth
    /// shifts of -0.5..+0.5pp.
    Sensitivity,

    /// Look up a financial snapshot through the snapshot sources.
    Snapshot(SnapshotArgs),
}

/// Arguments for the `value` command.
#[derive(Debug, Args)]
pub struct ValueArgs {
    /// Include all sixty projection years in the output.
    #[arg(long, default_value_t = false)]
    pub with_projections: bool,
}

/// Arguments for the `project` command.
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Show every projection year instead of the condensed view.
    #[arg(long, default_value_t = false)]
    pub all_years: bool,
}

/// Arguments for the `snapshot` command.
#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Ticker to look up (e.g., AAPL).
    pub ticker: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_growth_override() {
        let cli = Cli::try_parse_from(["ferrodcf", "value", "--stage1-growth", "-12.5"])
            .expect("must parse");
        assert_eq!(cli.assumptions.stage1_growth, Some(-12.5));
        assert!(matches!(cli.command, Command::Value(_)));
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "ferrodcf",
            "project",
            "--all-years",
            "--format",
            "table",
            "--ticker",
            "msft",
        ])
        .expect("must parse");
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.ticker.as_deref(), Some("msft"));
        assert!(matches!(cli.command, Command::Project(ProjectArgs { all_years: true })));
    }

    #[test]
    fn snapshot_requires_ticker() {
        assert!(Cli::try_parse_from(["ferrodcf", "snapshot"]).is_err());
    }
}
