mod project;
mod sensitivity;
mod snapshot;
mod value;

use std::sync::Arc;

use ferrodcf_core::{
    AssumptionOverrides, Envelope, EnvelopeError, FileSource, FinancialSnapshot, FixtureSource,
    ModelAssumptions, ProviderId, RouteFailure, SnapshotRequest, SnapshotRouter, SnapshotSource,
    SourceStrategy, Symbol, ValuationCase,
};
use serde_json::Value;

use crate::cli::{Cli, Command, SourceSelector};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    pub ticker: Option<Symbol>,
    pub table: Option<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub source_chain: Vec<ProviderId>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<ProviderId>) -> Self {
        Self {
            data,
            ticker: None,
            table: None,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            source_chain,
        }
    }

    /// Null data with the errors explaining why.
    pub fn failed(source_chain: Vec<ProviderId>, errors: Vec<EnvelopeError>) -> Self {
        Self::ok(Value::Null, source_chain).with_errors(errors)
    }

    pub fn with_ticker(mut self, ticker: Symbol) -> Self {
        self.ticker = Some(ticker);
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

/// Envelope plus the optional human-readable rendering of its data.
pub struct Outcome {
    pub envelope: Envelope<Value>,
    pub table: Option<String>,
}

/// Snapshot and assumptions for one valuation run, with provenance.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub snapshot: FinancialSnapshot,
    pub assumptions: ModelAssumptions,
    pub source_chain: Vec<ProviderId>,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

impl Inputs {
    fn result(&self, data: Value) -> CommandResult {
        CommandResult::ok(data, self.source_chain.clone())
            .with_ticker(self.snapshot.ticker.clone())
            .with_warnings(self.warnings.clone())
            .with_errors(self.errors.clone())
            .with_latency(self.latency_ms)
    }

    /// The valuation failed after inputs resolved.
    fn failed(&self, error: EnvelopeError) -> CommandResult {
        CommandResult::failed(self.source_chain.clone(), self.errors.clone())
            .with_errors(vec![error])
            .with_ticker(self.snapshot.ticker.clone())
            .with_warnings(self.warnings.clone())
            .with_latency(self.latency_ms)
    }
}

pub async fn run(cli: &Cli) -> Result<Outcome, CliError> {
    let router = build_router(cli);
    let strategy = to_source_strategy(cli.source);
    tracing::info!(command = ?cli.command, sources = ?router.registered(), "command started");

    let command_result = match &cli.command {
        Command::Value(args) => {
            valuate(cli, &router, strategy, |inputs| value::run(args, inputs)).await?
        }
        Command::Project(args) => {
            valuate(cli, &router, strategy, |inputs| project::run(args, inputs)).await?
        }
        Command::Sensitivity => valuate(cli, &router, strategy, sensitivity::run).await?,
        Command::Snapshot(args) => snapshot::run(args, &router, strategy).await?,
    };

    let CommandResult {
        data,
        ticker,
        table,
        warnings,
        errors,
        latency_ms,
        source_chain,
    } = command_result;

    let mut metadata = Metadata::new(source_chain, latency_ms).with_ticker(ticker);
    for warning in warnings {
        metadata.push_warning(warning);
    }
    let meta = metadata.into_envelope_meta()?;

    tracing::info!(
        request_id = %meta.request_id,
        ticker = ?meta.ticker.as_ref().map(Symbol::as_str),
        errors = errors.len(),
        warnings = meta.warnings.len(),
        "command finished"
    );

    let envelope = Envelope::new(meta, data, errors)?;
    Ok(Outcome { envelope, table })
}

/// Runs a valuation command once its inputs resolve; a failed snapshot
/// lookup becomes the command result instead.
async fn valuate<F>(
    cli: &Cli,
    router: &SnapshotRouter,
    strategy: SourceStrategy,
    command: F,
) -> Result<CommandResult, CliError>
where
    F: FnOnce(&Inputs) -> Result<CommandResult, CliError>,
{
    match resolve_inputs(cli, router, strategy).await? {
        Ok(inputs) => command(&inputs),
        Err(failure) => Ok(CommandResult::failed(failure.source_chain, failure.errors)
            .with_warnings(failure.warnings)
            .with_latency(failure.latency_ms)),
    }
}

/// File source first when a data directory is configured, fixtures after.
fn build_router(cli: &Cli) -> SnapshotRouter {
    let mut sources: Vec<Arc<dyn SnapshotSource>> = Vec::with_capacity(2);
    if let Some(root) = &cli.data_dir {
        sources.push(Arc::new(FileSource::new(root.clone())));
    }
    sources.push(Arc::new(FixtureSource::default()));
    SnapshotRouter::new(sources)
}

fn to_source_strategy(source: SourceSelector) -> SourceStrategy {
    match source {
        SourceSelector::Auto => SourceStrategy::Auto,
        SourceSelector::Fixture => SourceStrategy::Strict(ProviderId::Fixture),
        SourceSelector::File => SourceStrategy::Strict(ProviderId::File),
    }
}

/// Resolves the snapshot (ticker lookup, case file, or built-in sample) and
/// layers assumption overrides on top of the case assumptions.
///
/// A fetched snapshot rebases stage-1 growth unless the flag sets it.
async fn resolve_inputs(
    cli: &Cli,
    router: &SnapshotRouter,
    strategy: SourceStrategy,
) -> Result<Result<Inputs, RouteFailure>, CliError> {
    let case = match &cli.case {
        Some(path) => ValuationCase::load(path)?,
        None => ValuationCase::default(),
    };
    let overrides = AssumptionOverrides::from(cli.assumptions);

    let inputs = match (&cli.ticker, case.snapshot) {
        (Some(ticker), case_snapshot) => {
            let request = SnapshotRequest::new(Symbol::parse(ticker)?);
            let route = match router.route_snapshot(&request, strategy).await {
                Ok(route) => route,
                Err(failure) => return Ok(Err(failure)),
            };
            let mut warnings = route.warnings;
            if case_snapshot.is_some() {
                warnings.push(format!(
                    "--ticker {} replaces the snapshot from the case file",
                    route.data.ticker
                ));
            }
            let assumptions = if overrides.stage1_growth.is_none() {
                case.assumptions.rebased_for(&route.data)
            } else {
                case.assumptions
            };
            Inputs {
                snapshot: route.data,
                assumptions,
                source_chain: route.source_chain,
                warnings,
                errors: route.errors,
                latency_ms: route.latency_ms,
            }
        }
        (None, Some(snapshot)) => Inputs {
            snapshot,
            assumptions: case.assumptions,
            source_chain: vec![ProviderId::Inline],
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
        },
        (None, None) => Inputs {
            snapshot: FinancialSnapshot::sample(),
            assumptions: case.assumptions,
            source_chain: vec![ProviderId::Inline],
            warnings: vec![String::from(
                "no snapshot supplied; valuing the built-in AAPL sample",
            )],
            errors: Vec::new(),
            latency_ms: 0,
        },
    };

    Ok(Ok(Inputs {
        assumptions: overrides.apply(inputs.assumptions),
        ..inputs
    }))
}
