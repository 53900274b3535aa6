use std::sync::Arc;
use std::time::Instant;

use crate::adapters::FixtureSource;
use crate::data_source::{SnapshotRequest, SnapshotSource, SourceError};
use crate::{EnvelopeError, FinancialSnapshot, ProviderId};

/// Source selection strategy for routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStrategy {
    /// Try every registered source in registration order.
    Auto,
    /// Use exactly one source, no fallback.
    Strict(ProviderId),
}

/// Successful routed lookup.
#[derive(Debug, Clone)]
pub struct RouteSuccess {
    pub data: FinancialSnapshot,
    pub selected_source: ProviderId,
    pub source_chain: Vec<ProviderId>,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

/// Failed lookup after exhausting candidates.
#[derive(Debug, Clone)]
pub struct RouteFailure {
    pub source_chain: Vec<ProviderId>,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

pub type RouteResult = Result<RouteSuccess, RouteFailure>;

/// Ordered registry of snapshot sources with fallback.
pub struct SnapshotRouter {
    sources: Vec<Arc<dyn SnapshotSource>>,
}

impl Default for SnapshotRouter {
    fn default() -> Self {
        Self::new(vec![Arc::new(FixtureSource::default())])
    }
}

impl SnapshotRouter {
    /// Later registrations of an already-registered provider are ignored.
    pub fn new(sources: Vec<Arc<dyn SnapshotSource>>) -> Self {
        let mut unique: Vec<Arc<dyn SnapshotSource>> = Vec::with_capacity(sources.len());
        for source in sources {
            if !unique.iter().any(|known| known.id() == source.id()) {
                unique.push(source);
            }
        }
        Self { sources: unique }
    }

    pub fn registered(&self) -> Vec<ProviderId> {
        self.sources.iter().map(|source| source.id()).collect()
    }

    pub async fn route_snapshot(
        &self,
        req: &SnapshotRequest,
        strategy: SourceStrategy,
    ) -> RouteResult {
        let started = Instant::now();
        let planned = match &strategy {
            SourceStrategy::Auto => self.registered(),
            SourceStrategy::Strict(provider) => vec![*provider],
        };

        let mut source_chain = Vec::with_capacity(planned.len());
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        for provider in planned {
            source_chain.push(provider);
            let Some(source) = self.sources.iter().find(|source| source.id() == provider) else {
                errors.push(EnvelopeError::snapshot_source(
                    provider,
                    &SourceError::adapter_not_registered(provider),
                ));
                continue;
            };

            match source.fetch(req.clone()).await {
                Ok(data) => {
                    if !errors.is_empty() {
                        warnings.push(format!(
                            "snapshot for '{}' served by fallback source '{provider}'",
                            req.ticker
                        ));
                    }
                    return Ok(RouteSuccess {
                        data,
                        selected_source: provider,
                        source_chain,
                        warnings,
                        errors,
                        latency_ms: elapsed_ms(started),
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        source = %provider,
                        ticker = %req.ticker,
                        code = error.code(),
                        "snapshot source failed"
                    );
                    errors.push(EnvelopeError::snapshot_source(provider, &error));
                }
            }
        }

        Err(RouteFailure {
            source_chain,
            warnings,
            errors,
            latency_ms: elapsed_ms(started),
        })
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
