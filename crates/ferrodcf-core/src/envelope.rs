//! Response envelope for machine-readable output.
//!
//! Every valuation, projection, grid or snapshot lookup is wrapped with the
//! provenance of its inputs: which ticker was valued and which snapshot
//! sources were consulted. Failures travel as [`EnvelopeError`]s built from
//! the engine, sensitivity and source error types, so their codes stay in
//! the `valuation.*` and `source.*` namespaces.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::data_source::SourceError;
use crate::{ProviderId, SensitivityError, Symbol, ValidationError, ValuationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn new(
        meta: EnvelopeMeta,
        data: T,
        errors: Vec<EnvelopeError>,
    ) -> Result<Self, ValidationError> {
        meta.validate()?;
        Ok(Self { meta, data, errors })
    }

    /// The last error decides how a failed run is classified; earlier ones
    /// are source misses that preceded it.
    pub fn final_error(&self) -> Option<&EnvelopeError> {
        self.errors.last()
    }
}

/// Provenance of one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub schema_version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    /// Company the response is about; absent when no snapshot was resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<Symbol>,
    /// Where the snapshot came from, in the order sources were consulted.
    pub source_chain: Vec<ProviderId>,
    pub latency_ms: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(
        request_id: impl Into<String>,
        schema_version: impl Into<String>,
        source_chain: Vec<ProviderId>,
    ) -> Result<Self, ValidationError> {
        let meta = Self {
            request_id: request_id.into(),
            schema_version: schema_version.into(),
            generated_at: OffsetDateTime::now_utc(),
            ticker: None,
            source_chain,
            latency_ms: 0,
            warnings: Vec::new(),
        };
        meta.validate()?;
        Ok(meta)
    }

    pub fn with_ticker(mut self, ticker: Option<Symbol>) -> Self {
        self.ticker = ticker;
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn generated_at_rfc3339(&self) -> String {
        self.generated_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.generated_at.unix_timestamp().to_string())
    }

    /// Inline inputs (case file or built-in sample) are never routed, so
    /// `inline` only appears on its own.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_id.trim().len() < 8 {
            return Err(ValidationError::InvalidRequestId);
        }
        if !is_semver_tag(&self.schema_version) {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }
        if self.source_chain.is_empty() {
            return Err(ValidationError::EmptySourceChain);
        }
        for (index, source) in self.source_chain.iter().enumerate() {
            if self.source_chain[..index].contains(source) {
                return Err(ValidationError::DuplicateSource { source_id: *source });
            }
        }
        if self.source_chain.len() > 1 && self.source_chain.contains(&ProviderId::Inline) {
            return Err(ValidationError::InlineWithLookup);
        }
        Ok(())
    }
}

/// Grid position of a failed sensitivity cell, in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellShift {
    pub wacc_step: f64,
    pub growth_step: f64,
}

/// Structured failure carried next to (or instead of) the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ProviderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellShift>,
}

impl EnvelopeError {
    pub fn valuation(error: &ValuationError) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.to_string(),
            retryable: Some(false),
            source: None,
            cell: None,
        }
    }

    pub fn sensitivity(error: &SensitivityError) -> Self {
        Self {
            cell: Some(CellShift {
                wacc_step: error.wacc_step,
                growth_step: error.growth_step,
            }),
            message: error.to_string(),
            ..Self::valuation(&error.source)
        }
    }

    pub fn snapshot_source(provider: ProviderId, error: &SourceError) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.message().to_owned(),
            retryable: Some(error.retryable()),
            source: Some(provider),
            cell: None,
        }
    }

    pub fn is_source_failure(&self) -> bool {
        self.code.starts_with("source.")
    }
}

fn is_semver_tag(value: &str) -> bool {
    value.strip_prefix('v').is_some_and(|version| {
        let parts = version.split('.').collect::<Vec<_>>();
        parts.len() == 3
            && parts
                .iter()
                .all(|part| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DegenerateAssumptions, InvalidSnapshot};
    use crate::{sensitivity_grid, FinancialSnapshot, ModelAssumptions};

    #[test]
    fn inline_meta_carries_ticker() {
        let meta = EnvelopeMeta::new("request-12345", "v1.0.0", vec![ProviderId::Inline])
            .expect("meta should be valid")
            .with_ticker(Some(FinancialSnapshot::sample().ticker));

        assert_eq!(meta.ticker.as_ref().map(Symbol::as_str), Some("AAPL"));
        let json = serde_json::to_value(&meta).expect("serializes");
        assert_eq!(json["ticker"], "AAPL");
        assert!(json["generated_at"].as_str().is_some_and(|value| value.ends_with('Z')));
    }

    #[test]
    fn rejects_bad_schema_version_and_request_id() {
        let err = EnvelopeMeta::new("request-12345", "1.0", vec![ProviderId::Fixture])
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidSchemaVersion { .. }));

        let err =
            EnvelopeMeta::new("abc", "v1.0.0", vec![ProviderId::Fixture]).expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidRequestId);
    }

    #[test]
    fn source_chain_rules() {
        let build = |chain| EnvelopeMeta::new("request-12345", "v1.0.0", chain);

        assert_eq!(build(Vec::new()), Err(ValidationError::EmptySourceChain));
        assert_eq!(
            build(vec![ProviderId::File, ProviderId::File]),
            Err(ValidationError::DuplicateSource {
                source_id: ProviderId::File
            })
        );
        assert_eq!(
            build(vec![ProviderId::Inline, ProviderId::Fixture]),
            Err(ValidationError::InlineWithLookup)
        );
        assert!(build(vec![ProviderId::File, ProviderId::Fixture]).is_ok());
    }

    #[test]
    fn valuation_errors_keep_their_code() {
        let error = EnvelopeError::valuation(&ValuationError::from(InvalidSnapshot::ZeroRevenue));
        assert_eq!(error.code, "valuation.invalid_snapshot");
        assert!(!error.is_source_failure());
        assert!(error.cell.is_none());
    }

    #[test]
    fn sensitivity_errors_locate_the_cell() {
        let assumptions = ModelAssumptions {
            terminal_growth: 7.0,
            ..ModelAssumptions::default()
        };
        let failure = sensitivity_grid(&FinancialSnapshot::sample(), &assumptions)
            .expect_err("colliding cell");

        let error = EnvelopeError::sensitivity(&failure);
        assert_eq!(error.code, "valuation.degenerate_assumptions");
        assert_eq!(
            error.cell,
            Some(CellShift {
                wacc_step: -1.0,
                growth_step: -0.5
            })
        );
        assert!(matches!(
            failure.source,
            ValuationError::DegenerateAssumptions(DegenerateAssumptions::TerminalSpreadZero { .. })
        ));
    }

    #[test]
    fn source_errors_name_the_provider() {
        let error = EnvelopeError::snapshot_source(
            ProviderId::File,
            &SourceError::data_unavailable("no snapshot file for 'ZZZZ'"),
        );
        assert!(error.is_source_failure());
        assert_eq!(error.source, Some(ProviderId::File));
        assert_eq!(error.retryable, Some(true));
    }
}
