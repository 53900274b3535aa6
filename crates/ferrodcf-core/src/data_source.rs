//! Snapshot acquisition contract.
//!
//! The valuation engine only consumes [`FinancialSnapshot`] values; where they
//! come from is decided here. Adapters implement [`SnapshotSource`] and are
//! combined by [`SnapshotRouter`](crate::routing::SnapshotRouter).

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{FinancialSnapshot, ProviderId, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The source has no data for the requested ticker.
    DataUnavailable,
    /// The source answered with something that is not a valid snapshot.
    MalformedPayload,
    InvalidRequest,
    AdapterNotRegistered,
    Internal,
}

/// Structured source error used by router fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::DataUnavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::MalformedPayload,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn adapter_not_registered(provider: ProviderId) -> Self {
        Self {
            kind: SourceErrorKind::AdapterNotRegistered,
            message: format!("snapshot source '{provider}' is not registered"),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::DataUnavailable => "source.data_unavailable",
            SourceErrorKind::MalformedPayload => "source.malformed_payload",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::AdapterNotRegistered => "source.adapter_not_registered",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for snapshot lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub ticker: Symbol,
}

impl SnapshotRequest {
    pub fn new(ticker: Symbol) -> Self {
        Self { ticker }
    }

    pub fn parse(ticker: &str) -> Result<Self, SourceError> {
        let ticker =
            Symbol::parse(ticker).map_err(|error| SourceError::invalid_request(error.to_string()))?;
        Ok(Self { ticker })
    }
}

pub type SnapshotFuture<'a> =
    Pin<Box<dyn Future<Output = Result<FinancialSnapshot, SourceError>> + Send + 'a>>;

/// Snapshot source adapter contract.
///
/// Implementations must be `Send + Sync`; the router shares them behind `Arc`.
pub trait SnapshotSource: Send + Sync {
    /// Returns the unique provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches the trailing financial snapshot for one ticker.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] with [`SourceErrorKind::DataUnavailable`] when
    /// the source knows nothing about the ticker, and
    /// [`SourceErrorKind::MalformedPayload`] when its data cannot be read.
    fn fetch<'a>(&'a self, req: SnapshotRequest) -> SnapshotFuture<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_namespaced() {
        let err = SourceError::data_unavailable("no filing for ZZZZ");
        assert_eq!(err.code(), "source.data_unavailable");
        assert!(err.retryable());
        assert_eq!(err.to_string(), "no filing for ZZZZ (source.data_unavailable)");
    }

    #[test]
    fn request_parse_rejects_bad_ticker() {
        let err = SnapshotRequest::parse("  ").expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
    }
}
