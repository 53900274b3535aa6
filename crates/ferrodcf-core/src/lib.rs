//! # Ferrodcf Core
//!
//! Multi-stage discounted-cash-flow valuation.
//!
//! ## Overview
//!
//! Given a company's trailing [`FinancialSnapshot`] and a set of
//! [`ModelAssumptions`], the engine projects sixty years of free cash flow to
//! the firm across three explicit stages, adds a growing perpetuity, and
//! bridges enterprise value to an intrinsic value per share. The sensitivity
//! analyzer re-runs the engine over a fixed discount-rate / terminal-growth
//! grid.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`engine`] | Year-by-year projection, terminal value, equity bridge |
//! | [`sensitivity`] | 3x5 intrinsic-value grid |
//! | [`domain`] | Snapshot, assumptions, projection and result types |
//! | [`data_source`] | Snapshot acquisition contract |
//! | [`adapters`] | Fixture and file snapshot sources |
//! | [`routing`] | Ordered source fallback |
//! | [`config`] | Case files and assumption overrides |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrodcf_core::{engine, sensitivity, FinancialSnapshot, ModelAssumptions};
//!
//! let snapshot = FinancialSnapshot::sample();
//! let assumptions = ModelAssumptions::default();
//!
//! let result = engine::project(&snapshot, &assumptions)?;
//! let grid = sensitivity::sensitivity_grid(&snapshot, &assumptions)?;
//!
//! assert_eq!(grid.center(), result.intrinsic_value);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! A run fails only on inputs the model cannot value, never with NaN or
//! infinity:
//!
//! ```rust
//! use ferrodcf_core::{engine, FinancialSnapshot, ModelAssumptions, ValuationErrorKind};
//!
//! let assumptions = ModelAssumptions {
//!     terminal_wacc: 7.5,
//!     terminal_growth: 7.5,
//!     ..ModelAssumptions::default()
//! };
//! let err = engine::project(&FinancialSnapshot::sample(), &assumptions).unwrap_err();
//! assert_eq!(err.kind(), ValuationErrorKind::DegenerateAssumptions);
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod routing;
pub mod sensitivity;
pub mod source;

pub use adapters::{FileSource, FixtureSource};
pub use config::{AssumptionOverrides, CaseFormat, ConfigError, ValuationCase};
pub use data_source::{SnapshotRequest, SnapshotSource, SourceError, SourceErrorKind};
pub use domain::{
    fraction_to_percent, percent_to_fraction, FinancialSnapshot, ModelAssumptions, Stage,
    StageSummary, Symbol, TerminalValue, TickerRule, ValuationResult, YearProjection,
};
pub use engine::project;
pub use envelope::{CellShift, Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{
    DegenerateAssumptions, InvalidSnapshot, ValidationError, ValuationError,
    ValuationErrorKind,
};
pub use routing::{RouteFailure, RouteResult, RouteSuccess, SnapshotRouter, SourceStrategy};
pub use sensitivity::{sensitivity_grid, SensitivityError, SensitivityGrid};
pub use source::ProviderId;
