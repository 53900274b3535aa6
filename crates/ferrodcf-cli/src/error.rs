use ferrodcf_core::EnvelopeError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ferrodcf_core::ValidationError),

    #[error(transparent)]
    Config(#[from] ferrodcf_core::ConfigError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 5,
            Self::Serialization(_) => 6,
            Self::Io(_) => 10,
        }
    }
}

/// Exit code for an envelope that carries errors and no result.
///
/// Valuation failures exit with 3, snapshot source failures with 4.
pub fn exit_code_for_failure(error: &EnvelopeError) -> u8 {
    if error.is_source_failure() {
        4
    } else {
        3
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn config_errors_exit_with_five() {
        let error = CliError::from(ferrodcf_core::ConfigError::UnsupportedFormat {
            path: PathBuf::from("case.toml"),
        });
        assert_eq!(error.exit_code(), 5);
    }

    #[test]
    fn failures_map_by_error_namespace() {
        let valuation = EnvelopeError::valuation(&ferrodcf_core::ValuationError::from(
            ferrodcf_core::InvalidSnapshot::ZeroRevenue,
        ));
        let source = EnvelopeError::snapshot_source(
            ferrodcf_core::ProviderId::File,
            &ferrodcf_core::SourceError::data_unavailable("missing"),
        );
        assert_eq!(exit_code_for_failure(&valuation), 3);
        assert_eq!(exit_code_for_failure(&source), 4);
    }

    #[test]
    fn write_failures_exit_with_ten() {
        let error = CliError::from(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert_eq!(error.exit_code(), 10);
    }
}
