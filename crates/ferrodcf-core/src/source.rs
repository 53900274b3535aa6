use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Where a financial snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Supplied directly by the caller (case file or defaults).
    Inline,
    Fixture,
    File,
}

impl ProviderId {
    pub const ALL: [Self; 3] = [Self::Inline, Self::Fixture, Self::File];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Fixture => "fixture",
            Self::File => "file",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "fixture" => Ok(Self::Fixture),
            "file" => Ok(Self::File),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for provider in ProviderId::ALL {
            assert_eq!(provider.as_str().parse::<ProviderId>(), Ok(provider));
        }
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = "bloomberg".parse::<ProviderId>().expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidSource { .. }));
    }
}
