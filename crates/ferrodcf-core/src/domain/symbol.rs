use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Longest ticker accepted, share-class suffix included (`BRK.B`, `RDS-A`).
pub const MAX_TICKER_LEN: usize = 15;

/// Rule a rejected ticker broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerRule {
    Empty,
    TooLong,
    /// Tickers start with a letter, which also keeps `..` and `/` out of
    /// snapshot file names.
    LeadingNonLetter,
    Character { ch: char, index: usize },
}

impl Display for TickerRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("is empty"),
            Self::TooLong => write!(f, "is longer than {MAX_TICKER_LEN} characters"),
            Self::LeadingNonLetter => f.write_str("must start with a letter"),
            Self::Character { ch, index } => write!(f, "has invalid character '{ch}' at {index}"),
        }
    }
}

/// Company ticker, upper-cased and stripped of surrounding whitespace.
///
/// Also names the snapshot file a ticker is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let ticker = input.trim().to_ascii_uppercase();
        match broken_rule(&ticker) {
            None => Ok(Self(ticker)),
            Some(rule) => Err(ValidationError::InvalidTicker {
                ticker: input.to_owned(),
                rule,
            }),
        }
    }

    /// Wraps a literal ticker from a built-in catalogue.
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(broken_rule(value).is_none() && value == value.to_ascii_uppercase());
        Self(value.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<TICKER>.json`, the file a snapshot directory keeps this company in.
    pub fn snapshot_file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

fn broken_rule(ticker: &str) -> Option<TickerRule> {
    match ticker.chars().next() {
        None => return Some(TickerRule::Empty),
        Some(first) if !first.is_ascii_alphabetic() => return Some(TickerRule::LeadingNonLetter),
        Some(_) => {}
    }
    if ticker.chars().count() > MAX_TICKER_LEN {
        return Some(TickerRule::TooLong);
    }
    ticker
        .chars()
        .enumerate()
        .find(|(_, ch)| !(ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-')))
        .map(|(index, ch)| TickerRule::Character { ch, index })
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_of(input: &str) -> TickerRule {
        match Symbol::parse(input) {
            Err(ValidationError::InvalidTicker { rule, .. }) => rule,
            other => panic!("expected ticker rejection for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn share_class_tickers_normalize() {
        let ticker = Symbol::parse(" brk.b ").expect("ticker should parse");
        assert_eq!(ticker.as_str(), "BRK.B");
        assert_eq!(ticker.snapshot_file_name(), "BRK.B.json");
    }

    #[test]
    fn each_rule_is_reported() {
        assert_eq!(rule_of("   "), TickerRule::Empty);
        assert_eq!(rule_of("1AAPL"), TickerRule::LeadingNonLetter);
        assert_eq!(rule_of("ABCDEFGHIJKLMNOP"), TickerRule::TooLong);
        assert_eq!(rule_of("AA PL"), TickerRule::Character { ch: ' ', index: 2 });
    }

    #[test]
    fn path_like_tickers_cannot_escape_the_snapshot_directory() {
        assert_eq!(rule_of("../etc"), TickerRule::LeadingNonLetter);
        assert_eq!(rule_of("AA/PL"), TickerRule::Character { ch: '/', index: 2 });
    }

    #[test]
    fn rejection_message_keeps_the_raw_input() {
        let err = Symbol::parse("aa/pl").expect_err("must fail");
        assert_eq!(err.to_string(), "ticker 'aa/pl' has invalid character '/' at 2");
    }

    #[test]
    fn deserializes_through_validation() {
        let parsed: Symbol = serde_json::from_str("\"msft\"").expect("must deserialize");
        assert_eq!(parsed.as_str(), "MSFT");
        assert!(serde_json::from_str::<Symbol>("\"\"").is_err());
    }
}
