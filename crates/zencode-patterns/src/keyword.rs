//! The line-prefix keyword vocabulary shared by the parser and phase machine.
//!
//! A `ZenDSL` line always opens with one of these words; the parser strips it
//! before normalizing the rest of the line into a candidate pattern.

use std::fmt;
use std::str::FromStr;

/// The leading keyword of a `ZenDSL` statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// Opens a `Rule` block.
    Rule,
    /// Opens a `Scenario` block and triggers plugin loading.
    Scenario,
    /// Opens the `given` phase of a scenario.
    Given,
    /// Opens the `when` phase.
    When,
    /// Opens the `then` phase.
    Then,
    /// Continues the current phase.
    And,
}

impl Prefix {
    /// Returns the canonical lowercase spelling of the prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::Scenario => "scenario",
            Self::Given => "given",
            Self::When => "when",
            Self::Then => "then",
            Self::And => "and",
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a line's leading word is not a recognised prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPrefix(pub String);

impl fmt::Display for UnknownPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised statement prefix '{}'", self.0)
    }
}

impl std::error::Error for UnknownPrefix {}

impl FromStr for Prefix {
    type Err = UnknownPrefix;

    fn from_str(word: &str) -> Result<Self, Self::Err> {
        if word.eq_ignore_ascii_case("rule") {
            Ok(Self::Rule)
        } else if word.eq_ignore_ascii_case("scenario") {
            Ok(Self::Scenario)
        } else if word.eq_ignore_ascii_case("given") {
            Ok(Self::Given)
        } else if word.eq_ignore_ascii_case("when") {
            Ok(Self::When)
        } else if word.eq_ignore_ascii_case("then") {
            Ok(Self::Then)
        } else if word.eq_ignore_ascii_case("and") {
            Ok(Self::And)
        } else {
            Err(UnknownPrefix(word.to_string()))
        }
    }
}

/// Splits a trimmed, non-empty, non-comment line into its leading keyword and
/// the remainder of the line (the whitespace following the keyword is
/// consumed; interior whitespace in the remainder is left untouched).
///
/// # Errors
/// Returns [`UnknownPrefix`] when the leading word is not one of the six
/// recognised keywords.
///
/// # Examples
/// ```
/// use zencode_patterns::{split_prefix, Prefix};
/// let (prefix, rest) = split_prefix("Given that I am known as 'Alice'").unwrap();
/// assert_eq!(prefix, Prefix::Given);
/// assert_eq!(rest, "that I am known as 'Alice'");
/// ```
pub fn split_prefix(line: &str) -> Result<(Prefix, &str), UnknownPrefix> {
    let trimmed = line.trim_start();
    let word_end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    let (word, rest) = trimmed.split_at(word_end);
    let prefix: Prefix = word.parse()?;
    Ok((prefix, rest.trim_start()))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests assert on panics to surface failures directly")]
mod tests {
    use super::*;

    #[test]
    fn parses_each_keyword_case_insensitively() {
        assert_eq!("Given".parse::<Prefix>(), Ok(Prefix::Given));
        assert_eq!("SCENARIO".parse::<Prefix>(), Ok(Prefix::Scenario));
        assert_eq!("and".parse::<Prefix>(), Ok(Prefix::And));
    }

    #[test]
    fn rejects_unknown_word() {
        let err = "dance".parse::<Prefix>().unwrap_err();
        assert_eq!(err.0, "dance");
    }

    #[test]
    fn splits_prefix_and_remainder() {
        let (prefix, rest) = split_prefix("When I sign 'msg'").unwrap();
        assert_eq!(prefix, Prefix::When);
        assert_eq!(rest, "I sign 'msg'");
    }

    #[test]
    fn splits_prefix_with_no_remainder() {
        let (prefix, rest) = split_prefix("Then").unwrap();
        assert_eq!(prefix, Prefix::Then);
        assert_eq!(rest, "");
    }
}
