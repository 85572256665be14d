//! The phase state machine (`spec.md` §4.1, C5).

use crate::error::ZenError;
use std::fmt;
use zencode_patterns::Prefix;

/// One of the lexical blocks a script walks through.
///
/// The initial phase is [`Phase::Feature`]; `given`, `when`, and `then` are
/// the only terminal phases a script may end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Before any `Rule` or `Scenario` line.
    Feature,
    /// Inside a `Rule` block.
    Rule,
    /// After a `Scenario` line, before `Given`.
    Scenario,
    /// Inside a `Given` block.
    Given,
    /// Inside a `When` block.
    When,
    /// Inside a `Then` block.
    Then,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Feature => "feature",
            Self::Rule => "rule",
            Self::Scenario => "scenario",
            Self::Given => "given",
            Self::When => "when",
            Self::Then => "then",
        };
        f.write_str(s)
    }
}

impl Phase {
    /// Drives the state machine with `prefix`, returning the next phase or
    /// [`ZenError::InvalidTransition`] when the transition is unlisted.
    ///
    /// # Errors
    /// Returns [`ZenError::InvalidTransition`] for any transition not listed
    /// in `spec.md` §4.1.
    ///
    /// # Examples
    /// ```
    /// use zencode::Phase;
    /// use zencode_patterns::Prefix;
    /// assert_eq!(Phase::Feature.transition(Prefix::Scenario).unwrap(), Phase::Scenario);
    /// assert!(Phase::Feature.transition(Prefix::When).is_err());
    /// ```
    pub fn transition(self, prefix: Prefix) -> Result<Self, ZenError> {
        let next = match (self, prefix) {
            (Self::Feature | Self::Rule, Prefix::Rule) => Self::Rule,
            (Self::Feature | Self::Rule, Prefix::Scenario) => Self::Scenario,
            (Self::Scenario, Prefix::Given) => Self::Given,
            (Self::Given, Prefix::When) => Self::When,
            (Self::Given | Self::When, Prefix::Then) => Self::Then,
            (Self::Given | Self::When | Self::Then, Prefix::And) => self,
            _ => {
                return Err(ZenError::InvalidTransition {
                    from: self,
                    attempted: prefix.as_str().to_string(),
                });
            }
        };
        Ok(next)
    }

    /// Whether a line parsed while in this phase participates in handler
    /// lookup (`given`/`when`/`then`/`and`) as opposed to being purely
    /// structural (`rule`/`scenario`).
    #[must_use]
    pub const fn is_step_phase(self) -> bool {
        matches!(self, Self::Given | Self::When | Self::Then)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests assert on panics to surface failures directly")]
mod tests {
    use super::*;

    #[test]
    fn walks_the_happy_path() {
        let phase = Phase::Feature;
        let phase = phase.transition(Prefix::Scenario).unwrap();
        assert_eq!(phase, Phase::Scenario);
        let phase = phase.transition(Prefix::Given).unwrap();
        assert_eq!(phase, Phase::Given);
        let phase = phase.transition(Prefix::And).unwrap();
        assert_eq!(phase, Phase::Given);
        let phase = phase.transition(Prefix::When).unwrap();
        assert_eq!(phase, Phase::When);
        let phase = phase.transition(Prefix::Then).unwrap();
        assert_eq!(phase, Phase::Then);
    }

    #[test]
    fn rejects_when_without_given() {
        let err = Phase::Feature.transition(Prefix::When).unwrap_err();
        assert!(matches!(
            err,
            ZenError::InvalidTransition {
                from: Phase::Feature,
                ..
            }
        ));
    }

    #[test]
    fn and_is_illegal_outside_step_phases() {
        assert!(Phase::Feature.transition(Prefix::And).is_err());
        assert!(Phase::Scenario.transition(Prefix::And).is_err());
    }

    #[test]
    fn then_reachable_from_given_or_when() {
        assert_eq!(Phase::Given.transition(Prefix::Then).unwrap(), Phase::Then);
        assert_eq!(Phase::When.transition(Prefix::Then).unwrap(), Phase::Then);
    }
}
