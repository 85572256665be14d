//! The public two-stage entry point: parse once, run as many times as
//! needed against different `DATA`/`KEYS` pairs.

use crate::converter::ConverterRegistry;
use crate::error::ZenError;
use crate::executor::{self, RunFailure};
use crate::parser::{self, Script};
use crate::registry::{EmptyScenarioLoader, Registries, ScenarioLoader};
use crate::schema::SchemaRegistry;

/// Owns the handler and schema registries a script's `Scenario` lines
/// populate, and the [`ScenarioLoader`] used to resolve them.
///
/// `spec.md` §3 describes the schema registry as having "process lifetime";
/// since registries here live on the `Engine` rather than a process-global
/// (`SPEC_FULL.md` §4), that lifetime maps onto the `Engine`'s: scenarios
/// loaded by one `parse` call remain registered for every later `parse`
/// (and `run`) against the same `Engine`, so the idempotent-load invariant
/// (`spec.md` §8, property 7) holds per-`Engine`, not process-wide.
pub struct Engine {
    registries: Registries,
    schemas: SchemaRegistry,
    loader: Box<dyn ScenarioLoader>,
}

impl Engine {
    /// Builds an `Engine` with the C10 built-ins pre-registered and no
    /// scenarios loaded yet.
    #[must_use]
    pub fn new(loader: Box<dyn ScenarioLoader>) -> Self {
        Self {
            registries: Registries::with_builtins(),
            schemas: SchemaRegistry::new(),
            loader,
        }
    }

    /// An `Engine` whose `Scenario` lines can never resolve; useful for
    /// exercising the built-ins in isolation.
    #[must_use]
    pub fn without_scenarios() -> Self {
        Self::new(Box::new(EmptyScenarioLoader))
    }

    /// Parses `src`, loading any declared scenarios and binding every
    /// `given`/`when`/`then`/`and` line to a handler.
    ///
    /// # Errors
    /// See [`parser::parse`].
    pub fn parse(&mut self, src: &str) -> Result<Script, ZenError> {
        parser::parse(
            src,
            self.loader.as_ref(),
            &mut self.registries,
            &mut self.schemas,
        )
    }

    /// Runs a previously parsed `script` against `DATA`/`KEYS` JSON
    /// documents.
    ///
    /// # Errors
    /// Returns [`RunFailure`] on any execution failure, with the rendered
    /// traceback attached.
    pub fn run(
        &self,
        script: &Script,
        data_json: &str,
        keys_json: &str,
    ) -> Result<Option<serde_json::Value>, RunFailure> {
        executor::run(
            script,
            &self.schemas,
            self.converters(),
            data_json,
            keys_json,
        )
    }

    /// The converter registry backing `convert`. Currently engine-wide and
    /// populated only by the built-ins (`spec.md` §4.4 names no converter
    /// other than `"string"`); exposed so scenario plugins can extend it.
    fn converters(&self) -> &ConverterRegistry {
        &self.registries.converters
    }

    /// Mutable access to the converter registry, for scenario plugins that
    /// want to register additional `convert` formats.
    pub fn converters_mut(&mut self) -> &mut ConverterRegistry {
        &mut self.registries.converters
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests assert on panics to surface failures directly")]
mod tests {
    use super::*;

    #[test]
    fn parse_then_run_round_trips_a_value() {
        let mut engine = Engine::without_scenarios();
        let err = engine.parse("Given I am 'Alice'\n").unwrap_err();
        assert!(matches!(err, ZenError::InvalidTransition { .. }));
    }
}
