//! The handler registry (`spec.md` §4.3, C3) and the scenario loading
//! contract (`spec.md` §4.3/§6, C4).

use crate::context::{GivenView, ThenView, WhenView};
use crate::converter::ConverterRegistry;
use crate::error::ZenError;
use crate::schema::SchemaRegistry;
use std::collections::HashMap;
use std::sync::Arc;

/// A `Given`-phase handler: takes its capability view and its ordered
/// quoted arguments.
pub type GivenHandler = Arc<dyn Fn(&mut GivenView<'_>, &[String]) -> Result<(), ZenError> + Send + Sync>;
/// A `When`-phase handler.
pub type WhenHandler = Arc<dyn Fn(&mut WhenView<'_>, &[String]) -> Result<(), ZenError> + Send + Sync>;
/// A `Then`-phase handler.
pub type ThenHandler = Arc<dyn Fn(&mut ThenView<'_>, &[String]) -> Result<(), ZenError> + Send + Sync>;

/// A handler bound into the AST, tagged by the phase capability it expects.
#[derive(Clone)]
pub enum BoundHandler {
    /// A `Given`-phase handler.
    Given(GivenHandler),
    /// A `When`-phase handler.
    When(WhenHandler),
    /// A `Then`-phase handler.
    Then(ThenHandler),
}

/// Three phase-keyed dictionaries mapping pattern string to handler.
///
/// Built fresh per [`crate::Engine`] rather than as a process-global
/// `static`/`inventory` collector: `ZenDSL` registers handlers at *parse*
/// time (via scenario loading), not at Rust-compile time, so the
/// teacher's compile-time step discovery does not fit here (`SPEC_FULL.md`
/// §4).
#[derive(Default)]
pub struct Registries {
    given: HashMap<String, GivenHandler>,
    when: HashMap<String, WhenHandler>,
    then: HashMap<String, ThenHandler>,
    /// The `convert` built-in's named converters.
    pub converters: ConverterRegistry,
    /// Scenario names already loaded on this engine (`spec.md` §4.3: "loads
    /// it exactly once per process"). Persists across `parse` calls so a
    /// second script naming an already-loaded scenario does not re-invoke
    /// `ScenarioPlugin::load`.
    loaded_scenarios: std::collections::HashSet<String>,
}

impl Registries {
    /// An empty set of registries, with no built-ins.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a `Given` handler under `pattern`, replacing any previous
    /// handler for the same pattern (`spec.md` §4.2 step 7's tie policy).
    pub fn register_given(&mut self, pattern: impl Into<String>, handler: GivenHandler) {
        self.given.insert(pattern.into(), handler);
    }

    /// Registers a `When` handler under `pattern`.
    pub fn register_when(&mut self, pattern: impl Into<String>, handler: WhenHandler) {
        self.when.insert(pattern.into(), handler);
    }

    /// Registers a `Then` handler under `pattern`.
    pub fn register_then(&mut self, pattern: impl Into<String>, handler: ThenHandler) {
        self.then.insert(pattern.into(), handler);
    }

    /// Looks up a handler for `pattern` in the `Given` registry.
    #[must_use]
    pub fn lookup_given(&self, pattern: &str) -> Option<BoundHandler> {
        self.given.get(pattern).cloned().map(BoundHandler::Given)
    }

    /// Looks up a handler for `pattern` in the `When` registry.
    #[must_use]
    pub fn lookup_when(&self, pattern: &str) -> Option<BoundHandler> {
        self.when.get(pattern).cloned().map(BoundHandler::When)
    }

    /// Looks up a handler for `pattern` in the `Then` registry.
    #[must_use]
    pub fn lookup_then(&self, pattern: &str) -> Option<BoundHandler> {
        self.then.get(pattern).cloned().map(BoundHandler::Then)
    }

    /// Marks `name` as loaded, returning `true` the first time (the caller
    /// should then run the plugin's `load`) and `false` on every
    /// subsequent call for the same name.
    pub fn mark_scenario_loaded(&mut self, name: &str) -> bool {
        if self.loaded_scenarios.contains(name) {
            false
        } else {
            self.loaded_scenarios.insert(name.to_string());
            true
        }
    }

    /// The registered pattern keys for a phase's registry, for diagnostics
    /// (`trace!`-level logging of near-misses).
    #[must_use]
    pub fn patterns_for(&self, phase: crate::Phase) -> Vec<&str> {
        match phase {
            crate::Phase::Given => self.given.keys().map(String::as_str).collect(),
            crate::Phase::When => self.when.keys().map(String::as_str).collect(),
            crate::Phase::Then => self.then.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// A named bundle of handler/schema registrations loaded when a script
/// declares `Scenario '<name>'`.
pub trait ScenarioPlugin {
    /// The name this plugin is resolved by (the quoted literal on the
    /// `Scenario` line).
    fn name(&self) -> &'static str;

    /// Registers this plugin's handlers and schemas.
    fn load(&self, registries: &mut Registries, schemas: &mut SchemaRegistry);
}

/// Resolves a scenario name to the plugin that implements it
/// (`spec.md` §9, "Plugin loading via module name convention" →
/// `ScenarioLoader` trait + built-in resolver).
pub trait ScenarioLoader {
    /// Returns the plugin for `name`, or `None` if unrecognised.
    fn resolve(&self, name: &str) -> Option<Box<dyn ScenarioPlugin>>;
}

/// A [`ScenarioLoader`] with no scenarios registered; every `Scenario` line
/// fails with [`ZenError::ScenarioLoadFailure`].
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyScenarioLoader;

impl ScenarioLoader for EmptyScenarioLoader {
    fn resolve(&self, _name: &str) -> Option<Box<dyn ScenarioPlugin>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_replaces_silently() {
        let mut registries = Registries::new();
        let a: GivenHandler = Arc::new(|_, _| Ok(()));
        let b: GivenHandler = Arc::new(|_, _| Err(ZenError::TypeError("b".to_string())));
        registries.register_given("i do ''", a);
        registries.register_given("i do ''", b);
        assert!(registries.lookup_given("i do ''").is_some());
        assert_eq!(registries.given.len(), 1);
    }

    #[test]
    fn empty_loader_resolves_nothing() {
        assert!(EmptyScenarioLoader.resolve("eddsa").is_none());
    }
}
