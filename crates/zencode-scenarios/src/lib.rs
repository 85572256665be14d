//! Built-in `ZenDSL` scenario plugins.
//!
//! Each module here is a thin wrapper around a real cryptographic crate
//! (`ed25519-dalek`, `sha2`), registered as a [`zencode::ScenarioPlugin`]
//! under the fixed `zencode_<name>` naming convention `spec.md` §4.3
//! describes. [`BuiltinScenarioLoader`] resolves the scenario names shipped
//! here; a host embedding `zencode` is free to implement its own
//! [`zencode::ScenarioLoader`] instead.

mod eddsa;
mod hash;

use zencode::{ScenarioLoader, ScenarioPlugin};

/// Resolves the scenario names this crate ships: `eddsa` and `hash`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinScenarioLoader;

impl ScenarioLoader for BuiltinScenarioLoader {
    fn resolve(&self, name: &str) -> Option<Box<dyn ScenarioPlugin>> {
        match name {
            "eddsa" => Some(Box::new(eddsa::EddsaPlugin)),
            "hash" => Some(Box::new(hash::HashPlugin)),
            _ => None,
        }
    }
}
