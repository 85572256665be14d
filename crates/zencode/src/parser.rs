//! The line parser / matcher (`spec.md` §4.2, C6), driving the phase state
//! machine (C5) and the scenario loader (C4).

use crate::ast::AstNode;
use crate::error::ZenError;
use crate::phase::Phase;
use crate::registry::{Registries, ScenarioLoader};
use crate::schema::SchemaRegistry;
use zencode_patterns::{candidate_pattern, extract_quoted_args, split_prefix, Prefix};

/// Scripts shorter than this are rejected outright (`spec.md` §6).
const MINIMUM_SCRIPT_BYTES: usize = 9;

/// The ordered, bound sequence of steps produced by parsing.
pub struct Script {
    /// The bound AST, in ascending `id` order (source order).
    pub ast: Vec<AstNode>,
}

impl std::fmt::Debug for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Script").field("steps", &self.ast.len()).finish()
    }
}

/// Parses `src`, loading any declared scenarios into `registries`/`schemas`
/// and binding every `given`/`when`/`then`/`and` line to a handler.
///
/// # Errors
/// Returns [`ZenError::InvalidStatement`], [`ZenError::InvalidTransition`],
/// [`ZenError::UnknownStep`], or [`ZenError::ScenarioLoadFailure`] per
/// `spec.md` §4.1/§4.2/§4.3.
pub fn parse(
    src: &str,
    loader: &dyn ScenarioLoader,
    registries: &mut Registries,
    schemas: &mut SchemaRegistry,
) -> Result<Script, ZenError> {
    if src.len() < MINIMUM_SCRIPT_BYTES {
        return Err(ZenError::InvalidStatement(format!(
            "script is {} bytes, shorter than the {MINIMUM_SCRIPT_BYTES}-byte minimum",
            src.len()
        )));
    }

    let mut phase = Phase::Feature;
    let mut counter: u64 = 0;
    let mut ast = Vec::new();

    for raw_line in src.lines() {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (prefix, rest) = split_prefix(trimmed).map_err(|e| ZenError::InvalidStatement(e.to_string()))?;
        phase = phase.transition(prefix)?;
        log::debug!("line '{trimmed}' transitioned phase to {phase}");

        if prefix == Prefix::Scenario {
            let args = extract_quoted_args(trimmed)?;
            let name = args.first().ok_or_else(|| {
                ZenError::InvalidStatement("Scenario line requires a quoted name".to_string())
            })?;
            if registries.mark_scenario_loaded(name) {
                let plugin = loader
                    .resolve(name)
                    .ok_or_else(|| ZenError::ScenarioLoadFailure(name.clone()))?;
                plugin.load(registries, schemas);
                log::debug!("loaded scenario '{name}'");
            }
            continue;
        }

        if !phase.is_step_phase() {
            // `Rule` lines are purely structural; nothing to bind.
            continue;
        }

        let pattern = candidate_pattern(rest)?;
        let args = extract_quoted_args(trimmed)?;
        let handler = match phase {
            Phase::Given => registries.lookup_given(&pattern),
            Phase::When => registries.lookup_when(&pattern),
            Phase::Then => registries.lookup_then(&pattern),
            _ => unreachable!("is_step_phase guarantees Given/When/Then"),
        };
        let Some(handler) = handler else {
            log::trace!(
                "no match for candidate pattern '{pattern}' against {:?}",
                registries.patterns_for(phase)
            );
            return Err(ZenError::UnknownStep(trimmed.to_string()));
        };

        counter += 1;
        ast.push(AstNode {
            id: counter,
            source: trimmed.to_string(),
            args,
            handler,
            phase,
        });
    }

    Ok(Script { ast })
}
