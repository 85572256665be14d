//! The executor (`spec.md` §4.5, C8): iterates the bound AST, resets `IN`
//! per step, invokes each handler, and manages the traceback on failure.

use crate::context::{Compartments, GivenView, ThenView, WhenView};
use crate::converter::ConverterRegistry;
use crate::error::ZenError;
use crate::parser::Script;
use crate::registry::BoundHandler;
use crate::schema::SchemaRegistry;
use crate::traceback::Traceback;
use crate::value::Value;
use std::panic::{self, AssertUnwindSafe};

/// A failed run: the terminating error, the rendered human traceback, and a
/// machine-readable JSON dump of the same diagnostics.
#[derive(Debug)]
pub struct RunFailure {
    /// The error that aborted the run.
    pub error: ZenError,
    /// The rendered traceback (`spec.md` §4.6), suitable for standard error.
    pub report: String,
    /// The JSON-formatted debug dump (`spec.md` §4.6) for machine consumers.
    pub debug: serde_json::Value,
}

impl std::fmt::Display for RunFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.report)
    }
}

impl std::error::Error for RunFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Runs `script` to completion against the decoded `DATA`/`KEYS` documents,
/// sorting the AST by `id` first (`spec.md` §4.5 pre-run step; already
/// source order by construction, sorted again defensively).
///
/// Returns the final `OUT` as JSON (`None` if `OUT` stayed empty), or a
/// [`RunFailure`] carrying the rendered traceback.
pub fn run(
    script: &Script,
    schemas: &SchemaRegistry,
    converters: &ConverterRegistry,
    data_json: &str,
    keys_json: &str,
) -> Result<Option<serde_json::Value>, RunFailure> {
    let mut ast = script.ast.clone();
    ast.sort_by_key(|node| node.id);

    let input = Value::decode_data(data_json).map_err(bare_failure)?;
    let input_keys = Value::decode_keys(keys_json).map_err(bare_failure)?;

    let mut cx = Compartments::new(input.clone(), input_keys.clone());
    let mut traceback = Traceback::new();

    for node in &ast {
        cx.reset_inputs(input.clone(), input_keys.clone());
        traceback.trace(&node.source);
        cx.ok = true;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            invoke(&node.handler, &mut cx, &node.args, schemas, converters)
        }));

        let result = match outcome {
            Ok(result) => result,
            Err(payload) => Err(ZenError::HandlerPanicked(crate::panic::panic_message(payload.as_ref()))),
        };

        if let Err(err) = result {
            traceback.fail(err.to_string());
            let debug = traceback.debug_json(&cx, schemas);
            let report = traceback.render_failure(&cx, schemas);
            return Err(RunFailure {
                error: err,
                report,
                debug,
            });
        }

        if !cx.ok {
            let err = ZenError::TypeError("assertion failed".to_string());
            traceback.fail(err.to_string());
            let debug = traceback.debug_json(&cx, schemas);
            let report = traceback.render_failure(&cx, schemas);
            return Err(RunFailure {
                error: err,
                report,
                debug,
            });
        }
    }

    if cx.out.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Value::Map(cx.out).to_json()))
    }
}

fn bare_failure(error: ZenError) -> RunFailure {
    let schemas = SchemaRegistry::new();
    let cx = Compartments::new(Value::empty_map(), Value::empty_map());
    let mut traceback = Traceback::new();
    traceback.fail(error.to_string());
    let debug = traceback.debug_json(&cx, &schemas);
    let report = traceback.render_failure(&cx, &schemas);
    RunFailure {
        error,
        report,
        debug,
    }
}

fn invoke(
    handler: &BoundHandler,
    cx: &mut Compartments,
    args: &[String],
    schemas: &SchemaRegistry,
    converters: &ConverterRegistry,
) -> Result<(), ZenError> {
    match handler {
        BoundHandler::Given(f) => {
            let mut view = GivenView::new(cx, schemas, converters);
            f(&mut view, args)
        }
        BoundHandler::When(f) => {
            let mut view = WhenView::new(cx);
            f(&mut view, args)
        }
        BoundHandler::Then(f) => {
            let mut view = ThenView::new(cx);
            f(&mut view, args)
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests assert on panics to surface failures directly"
)]
mod tests {
    use super::*;
    use crate::registry::{EmptyScenarioLoader, Registries};

    fn eddsa_keypair_handler() -> crate::registry::WhenHandler {
        std::sync::Arc::new(|view: &mut WhenView<'_>, _args: &[String]| {
            let whoami = view.whoami().unwrap_or_default().to_string();
            let mut inner = indexmap::IndexMap::new();
            inner.insert(
                "eddsa".to_string(),
                Value::Octet(crate::value::Octet::from_str_bytes("base58pubkey")),
            );
            let mut slot = indexmap::IndexMap::new();
            slot.insert("keyring".to_string(), Value::Map(inner));
            view.ack_mut().insert(whoami, Value::Map(slot));
            Ok(())
        })
    }

    struct KeypairPlugin;
    impl crate::registry::ScenarioPlugin for KeypairPlugin {
        fn name(&self) -> &'static str {
            "keypair"
        }
        fn load(&self, registries: &mut Registries, _schemas: &mut SchemaRegistry) {
            registries.register_when("i create the keypair", eddsa_keypair_handler());
        }
    }
    struct KeypairLoader;
    impl crate::registry::ScenarioLoader for KeypairLoader {
        fn resolve(&self, name: &str) -> Option<Box<dyn crate::registry::ScenarioPlugin>> {
            (name == "keypair").then_some(Box::new(KeypairPlugin) as Box<dyn crate::registry::ScenarioPlugin>)
        }
    }

    #[test]
    fn happy_path_eddsa_style_script_emits_out() {
        let mut registries = Registries::with_builtins();
        let mut schemas = SchemaRegistry::new();
        let script = crate::parser::parse(
            "Scenario 'keypair'\nGiven I am 'Alice'\nWhen I create the keypair\nThen print my 'keyring'\n",
            &KeypairLoader,
            &mut registries,
            &mut schemas,
        )
        .unwrap();
        let converters = ConverterRegistry::new();
        let out = run(&script, &schemas, &converters, "", "").unwrap();
        let out = out.expect("OUT should be non-empty");
        assert_eq!(
            out.pointer("/Alice/keyring/eddsa").and_then(|v| v.as_str()),
            Some("base58pubkey")
        );
    }

    #[test]
    fn invalid_transition_is_rejected_before_any_run() {
        let err = crate::parser::parse(
            "When I sign 'msg'\n",
            &EmptyScenarioLoader,
            &mut Registries::with_builtins(),
            &mut SchemaRegistry::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ZenError::InvalidTransition { .. }));
    }

    #[test]
    fn pick_not_found_fails_at_run_time() {
        let mut registries = Registries::with_builtins();
        let mut schemas = SchemaRegistry::new();
        let script = crate::parser::parse(
            "Scenario 'keypair'\nGiven I have 'bob_pubkey'\n",
            &KeypairLoader,
            &mut registries,
            &mut schemas,
        )
        .unwrap();
        let converters = ConverterRegistry::new();
        let failure = run(&script, &schemas, &converters, r#"{"alice_pubkey":"abc"}"#, "").unwrap_err();
        assert_eq!(failure.error, ZenError::NotFound("bob_pubkey".to_string()));
        let trace = failure.debug.pointer("/trace").and_then(serde_json::Value::as_array).expect("trace array");
        assert!(!trace.is_empty(), "debug dump must retain the trace, not just the rendered report");
    }
}
