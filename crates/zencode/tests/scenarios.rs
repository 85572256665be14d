//! End-to-end coverage of `spec.md` §8's literal scenarios and invariants
//! not already exercised by the unit tests alongside the source.
#![expect(clippy::unwrap_used, clippy::expect_used, reason = "tests assert on panics to surface failures directly")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use zencode::{Engine, Registries, ScenarioLoader, ScenarioPlugin, SchemaRegistry, Value, ZenError};

/// A scenario with no handlers of its own, just enough to satisfy the
/// `Scenario` line every script needs before its first `Given`.
struct NoopPlugin;
impl ScenarioPlugin for NoopPlugin {
    fn name(&self) -> &'static str {
        "noop"
    }
    fn load(&self, _registries: &mut Registries, schemas: &mut SchemaRegistry) {
        schemas.register("identity", Arc::new(|v: &Value| Ok(v.clone())));
    }
}

/// A scenario that additionally registers a schema named `reject`, always
/// failing validation, so `S5` is reachable without a real cryptographic
/// plugin.
struct RejectingSchemaPlugin;
impl ScenarioPlugin for RejectingSchemaPlugin {
    fn name(&self) -> &'static str {
        "rejector"
    }
    fn load(&self, _registries: &mut Registries, schemas: &mut SchemaRegistry) {
        schemas.register("reject", Arc::new(|_: &Value| Err("always rejects".to_string())));
    }
}

/// A scenario that counts how many times `load` actually runs, so a test
/// can tell a skipped reload apart from an idempotent one.
struct CountingPlugin(Arc<AtomicUsize>);
impl ScenarioPlugin for CountingPlugin {
    fn name(&self) -> &'static str {
        "counting"
    }
    fn load(&self, _registries: &mut Registries, _schemas: &mut SchemaRegistry) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}
struct CountingLoader(Arc<AtomicUsize>);
impl ScenarioLoader for CountingLoader {
    fn resolve(&self, name: &str) -> Option<Box<dyn ScenarioPlugin>> {
        (name == "counting").then(|| Box::new(CountingPlugin(Arc::clone(&self.0))) as Box<dyn ScenarioPlugin>)
    }
}

struct TestLoader;
impl ScenarioLoader for TestLoader {
    fn resolve(&self, name: &str) -> Option<Box<dyn ScenarioPlugin>> {
        match name {
            "noop" => Some(Box::new(NoopPlugin) as Box<dyn ScenarioPlugin>),
            "rejector" => Some(Box::new(RejectingSchemaPlugin) as Box<dyn ScenarioPlugin>),
            _ => None,
        }
    }
}

#[test]
fn s4_pick_not_found_fails_execution() {
    let mut engine = Engine::new(Box::new(TestLoader));
    let script = engine.parse("Scenario 'noop'\nGiven I have 'bob_pubkey'\n").unwrap();
    let failure = engine.run(&script, r#"{"alice_pubkey":"abc"}"#, "").unwrap_err();
    assert_eq!(failure.error, ZenError::NotFound("bob_pubkey".to_string()));
}

#[test]
fn s5_schema_failure_emits_no_out() {
    let mut engine = Engine::new(Box::new(TestLoader));
    let script = engine
        .parse("Scenario 'rejector'\nGiven I have 'x'\nAnd validate 'x' as 'reject'\n")
        .unwrap();
    let failure = engine.run(&script, r#"{"x":"anything"}"#, "").unwrap_err();
    assert!(matches!(failure.error, ZenError::SchemaFailed { .. }));
}

#[test]
fn s6_array_of_mappings_data_flattens_and_both_keys_pick() {
    let mut engine = Engine::new(Box::new(TestLoader));
    let script = engine
        .parse(
            "Scenario 'noop'\n\
             Given I have 'a'\n\
             And validate 'a' as 'identity'\n\
             And ack 'a'\n\
             And I have 'b'\n\
             And validate 'b' as 'identity'\n\
             And ack 'b'\n\
             Then print 'a'\n\
             And print 'b'\n",
        )
        .unwrap();
    let out = engine
        .run(&script, r#"[{"a":"1"},{"b":"2"}]"#, "")
        .unwrap()
        .expect("OUT should be non-empty");
    assert_eq!(out, serde_json::json!({"a": "1", "b": "2"}));
}

#[test]
fn invariant_identity_monotonicity_rejects_a_second_distinct_iam() {
    let mut engine = Engine::new(Box::new(TestLoader));
    let script = engine
        .parse("Scenario 'noop'\nGiven I am 'Alice'\nAnd I am 'Bob'\n")
        .unwrap();
    let failure = engine.run(&script, "", "").unwrap_err();
    assert!(matches!(failure.error, ZenError::IdentityError(_)));
}

#[test]
fn invariant_in_does_not_leak_mutations_across_steps() {
    let mut engine = Engine::new(Box::new(TestLoader));
    let script = engine
        .parse(
            "Scenario 'noop'\n\
             Given I have 'a'\n\
             And validate 'a' as 'identity'\n\
             And ack 'a'\n\
             And I have 'a'\n\
             Then print 'a'\n",
        )
        .unwrap();
    let out = engine.run(&script, r#"{"a":"1"}"#, "").unwrap().expect("OUT should be non-empty");
    assert_eq!(out, serde_json::json!({"a": "1"}));
}

#[test]
fn invariant_scenario_loads_exactly_once_per_engine() {
    let loads = Arc::new(AtomicUsize::new(0));
    let mut engine = Engine::new(Box::new(CountingLoader(Arc::clone(&loads))));
    engine.parse("Scenario 'counting'\nGiven I am 'Alice'\n").unwrap();
    let second = engine.parse("Scenario 'counting'\nGiven I am 'Bob'\n");
    assert!(second.is_ok());
    assert_eq!(loads.load(Ordering::SeqCst), 1, "a repeated Scenario line must not reload its plugin");
}

/// Property 6's literal two-line form (`Given I have '<k>'` / `Then print
/// '<k>'`) cannot round-trip on its own: `i have ''` only binds to `pick`,
/// which stops at `TMP` (`builtins.rs`'s `pick`), so `print` would fail
/// `NotFound` without the `validate`/`ack` steps that move the value into
/// `ACK` first. That split follows `spec.md` §4.4's verb contracts, but
/// diverges from the property's literal script; this test exercises the
/// intended round-trip with the steps the verb split actually requires.
#[test]
fn invariant_round_trip_preserves_a_mapping_value() {
    let mut engine = Engine::new(Box::new(TestLoader));
    let script = engine
        .parse("Scenario 'noop'\nGiven I have 'k'\nAnd validate 'k' as 'identity'\nAnd ack 'k'\nThen print 'k'\n")
        .unwrap();
    let out = engine.run(&script, r#"{"k":"v"}"#, "").unwrap().expect("OUT should be non-empty");
    assert_eq!(out, serde_json::json!({"k": "v"}));
}
