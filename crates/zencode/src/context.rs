//! The memory compartments (`spec.md` §3/§5, C7) and the phase-scoped
//! capability views over them.
//!
//! `spec.md` §9 flags the source's ambient `IN/TMP/ACK/OUT` globals for
//! re-architecture into "an explicit `RunContext` value threaded through the
//! executor and handlers; the compartment-access discipline becomes a
//! type-level capability per phase rather than convention." [`Compartments`]
//! is that explicit, owned value; [`GivenView`], [`WhenView`], and
//! [`ThenView`] are the type-level capabilities: a `Given` handler is only
//! ever handed a `GivenView`, so it cannot reach `OUT` even by mistake.

use crate::converter::ConverterRegistry;
use crate::error::ZenError;
use crate::schema::SchemaRegistry;
use crate::value::Value;
use indexmap::IndexMap;

/// The `TMP` compartment: the working area written by `pick`/`pickin` and
/// consumed by `validate`/`ack`.
#[derive(Debug, Default)]
pub struct Tmp {
    /// The value most recently picked or validated.
    pub data: Option<Value>,
    /// The schema name in effect, defaulted by `pick`, overridable by `validate`.
    pub schema: Option<String>,
    /// The section name bound by `pickin`, if any.
    pub root: Option<String>,
    /// The canonical value produced by the last successful `validate`.
    pub valid: Option<Value>,
}

/// The four typed memory regions plus the soft-failure flag, owned by one
/// run of the executor.
#[derive(Debug)]
pub struct Compartments {
    /// `IN`: the decoded `DATA` input, reset before every step.
    pub input: Value,
    /// `IN.KEYS`: the decoded `KEYS` input, reset before every step.
    pub input_keys: Value,
    /// `TMP`: see [`Tmp`].
    pub tmp: Tmp,
    /// `ACK`: accumulates across the whole run; keyed by arbitrary names
    /// (including the reserved `whoami` and `draft` keys used by the
    /// built-ins).
    pub ack: IndexMap<String, Value>,
    /// `OUT`: the final output mapping, emitted once at the end of the run.
    pub out: IndexMap<String, Value>,
    /// The soft-failure flag checked by the executor after every handler.
    pub ok: bool,
}

impl Compartments {
    /// Builds an empty run state with `IN`/`IN.KEYS` already populated.
    #[must_use]
    pub fn new(input: Value, input_keys: Value) -> Self {
        Self {
            input,
            input_keys,
            tmp: Tmp::default(),
            ack: IndexMap::new(),
            out: IndexMap::new(),
            ok: true,
        }
    }

    /// Re-decodes `IN`/`IN.KEYS` for the next step, per `spec.md` §4.5 step 1:
    /// each step is a pure transformation of the immutable inputs plus the
    /// accumulated `ACK`, so mutations must not leak across steps.
    pub fn reset_inputs(&mut self, input: Value, input_keys: Value) {
        self.input = input;
        self.input_keys = input_keys;
    }

    /// Resolves `ACK.whoami`, the identity set by `Iam`.
    #[must_use]
    pub fn whoami(&self) -> Option<&str> {
        match self.ack.get("whoami") {
            Some(Value::Octet(o)) => o.as_str().ok(),
            _ => None,
        }
    }
}

/// The capability handed to a `Given`-phase handler: read `IN`/`IN.KEYS`,
/// read/write `TMP`, read/write `ACK`.
pub struct GivenView<'a> {
    cx: &'a mut Compartments,
    schemas: &'a SchemaRegistry,
    converters: &'a ConverterRegistry,
}

impl<'a> GivenView<'a> {
    /// Wraps `cx` as a `Given` capability, with read-only access to the
    /// engine's schema and converter registries (consulted by `validate`
    /// and `convert`).
    pub fn new(cx: &'a mut Compartments, schemas: &'a SchemaRegistry, converters: &'a ConverterRegistry) -> Self {
        Self {
            cx,
            schemas,
            converters,
        }
    }

    /// The engine's schema registry.
    #[must_use]
    pub fn schemas(&self) -> &SchemaRegistry {
        self.schemas
    }

    /// The engine's converter registry.
    #[must_use]
    pub fn converters(&self) -> &ConverterRegistry {
        self.converters
    }

    /// `IN`.
    #[must_use]
    pub fn input(&self) -> &Value {
        &self.cx.input
    }

    /// `IN.KEYS`.
    #[must_use]
    pub fn input_keys(&self) -> &Value {
        &self.cx.input_keys
    }

    /// `TMP`.
    #[must_use]
    pub fn tmp(&self) -> &Tmp {
        &self.cx.tmp
    }

    /// `TMP`, mutably.
    pub fn tmp_mut(&mut self) -> &mut Tmp {
        &mut self.cx.tmp
    }

    /// `ACK`.
    #[must_use]
    pub fn ack(&self) -> &IndexMap<String, Value> {
        &self.cx.ack
    }

    /// `ACK`, mutably.
    pub fn ack_mut(&mut self) -> &mut IndexMap<String, Value> {
        &mut self.cx.ack
    }

    /// Clears the soft-failure flag and records `reason` for the traceback.
    pub fn fail(&mut self, reason: impl Into<String>) -> ZenError {
        self.cx.ok = false;
        ZenError::TypeError(reason.into())
    }

    /// `ACK.whoami`, if set.
    #[must_use]
    pub fn whoami(&self) -> Option<&str> {
        self.cx.whoami()
    }
}

/// The capability handed to a `When`-phase handler: read/write `ACK` only.
pub struct WhenView<'a> {
    cx: &'a mut Compartments,
}

impl<'a> WhenView<'a> {
    /// Wraps `cx` as a `When` capability.
    pub fn new(cx: &'a mut Compartments) -> Self {
        Self { cx }
    }

    /// `ACK`.
    #[must_use]
    pub fn ack(&self) -> &IndexMap<String, Value> {
        &self.cx.ack
    }

    /// `ACK`, mutably.
    pub fn ack_mut(&mut self) -> &mut IndexMap<String, Value> {
        &mut self.cx.ack
    }

    /// `ACK.whoami`, if set.
    #[must_use]
    pub fn whoami(&self) -> Option<&str> {
        self.cx.whoami()
    }
}

/// The capability handed to a `Then`-phase handler: read `ACK`, write `OUT`.
pub struct ThenView<'a> {
    cx: &'a mut Compartments,
}

impl<'a> ThenView<'a> {
    /// Wraps `cx` as a `Then` capability.
    pub fn new(cx: &'a mut Compartments) -> Self {
        Self { cx }
    }

    /// `ACK`.
    #[must_use]
    pub fn ack(&self) -> &IndexMap<String, Value> {
        &self.cx.ack
    }

    /// `OUT`, mutably.
    pub fn out_mut(&mut self) -> &mut IndexMap<String, Value> {
        &mut self.cx.out
    }

    /// `ACK.whoami`, if set.
    #[must_use]
    pub fn whoami(&self) -> Option<&str> {
        self.cx.whoami()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whoami_reads_back_a_set_identity() {
        let mut cx = Compartments::new(Value::empty_map(), Value::empty_map());
        cx.ack
            .insert("whoami".to_string(), Value::Octet(crate::Octet::from_str_bytes("Alice")));
        assert_eq!(cx.whoami(), Some("Alice"));
    }

    #[test]
    fn given_view_exposes_tmp_and_ack() {
        let mut cx = Compartments::new(Value::empty_map(), Value::empty_map());
        let schemas = SchemaRegistry::new();
        let converters = ConverterRegistry::new();
        let mut view = GivenView::new(&mut cx, &schemas, &converters);
        view.tmp_mut().schema = Some("eddsa_public_key".to_string());
        view.ack_mut().insert("x".to_string(), Value::empty_map());
        assert_eq!(view.tmp().schema.as_deref(), Some("eddsa_public_key"));
        assert!(view.ack().contains_key("x"));
    }
}
