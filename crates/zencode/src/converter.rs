//! Named converters dispatched by the `convert` built-in (`spec.md` §4.4).

use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A pure function from a `Value` to a converted `Value`, or a rejection
/// reason.
pub type ConverterFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// Named converters, keyed by the `format` argument of `convert`.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, ConverterFn>,
}

impl ConverterRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `format`, replacing any previous converter of the same name.
    pub fn register(&mut self, format: impl Into<String>, converter: ConverterFn) {
        self.converters.insert(format.into(), converter);
    }

    /// Looks up a converter by format name.
    #[must_use]
    pub fn get(&self, format: &str) -> Option<&ConverterFn> {
        self.converters.get(format)
    }
}

/// The `string` converter: requires the value to already be an `Octet` (the
/// only scalar `ZenDSL` has) and returns it unchanged, rejecting anything
/// else. `spec.md` §4.4 only commits to the `"string"` format name; this is
/// the minimal faithful reading given the Octet-as-canonical-scalar data
/// model of `spec.md` §3.
#[must_use]
pub fn string_converter() -> ConverterFn {
    Arc::new(|value: &Value| match value {
        Value::Octet(_) => Ok(value.clone()),
        other => Err(format!("cannot convert {other:?} to string: not an octet")),
    })
}
