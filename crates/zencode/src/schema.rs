//! The schema registry (`spec.md` §3/§4.4, C2): named validators mapping a
//! decoded `Value` to a canonical value or a failure reason.

use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A pure function from a candidate `Value` to either a canonical `Value` or
/// a human-readable rejection reason.
pub type SchemaFn = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// Named validators, populated by scenario plugins at load time and
/// consulted by the `validate` built-in. Lives for the lifetime of the
/// owning [`crate::Engine`] (`spec.md` §3 calls this "process lifetime";
/// `SPEC_FULL.md` §4 re-homes the registries on the `Engine` rather than a
/// process-global, so here "process lifetime" means "engine lifetime").
#[derive(Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, SchemaFn>,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("names", &self.schemas.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SchemaRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, replacing any previous schema of the same name
    /// (`spec.md` §4.3's silent-replace tie policy applies here too).
    pub fn register(&mut self, name: impl Into<String>, schema: SchemaFn) {
        self.schemas.insert(name.into(), schema);
    }

    /// Looks up a schema by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaFn> {
        self.schemas.get(name)
    }

    /// The registered schema names, for diagnostics.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
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
    use crate::value::Octet;

    #[test]
    fn registers_and_looks_up_a_schema() {
        let mut registry = SchemaRegistry::new();
        registry.register(
            "identity",
            Arc::new(|v: &Value| Ok(v.clone())) as SchemaFn,
        );
        let schema = registry.get("identity").expect("registered");
        let value = Value::Octet(Octet::from_str_bytes("x"));
        assert_eq!(schema(&value).unwrap(), value);
    }

    #[test]
    fn replaces_on_duplicate_registration() {
        let mut registry = SchemaRegistry::new();
        registry.register("s", Arc::new(|_: &Value| Err("first".to_string())) as SchemaFn);
        registry.register("s", Arc::new(|_: &Value| Err("second".to_string())) as SchemaFn);
        let schema = registry.get("s").unwrap();
        assert_eq!(schema(&Value::empty_map()).unwrap_err(), "second");
    }
}
