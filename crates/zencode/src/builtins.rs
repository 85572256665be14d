//! The built-in `Given`/`Then` memory-movement verbs (`spec.md` §4.4, C10)
//! every scenario depends on. Always registered, regardless of which
//! scenario is loaded.

use crate::context::{GivenView, ThenView};
use crate::converter::string_converter;
use crate::error::ZenError;
use crate::registry::Registries;
use crate::value::{Octet, Value};

fn require_one<'a>(args: &'a [String], verb: &str) -> Result<&'a String, ZenError> {
    args.first()
        .ok_or_else(|| ZenError::TypeError(format!("{verb} requires an argument")))
}

/// `Iam(name)` / `Iam()` (`spec.md` §4.4): sets `ACK.whoami` once, or, called
/// with no argument, asserts that identity is already set.
fn iam(view: &mut GivenView<'_>, args: &[String]) -> Result<(), ZenError> {
    match args.first() {
        None => {
            if view.whoami().is_none() {
                return Err(ZenError::IdentityError("identity is not set".to_string()));
            }
            Ok(())
        }
        Some(name) => {
            if let Some(existing) = view.whoami() {
                if existing == name {
                    return Ok(());
                }
                return Err(ZenError::IdentityError(format!(
                    "identity already set to '{existing}', cannot set to '{name}'"
                )));
            }
            view.ack_mut()
                .insert("whoami".to_string(), Value::Octet(Octet::from_str_bytes(name)));
            Ok(())
        }
    }
}

/// `pick(what, obj?)` (`spec.md` §4.4).
fn pick(view: &mut GivenView<'_>, args: &[String]) -> Result<(), ZenError> {
    let what = require_one(args, "pick")?.clone();
    let data = if let Some(obj) = args.get(1) {
        Value::Octet(Octet::from_str_bytes(obj))
    } else {
        view.input_keys()
            .one_deep_lookup(&what)
            .or_else(|| view.input().one_deep_lookup(&what))
            .cloned()
            .ok_or_else(|| ZenError::NotFound(what.clone()))?
    };
    let tmp = view.tmp_mut();
    tmp.data = Some(data);
    tmp.schema = Some(what);
    tmp.root = None;
    Ok(())
}

/// `pickin(section, what)` (`spec.md` §4.4).
fn pickin(view: &mut GivenView<'_>, args: &[String]) -> Result<(), ZenError> {
    let what = require_one(args, "pickin")?.clone();
    let section = args
        .get(1)
        .ok_or_else(|| ZenError::TypeError("pickin requires a section argument".to_string()))?
        .clone();
    let container = view
        .input_keys()
        .one_deep_lookup(&section)
        .or_else(|| view.input().one_deep_lookup(&section))
        .ok_or_else(|| ZenError::NotFound(section.clone()))?;
    let data = container
        .one_deep_lookup(&what)
        .cloned()
        .ok_or_else(|| ZenError::NotFound(what.clone()))?;
    let tmp = view.tmp_mut();
    tmp.data = Some(data);
    tmp.schema = Some(what);
    tmp.root = Some(section);
    Ok(())
}

/// `validate(name, schema?)` (`spec.md` §4.4).
fn validate(view: &mut GivenView<'_>, args: &[String]) -> Result<(), ZenError> {
    let name = require_one(args, "validate")?.clone();
    let schema_name = args
        .get(1)
        .cloned()
        .or_else(|| view.tmp().schema.clone())
        .unwrap_or_else(|| name.clone());
    let schema = view
        .schemas()
        .get(&schema_name)
        .cloned()
        .ok_or_else(|| ZenError::SchemaNotFound(schema_name.clone()))?;
    let data = view
        .tmp()
        .data
        .clone()
        .ok_or_else(|| ZenError::TypeError("validate requires a preceding pick/pickin".to_string()))?;
    let validated = schema(&data).map_err(|reason| ZenError::SchemaFailed {
        name: schema_name,
        reason,
    })?;
    view.tmp_mut().valid = Some(validated);
    Ok(())
}

/// Merges `value` into an existing `ACK[name]` slot, implementing the
/// scalar/array promotion and the mapping-conflict policy decided in
/// `DESIGN.md` for `spec.md` §9's open question on `ack`'s mapping branch.
fn merge_ack(existing: Option<Value>, value: Value) -> Result<Value, ZenError> {
    match existing {
        None => Ok(value),
        Some(Value::Seq(mut items)) => {
            items.push(value);
            Ok(Value::Seq(items))
        }
        Some(Value::Map(_)) => Err(ZenError::TypeError(
            "cannot ack into a name whose existing value is a mapping".to_string(),
        )),
        Some(scalar) => Ok(Value::Seq(vec![scalar, value])),
    }
}

/// `ack(name)` (`spec.md` §4.4).
fn ack(view: &mut GivenView<'_>, args: &[String]) -> Result<(), ZenError> {
    let name = require_one(args, "ack")?.clone();
    let value = view
        .tmp()
        .valid
        .clone()
        .ok_or_else(|| ZenError::TypeError("ack requires a preceding validate".to_string()))?;
    let existing = view.ack().get(&name).cloned();
    let merged = merge_ack(existing, value)?;
    view.ack_mut().insert(name, merged);
    view.tmp_mut().valid = None;
    Ok(())
}

/// `ackmy(name, object?)` (`spec.md` §4.4).
fn ackmy(view: &mut GivenView<'_>, args: &[String]) -> Result<(), ZenError> {
    let name = require_one(args, "ackmy")?.clone();
    let whoami = view
        .whoami()
        .ok_or_else(|| ZenError::IdentityError("ackmy requires identity to be set".to_string()))?
        .to_string();
    let value = if let Some(object) = args.get(1) {
        Value::Octet(Octet::from_str_bytes(object))
    } else {
        let value = view
            .tmp()
            .valid
            .clone()
            .ok_or_else(|| ZenError::TypeError("ackmy requires a preceding validate".to_string()))?;
        view.tmp_mut().valid = None;
        value
    };
    let slot = view
        .ack_mut()
        .entry(whoami)
        .or_insert_with(Value::empty_map);
    let Value::Map(map) = slot else {
        return Err(ZenError::TypeError(format!(
            "ACK[{}] is not a mapping",
            view.whoami().unwrap_or_default()
        )));
    };
    let existing = map.shift_remove(&name);
    let merged = merge_ack(existing, value)?;
    map.insert(name, merged);
    Ok(())
}

/// `draft(s)` (`spec.md` §4.4).
fn draft(view: &mut GivenView<'_>, args: &[String]) -> Result<(), ZenError> {
    let s = require_one(args, "draft")?;
    let slot = view
        .ack_mut()
        .entry("draft".to_string())
        .or_insert_with(|| Value::Octet(Octet::default()));
    let Value::Octet(octet) = slot else {
        return Err(ZenError::TypeError("ACK.draft is not an octet".to_string()));
    };
    let mut bytes = octet.as_bytes().to_vec();
    bytes.extend_from_slice(s.as_bytes());
    *octet = Octet::new(bytes);
    Ok(())
}

/// `convert(object, format)` (`spec.md` §4.4).
fn convert(view: &mut GivenView<'_>, args: &[String]) -> Result<(), ZenError> {
    let object = require_one(args, "convert")?.clone();
    let format = args
        .get(1)
        .ok_or_else(|| ZenError::TypeError("convert requires a format argument".to_string()))?
        .clone();
    let source = view
        .input_keys()
        .one_deep_lookup(&object)
        .or_else(|| view.input().one_deep_lookup(&object))
        .or_else(|| view.ack().get(&object))
        .cloned()
        .ok_or_else(|| ZenError::NotFound(object.clone()))?;
    let format_fn = view
        .converters()
        .get(&format)
        .cloned()
        .ok_or_else(|| ZenError::TypeError(format!("no converter registered for format '{format}'")))?;
    let converted = format_fn(&source).map_err(ZenError::TypeError)?;
    let tmp = view.tmp_mut();
    tmp.data = Some(converted);
    tmp.schema = Some(object);
    tmp.root = None;
    Ok(())
}

/// `out(name)` (`spec.md` §4.4): moves `ACK[name]` into `OUT[name]`.
fn out(view: &mut ThenView<'_>, args: &[String]) -> Result<(), ZenError> {
    let name = require_one(args, "out")?.clone();
    let value = view
        .ack()
        .get(&name)
        .cloned()
        .ok_or_else(|| ZenError::NotFound(name.clone()))?;
    view.out_mut().insert(name, value);
    Ok(())
}

/// `outmy(name)` (`spec.md` §4.4): moves `ACK[whoami][name]` into
/// `OUT[whoami][name]`.
fn outmy(view: &mut ThenView<'_>, args: &[String]) -> Result<(), ZenError> {
    let name = require_one(args, "outmy")?.clone();
    let whoami = view
        .whoami()
        .ok_or_else(|| ZenError::IdentityError("outmy requires identity to be set".to_string()))?
        .to_string();
    let value = view
        .ack()
        .get(&whoami)
        .and_then(Value::as_map)
        .and_then(|m| m.get(&name))
        .cloned()
        .ok_or_else(|| ZenError::NotFound(format!("{whoami}.{name}")))?;
    let slot = view
        .out_mut()
        .entry(whoami)
        .or_insert_with(Value::empty_map);
    let Value::Map(map) = slot else {
        return Err(ZenError::TypeError("OUT[whoami] is not a mapping".to_string()));
    };
    map.insert(name, value);
    Ok(())
}

impl Registries {
    /// Builds the registries with the C10 built-ins pre-registered. Every
    /// [`crate::Engine`] starts from this, independent of which scenarios
    /// are later loaded.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registries = Self::new();

        registries.register_given("i am ''", std::sync::Arc::new(iam));
        registries.register_given("i am", std::sync::Arc::new(iam));
        registries.register_given("i have ''", std::sync::Arc::new(pick));
        registries.register_given("i have '' as ''", std::sync::Arc::new(pick));
        registries.register_given(
            "i have '' from ''",
            std::sync::Arc::new(pickin),
        );
        registries.register_given("validate ''", std::sync::Arc::new(validate));
        registries.register_given("validate '' as ''", std::sync::Arc::new(validate));
        registries.register_given("ack ''", std::sync::Arc::new(ack));
        registries.register_given("ack my ''", std::sync::Arc::new(ackmy));
        registries.register_given("ack my '' as ''", std::sync::Arc::new(ackmy));
        registries.register_given("draft ''", std::sync::Arc::new(draft));
        registries.register_given("convert '' to ''", std::sync::Arc::new(convert));
        registries.register_then("print ''", std::sync::Arc::new(out));
        registries.register_then("print my ''", std::sync::Arc::new(outmy));
        registries
            .converters
            .register("string", string_converter());

        registries
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests assert on panics to surface failures directly")]
mod tests {
    use super::*;
    use crate::context::Compartments;
    use crate::converter::ConverterRegistry;
    use crate::schema::SchemaRegistry;

    macro_rules! given_view {
        ($view:ident, $cx:expr) => {
            let mut cx = $cx;
            let schemas = SchemaRegistry::new();
            let converters = ConverterRegistry::new();
            let mut $view = GivenView::new(&mut cx, &schemas, &converters);
        };
    }

    #[test]
    fn iam_sets_identity_once() {
        given_view!(view, Compartments::new(Value::empty_map(), Value::empty_map()));
        iam(&mut view, &["Alice".to_string()]).unwrap();
        assert_eq!(view.whoami(), Some("Alice"));
        let err = iam(&mut view, &["Bob".to_string()]).unwrap_err();
        assert!(matches!(err, ZenError::IdentityError(_)));
    }

    #[test]
    fn pick_finds_top_level_key() {
        let input = Value::decode_data(r#"{"alice_pubkey":"abc"}"#).unwrap();
        given_view!(view, Compartments::new(input, Value::empty_map()));
        pick(&mut view, &["alice_pubkey".to_string()]).unwrap();
        assert!(view.tmp().data.is_some());
        assert_eq!(view.tmp().schema.as_deref(), Some("alice_pubkey"));
    }

    #[test]
    fn pick_fails_not_found() {
        let input = Value::decode_data(r#"{"alice_pubkey":"abc"}"#).unwrap();
        given_view!(view, Compartments::new(input, Value::empty_map()));
        let err = pick(&mut view, &["bob_pubkey".to_string()]).unwrap_err();
        assert_eq!(err, ZenError::NotFound("bob_pubkey".to_string()));
    }

    #[test]
    fn ack_promotes_scalar_to_array_on_repeat() {
        given_view!(view, Compartments::new(Value::empty_map(), Value::empty_map()));
        view.tmp_mut().valid = Some(Value::Octet(Octet::from_str_bytes("one")));
        ack(&mut view, &["x".to_string()]).unwrap();
        view.tmp_mut().valid = Some(Value::Octet(Octet::from_str_bytes("two")));
        ack(&mut view, &["x".to_string()]).unwrap();
        assert_eq!(
            view.ack().get("x"),
            Some(&Value::Seq(vec![
                Value::Octet(Octet::from_str_bytes("one")),
                Value::Octet(Octet::from_str_bytes("two")),
            ]))
        );
    }

    #[test]
    fn ack_rejects_repeat_into_a_mapping() {
        given_view!(view, Compartments::new(Value::empty_map(), Value::empty_map()));
        view.ack_mut().insert("x".to_string(), Value::empty_map());
        view.tmp_mut().valid = Some(Value::Octet(Octet::from_str_bytes("one")));
        let err = ack(&mut view, &["x".to_string()]).unwrap_err();
        assert!(matches!(err, ZenError::TypeError(_)));
    }

    #[test]
    fn ackmy_requires_identity() {
        given_view!(view, Compartments::new(Value::empty_map(), Value::empty_map()));
        view.tmp_mut().valid = Some(Value::Octet(Octet::from_str_bytes("one")));
        let err = ackmy(&mut view, &["x".to_string()]).unwrap_err();
        assert!(matches!(err, ZenError::IdentityError(_)));
    }

    #[test]
    fn draft_appends_across_calls() {
        given_view!(view, Compartments::new(Value::empty_map(), Value::empty_map()));
        draft(&mut view, &["hello".to_string()]).unwrap();
        draft(&mut view, &["_world".to_string()]).unwrap();
        let Some(Value::Octet(o)) = view.ack().get("draft") else {
            panic!("expected octet");
        };
        assert_eq!(o.as_str().unwrap(), "hello_world");
    }
}
