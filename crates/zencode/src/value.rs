//! The data model (`spec.md` §3, C1): `Octet`, `Value`, and the JSON codec
//! bridge at the `IN`/`KEYS`/`OUT` boundary.

use crate::error::ZenError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use indexmap::IndexMap;

/// An opaque byte sequence, the universal currency for cryptographic values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Octet(Vec<u8>);

impl Octet {
    /// Wraps a byte buffer as an `Octet`.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrows the underlying bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the `Octet`, returning the underlying bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Interprets the bytes as UTF-8 text.
    ///
    /// # Errors
    /// Returns [`ZenError::CodecError`] if the bytes are not valid UTF-8.
    pub fn as_str(&self) -> Result<&str, ZenError> {
        std::str::from_utf8(&self.0).map_err(|e| ZenError::CodecError(e.to_string()))
    }

    /// Builds an `Octet` from UTF-8 text.
    #[must_use]
    pub fn from_str_bytes(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

/// Recursively either an [`Octet`], an ordered sequence of `Value`s, or a
/// mapping from string keys to `Value`s. JSON is the only serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A leaf byte buffer.
    Octet(Octet),
    /// An ordered sequence.
    Seq(Vec<Self>),
    /// A mapping, preserving the insertion order of the underlying JSON.
    Map(IndexMap<String, Self>),
}

impl Value {
    /// An empty mapping, the canonical "nothing here" `Value`.
    #[must_use]
    pub fn empty_map() -> Self {
        Self::Map(IndexMap::new())
    }

    /// Returns this value as a map, if it is one.
    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<String, Self>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns this value as a mutable map, if it is one.
    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<String, Self>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Decodes a JSON document into a `Value`.
    ///
    /// Objects become [`Value::Map`], arrays become [`Value::Seq`], and
    /// strings become [`Value::Octet`] holding their UTF-8 bytes (Octet is
    /// the only scalar `ZenDSL` has). An `Octet` whose JSON representation is a
    /// base64 string round-trips through [`Value::to_json`]; a plain JSON
    /// string decodes to the literal UTF-8 bytes of that string instead, so
    /// callers that need true binary data should base64-encode it themselves
    /// and pass it through a schema/converter that knows to decode it.
    ///
    /// # Errors
    /// Returns [`ZenError::CodecError`] for numbers, booleans, and `null`,
    /// which `ZenDSL`'s data model has no representation for.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, ZenError> {
        match json {
            serde_json::Value::String(s) => Ok(Self::Octet(Octet::from_str_bytes(s))),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Seq),
            serde_json::Value::Object(obj) => obj
                .iter()
                .map(|(k, v)| Self::from_json(v).map(|v| (k.clone(), v)))
                .collect::<Result<IndexMap<_, _>, _>>()
                .map(Self::Map),
            other => Err(ZenError::CodecError(format!(
                "value '{other}' has no `ZenDSL` representation (expected string, array, or object)"
            ))),
        }
    }

    /// Encodes a `Value` back into JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Octet(octet) => octet.as_str().map_or_else(
                |_| serde_json::Value::String(BASE64.encode(octet.as_bytes())),
                |s| serde_json::Value::String(s.to_string()),
            ),
            Self::Seq(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Decodes the `DATA` input: either a mapping, or an array of mappings
    /// flattened one level (later keys win on collision), per `spec.md` §4.5
    /// step 1 and the `S6` testable property.
    ///
    /// # Errors
    /// Returns [`ZenError::CodecError`] if `json` does not decode to a
    /// mapping or an array of mappings, or on malformed JSON text.
    pub fn decode_data(json: &str) -> Result<Self, ZenError> {
        if json.trim().is_empty() {
            return Ok(Self::empty_map());
        }
        let parsed: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ZenError::CodecError(e.to_string()))?;
        match parsed {
            serde_json::Value::Array(items) => {
                let mut flattened = IndexMap::new();
                for item in &items {
                    let value = Self::from_json(item)?;
                    let Some(map) = value.as_map() else {
                        return Err(ZenError::CodecError(
                            "DATA array members must all be mappings".to_string(),
                        ));
                    };
                    for (k, v) in map {
                        flattened.insert(k.clone(), v.clone());
                    }
                }
                Ok(Self::Map(flattened))
            }
            other => {
                let value = Self::from_json(&other)?;
                if value.as_map().is_none() {
                    return Err(ZenError::CodecError(
                        "DATA must decode to a mapping or an array of mappings".to_string(),
                    ));
                }
                Ok(value)
            }
        }
    }

    /// Decodes the `KEYS` input: always a mapping.
    ///
    /// # Errors
    /// Returns [`ZenError::CodecError`] if `json` does not decode to a
    /// mapping, or on malformed JSON text.
    pub fn decode_keys(json: &str) -> Result<Self, ZenError> {
        if json.trim().is_empty() {
            return Ok(Self::empty_map());
        }
        let parsed: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ZenError::CodecError(e.to_string()))?;
        let value = Self::from_json(&parsed)?;
        if value.as_map().is_none() {
            return Err(ZenError::CodecError("KEYS must decode to a mapping".to_string()));
        }
        Ok(value)
    }

    /// Performs the "one-deep lookup" rule shared by `pick`/`pickin`: return
    /// `container[key]` if present, else scan one level of nested mappings
    /// and return the first `child[key]` found, in insertion order.
    #[must_use]
    pub fn one_deep_lookup(&self, key: &str) -> Option<&Self> {
        let map = self.as_map()?;
        if let Some(v) = map.get(key) {
            return Some(v);
        }
        for child in map.values() {
            if let Some(map) = child.as_map() {
                if let Some(v) = map.get(key) {
                    return Some(v);
                }
            }
        }
        None
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests assert on panics to surface failures directly")]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_mapping() {
        let value = Value::decode_data(r#"{"a":"1"}"#).unwrap();
        assert_eq!(value.to_json(), serde_json::json!({"a": "1"}));
    }

    #[test]
    fn flattens_array_of_mappings_last_wins() {
        let value = Value::decode_data(r#"[{"a":"1"},{"a":"2","b":"3"}]"#).unwrap();
        assert_eq!(value.to_json(), serde_json::json!({"a": "2", "b": "3"}));
    }

    #[test]
    fn rejects_scalars_at_the_boundary() {
        assert!(Value::decode_data("42").is_err());
        assert!(Value::decode_data("true").is_err());
    }

    #[test]
    fn empty_data_is_an_empty_mapping() {
        assert_eq!(Value::decode_data("").unwrap(), Value::empty_map());
    }

    #[test]
    fn one_deep_lookup_finds_top_level_key() {
        let value = Value::decode_data(r#"{"a":"1"}"#).unwrap();
        assert!(value.one_deep_lookup("a").is_some());
    }

    #[test]
    fn one_deep_lookup_descends_one_level() {
        let value = Value::decode_data(r#"{"section":{"a":"1"}}"#).unwrap();
        assert!(value.one_deep_lookup("a").is_some());
        assert!(value.one_deep_lookup("missing").is_none());
    }
}
