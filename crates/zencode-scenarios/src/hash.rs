//! `Scenario 'hash'`: SHA-256 over the `ACK.draft` octet buffer.

use indexmap::IndexMap;
use sha2::{Digest as _, Sha256};
use zencode::{Octet, Registries, SchemaRegistry, ScenarioPlugin, Value, WhenView, ZenError};

fn slot_for<'a>(ack: &'a mut IndexMap<String, Value>, whoami: &str) -> Result<&'a mut IndexMap<String, Value>, ZenError> {
    let entry = ack.entry(whoami.to_string()).or_insert_with(Value::empty_map);
    let Value::Map(map) = entry else {
        return Err(ZenError::TypeError(format!("ACK[{whoami}] is not a mapping")));
    };
    Ok(map)
}

fn create_the_hash(view: &mut WhenView<'_>, _args: &[String]) -> Result<(), ZenError> {
    let whoami = view
        .whoami()
        .ok_or_else(|| ZenError::IdentityError("i create the hash requires identity to be set".to_string()))?
        .to_string();
    let draft = view
        .ack()
        .get("draft")
        .and_then(|v| if let Value::Octet(o) = v { Some(o.as_bytes().to_vec()) } else { None })
        .ok_or_else(|| ZenError::NotFound("draft".to_string()))?;
    let digest = Sha256::digest(&draft);
    let slot = slot_for(view.ack_mut(), &whoami)?;
    slot.insert("hash".to_string(), Value::Octet(Octet::new(digest.to_vec())));
    Ok(())
}

/// `Scenario 'hash'`.
pub struct HashPlugin;

impl ScenarioPlugin for HashPlugin {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn load(&self, registries: &mut Registries, _schemas: &mut SchemaRegistry) {
        registries.register_when("i create the hash", std::sync::Arc::new(create_the_hash));
    }
}
