//! `Scenario 'eddsa'`: Ed25519 keypair generation, signing, and verification.
//!
//! Grounded in `spec.md` §8's S1 literal scenario, which requires
//! `ACK[whoami].keyring.eddsa` to hold a base58-encoded public key after
//! `When I create the keypair`.

use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};
use indexmap::IndexMap;
use rand::rngs::OsRng;
use zencode::{
    Octet, Registries, SchemaRegistry, ScenarioPlugin, Value, WhenView, ZenError,
};

fn slot_for<'a>(ack: &'a mut IndexMap<String, Value>, whoami: &str) -> Result<&'a mut IndexMap<String, Value>, ZenError> {
    let entry = ack.entry(whoami.to_string()).or_insert_with(Value::empty_map);
    let Value::Map(map) = entry else {
        return Err(ZenError::TypeError(format!("ACK[{whoami}] is not a mapping")));
    };
    Ok(map)
}

fn nested_mut<'a>(map: &'a mut IndexMap<String, Value>, key: &str) -> Result<&'a mut IndexMap<String, Value>, ZenError> {
    let entry = map.entry(key.to_string()).or_insert_with(Value::empty_map);
    let Value::Map(inner) = entry else {
        return Err(ZenError::TypeError(format!("ACK.{key} is not a mapping")));
    };
    Ok(inner)
}

fn create_keypair(view: &mut WhenView<'_>, _args: &[String]) -> Result<(), ZenError> {
    let whoami = view
        .whoami()
        .ok_or_else(|| ZenError::IdentityError("i create the keypair requires identity to be set".to_string()))?
        .to_string();
    let signing_key = SigningKey::generate(&mut OsRng);
    let public_b58 = bs58::encode(signing_key.verifying_key().as_bytes()).into_string();
    let secret_b58 = bs58::encode(signing_key.to_bytes()).into_string();

    let slot = slot_for(view.ack_mut(), &whoami)?;
    nested_mut(slot, "keyring")?.insert(
        "eddsa".to_string(),
        Value::Octet(Octet::from_str_bytes(&public_b58)),
    );
    nested_mut(slot, "private_keyring")?.insert(
        "eddsa".to_string(),
        Value::Octet(Octet::from_str_bytes(&secret_b58)),
    );
    Ok(())
}

fn sign_the_draft(view: &mut WhenView<'_>, _args: &[String]) -> Result<(), ZenError> {
    let whoami = view
        .whoami()
        .ok_or_else(|| ZenError::IdentityError("i sign the draft requires identity to be set".to_string()))?
        .to_string();
    let draft = view
        .ack()
        .get("draft")
        .and_then(|v| if let Value::Octet(o) = v { Some(o.as_bytes().to_vec()) } else { None })
        .ok_or_else(|| ZenError::NotFound("draft".to_string()))?;
    let secret_b58 = view
        .ack()
        .get(&whoami)
        .and_then(Value::as_map)
        .and_then(|m| m.get("private_keyring"))
        .and_then(Value::as_map)
        .and_then(|m| m.get("eddsa"))
        .and_then(|v| if let Value::Octet(o) = v { o.as_str().ok() } else { None })
        .ok_or_else(|| ZenError::NotFound(format!("{whoami}.private_keyring.eddsa")))?
        .to_string();
    let secret_bytes: [u8; 32] = bs58::decode(&secret_b58)
        .into_vec()
        .map_err(|e| ZenError::CodecError(e.to_string()))?
        .try_into()
        .map_err(|_| ZenError::CodecError("eddsa private key is not 32 bytes".to_string()))?;
    let signing_key = SigningKey::from_bytes(&secret_bytes);
    let signature = signing_key.sign(&draft);
    let signature_b58 = bs58::encode(signature.to_bytes()).into_string();

    let slot = slot_for(view.ack_mut(), &whoami)?;
    slot.insert(
        "eddsa_signature".to_string(),
        Value::Octet(Octet::from_str_bytes(&signature_b58)),
    );
    Ok(())
}

fn verify_the_signature_from(view: &mut WhenView<'_>, args: &[String]) -> Result<(), ZenError> {
    let signer = args
        .first()
        .ok_or_else(|| ZenError::TypeError("i verify the signature from '' requires an identity".to_string()))?
        .clone();
    let draft = view
        .ack()
        .get("draft")
        .and_then(|v| if let Value::Octet(o) = v { Some(o.as_bytes().to_vec()) } else { None })
        .ok_or_else(|| ZenError::NotFound("draft".to_string()))?;
    let whoami = view
        .whoami()
        .ok_or_else(|| ZenError::IdentityError("verification requires identity to be set".to_string()))?
        .to_string();
    let public_b58 = view
        .ack()
        .get(&signer)
        .and_then(Value::as_map)
        .and_then(|m| m.get("keyring"))
        .and_then(Value::as_map)
        .and_then(|m| m.get("eddsa"))
        .and_then(|v| if let Value::Octet(o) = v { o.as_str().ok() } else { None })
        .ok_or_else(|| ZenError::NotFound(format!("{signer}.keyring.eddsa")))?
        .to_string();
    let signature_b58 = view
        .ack()
        .get(&whoami)
        .and_then(Value::as_map)
        .and_then(|m| m.get("eddsa_signature"))
        .and_then(|v| if let Value::Octet(o) = v { o.as_str().ok() } else { None })
        .ok_or_else(|| ZenError::NotFound(format!("{whoami}.eddsa_signature")))?
        .to_string();

    let public_bytes: [u8; 32] = bs58::decode(&public_b58)
        .into_vec()
        .map_err(|e| ZenError::CodecError(e.to_string()))?
        .try_into()
        .map_err(|_| ZenError::CodecError("eddsa public key is not 32 bytes".to_string()))?;
    let signature_bytes: [u8; 64] = bs58::decode(&signature_b58)
        .into_vec()
        .map_err(|e| ZenError::CodecError(e.to_string()))?
        .try_into()
        .map_err(|_| ZenError::CodecError("eddsa signature is not 64 bytes".to_string()))?;
    let verifying_key = VerifyingKey::from_bytes(&public_bytes).map_err(|e| ZenError::CodecError(e.to_string()))?;
    let signature = ed25519_dalek::Signature::from_bytes(&signature_bytes);
    verifying_key
        .verify(&draft, &signature)
        .map_err(|_| ZenError::TypeError(format!("signature from '{signer}' did not verify")))
}

/// `Scenario 'eddsa'`.
pub struct EddsaPlugin;

impl ScenarioPlugin for EddsaPlugin {
    fn name(&self) -> &'static str {
        "eddsa"
    }

    fn load(&self, registries: &mut Registries, _schemas: &mut SchemaRegistry) {
        registries.register_when("i create the keypair", std::sync::Arc::new(create_keypair));
        registries.register_when("i sign the draft", std::sync::Arc::new(sign_the_draft));
        registries.register_when(
            "i verify the signature from ''",
            std::sync::Arc::new(verify_the_signature_from),
        );
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, clippy::expect_used, reason = "tests assert on panics to surface failures directly")]
mod tests {
    use super::*;
    use zencode::{Compartments, Engine};

    #[test]
    fn keypair_then_sign_then_verify_round_trips() {
        let mut engine = Engine::new(Box::new(crate::BuiltinScenarioLoader));
        let script = engine
            .parse(
                "Scenario 'eddsa'\n\
                 Given I am 'Alice'\n\
                 And draft 'hello world'\n\
                 When I create the keypair\n\
                 And I sign the draft\n\
                 And I verify the signature from 'Alice'\n\
                 Then print my 'keyring'\n\
                 And print my 'eddsa_signature'\n",
            )
            .unwrap();
        let out = engine.run(&script, "", "").unwrap();
        let out = out.expect("OUT should be non-empty");
        assert!(out.pointer("/Alice/keyring/eddsa").and_then(|v| v.as_str()).is_some());
        assert!(out.pointer("/Alice/eddsa_signature").and_then(|v| v.as_str()).is_some());
    }

    #[test]
    fn verify_rejects_a_tampered_signer() {
        let _ = Compartments::new(Value::empty_map(), Value::empty_map());
        let mut engine = Engine::new(Box::new(crate::BuiltinScenarioLoader));
        let script = engine
            .parse(
                "Scenario 'eddsa'\n\
                 Given I am 'Alice'\n\
                 And draft 'hello world'\n\
                 When I create the keypair\n\
                 And I verify the signature from 'Alice'\n",
            )
            .unwrap();
        let failure = engine.run(&script, "", "").unwrap_err();
        assert!(matches!(failure.error, ZenError::NotFound(_)));
    }
}
