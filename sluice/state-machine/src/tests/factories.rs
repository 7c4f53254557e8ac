use std::collections::BTreeMap;

use ethsign::SecretKey;
use serde::{
	Deserialize,
	Serialize,
};
use sluice_primitives::{
	constants::CANONICAL_IDENTIFIER_GLOBAL_QUEUE,
	hashing::hash_secret,
	types::{
		Address,
		BlockNumber,
		Bytes,
		Secret,
		SecretHash,
	},
};

use crate::{
	manager::{
		Result,
		TransitionResult,
	},
	types::{
		SendMessageEventInner,
		SendSecretReveal,
		State,
		StateChange,
	},
};

pub enum Keyring {
	Alice,
	Bob,
}

impl Keyring {
	pub fn private_key(&self) -> SecretKey {
		let mut secret: [u8; 32] = [0; 32];
		let s = match self {
			Self::Alice => b"ALICE".as_slice(),
			Self::Bob => b"BOB".as_slice(),
		};
		secret[..s.len()].copy_from_slice(s);
		SecretKey::from_raw(&secret).expect("Private key generation should not fail")
	}

	pub fn address(&self) -> Address {
		Address::from_slice(self.private_key().public().address())
	}
}

/// Block height past which the registry task considers itself done.
pub const REGISTRY_HORIZON: u64 = 500;

/// The simplest real machine of the node: remember revealed secrets and
/// answer secret requests for the ones we know.
#[derive(Serialize, Deserialize, Clone, Debug, Default, Eq, PartialEq)]
pub struct SecretRegistryState {
	pub secrethashes_to_secrets: BTreeMap<SecretHash, Secret>,
}

impl State for SecretRegistryState {}

pub fn secret_registry_transition(
	state: Option<SecretRegistryState>,
	state_change: StateChange,
) -> Result<TransitionResult<SecretRegistryState>> {
	let mut state = state.unwrap_or_default();

	match state_change {
		StateChange::ReceiveSecretReveal(reveal) => {
			state.secrethashes_to_secrets.insert(reveal.secrethash, reveal.secret);
			Ok(TransitionResult { new_state: Some(state), events: vec![] })
		},
		StateChange::ReceiveSecretRequest(request) => {
			let events = match state.secrethashes_to_secrets.get(&request.secrethash) {
				Some(secret) => vec![SendSecretReveal {
					inner: SendMessageEventInner {
						recipient: request.sender,
						canonical_identifier: CANONICAL_IDENTIFIER_GLOBAL_QUEUE,
						message_identifier: request.payment_identifier.into(),
					},
					secret: secret.clone(),
					secrethash: request.secrethash,
				}
				.into()],
				None => vec![],
			};
			Ok(TransitionResult { new_state: Some(state), events })
		},
		StateChange::Block(block) => {
			if block.block_number >= BlockNumber::from(REGISTRY_HORIZON) {
				return Ok(TransitionResult { new_state: None, events: vec![] })
			}
			Ok(TransitionResult { new_state: Some(state), events: vec![] })
		},
		// anything else is not for this machine, leave the state as is
		_ => Ok(TransitionResult { new_state: Some(state), events: vec![] }),
	}
}

pub fn secret_fixture(fill: u8) -> (Secret, SecretHash) {
	let secret = Bytes(vec![fill; 32]);
	let secrethash = hash_secret(&secret.0);
	(secret, secrethash)
}
