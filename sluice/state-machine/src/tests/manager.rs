use sluice_primitives::types::{
	BlockHash,
	BlockNumber,
	PaymentIdentifier,
	TokenAmount,
	U64,
};

use crate::{
	manager::{
		replay,
		StateManager,
	},
	tests::factories::{
		secret_fixture,
		secret_registry_transition,
		Keyring,
		SecretRegistryState,
		REGISTRY_HORIZON,
	},
	types::{
		Block,
		Event,
		ReceiveDelivered,
		ReceiveSecretRequest,
		ReceiveSecretReveal,
		StateChange,
	},
};

fn reveal(fill: u8) -> StateChange {
	let (secret, secrethash) = secret_fixture(fill);
	ReceiveSecretReveal { sender: Keyring::Alice.address(), secret, secrethash }.into()
}

fn request(fill: u8) -> StateChange {
	let (_secret, secrethash) = secret_fixture(fill);
	ReceiveSecretRequest {
		sender: Keyring::Bob.address(),
		payment_identifier: PaymentIdentifier::from(fill as u64),
		amount: TokenAmount::from(100),
		expiration: U64::from(50u64),
		secrethash,
	}
	.into()
}

fn recorded_state_changes() -> Vec<StateChange> {
	vec![reveal(1), request(1), reveal(2), request(3), request(2)]
}

#[test]
fn test_dispatch_returns_previous_state_and_events() {
	let mut state_manager = StateManager::new(secret_registry_transition, None);

	let (previous, events) =
		state_manager.dispatch(reveal(1)).expect("Transition should succeed");
	assert_eq!(previous, None);
	assert!(events.is_empty());

	let state = state_manager.current_state.clone().expect("State should be initialized");
	assert_eq!(state.secrethashes_to_secrets.len(), 1);

	let (previous, events) =
		state_manager.dispatch(request(1)).expect("Transition should succeed");
	assert_eq!(previous, Some(state));
	assert_eq!(events.len(), 1);

	let (secret, secrethash) = secret_fixture(1);
	match &events[0] {
		Event::SendSecretReveal(inner) => {
			assert_eq!(inner.recipient, Keyring::Bob.address());
			assert_eq!(inner.secret, secret);
			assert_eq!(inner.secrethash, secrethash);
		},
		_ => panic!("Expected a SendSecretReveal event"),
	}
}

#[test]
fn test_unknown_state_change_leaves_state_untouched() {
	let mut state_manager = StateManager::new(secret_registry_transition, None);
	state_manager.dispatch(reveal(1)).expect("Transition should succeed");
	let before = state_manager.current_state.clone();

	let (previous, events) = state_manager
		.dispatch(
			ReceiveDelivered { sender: Keyring::Alice.address(), message_identifier: 7 }.into(),
		)
		.expect("Unexpected state changes must not fail");

	assert_eq!(previous, before);
	assert_eq!(state_manager.current_state, before);
	assert!(events.is_empty());
}

#[test]
fn test_requesting_unknown_secret_produces_no_events() {
	let mut state_manager = StateManager::new(secret_registry_transition, None);
	let (_previous, events) =
		state_manager.dispatch(request(9)).expect("Transition should succeed");
	assert!(events.is_empty());
}

#[test]
fn test_deterministic_dispatch() {
	let run = || {
		let mut state_manager = StateManager::new(secret_registry_transition, None);
		let mut all_events = vec![];
		for state_change in recorded_state_changes() {
			let (_previous, mut events) =
				state_manager.dispatch(state_change).expect("Transition should succeed");
			all_events.append(&mut events);
		}
		(state_manager.current_state, all_events)
	};

	let (first_state, first_events) = run();
	let (second_state, second_events) = run();

	assert_eq!(first_state, second_state);
	assert_eq!(first_events, second_events);

	// the serialized form must match as well, snapshots depend on it
	let first_snapshot =
		serde_json::to_string(&first_state).expect("State should serialize");
	let second_snapshot =
		serde_json::to_string(&second_state).expect("State should serialize");
	assert_eq!(first_snapshot, second_snapshot);
}

#[test]
fn test_previous_state_is_frozen() {
	let mut state_manager = StateManager::new(secret_registry_transition, None);
	state_manager.dispatch(reveal(1)).expect("Transition should succeed");

	let (previous, _events) =
		state_manager.dispatch(reveal(2)).expect("Transition should succeed");
	let frozen = previous.clone().expect("State should exist");
	assert_eq!(frozen.secrethashes_to_secrets.len(), 1);

	state_manager.dispatch(reveal(3)).expect("Transition should succeed");
	state_manager.dispatch(request(2)).expect("Transition should succeed");

	assert_eq!(previous.expect("State should exist"), frozen);
	assert_eq!(frozen.secrethashes_to_secrets.len(), 1);
	assert_eq!(
		state_manager
			.current_state
			.expect("State should exist")
			.secrethashes_to_secrets
			.len(),
		3
	);
}

#[test]
fn test_replay_matches_live_run() {
	let mut live_manager = StateManager::new(secret_registry_transition, None);
	let mut live_events = vec![];
	for state_change in recorded_state_changes() {
		let (_previous, mut events) =
			live_manager.dispatch(state_change).expect("Transition should succeed");
		live_events.append(&mut events);
	}

	let (replayed_manager, replayed_events) =
		replay(secret_registry_transition, None, recorded_state_changes())
			.expect("Replay should succeed");

	assert_eq!(replayed_manager.current_state, live_manager.current_state);
	assert_eq!(replayed_events, live_events);
}

#[test]
fn test_replay_from_snapshot() {
	let state_changes = recorded_state_changes();
	let split_at = 2;

	let mut live_manager = StateManager::new(secret_registry_transition, None);
	for state_change in state_changes.clone() {
		live_manager.dispatch(state_change).expect("Transition should succeed");
	}

	let mut snapshot_manager = StateManager::new(secret_registry_transition, None);
	for state_change in state_changes[..split_at].to_vec() {
		snapshot_manager.dispatch(state_change).expect("Transition should succeed");
	}
	let snapshot: Option<SecretRegistryState> = snapshot_manager.current_state;

	let (restored_manager, _events) =
		replay(secret_registry_transition, snapshot, state_changes[split_at..].to_vec())
			.expect("Replay should succeed");

	assert_eq!(restored_manager.current_state, live_manager.current_state);
}

#[test]
fn test_terminal_transition_clears_state() {
	let mut state_manager = StateManager::new(secret_registry_transition, None);
	state_manager.dispatch(reveal(1)).expect("Transition should succeed");
	assert!(state_manager.current_state.is_some());

	let block = Block {
		block_number: BlockNumber::from(REGISTRY_HORIZON + 100),
		block_hash: BlockHash::zero(),
	};
	let (previous, events) =
		state_manager.dispatch(block.into()).expect("Transition should succeed");

	assert!(previous.is_some());
	assert!(events.is_empty());
	assert_eq!(state_manager.current_state, None);
}
