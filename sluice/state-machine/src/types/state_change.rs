#![warn(clippy::missing_docs_in_private_items)]

use sluice_primitives::{
	deserializers::u256_from_str,
	serializers::u256_to_str,
	types::{
		Address,
		BlockExpiration,
		BlockHash,
		BlockNumber,
		MessageIdentifier,
		PaymentIdentifier,
		Secret,
		SecretHash,
		TokenAmount,
	},
};
use serde::{
	Deserialize,
	Serialize,
};

use super::{
	BalanceProofSignedState,
	LockedTransferSignedState,
};

/// The transitions applied to the application state.
///
/// State changes are the only inputs of the state machine: a new protocol
/// message, a chain event, a timer-driven block. Nomenclature convention:
/// `Receive` prefix for protocol messages, `ContractReceive` prefix for
/// smart contract logs, `Action` prefix for other interactions. The
/// variants carry data only; every `Receive*` sender has already been
/// verified against the message signature.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(tag = "type")]
pub enum StateChange {
	Block(Block),
	ReceiveLockedTransfer(ReceiveLockedTransfer),
	ReceiveTransferRefund(ReceiveTransferRefund),
	ReceiveSecretRequest(ReceiveSecretRequest),
	ReceiveSecretReveal(ReceiveSecretReveal),
	ReceiveUnlock(ReceiveUnlock),
	ReceiveLockExpired(ReceiveLockExpired),
	ReceiveDelivered(ReceiveDelivered),
	ReceiveProcessed(ReceiveProcessed),
}

impl StateChange {
	/// Returns a string of the inner state change's type name.
	pub fn type_name(&self) -> &'static str {
		match self {
			StateChange::Block(_) => "Block",
			StateChange::ReceiveLockedTransfer(_) => "ReceiveLockedTransfer",
			StateChange::ReceiveTransferRefund(_) => "ReceiveTransferRefund",
			StateChange::ReceiveSecretRequest(_) => "ReceiveSecretRequest",
			StateChange::ReceiveSecretReveal(_) => "ReceiveSecretReveal",
			StateChange::ReceiveUnlock(_) => "ReceiveUnlock",
			StateChange::ReceiveLockExpired(_) => "ReceiveLockExpired",
			StateChange::ReceiveDelivered(_) => "ReceiveDelivered",
			StateChange::ReceiveProcessed(_) => "ReceiveProcessed",
		}
	}
}

/// A new block was mined. Expiry-dependent behaviour is driven by this
/// input alone, the state machine keeps no timers of its own.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Block {
	pub block_number: BlockNumber,
	pub block_hash: BlockHash,
}

impl From<Block> for StateChange {
	fn from(inner: Block) -> Self {
		StateChange::Block(inner)
	}
}

/// A valid mediated transfer arrived.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct ReceiveLockedTransfer {
	pub sender: Address,
	pub transfer: LockedTransferSignedState,
}

impl From<ReceiveLockedTransfer> for StateChange {
	fn from(inner: ReceiveLockedTransfer) -> Self {
		StateChange::ReceiveLockedTransfer(inner)
	}
}

/// The partner refused a transfer and returned it, allowing a new route
/// to be tried.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct ReceiveTransferRefund {
	pub sender: Address,
	pub transfer: LockedTransferSignedState,
}

impl From<ReceiveTransferRefund> for StateChange {
	fn from(inner: ReceiveTransferRefund) -> Self {
		StateChange::ReceiveTransferRefund(inner)
	}
}

/// The transfer target asks for the secret matching a pending lock.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct ReceiveSecretRequest {
	pub sender: Address,
	pub payment_identifier: PaymentIdentifier,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub amount: TokenAmount,
	pub expiration: BlockExpiration,
	pub secrethash: SecretHash,
}

impl From<ReceiveSecretRequest> for StateChange {
	fn from(inner: ReceiveSecretRequest) -> Self {
		StateChange::ReceiveSecretRequest(inner)
	}
}

/// A party with an interest in a lock revealed its secret.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct ReceiveSecretReveal {
	pub sender: Address,
	pub secret: Secret,
	pub secrethash: SecretHash,
}

impl From<ReceiveSecretReveal> for StateChange {
	fn from(inner: ReceiveSecretReveal) -> Self {
		StateChange::ReceiveSecretReveal(inner)
	}
}

/// The payer unlocked a lock off-chain with an up-to-date balance proof.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct ReceiveUnlock {
	pub sender: Address,
	pub message_identifier: MessageIdentifier,
	pub secret: Secret,
	pub secrethash: SecretHash,
	pub balance_proof: BalanceProofSignedState,
}

impl From<ReceiveUnlock> for StateChange {
	fn from(inner: ReceiveUnlock) -> Self {
		StateChange::ReceiveUnlock(inner)
	}
}

/// The partner removed an expired lock from its locksroot.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct ReceiveLockExpired {
	pub sender: Address,
	pub message_identifier: MessageIdentifier,
	pub secrethash: SecretHash,
	pub balance_proof: BalanceProofSignedState,
}

impl From<ReceiveLockExpired> for StateChange {
	fn from(inner: ReceiveLockExpired) -> Self {
		StateChange::ReceiveLockExpired(inner)
	}
}

/// The partner received a message of ours.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct ReceiveDelivered {
	pub sender: Address,
	pub message_identifier: MessageIdentifier,
}

impl From<ReceiveDelivered> for StateChange {
	fn from(inner: ReceiveDelivered) -> Self {
		StateChange::ReceiveDelivered(inner)
	}
}

/// The partner processed a message of ours.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct ReceiveProcessed {
	pub sender: Address,
	pub message_identifier: MessageIdentifier,
}

impl From<ReceiveProcessed> for StateChange {
	fn from(inner: ReceiveProcessed) -> Self {
		StateChange::ReceiveProcessed(inner)
	}
}
