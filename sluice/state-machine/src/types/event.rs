#![warn(clippy::missing_docs_in_private_items)]

use derive_more::Deref;
use sluice_primitives::{
	deserializers::u256_from_str,
	serializers::u256_to_str,
	types::{
		Address,
		BlockExpiration,
		CanonicalIdentifier,
		MessageIdentifier,
		PaymentIdentifier,
		QueueIdentifier,
		Secret,
		SecretHash,
		TokenAddress,
		TokenAmount,
		TokenNetworkAddress,
	},
};
use serde::{
	Deserialize,
	Serialize,
};

use super::{
	BalanceProofUnsignedState,
	LockedTransferUnsignedState,
};

/// The outputs of the state machine.
///
/// Events are produced by applying a state change and are handed to the
/// upper layers for execution; the state machine itself never talks to the
/// outside world. `Send` prefix for protocol messages. Variants contain
/// only serializable values copied out of the new state.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(tag = "type")]
pub enum Event {
	SendLockedTransfer(SendLockedTransfer),
	SendRefundTransfer(SendRefundTransfer),
	SendSecretReveal(SendSecretReveal),
	SendBalanceProof(SendBalanceProof),
	SendSecretRequest(SendSecretRequest),
	SendLockExpired(SendLockExpired),
	SendProcessed(SendProcessed),
	PaymentSentSuccess(PaymentSentSuccess),
	PaymentReceivedSuccess(PaymentReceivedSuccess),
}

impl Event {
	/// Returns a string of the inner event's type name.
	pub fn type_name(&self) -> &'static str {
		match self {
			Event::SendLockedTransfer(_) => "SendLockedTransfer",
			Event::SendRefundTransfer(_) => "SendRefundTransfer",
			Event::SendSecretReveal(_) => "SendSecretReveal",
			Event::SendBalanceProof(_) => "SendBalanceProof",
			Event::SendSecretRequest(_) => "SendSecretRequest",
			Event::SendLockExpired(_) => "SendLockExpired",
			Event::SendProcessed(_) => "SendProcessed",
			Event::PaymentSentSuccess(_) => "PaymentSentSuccess",
			Event::PaymentReceivedSuccess(_) => "PaymentReceivedSuccess",
		}
	}
}

/// Common attributes of events which represent off-chain protocol messages
/// tied to a channel. Channel identifier zero stands for the global queue.
/// Messages are handed over once; delivery is the transport's business,
/// not the state machine's.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SendMessageEventInner {
	pub recipient: Address,
	pub canonical_identifier: CanonicalIdentifier,
	pub message_identifier: MessageIdentifier,
}

impl SendMessageEventInner {
	pub fn queue_identifier(&self) -> QueueIdentifier {
		QueueIdentifier {
			recipient: self.recipient,
			canonical_identifier: self.canonical_identifier.clone(),
		}
	}
}

/// A locked transfer that must be sent to `recipient`.
#[derive(Deref, Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct SendLockedTransfer {
	#[deref]
	pub inner: SendMessageEventInner,
	pub transfer: LockedTransferUnsignedState,
}

impl From<SendLockedTransfer> for Event {
	fn from(inner: SendLockedTransfer) -> Self {
		Event::SendLockedTransfer(inner)
	}
}

/// Return a transfer to its payer because no route can complete it.
#[derive(Deref, Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct SendRefundTransfer {
	#[deref]
	pub inner: SendMessageEventInner,
	pub transfer: LockedTransferUnsignedState,
}

impl From<SendRefundTransfer> for Event {
	fn from(inner: SendRefundTransfer) -> Self {
		Event::SendRefundTransfer(inner)
	}
}

/// Reveal a secret to a node known to have an interest in it.
///
/// Revealing a secret on its own is not enough to change channel state;
/// balances only move once the payer follows up with an up-to-date balance
/// proof.
#[derive(Deref, Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct SendSecretReveal {
	#[deref]
	pub inner: SendMessageEventInner,
	pub secret: Secret,
	pub secrethash: SecretHash,
}

impl From<SendSecretReveal> for Event {
	fn from(inner: SendSecretReveal) -> Self {
		Event::SendSecretReveal(inner)
	}
}

/// Send an up-to-date balance proof to the counter-party after a lock was
/// unlocked locally, allowing it to claim the lock. Used by payers. The
/// same message synchronizes the off-chain locksroot and serves as the
/// balance proof for the netting channel contract.
#[derive(Deref, Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct SendBalanceProof {
	#[deref]
	pub inner: SendMessageEventInner,
	pub payment_identifier: PaymentIdentifier,
	pub token_address: TokenAddress,
	pub secret: Secret,
	pub secrethash: SecretHash,
	pub balance_proof: BalanceProofUnsignedState,
}

impl From<SendBalanceProof> for Event {
	fn from(inner: SendBalanceProof) -> Self {
		Event::SendBalanceProof(inner)
	}
}

/// Event used by a target node to request the secret from the initiator.
#[derive(Deref, Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct SendSecretRequest {
	#[deref]
	pub inner: SendMessageEventInner,
	pub payment_identifier: PaymentIdentifier,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub amount: TokenAmount,
	pub expiration: BlockExpiration,
	pub secrethash: SecretHash,
}

impl From<SendSecretRequest> for Event {
	fn from(inner: SendSecretRequest) -> Self {
		Event::SendSecretRequest(inner)
	}
}

/// Notify the partner that a lock has expired and was removed from the
/// locksroot.
#[derive(Deref, Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct SendLockExpired {
	#[deref]
	pub inner: SendMessageEventInner,
	pub balance_proof: BalanceProofUnsignedState,
	pub secrethash: SecretHash,
}

impl From<SendLockExpired> for Event {
	fn from(inner: SendLockExpired) -> Self {
		Event::SendLockExpired(inner)
	}
}

/// Confirm to the partner that its message was applied.
#[derive(Deref, Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct SendProcessed {
	#[deref]
	pub inner: SendMessageEventInner,
}

impl From<SendProcessed> for Event {
	fn from(inner: SendProcessed) -> Self {
		Event::SendProcessed(inner)
	}
}

/// A payment initiated by this node completed.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct PaymentSentSuccess {
	pub token_network_address: TokenNetworkAddress,
	pub identifier: PaymentIdentifier,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub amount: TokenAmount,
	pub target: Address,
	pub secret: Secret,
}

impl From<PaymentSentSuccess> for Event {
	fn from(inner: PaymentSentSuccess) -> Self {
		Event::PaymentSentSuccess(inner)
	}
}

/// A payee received a payment.
///
/// A failed lock claim is not reported symmetrically: the initiator may
/// retry later over different routes, so there is no received-failed
/// counterpart.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct PaymentReceivedSuccess {
	pub token_network_address: TokenNetworkAddress,
	pub identifier: PaymentIdentifier,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub amount: TokenAmount,
	pub initiator: Address,
}

impl From<PaymentReceivedSuccess> for Event {
	fn from(inner: PaymentReceivedSuccess) -> Self {
		Event::PaymentReceivedSuccess(inner)
	}
}

/// The subset of events which translate into outgoing protocol messages.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub enum SendMessageEvent {
	SendLockedTransfer(SendLockedTransfer),
	SendRefundTransfer(SendRefundTransfer),
	SendSecretReveal(SendSecretReveal),
	SendBalanceProof(SendBalanceProof),
	SendSecretRequest(SendSecretRequest),
	SendLockExpired(SendLockExpired),
	SendProcessed(SendProcessed),
}

impl TryFrom<Event> for SendMessageEvent {
	type Error = ();

	fn try_from(event: Event) -> Result<Self, Self::Error> {
		Ok(match event {
			Event::SendLockedTransfer(inner) => SendMessageEvent::SendLockedTransfer(inner),
			Event::SendRefundTransfer(inner) => SendMessageEvent::SendRefundTransfer(inner),
			Event::SendSecretReveal(inner) => SendMessageEvent::SendSecretReveal(inner),
			Event::SendBalanceProof(inner) => SendMessageEvent::SendBalanceProof(inner),
			Event::SendSecretRequest(inner) => SendMessageEvent::SendSecretRequest(inner),
			Event::SendLockExpired(inner) => SendMessageEvent::SendLockExpired(inner),
			Event::SendProcessed(inner) => SendMessageEvent::SendProcessed(inner),
			_ => return Err(()),
		})
	}
}
