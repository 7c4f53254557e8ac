use std::num::NonZeroUsize;

use lru::LruCache;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{
	Deserialize,
	Serialize,
};
use sluice_primitives::{
	signing::{
		recover,
		PrivateKey,
	},
	types::{
		Address,
		MessageHash,
		Signature,
		H256,
	},
};
use sluice_state_machine::types::SendMessageEvent;
use tiny_keccak::{
	Hasher,
	Keccak,
};
use web3::signing::{
	Key,
	Signature as RecoverableSignature,
	SigningError,
};

use crate::errors::MessageError;

mod healthcheck;
mod monitoring_service;
mod pathfinding;
mod synchronization;
mod transfer;

pub use healthcheck::*;
pub use monitoring_service::*;
pub use pathfinding::*;
pub use synchronization::*;
pub use transfer::*;

/// Identifier for off-chain messages.
///
/// These magic numbers are the first byte of every peer message and are a
/// stable part of the wire contract.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CmdId {
	Processed = 0,
	Ping = 1,
	Pong = 2,
	SecretRequest = 3,
	Unlock = 4,
	LockedTransfer = 7,
	RefundTransfer = 8,
	RevealSecret = 11,
	Delivered = 12,
	LockExpired = 13,
	ToDevice = 14,
}

impl From<CmdId> for u8 {
	fn from(val: CmdId) -> Self {
		val as u8
	}
}

/// Keccak-256 of arbitrary message bytes.
pub(crate) fn keccak(data: &[u8]) -> H256 {
	let mut keccak = Keccak::v256();
	let mut result = [0u8; 32];
	keccak.update(data);
	keccak.finalize(&mut result);
	H256::from_slice(&result)
}

/// An unsigned or failed signature slot.
pub(crate) fn is_empty_signature(signature: &Signature) -> bool {
	signature.0.is_empty() || signature.0.iter().all(|b| *b == 0)
}

/// Memoised sender recoveries. Keyed on the digest of the signed payload
/// together with the signature, never on the signature alone: two distinct
/// messages carrying identical signature bytes must not be confused.
static SENDERS_CACHE: Lazy<Mutex<LruCache<(H256, Vec<u8>), Option<Address>>>> = Lazy::new(|| {
	Mutex::new(LruCache::new(NonZeroUsize::new(128).expect("cache capacity is non-zero")))
});

/// Recover the address which signed `data`, consulting the bounded sender
/// cache first.
pub(crate) fn recover_cached(data: &[u8], signature: &Signature) -> Option<Address> {
	let key = (keccak(data), signature.0.clone());

	let mut cache = SENDERS_CACHE.lock();
	if let Some(sender) = cache.get(&key) {
		return *sender
	}

	let sender = recover(data, &signature.0).ok();
	cache.put(key, sender);
	sender
}

/// Trait implemented by the messages that have to be signed before being
/// sent.
///
/// Messages are immutable once signed: `sign` writes exactly the signature
/// slot, everything else stays fixed, which is what makes the derived
/// projections (hash, sender) stable and cacheable.
pub trait SignedMessage {
	/// The payload a signature of this message commits to.
	fn bytes_to_sign(&self) -> Vec<u8>;

	/// The current content of the signature slot.
	fn signature(&self) -> &Signature;

	/// Sign the message, filling in the signature slot.
	fn sign(&mut self, key: PrivateKey) -> Result<(), SigningError>;

	/// Produce this message's signature without storing it.
	fn sign_message(&self, key: PrivateKey) -> Result<RecoverableSignature, SigningError> {
		let bytes = self.bytes_to_sign();
		key.sign_message(&bytes)
	}

	/// The address which signed this message, or `None` when the message
	/// is unsigned or recovery fails.
	fn sender(&self) -> Option<Address> {
		let signature = self.signature();
		if signature.0.len() != 65 || is_empty_signature(signature) {
			return None
		}
		recover_cached(&self.bytes_to_sign(), signature)
	}
}

/// A signed message carrying a balance proof. Its signature does not
/// commit to the wire prefix but to the on-chain balance-proof packing,
/// with the hash of the wire prefix as the additional hash.
pub trait SignedEnvelopeMessage: SignedMessage {
	/// Hash of the wire bytes excluding the trailing signature.
	fn message_hash(&self) -> MessageHash;
}

/// All messages understood by this node, tagged for the structured
/// storage/API format. `"Secret"` is accepted as a historical alias of
/// `Unlock` on ingest; emission always uses `"Unlock"`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
	Ping(Ping),
	Pong(Pong),
	Processed(Processed),
	Delivered(Delivered),
	ToDevice(ToDevice),
	SecretRequest(SecretRequest),
	RevealSecret(RevealSecret),
	#[serde(alias = "Secret")]
	Unlock(Unlock),
	LockedTransfer(LockedTransfer),
	RefundTransfer(RefundTransfer),
	LockExpired(LockExpired),
	RequestMonitoring(RequestMonitoring),
	UpdatePFS(UpdatePFS),
}

impl Message {
	/// Returns a string of the inner message's type name.
	pub fn type_name(&self) -> &'static str {
		match self {
			Message::Ping(_) => "Ping",
			Message::Pong(_) => "Pong",
			Message::Processed(_) => "Processed",
			Message::Delivered(_) => "Delivered",
			Message::ToDevice(_) => "ToDevice",
			Message::SecretRequest(_) => "SecretRequest",
			Message::RevealSecret(_) => "RevealSecret",
			Message::Unlock(_) => "Unlock",
			Message::LockedTransfer(_) => "LockedTransfer",
			Message::RefundTransfer(_) => "RefundTransfer",
			Message::LockExpired(_) => "LockExpired",
			Message::RequestMonitoring(_) => "RequestMonitoring",
			Message::UpdatePFS(_) => "UpdatePFS",
		}
	}

	/// Hash over the full packed form, signature included. Two messages
	/// are interchangeable exactly when their class and hash agree.
	pub fn hash(&self) -> Result<MessageHash, MessageError> {
		let packed = match self {
			Message::Ping(inner) => inner.encode(),
			Message::Pong(inner) => inner.encode(),
			Message::Processed(inner) => inner.encode(),
			Message::Delivered(inner) => inner.encode(),
			Message::ToDevice(inner) => inner.encode(),
			Message::SecretRequest(inner) => inner.encode(),
			Message::RevealSecret(inner) => inner.encode(),
			Message::Unlock(inner) => inner.encode(),
			Message::LockedTransfer(inner) => inner.encode(),
			Message::RefundTransfer(inner) => inner.encode(),
			Message::LockExpired(inner) => inner.encode(),
			Message::RequestMonitoring(inner) => inner.encode()?,
			Message::UpdatePFS(inner) => inner.encode(),
		};
		Ok(keccak(&packed))
	}
}

/// Convert an outgoing send event into its unsigned wire message. Events
/// that do not represent protocol messages never reach this point; the
/// `SendMessageEvent` conversion rejects them beforehand.
pub fn message_from_send_event(event: SendMessageEvent) -> Message {
	match event {
		SendMessageEvent::SendLockedTransfer(inner) => Message::LockedTransfer(inner.into()),
		SendMessageEvent::SendRefundTransfer(inner) => Message::RefundTransfer(inner.into()),
		SendMessageEvent::SendSecretReveal(inner) => Message::RevealSecret(inner.into()),
		SendMessageEvent::SendBalanceProof(inner) => Message::Unlock(inner.into()),
		SendMessageEvent::SendSecretRequest(inner) => Message::SecretRequest(inner.into()),
		SendMessageEvent::SendLockExpired(inner) => Message::LockExpired(inner.into()),
		SendMessageEvent::SendProcessed(inner) => Message::Processed(inner.into()),
	}
}
