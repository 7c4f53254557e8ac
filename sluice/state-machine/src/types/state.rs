#![warn(clippy::missing_docs_in_private_items)]

use sluice_primitives::{
	deserializers::u256_from_str,
	hashing::hash_balance_data,
	serializers::u256_to_str,
	traits::ToBytes,
	types::{
		Address,
		BalanceHash,
		BlockExpiration,
		Bytes,
		CanonicalIdentifier,
		ChainID,
		ChannelIdentifier,
		EncodedLock,
		LockedAmount,
		Locksroot,
		MessageHash,
		MessageIdentifier,
		Nonce,
		PaymentIdentifier,
		SecretHash,
		Signature,
		TokenAddress,
		TokenAmount,
		TokenNetworkAddress,
	},
};
use serde::{
	Deserialize,
	Serialize,
};

use super::State;
use crate::errors::InvalidStateError;

/// Balance proof issued by the local node, not yet signed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BalanceProofUnsignedState {
	pub nonce: Nonce,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub transferred_amount: TokenAmount,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub locked_amount: LockedAmount,
	pub locksroot: Locksroot,
	pub canonical_identifier: CanonicalIdentifier,
	pub balance_hash: BalanceHash,
}

impl BalanceProofUnsignedState {
	pub fn new(
		nonce: Nonce,
		transferred_amount: TokenAmount,
		locked_amount: LockedAmount,
		locksroot: Locksroot,
		canonical_identifier: CanonicalIdentifier,
	) -> Result<Self, InvalidStateError> {
		if nonce == Nonce::zero() {
			return Err(InvalidStateError { msg: "nonce cannot be zero".to_owned() })
		}

		let balance_hash = hash_balance_data(transferred_amount, locked_amount, locksroot);
		Ok(Self {
			nonce,
			transferred_amount,
			locked_amount,
			locksroot,
			canonical_identifier,
			balance_hash,
		})
	}

	pub fn chain_id(&self) -> ChainID {
		self.canonical_identifier.chain_identifier
	}

	pub fn token_network_address(&self) -> TokenNetworkAddress {
		self.canonical_identifier.token_network_address
	}

	pub fn channel_identifier(&self) -> ChannelIdentifier {
		self.canonical_identifier.channel_identifier
	}
}

impl State for BalanceProofUnsignedState {}

/// Proof of a channel balance signed by the partner, usable on-chain to
/// resolve disputes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BalanceProofSignedState {
	pub nonce: Nonce,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub transferred_amount: TokenAmount,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub locked_amount: LockedAmount,
	pub locksroot: Locksroot,
	pub canonical_identifier: CanonicalIdentifier,
	pub balance_hash: BalanceHash,
	pub message_hash: MessageHash,
	pub signature: Signature,
	pub sender: Address,
}

impl BalanceProofSignedState {
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		nonce: Nonce,
		transferred_amount: TokenAmount,
		locked_amount: LockedAmount,
		locksroot: Locksroot,
		canonical_identifier: CanonicalIdentifier,
		message_hash: MessageHash,
		signature: Signature,
		sender: Address,
	) -> Result<Self, InvalidStateError> {
		if nonce == Nonce::zero() {
			return Err(InvalidStateError { msg: "nonce cannot be zero".to_owned() })
		}
		if signature.0.len() != 65 {
			return Err(InvalidStateError { msg: "signature is an invalid signature".to_owned() })
		}

		let balance_hash = hash_balance_data(transferred_amount, locked_amount, locksroot);
		Ok(Self {
			nonce,
			transferred_amount,
			locked_amount,
			locksroot,
			canonical_identifier,
			balance_hash,
			message_hash,
			signature,
			sender,
		})
	}

	pub fn chain_id(&self) -> ChainID {
		self.canonical_identifier.chain_identifier
	}

	pub fn token_network_address(&self) -> TokenNetworkAddress {
		self.canonical_identifier.token_network_address
	}

	pub fn channel_identifier(&self) -> ChannelIdentifier {
		self.canonical_identifier.channel_identifier
	}
}

impl State for BalanceProofSignedState {}

/// A single pending hash-time-locked transfer.
#[derive(Default, Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct HashTimeLockState {
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub amount: TokenAmount,
	pub expiration: BlockExpiration,
	pub secrethash: SecretHash,
	pub encoded: EncodedLock,
}

impl HashTimeLockState {
	/// Creates a lock state along with its canonical 96-byte encoding.
	pub fn create(
		amount: TokenAmount,
		expiration: BlockExpiration,
		secrethash: SecretHash,
	) -> Self {
		let mut data = amount.to_bytes();
		data.extend_from_slice(&expiration.to_be_bytes());
		data.extend_from_slice(secrethash.as_bytes());
		Self { amount, expiration, secrethash, encoded: Bytes(data) }
	}
}

/// An outgoing mediated transfer before it is signed into a message.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct LockedTransferUnsignedState {
	pub payment_identifier: PaymentIdentifier,
	pub token: TokenAddress,
	pub balance_proof: BalanceProofUnsignedState,
	pub lock: HashTimeLockState,
	pub initiator: Address,
	pub target: Address,
}

impl State for LockedTransferUnsignedState {}

/// An incoming mediated transfer lifted out of its signed wire message.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct LockedTransferSignedState {
	pub message_identifier: MessageIdentifier,
	pub payment_identifier: PaymentIdentifier,
	pub token: TokenAddress,
	pub balance_proof: BalanceProofSignedState,
	pub lock: HashTimeLockState,
	pub initiator: Address,
	pub target: Address,
}

impl LockedTransferSignedState {
	/// The channel partner which signed the transfer.
	pub fn sender(&self) -> Address {
		self.balance_proof.sender
	}
}

impl State for LockedTransferSignedState {}
