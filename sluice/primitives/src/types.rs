#![warn(clippy::missing_docs_in_private_items)]

use std::fmt;

use derive_more::Display;
use serde::{
	Deserialize,
	Serialize,
};
pub use web3::types::{
	Address,
	Bytes,
	H160,
	H256,
	U256,
};

/// Chain identifier module.
mod chain_id;
pub use chain_id::*;

/// Custom numeric data types.
mod numeric;
pub use numeric::*;

use crate::{
	deserializers::u256_from_str,
	serializers::u256_to_str,
	traits::Checksum,
};

/// Alias type for the hash binding a balance proof on-chain.
pub type AdditionalHash = H256;

/// Alias type for balance hash.
pub type BalanceHash = H256;

/// Alias type for block expiration.
pub type BlockExpiration = U64;

/// Alias type for block number.
pub type BlockNumber = U64;

/// Alias type for block hash.
pub type BlockHash = H256;

/// Alias type for channel identifier.
pub type ChannelIdentifier = U256;

/// Alias type for the canonical byte form of a lock.
pub type EncodedLock = Bytes;

/// Alias type for fee amount.
pub type FeeAmount = U256;

/// Alias type for locked amount.
pub type LockedAmount = U256;

/// Alias type for lock hash.
pub type LockHash = H256;

/// Alias type for locksroot.
pub type Locksroot = H256;

/// Alias type for message identifier.
pub type MessageIdentifier = u64;

/// Alias type for message hash.
pub type MessageHash = H256;

/// Alias type for nonce.
pub type Nonce = U64;

/// Alias type for payment identifier.
pub type PaymentIdentifier = U64;

/// Alias type for the peer protocol version.
pub type ProtocolVersion = u8;

/// Alias type for reveal timeout.
pub type RevealTimeout = U64;

/// Alias type for secret.
pub type Secret = Bytes;

/// Alias type for secret hash.
pub type SecretHash = H256;

/// Alias type for signature.
pub type Signature = Bytes;

/// Alias type for token address.
pub type TokenAddress = Address;

/// Alias type for token network address.
pub type TokenNetworkAddress = Address;

/// Alias type for token amount.
pub type TokenAmount = U256;

/// The triplet uniquely naming an on-chain channel. Every balance proof is
/// bound to exactly one canonical identifier.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct CanonicalIdentifier {
	pub chain_identifier: ChainID,
	pub token_network_address: TokenNetworkAddress,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub channel_identifier: ChannelIdentifier,
}

impl fmt::Display for CanonicalIdentifier {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"ChainID: {}, TokenNetworkAddress: {}, ChannelID: {}",
			self.chain_identifier,
			self.token_network_address.checksum(),
			self.channel_identifier
		)
	}
}

/// Message queue identifier. Channel identifier zero denotes the global
/// queue of messages not tied to any channel.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct QueueIdentifier {
	pub recipient: Address,
	pub canonical_identifier: CanonicalIdentifier,
}

impl fmt::Display for QueueIdentifier {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "Recipient: {}, {}", self.recipient.checksum(), self.canonical_identifier)
	}
}

/// Message type discriminators of the on-chain balance proof packings.
#[repr(u8)]
#[derive(Copy, Clone, Display, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MessageTypeId {
	BalanceProof = 1,
	BalanceProofUpdate = 2,
}

impl From<MessageTypeId> for U256 {
	fn from(val: MessageTypeId) -> Self {
		(val as u8).into()
	}
}
