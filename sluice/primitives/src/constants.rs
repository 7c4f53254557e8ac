#![warn(clippy::missing_docs_in_private_items)]

use lazy_static::lazy_static;

use crate::types::{
	Address,
	BalanceHash,
	Bytes,
	CanonicalIdentifier,
	ChainID,
	ChannelIdentifier,
	ProtocolVersion,
	U256,
};

/// Current version of the peer protocol, carried by `Ping`.
pub const PROTOCOL_VERSION: ProtocolVersion = 0;

/// Largest value a nonce, message or payment identifier may take.
pub const UINT64_MAX: u64 = u64::MAX;

/// Messages not bound to a channel are enqueued under this identifier,
/// channel identifier zero being reserved for the global queue.
pub const CANONICAL_IDENTIFIER_GLOBAL_QUEUE: CanonicalIdentifier = CanonicalIdentifier {
	chain_identifier: ChainID::Private(U256::zero()),
	token_network_address: Address::zero(),
	channel_identifier: ChannelIdentifier::zero(),
};

lazy_static! {
	pub static ref EMPTY_SIGNATURE: Bytes = Bytes(vec![0; 65]);
	pub static ref EMPTY_BALANCE_HASH: BalanceHash = BalanceHash::zero();
	pub static ref UINT256_MAX: U256 = U256::max_value();
}
