#![warn(clippy::missing_docs_in_private_items)]

use web3::ethabi::{
	encode,
	Token,
};

use crate::types::{
	AdditionalHash,
	BalanceHash,
	Bytes,
	CanonicalIdentifier,
	MessageTypeId,
	Nonce,
	Signature,
	TokenAmount,
	U256,
};

/// The packing a channel participant signs over to certify its balance.
/// Byte-for-byte compatible with the on-chain dispute verifier.
pub fn pack_balance_proof(
	nonce: Nonce,
	balance_hash: BalanceHash,
	additional_hash: AdditionalHash,
	canonical_identifier: CanonicalIdentifier,
	msg_type: MessageTypeId,
) -> Bytes {
	let mut b = vec![];

	b.extend(canonical_identifier.token_network_address.as_bytes());
	b.extend(encode(&[Token::Uint(canonical_identifier.chain_identifier.into())]));
	b.extend(encode(&[Token::Uint(msg_type.into())]));
	b.extend(encode(&[Token::Uint(canonical_identifier.channel_identifier)]));
	b.extend(balance_hash.as_bytes());
	b.extend(encode(&[Token::Uint(U256::from(nonce))]));
	b.extend(additional_hash.as_bytes());

	Bytes(b)
}

/// The packing a non-closing participant counter-signs so that a monitoring
/// service may submit the partner's balance proof on its behalf.
pub fn pack_balance_proof_update(
	nonce: Nonce,
	balance_hash: BalanceHash,
	additional_hash: AdditionalHash,
	canonical_identifier: CanonicalIdentifier,
	partner_signature: Signature,
) -> Bytes {
	let mut b = pack_balance_proof(
		nonce,
		balance_hash,
		additional_hash,
		canonical_identifier,
		MessageTypeId::BalanceProofUpdate,
	);

	b.0.extend(&partner_signature.0);

	b
}

/// The packing that entitles a monitoring service to its reward once it
/// intervened on behalf of a channel participant.
pub fn pack_reward_proof(
	canonical_identifier: CanonicalIdentifier,
	reward_amount: TokenAmount,
	nonce: Nonce,
) -> Bytes {
	let mut b = vec![];

	b.extend(encode(&[Token::Uint(canonical_identifier.channel_identifier)]));
	b.extend(encode(&[Token::Uint(reward_amount)]));
	b.extend(canonical_identifier.token_network_address.as_bytes());
	b.extend(encode(&[Token::Uint(canonical_identifier.chain_identifier.into())]));
	b.extend(encode(&[Token::Uint(U256::from(nonce))]));

	Bytes(b)
}
