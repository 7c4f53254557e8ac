use serde::{
	Deserialize,
	Serialize,
};
use sluice_primitives::{
	deserializers::{
		signature_from_str,
		u256_from_str,
	},
	serializers::u256_to_str,
	signing::PrivateKey,
	traits::ToBytes,
	types::{
		Address,
		CanonicalIdentifier,
		FeeAmount,
		MessageHash,
		Nonce,
		RevealTimeout,
		Signature,
		TokenAmount,
	},
};
use web3::signing::SigningError;

use super::{
	keccak,
	SignedMessage,
};
use crate::{
	errors::MessageError,
	frame::{
		Packer,
		Unpacker,
	},
};

/// Message to inform a pathfinding service about a capacity change of a
/// channel. Carried over a broadcast endpoint, never peer-decoded, and
/// signed over its own packed layout.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UpdatePFS {
	pub canonical_identifier: CanonicalIdentifier,
	pub updating_participant: Address,
	pub other_participant: Address,
	pub updating_nonce: Nonce,
	pub other_nonce: Nonce,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub updating_capacity: TokenAmount,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub other_capacity: TokenAmount,
	pub reveal_timeout: RevealTimeout,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub mediation_fee: FeeAmount,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl UpdatePFS {
	/// Total packed size.
	pub const SIZE: usize = 32 + 20 + 32 + 20 + 20 + 8 + 8 + 32 + 32 + 8 + 32 + 65;

	pub fn encode(&self) -> Vec<u8> {
		let mut packer = Packer::new(Self::SIZE);
		packer.write_u256(self.canonical_identifier.chain_identifier.into());
		packer.write_address(self.canonical_identifier.token_network_address);
		packer.write_u256(self.canonical_identifier.channel_identifier);
		packer.write_address(self.updating_participant);
		packer.write_address(self.other_participant);
		packer.write_u64(self.updating_nonce);
		packer.write_u64(self.other_nonce);
		packer.write_u256(self.updating_capacity);
		packer.write_u256(self.other_capacity);
		packer.write_u64(self.reveal_timeout);
		packer.write_u256(self.mediation_fee);
		packer.write_signature(&self.signature);
		packer.finish()
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		let update = Self {
			canonical_identifier: CanonicalIdentifier {
				chain_identifier: unpacker.read_u256()?.into(),
				token_network_address: unpacker.read_address()?,
				channel_identifier: unpacker.read_u256()?,
			},
			updating_participant: unpacker.read_address()?,
			other_participant: unpacker.read_address()?,
			updating_nonce: unpacker.read_u64()?,
			other_nonce: unpacker.read_u64()?,
			updating_capacity: unpacker.read_u256()?,
			other_capacity: unpacker.read_u256()?,
			reveal_timeout: unpacker.read_u64()?,
			mediation_fee: unpacker.read_u256()?,
			signature: unpacker.read_signature()?,
		};
		unpacker.finish()?;
		Ok(update)
	}

	pub fn hash(&self) -> MessageHash {
		keccak(&self.encode())
	}
}

impl SignedMessage for UpdatePFS {
	fn bytes_to_sign(&self) -> Vec<u8> {
		self.encode()[..Self::SIZE - 65].to_vec()
	}

	fn signature(&self) -> &Signature {
		&self.signature
	}

	fn sign(&mut self, key: PrivateKey) -> Result<(), SigningError> {
		self.signature = self.sign_message(key)?.to_bytes().into();
		Ok(())
	}
}
