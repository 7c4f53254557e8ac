use serde::{
	Deserialize,
	Serialize,
};
use sluice_primitives::{
	constants::EMPTY_SIGNATURE,
	deserializers::{
		signature_from_str,
		u256_from_str,
	},
	hashing::hash_balance_data,
	packing::{
		pack_balance_proof,
		pack_balance_proof_update,
		pack_reward_proof,
	},
	serializers::u256_to_str,
	signing::{
		recover,
		PrivateKey,
	},
	traits::ToBytes,
	types::{
		AdditionalHash,
		Address,
		BalanceHash,
		CanonicalIdentifier,
		ChainID,
		ChannelIdentifier,
		MessageHash,
		MessageTypeId,
		Nonce,
		Signature,
		TokenAmount,
		TokenNetworkAddress,
	},
};
use sluice_state_machine::types::BalanceProofSignedState;
use web3::signing::SigningError;

use super::{
	is_empty_signature,
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

/// Message sub-field `balance_proof` of `RequestMonitoring`: the partner's
/// balance proof blinded down to the values the on-chain verifier needs,
/// counter-signed by this node.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SignedBlindedBalanceProof {
	pub chain_id: ChainID,
	pub token_network_address: TokenNetworkAddress,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub channel_identifier: ChannelIdentifier,
	pub nonce: Nonce,
	pub additional_hash: AdditionalHash,
	pub balance_hash: BalanceHash,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
	#[serde(deserialize_with = "signature_from_str")]
	pub non_closing_signature: Signature,
}

impl SignedBlindedBalanceProof {
	pub fn from_balance_proof_signed_state(
		balance_proof: &BalanceProofSignedState,
	) -> Result<Self, MessageError> {
		if is_empty_signature(&balance_proof.signature) {
			return Err(MessageError::InvalidValue("balance proof is not signed".to_owned()))
		}

		Ok(Self {
			chain_id: balance_proof.chain_id(),
			token_network_address: balance_proof.token_network_address(),
			channel_identifier: balance_proof.channel_identifier(),
			nonce: balance_proof.nonce,
			additional_hash: balance_proof.message_hash,
			balance_hash: hash_balance_data(
				balance_proof.transferred_amount,
				balance_proof.locked_amount,
				balance_proof.locksroot,
			),
			signature: balance_proof.signature.clone(),
			non_closing_signature: EMPTY_SIGNATURE.clone(),
		})
	}

	pub fn canonical_identifier(&self) -> CanonicalIdentifier {
		CanonicalIdentifier {
			chain_identifier: self.chain_id,
			token_network_address: self.token_network_address,
			channel_identifier: self.channel_identifier,
		}
	}
}

impl SignedMessage for SignedBlindedBalanceProof {
	fn bytes_to_sign(&self) -> Vec<u8> {
		pack_balance_proof_update(
			self.nonce,
			self.balance_hash,
			self.additional_hash,
			self.canonical_identifier(),
			self.signature.clone(),
		)
		.0
	}

	fn signature(&self) -> &Signature {
		&self.non_closing_signature
	}

	fn sign(&mut self, key: PrivateKey) -> Result<(), SigningError> {
		self.non_closing_signature = self.sign_message(key)?.to_bytes().into();
		Ok(())
	}
}

/// Message to request channel watching from a monitoring service.
///
/// Carries the partner's signed balance proof together with two
/// signatures of this node: the non-closing signature over the
/// balance-proof-update packing, letting the service submit the proof
/// while this node is offline, and the reward proof signature over the
/// reward packing, entitling the service to its payment.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RequestMonitoring {
	pub balance_proof: SignedBlindedBalanceProof,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub reward_amount: TokenAmount,
	#[serde(deserialize_with = "signature_from_str")]
	pub non_closing_signature: Signature,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl RequestMonitoring {
	/// Total packed size.
	pub const SIZE: usize = 8 + 32 + 20 + 32 + 32 + 32 + 65 + 65 + 32 + 65;

	pub fn from_balance_proof_signed_state(
		balance_proof: &BalanceProofSignedState,
		reward_amount: TokenAmount,
	) -> Result<Self, MessageError> {
		let balance_proof = SignedBlindedBalanceProof::from_balance_proof_signed_state(balance_proof)?;
		Ok(Self {
			balance_proof,
			reward_amount,
			non_closing_signature: EMPTY_SIGNATURE.clone(),
			signature: EMPTY_SIGNATURE.clone(),
		})
	}

	/// The signature entitling the monitoring service to its reward.
	pub fn reward_proof_signature(&self) -> &Signature {
		&self.signature
	}

	/// Packed form of the request. Both signatures produced by `sign` must
	/// be present; packing an incompletely signed request is a programmer
	/// error.
	pub fn encode(&self) -> Result<Vec<u8>, MessageError> {
		if is_empty_signature(&self.non_closing_signature) {
			return Err(MessageError::MissingSignature)
		}
		if is_empty_signature(&self.signature) {
			return Err(MessageError::MissingSignature)
		}

		let mut packer = Packer::new(Self::SIZE);
		packer.write_u64(self.balance_proof.nonce);
		packer.write_u256(self.balance_proof.chain_id.into());
		packer.write_address(self.balance_proof.token_network_address);
		packer.write_u256(self.balance_proof.channel_identifier);
		packer.write_h256(self.balance_proof.balance_hash);
		packer.write_h256(self.balance_proof.additional_hash);
		packer.write_signature(&self.balance_proof.signature);
		packer.write_signature(&self.non_closing_signature);
		packer.write_u256(self.reward_amount);
		packer.write_signature(&self.signature);
		Ok(packer.finish())
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		let nonce = unpacker.read_u64()?;
		let chain_id: ChainID = unpacker.read_u256()?.into();
		let token_network_address = unpacker.read_address()?;
		let channel_identifier = unpacker.read_u256()?;
		let balance_hash = unpacker.read_h256()?;
		let additional_hash = unpacker.read_h256()?;
		let signature = unpacker.read_signature()?;
		let non_closing_signature = unpacker.read_signature()?;
		let reward_amount = unpacker.read_u256()?;
		let reward_proof_signature = unpacker.read_signature()?;
		unpacker.finish()?;

		Ok(Self {
			balance_proof: SignedBlindedBalanceProof {
				chain_id,
				token_network_address,
				channel_identifier,
				nonce,
				additional_hash,
				balance_hash,
				signature,
				non_closing_signature: non_closing_signature.clone(),
			},
			reward_amount,
			non_closing_signature,
			signature: reward_proof_signature,
		})
	}

	pub fn hash(&self) -> Result<MessageHash, MessageError> {
		Ok(keccak(&self.encode()?))
	}

	/// Verify integrity of a fully signed monitoring request: the partner
	/// must have signed the balance proof, the requesting node both the
	/// blinded update and the reward proof.
	pub fn verify_request_monitoring(
		&self,
		partner_address: Address,
		requesting_address: Address,
	) -> bool {
		if is_empty_signature(&self.non_closing_signature) {
			return false
		}

		let balance_proof_data = pack_balance_proof(
			self.balance_proof.nonce,
			self.balance_proof.balance_hash,
			self.balance_proof.additional_hash,
			self.balance_proof.canonical_identifier(),
			MessageTypeId::BalanceProof,
		);
		let blinded_data = pack_balance_proof_update(
			self.balance_proof.nonce,
			self.balance_proof.balance_hash,
			self.balance_proof.additional_hash,
			self.balance_proof.canonical_identifier(),
			self.balance_proof.signature.clone(),
		);
		let reward_proof_data = pack_reward_proof(
			self.balance_proof.canonical_identifier(),
			self.reward_amount,
			self.balance_proof.nonce,
		);

		let partner_signed = recover(&balance_proof_data.0, &self.balance_proof.signature.0)
			.map(|address| address == partner_address)
			.unwrap_or(false);
		let update_signed = recover(&blinded_data.0, &self.non_closing_signature.0)
			.map(|address| address == requesting_address)
			.unwrap_or(false);
		let reward_signed = recover(&reward_proof_data.0, &self.signature.0)
			.map(|address| address == requesting_address)
			.unwrap_or(false);

		partner_signed && update_signed && reward_signed
	}
}

impl SignedMessage for RequestMonitoring {
	fn bytes_to_sign(&self) -> Vec<u8> {
		pack_reward_proof(
			self.balance_proof.canonical_identifier(),
			self.reward_amount,
			self.balance_proof.nonce,
		)
		.0
	}

	fn signature(&self) -> &Signature {
		&self.signature
	}

	/// This method signs twice: the `non_closing_signature` for the
	/// balance proof update and the reward proof signature for the
	/// monitoring request itself.
	fn sign(&mut self, key: PrivateKey) -> Result<(), SigningError> {
		self.balance_proof.sign(key.clone())?;
		self.non_closing_signature = self.balance_proof.non_closing_signature.clone();
		self.signature = self.sign_message(key)?.to_bytes().into();
		Ok(())
	}
}
