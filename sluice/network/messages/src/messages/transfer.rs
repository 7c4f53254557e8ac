use serde::{
	Deserialize,
	Serialize,
};
use sluice_primitives::{
	constants::EMPTY_SIGNATURE,
	deserializers::{
		signature_from_str,
		u256_from_str,
		u64_from_str,
	},
	hashing::{
		hash_balance_data,
		hash_secret,
	},
	packing::pack_balance_proof,
	serializers::u256_to_str,
	signing::PrivateKey,
	traits::ToBytes,
	types::{
		Address,
		BlockExpiration,
		CanonicalIdentifier,
		ChainID,
		ChannelIdentifier,
		FeeAmount,
		LockHash,
		LockedAmount,
		Locksroot,
		MessageHash,
		MessageIdentifier,
		MessageTypeId,
		Nonce,
		PaymentIdentifier,
		Secret,
		SecretHash,
		Signature,
		TokenAddress,
		TokenAmount,
		TokenNetworkAddress,
	},
};
use sluice_state_machine::types::{
	BalanceProofSignedState,
	HashTimeLockState,
	LockedTransferSignedState,
	SendBalanceProof,
	SendLockExpired,
	SendLockedTransfer,
	SendRefundTransfer,
	SendSecretRequest,
	SendSecretReveal,
};
use web3::signing::SigningError;

use super::{
	keccak,
	CmdId,
	SignedEnvelopeMessage,
	SignedMessage,
};
use crate::{
	errors::MessageError,
	frame::{
		Packer,
		Unpacker,
	},
};

/// A balance proof requires a strictly positive nonce; zero marks the
/// absence of any proof.
fn assert_envelope_values(nonce: Nonce) -> Result<(), MessageError> {
	if nonce == Nonce::zero() {
		return Err(MessageError::InvalidValue("nonce cannot be zero".to_owned()))
	}
	Ok(())
}

/// Secrets travel as exactly 32 bytes.
fn assert_secret(secret: &Secret) -> Result<(), MessageError> {
	if secret.0.len() != 32 {
		return Err(MessageError::InvalidValue("secret must have 32 bytes".to_owned()))
	}
	Ok(())
}

/// Requests the secret which unlocks a secrethash.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SecretRequest {
	#[serde(deserialize_with = "u64_from_str")]
	pub message_identifier: MessageIdentifier,
	pub payment_identifier: PaymentIdentifier,
	pub secrethash: SecretHash,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub amount: TokenAmount,
	pub expiration: BlockExpiration,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl SecretRequest {
	/// Total wire size.
	pub const SIZE: usize = 1 + 8 + 8 + 32 + 32 + 32 + 65;

	pub fn encode(&self) -> Vec<u8> {
		let mut packer = Packer::new(Self::SIZE);
		packer.write_u8(CmdId::SecretRequest.into());
		packer.write_u64(self.message_identifier.into());
		packer.write_u64(self.payment_identifier);
		packer.write_h256(self.secrethash);
		packer.write_u256(self.amount);
		packer.write_u64_padded(self.expiration);
		packer.write_signature(&self.signature);
		packer.finish()
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		if unpacker.read_u8()? != u8::from(CmdId::SecretRequest) {
			return Err(MessageError::InvalidData("not a SecretRequest message".to_owned()))
		}
		let secret_request = Self {
			message_identifier: unpacker.read_u64()?.into(),
			payment_identifier: unpacker.read_u64()?,
			secrethash: unpacker.read_h256()?,
			amount: unpacker.read_u256()?,
			expiration: unpacker.read_u64_padded()?,
			signature: unpacker.read_signature()?,
		};
		unpacker.finish()?;
		Ok(secret_request)
	}

	pub fn hash(&self) -> MessageHash {
		keccak(&self.encode())
	}
}

impl From<SendSecretRequest> for SecretRequest {
	fn from(event: SendSecretRequest) -> Self {
		Self {
			message_identifier: event.message_identifier,
			payment_identifier: event.payment_identifier,
			secrethash: event.secrethash,
			amount: event.amount,
			expiration: event.expiration,
			signature: EMPTY_SIGNATURE.clone(),
		}
	}
}

impl SignedMessage for SecretRequest {
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

/// Message used to reveal a secret to a party known to have an interest
/// in it.
///
/// Revealing a secret on its own is not sufficient for a state change in
/// the channel; balances only move once the payer sends an up-to-date
/// balance proof.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RevealSecret {
	#[serde(deserialize_with = "u64_from_str")]
	pub message_identifier: MessageIdentifier,
	pub secret: Secret,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl RevealSecret {
	/// Total wire size.
	pub const SIZE: usize = 1 + 8 + 32 + 65;

	pub fn secrethash(&self) -> SecretHash {
		hash_secret(&self.secret.0)
	}

	pub fn validate(&self) -> Result<(), MessageError> {
		assert_secret(&self.secret)
	}

	pub fn encode(&self) -> Vec<u8> {
		let mut packer = Packer::new(Self::SIZE);
		packer.write_u8(CmdId::RevealSecret.into());
		packer.write_u64(self.message_identifier.into());
		packer.write_bytes(&self.secret.0);
		packer.write_signature(&self.signature);
		packer.finish()
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		if unpacker.read_u8()? != u8::from(CmdId::RevealSecret) {
			return Err(MessageError::InvalidData("not a RevealSecret message".to_owned()))
		}
		let reveal_secret = Self {
			message_identifier: unpacker.read_u64()?.into(),
			secret: unpacker.read_bytes32()?,
			signature: unpacker.read_signature()?,
		};
		unpacker.finish()?;
		Ok(reveal_secret)
	}

	pub fn hash(&self) -> MessageHash {
		keccak(&self.encode())
	}
}

impl From<SendSecretReveal> for RevealSecret {
	fn from(event: SendSecretReveal) -> Self {
		Self {
			message_identifier: event.message_identifier,
			secret: event.secret,
			signature: EMPTY_SIGNATURE.clone(),
		}
	}
}

impl SignedMessage for RevealSecret {
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

/// A single pending hash-time-locked amount. Not a message of its own, a
/// serializable structure reused by the transfer messages.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Lock {
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub amount: TokenAmount,
	pub expiration: BlockExpiration,
	pub secrethash: SecretHash,
}

impl Lock {
	/// Size of the canonical byte form.
	pub const SIZE: usize = 96;

	/// Canonical big-endian byte form, the unit the locksroot commits to.
	pub fn as_bytes(&self) -> Vec<u8> {
		let mut data = self.amount.to_bytes();
		data.extend_from_slice(&self.expiration.to_be_bytes());
		data.extend_from_slice(self.secrethash.as_bytes());
		data
	}

	pub fn lockhash(&self) -> LockHash {
		keccak(&self.as_bytes())
	}

	pub fn from_bytes(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		let lock = Self {
			amount: unpacker.read_u256()?,
			expiration: unpacker.read_u64_padded()?,
			secrethash: unpacker.read_h256()?,
		};
		unpacker.finish()?;
		Ok(lock)
	}
}

/// Message used to unlock a lock after its secret became known, moving
/// the lock's amount into `transferred_amount` and committing to the
/// reduced set of pending locks.
///
/// Only the payer side sends an `Unlock`; the recipient's locksroot is
/// updated once the message is received.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Unlock {
	#[serde(deserialize_with = "u64_from_str")]
	pub message_identifier: MessageIdentifier,
	pub payment_identifier: PaymentIdentifier,
	pub chain_id: ChainID,
	pub token_network_address: TokenNetworkAddress,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub channel_identifier: ChannelIdentifier,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub transferred_amount: TokenAmount,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub locked_amount: LockedAmount,
	pub locksroot: Locksroot,
	pub nonce: Nonce,
	pub secret: Secret,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl Unlock {
	/// Total wire size.
	pub const SIZE: usize = 1 + 32 + 8 + 8 + 8 + 20 + 32 + 32 + 32 + 32 + 32 + 65;

	pub fn secrethash(&self) -> SecretHash {
		hash_secret(&self.secret.0)
	}

	pub fn canonical_identifier(&self) -> CanonicalIdentifier {
		CanonicalIdentifier {
			chain_identifier: self.chain_id,
			token_network_address: self.token_network_address,
			channel_identifier: self.channel_identifier,
		}
	}

	pub fn validate(&self) -> Result<(), MessageError> {
		assert_envelope_values(self.nonce)?;
		assert_secret(&self.secret)
	}

	pub fn encode(&self) -> Vec<u8> {
		let mut packer = Packer::new(Self::SIZE);
		packer.write_u8(CmdId::Unlock.into());
		packer.write_u256(self.chain_id.into());
		packer.write_u64(self.message_identifier.into());
		packer.write_u64(self.payment_identifier);
		packer.write_u64(self.nonce);
		packer.write_address(self.token_network_address);
		packer.write_u256(self.channel_identifier);
		packer.write_u256(self.transferred_amount);
		packer.write_u256(self.locked_amount);
		packer.write_h256(self.locksroot);
		packer.write_bytes(&self.secret.0);
		packer.write_signature(&self.signature);
		packer.finish()
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		if unpacker.read_u8()? != u8::from(CmdId::Unlock) {
			return Err(MessageError::InvalidData("not an Unlock message".to_owned()))
		}
		let unlock = Self {
			chain_id: unpacker.read_u256()?.into(),
			message_identifier: unpacker.read_u64()?.into(),
			payment_identifier: unpacker.read_u64()?,
			nonce: unpacker.read_u64()?,
			token_network_address: unpacker.read_address()?,
			channel_identifier: unpacker.read_u256()?,
			transferred_amount: unpacker.read_u256()?,
			locked_amount: unpacker.read_u256()?,
			locksroot: unpacker.read_h256()?,
			secret: unpacker.read_bytes32()?,
			signature: unpacker.read_signature()?,
		};
		unpacker.finish()?;
		unlock.validate()?;
		Ok(unlock)
	}

	pub fn hash(&self) -> MessageHash {
		keccak(&self.encode())
	}
}

impl From<SendBalanceProof> for Unlock {
	fn from(event: SendBalanceProof) -> Self {
		let balance_proof = event.balance_proof.clone();
		Self {
			message_identifier: event.message_identifier,
			payment_identifier: event.payment_identifier,
			chain_id: balance_proof.chain_id(),
			token_network_address: balance_proof.token_network_address(),
			channel_identifier: balance_proof.channel_identifier(),
			transferred_amount: balance_proof.transferred_amount,
			locked_amount: balance_proof.locked_amount,
			locksroot: balance_proof.locksroot,
			nonce: balance_proof.nonce,
			secret: event.secret,
			signature: EMPTY_SIGNATURE.clone(),
		}
	}
}

impl SignedMessage for Unlock {
	fn bytes_to_sign(&self) -> Vec<u8> {
		let balance_hash =
			hash_balance_data(self.transferred_amount, self.locked_amount, self.locksroot);
		pack_balance_proof(
			self.nonce,
			balance_hash,
			self.message_hash(),
			self.canonical_identifier(),
			MessageTypeId::BalanceProof,
		)
		.0
	}

	fn signature(&self) -> &Signature {
		&self.signature
	}

	fn sign(&mut self, key: PrivateKey) -> Result<(), SigningError> {
		self.signature = self.sign_message(key)?.to_bytes().into();
		Ok(())
	}
}

impl SignedEnvelopeMessage for Unlock {
	fn message_hash(&self) -> MessageHash {
		keccak(&self.encode()[..Self::SIZE - 65])
	}
}

/// A transfer which commits the sender to pay `lock.amount` to whoever
/// presents the secret matching `lock.secrethash` before the lock
/// expires.
///
/// The locked amount is carried in the locksroot commitment and only
/// moves into `transferred_amount` once the secret is revealed and the
/// lock unlocked. `target` is the final recipient of the payment,
/// `initiator` the party that knows the secret. Fees are payable by the
/// initiator; a mediator deducts its own fee from the forwarded amount.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LockedTransfer {
	#[serde(deserialize_with = "u64_from_str")]
	pub message_identifier: MessageIdentifier,
	pub payment_identifier: PaymentIdentifier,
	pub chain_id: ChainID,
	pub token_network_address: TokenNetworkAddress,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub channel_identifier: ChannelIdentifier,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub transferred_amount: TokenAmount,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub locked_amount: LockedAmount,
	pub locksroot: Locksroot,
	pub token: TokenAddress,
	pub recipient: Address,
	pub lock: Lock,
	pub target: Address,
	pub initiator: Address,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub fee: FeeAmount,
	pub nonce: Nonce,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl LockedTransfer {
	/// Total wire size.
	pub const SIZE: usize =
		1 + 32 + 8 + 8 + 8 + 20 + 32 + 32 + 32 + 32 + 20 + 20 + 20 + 20 + Lock::SIZE + 32 + 65;

	pub fn canonical_identifier(&self) -> CanonicalIdentifier {
		CanonicalIdentifier {
			chain_identifier: self.chain_id,
			token_network_address: self.token_network_address,
			channel_identifier: self.channel_identifier,
		}
	}

	pub fn validate(&self) -> Result<(), MessageError> {
		assert_envelope_values(self.nonce)
	}

	pub fn encode(&self) -> Vec<u8> {
		let mut packer = Packer::new(Self::SIZE);
		packer.write_u8(CmdId::LockedTransfer.into());
		pack_locked_transfer_body(&mut packer, self);
		packer.finish()
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		if unpacker.read_u8()? != u8::from(CmdId::LockedTransfer) {
			return Err(MessageError::InvalidData("not a LockedTransfer message".to_owned()))
		}
		let locked_transfer = unpack_locked_transfer_body(&mut unpacker)?;
		unpacker.finish()?;
		locked_transfer.validate()?;
		Ok(locked_transfer)
	}

	pub fn hash(&self) -> MessageHash {
		keccak(&self.encode())
	}
}

/// The fields shared by `LockedTransfer` and `RefundTransfer`, in wire
/// order.
fn pack_locked_transfer_body(packer: &mut Packer, message: &LockedTransfer) {
	packer.write_u256(message.chain_id.into());
	packer.write_u64(message.message_identifier.into());
	packer.write_u64(message.payment_identifier);
	packer.write_u64(message.nonce);
	packer.write_address(message.token_network_address);
	packer.write_u256(message.channel_identifier);
	packer.write_u256(message.transferred_amount);
	packer.write_u256(message.locked_amount);
	packer.write_h256(message.locksroot);
	packer.write_address(message.token);
	packer.write_address(message.recipient);
	packer.write_address(message.target);
	packer.write_address(message.initiator);
	packer.write_bytes(&message.lock.as_bytes());
	packer.write_u256(message.fee);
	packer.write_signature(&message.signature);
}

/// Inverse of [`pack_locked_transfer_body`].
fn unpack_locked_transfer_body(unpacker: &mut Unpacker) -> Result<LockedTransfer, MessageError> {
	Ok(LockedTransfer {
		chain_id: unpacker.read_u256()?.into(),
		message_identifier: unpacker.read_u64()?.into(),
		payment_identifier: unpacker.read_u64()?,
		nonce: unpacker.read_u64()?,
		token_network_address: unpacker.read_address()?,
		channel_identifier: unpacker.read_u256()?,
		transferred_amount: unpacker.read_u256()?,
		locked_amount: unpacker.read_u256()?,
		locksroot: unpacker.read_h256()?,
		token: unpacker.read_address()?,
		recipient: unpacker.read_address()?,
		target: unpacker.read_address()?,
		initiator: unpacker.read_address()?,
		lock: Lock {
			amount: unpacker.read_u256()?,
			expiration: unpacker.read_u64_padded()?,
			secrethash: unpacker.read_h256()?,
		},
		fee: unpacker.read_u256()?,
		signature: unpacker.read_signature()?,
	})
}

impl From<SendLockedTransfer> for LockedTransfer {
	fn from(event: SendLockedTransfer) -> Self {
		let transfer = event.transfer.clone();
		let balance_proof = transfer.balance_proof;
		Self {
			message_identifier: event.message_identifier,
			payment_identifier: transfer.payment_identifier,
			chain_id: balance_proof.chain_id(),
			token_network_address: balance_proof.token_network_address(),
			channel_identifier: balance_proof.channel_identifier(),
			transferred_amount: balance_proof.transferred_amount,
			locked_amount: balance_proof.locked_amount,
			locksroot: balance_proof.locksroot,
			token: transfer.token,
			recipient: event.inner.recipient,
			lock: Lock {
				amount: transfer.lock.amount,
				expiration: transfer.lock.expiration,
				secrethash: transfer.lock.secrethash,
			},
			target: transfer.target,
			initiator: transfer.initiator,
			fee: FeeAmount::zero(),
			nonce: balance_proof.nonce,
			signature: EMPTY_SIGNATURE.clone(),
		}
	}
}

impl SignedMessage for LockedTransfer {
	fn bytes_to_sign(&self) -> Vec<u8> {
		let balance_hash =
			hash_balance_data(self.transferred_amount, self.locked_amount, self.locksroot);
		pack_balance_proof(
			self.nonce,
			balance_hash,
			self.message_hash(),
			self.canonical_identifier(),
			MessageTypeId::BalanceProof,
		)
		.0
	}

	fn signature(&self) -> &Signature {
		&self.signature
	}

	fn sign(&mut self, key: PrivateKey) -> Result<(), SigningError> {
		self.signature = self.sign_message(key)?.to_bytes().into();
		Ok(())
	}
}

impl SignedEnvelopeMessage for LockedTransfer {
	fn message_hash(&self) -> MessageHash {
		keccak(&self.encode()[..Self::SIZE - 65])
	}
}

/// A special locked transfer sent from a payee back to a payer, signalling
/// that no route was available and refunding the payer so a new path may
/// be tried. Same layout as `LockedTransfer` under its own command id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RefundTransfer {
	#[serde(deserialize_with = "u64_from_str")]
	pub message_identifier: MessageIdentifier,
	pub payment_identifier: PaymentIdentifier,
	pub chain_id: ChainID,
	pub token_network_address: TokenNetworkAddress,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub channel_identifier: ChannelIdentifier,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub transferred_amount: TokenAmount,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub locked_amount: LockedAmount,
	pub locksroot: Locksroot,
	pub token: TokenAddress,
	pub recipient: Address,
	pub lock: Lock,
	pub target: Address,
	pub initiator: Address,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub fee: FeeAmount,
	pub nonce: Nonce,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl RefundTransfer {
	/// Total wire size.
	pub const SIZE: usize = LockedTransfer::SIZE;

	pub fn canonical_identifier(&self) -> CanonicalIdentifier {
		CanonicalIdentifier {
			chain_identifier: self.chain_id,
			token_network_address: self.token_network_address,
			channel_identifier: self.channel_identifier,
		}
	}

	pub fn validate(&self) -> Result<(), MessageError> {
		assert_envelope_values(self.nonce)
	}

	pub fn encode(&self) -> Vec<u8> {
		let mut packer = Packer::new(Self::SIZE);
		packer.write_u8(CmdId::RefundTransfer.into());
		pack_locked_transfer_body(&mut packer, &self.as_locked_transfer());
		packer.finish()
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		if unpacker.read_u8()? != u8::from(CmdId::RefundTransfer) {
			return Err(MessageError::InvalidData("not a RefundTransfer message".to_owned()))
		}
		let refund = Self::from_locked_transfer(unpack_locked_transfer_body(&mut unpacker)?);
		unpacker.finish()?;
		refund.validate()?;
		Ok(refund)
	}

	pub fn hash(&self) -> MessageHash {
		keccak(&self.encode())
	}

	/// View the refund under the shared transfer layout.
	fn as_locked_transfer(&self) -> LockedTransfer {
		LockedTransfer {
			message_identifier: self.message_identifier,
			payment_identifier: self.payment_identifier,
			chain_id: self.chain_id,
			token_network_address: self.token_network_address,
			channel_identifier: self.channel_identifier,
			transferred_amount: self.transferred_amount,
			locked_amount: self.locked_amount,
			locksroot: self.locksroot,
			token: self.token,
			recipient: self.recipient,
			lock: self.lock.clone(),
			target: self.target,
			initiator: self.initiator,
			fee: self.fee,
			nonce: self.nonce,
			signature: self.signature.clone(),
		}
	}

	/// Inverse of [`RefundTransfer::as_locked_transfer`].
	fn from_locked_transfer(message: LockedTransfer) -> Self {
		Self {
			message_identifier: message.message_identifier,
			payment_identifier: message.payment_identifier,
			chain_id: message.chain_id,
			token_network_address: message.token_network_address,
			channel_identifier: message.channel_identifier,
			transferred_amount: message.transferred_amount,
			locked_amount: message.locked_amount,
			locksroot: message.locksroot,
			token: message.token,
			recipient: message.recipient,
			lock: message.lock,
			target: message.target,
			initiator: message.initiator,
			fee: message.fee,
			nonce: message.nonce,
			signature: message.signature,
		}
	}
}

impl From<SendRefundTransfer> for RefundTransfer {
	fn from(event: SendRefundTransfer) -> Self {
		let transfer = event.transfer.clone();
		let balance_proof = transfer.balance_proof;
		Self {
			message_identifier: event.message_identifier,
			payment_identifier: transfer.payment_identifier,
			chain_id: balance_proof.chain_id(),
			token_network_address: balance_proof.token_network_address(),
			channel_identifier: balance_proof.channel_identifier(),
			transferred_amount: balance_proof.transferred_amount,
			locked_amount: balance_proof.locked_amount,
			locksroot: balance_proof.locksroot,
			token: transfer.token,
			recipient: event.inner.recipient,
			lock: Lock {
				amount: transfer.lock.amount,
				expiration: transfer.lock.expiration,
				secrethash: transfer.lock.secrethash,
			},
			target: transfer.target,
			initiator: transfer.initiator,
			fee: FeeAmount::zero(),
			nonce: balance_proof.nonce,
			signature: EMPTY_SIGNATURE.clone(),
		}
	}
}

impl SignedMessage for RefundTransfer {
	fn bytes_to_sign(&self) -> Vec<u8> {
		let balance_hash =
			hash_balance_data(self.transferred_amount, self.locked_amount, self.locksroot);
		pack_balance_proof(
			self.nonce,
			balance_hash,
			self.message_hash(),
			self.canonical_identifier(),
			MessageTypeId::BalanceProof,
		)
		.0
	}

	fn signature(&self) -> &Signature {
		&self.signature
	}

	fn sign(&mut self, key: PrivateKey) -> Result<(), SigningError> {
		self.signature = self.sign_message(key)?.to_bytes().into();
		Ok(())
	}
}

impl SignedEnvelopeMessage for RefundTransfer {
	fn message_hash(&self) -> MessageHash {
		keccak(&self.encode()[..Self::SIZE - 65])
	}
}

/// Message used to notify the opposite channel participant that a lock
/// has expired and was removed from the locksroot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LockExpired {
	#[serde(deserialize_with = "u64_from_str")]
	pub message_identifier: MessageIdentifier,
	pub chain_id: ChainID,
	pub token_network_address: TokenNetworkAddress,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub channel_identifier: ChannelIdentifier,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub transferred_amount: TokenAmount,
	#[serde(deserialize_with = "u256_from_str", serialize_with = "u256_to_str")]
	pub locked_amount: LockedAmount,
	pub locksroot: Locksroot,
	pub nonce: Nonce,
	pub recipient: Address,
	pub secrethash: SecretHash,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl LockExpired {
	/// Total wire size.
	pub const SIZE: usize = 1 + 32 + 8 + 8 + 20 + 32 + 32 + 32 + 32 + 20 + 32 + 65;

	pub fn canonical_identifier(&self) -> CanonicalIdentifier {
		CanonicalIdentifier {
			chain_identifier: self.chain_id,
			token_network_address: self.token_network_address,
			channel_identifier: self.channel_identifier,
		}
	}

	pub fn validate(&self) -> Result<(), MessageError> {
		assert_envelope_values(self.nonce)
	}

	pub fn encode(&self) -> Vec<u8> {
		let mut packer = Packer::new(Self::SIZE);
		packer.write_u8(CmdId::LockExpired.into());
		packer.write_u256(self.chain_id.into());
		packer.write_u64(self.message_identifier.into());
		packer.write_u64(self.nonce);
		packer.write_address(self.token_network_address);
		packer.write_u256(self.channel_identifier);
		packer.write_u256(self.transferred_amount);
		packer.write_u256(self.locked_amount);
		packer.write_h256(self.locksroot);
		packer.write_address(self.recipient);
		packer.write_h256(self.secrethash);
		packer.write_signature(&self.signature);
		packer.finish()
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		if unpacker.read_u8()? != u8::from(CmdId::LockExpired) {
			return Err(MessageError::InvalidData("not a LockExpired message".to_owned()))
		}
		let lock_expired = Self {
			chain_id: unpacker.read_u256()?.into(),
			message_identifier: unpacker.read_u64()?.into(),
			nonce: unpacker.read_u64()?,
			token_network_address: unpacker.read_address()?,
			channel_identifier: unpacker.read_u256()?,
			transferred_amount: unpacker.read_u256()?,
			locked_amount: unpacker.read_u256()?,
			locksroot: unpacker.read_h256()?,
			recipient: unpacker.read_address()?,
			secrethash: unpacker.read_h256()?,
			signature: unpacker.read_signature()?,
		};
		unpacker.finish()?;
		lock_expired.validate()?;
		Ok(lock_expired)
	}

	pub fn hash(&self) -> MessageHash {
		keccak(&self.encode())
	}
}

impl From<SendLockExpired> for LockExpired {
	fn from(event: SendLockExpired) -> Self {
		let balance_proof = event.balance_proof.clone();
		Self {
			message_identifier: event.message_identifier,
			chain_id: balance_proof.chain_id(),
			token_network_address: balance_proof.token_network_address(),
			channel_identifier: balance_proof.channel_identifier(),
			transferred_amount: balance_proof.transferred_amount,
			locked_amount: balance_proof.locked_amount,
			locksroot: balance_proof.locksroot,
			nonce: balance_proof.nonce,
			recipient: event.inner.recipient,
			secrethash: event.secrethash,
			signature: EMPTY_SIGNATURE.clone(),
		}
	}
}

impl SignedMessage for LockExpired {
	fn bytes_to_sign(&self) -> Vec<u8> {
		let balance_hash =
			hash_balance_data(self.transferred_amount, self.locked_amount, self.locksroot);
		pack_balance_proof(
			self.nonce,
			balance_hash,
			self.message_hash(),
			self.canonical_identifier(),
			MessageTypeId::BalanceProof,
		)
		.0
	}

	fn signature(&self) -> &Signature {
		&self.signature
	}

	fn sign(&mut self, key: PrivateKey) -> Result<(), SigningError> {
		self.signature = self.sign_message(key)?.to_bytes().into();
		Ok(())
	}
}

impl SignedEnvelopeMessage for LockExpired {
	fn message_hash(&self) -> MessageHash {
		keccak(&self.encode()[..Self::SIZE - 65])
	}
}

/// Lift a signed incoming `LockedTransfer` into the state the transfer
/// machines operate on. Fails when the sender cannot be recovered from
/// the message signature.
pub fn locked_transfer_signed_from_message(
	message: &LockedTransfer,
) -> Result<LockedTransferSignedState, MessageError> {
	let sender = message.sender().ok_or(MessageError::InvalidSignature)?;

	let balance_proof = BalanceProofSignedState::new(
		message.nonce,
		message.transferred_amount,
		message.locked_amount,
		message.locksroot,
		message.canonical_identifier(),
		message.message_hash(),
		message.signature.clone(),
		sender,
	)
	.map_err(|e| MessageError::InvalidValue(e.msg))?;

	let lock =
		HashTimeLockState::create(message.lock.amount, message.lock.expiration, message.lock.secrethash);

	Ok(LockedTransferSignedState {
		message_identifier: message.message_identifier,
		payment_identifier: message.payment_identifier,
		token: message.token,
		balance_proof,
		lock,
		initiator: message.initiator,
		target: message.target,
	})
}
