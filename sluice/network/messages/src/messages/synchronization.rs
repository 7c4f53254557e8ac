use serde::{
	Deserialize,
	Serialize,
};
use sluice_primitives::{
	constants::EMPTY_SIGNATURE,
	deserializers::{
		signature_from_str,
		u64_from_str,
	},
	signing::PrivateKey,
	traits::ToBytes,
	types::{
		MessageHash,
		MessageIdentifier,
		Signature,
	},
};
use sluice_state_machine::types::SendProcessed;
use web3::signing::SigningError;

use super::{
	keccak,
	CmdId,
	SignedMessage,
};
use crate::{
	errors::MessageError,
	frame::{
		Packer,
		Unpacker,
	},
};

/// All accepted messages should be confirmed by a `Processed` message
/// which echoes the original's message identifier.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Processed {
	#[serde(deserialize_with = "u64_from_str")]
	pub message_identifier: MessageIdentifier,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl Processed {
	/// Total wire size.
	pub const SIZE: usize = 1 + 8 + 65;

	pub fn encode(&self) -> Vec<u8> {
		let mut packer = Packer::new(Self::SIZE);
		packer.write_u8(CmdId::Processed.into());
		packer.write_u64(self.message_identifier.into());
		packer.write_signature(&self.signature);
		packer.finish()
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		if unpacker.read_u8()? != u8::from(CmdId::Processed) {
			return Err(MessageError::InvalidData("not a Processed message".to_owned()))
		}
		let processed = Self {
			message_identifier: unpacker.read_u64()?.into(),
			signature: unpacker.read_signature()?,
		};
		unpacker.finish()?;
		Ok(processed)
	}

	pub fn hash(&self) -> MessageHash {
		keccak(&self.encode())
	}
}

impl From<SendProcessed> for Processed {
	fn from(event: SendProcessed) -> Self {
		Self {
			message_identifier: event.message_identifier,
			signature: EMPTY_SIGNATURE.clone(),
		}
	}
}

impl SignedMessage for Processed {
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

/// Message used to inform the partner node that a message was received
/// *and* persisted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Delivered {
	#[serde(deserialize_with = "u64_from_str")]
	pub delivered_message_identifier: MessageIdentifier,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl Delivered {
	/// Total wire size.
	pub const SIZE: usize = 1 + 8 + 65;

	pub fn encode(&self) -> Vec<u8> {
		let mut packer = Packer::new(Self::SIZE);
		packer.write_u8(CmdId::Delivered.into());
		packer.write_u64(self.delivered_message_identifier.into());
		packer.write_signature(&self.signature);
		packer.finish()
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		if unpacker.read_u8()? != u8::from(CmdId::Delivered) {
			return Err(MessageError::InvalidData("not a Delivered message".to_owned()))
		}
		let delivered = Self {
			delivered_message_identifier: unpacker.read_u64()?.into(),
			signature: unpacker.read_signature()?,
		};
		unpacker.finish()?;
		Ok(delivered)
	}

	pub fn hash(&self) -> MessageHash {
		keccak(&self.encode())
	}
}

impl SignedMessage for Delivered {
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

/// Message which can be sent directly to all devices of a node, no room
/// required.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ToDevice {
	#[serde(deserialize_with = "u64_from_str")]
	pub message_identifier: MessageIdentifier,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl ToDevice {
	/// Total wire size.
	pub const SIZE: usize = 1 + 8 + 65;

	pub fn encode(&self) -> Vec<u8> {
		let mut packer = Packer::new(Self::SIZE);
		packer.write_u8(CmdId::ToDevice.into());
		packer.write_u64(self.message_identifier.into());
		packer.write_signature(&self.signature);
		packer.finish()
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		if unpacker.read_u8()? != u8::from(CmdId::ToDevice) {
			return Err(MessageError::InvalidData("not a ToDevice message".to_owned()))
		}
		let to_device = Self {
			message_identifier: unpacker.read_u64()?.into(),
			signature: unpacker.read_signature()?,
		};
		unpacker.finish()?;
		Ok(to_device)
	}

	pub fn hash(&self) -> MessageHash {
		keccak(&self.encode())
	}
}

impl SignedMessage for ToDevice {
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
