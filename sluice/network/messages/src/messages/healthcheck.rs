use serde::{
	Deserialize,
	Serialize,
};
use sluice_primitives::{
	deserializers::signature_from_str,
	signing::PrivateKey,
	traits::ToBytes,
	types::{
		MessageHash,
		Nonce,
		ProtocolVersion,
		Signature,
	},
};
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

/// Healthcheck message.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ping {
	pub nonce: Nonce,
	pub current_protocol_version: ProtocolVersion,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl Ping {
	/// Total wire size.
	pub const SIZE: usize = 1 + 8 + 1 + 65;

	pub fn encode(&self) -> Vec<u8> {
		let mut packer = Packer::new(Self::SIZE);
		packer.write_u8(CmdId::Ping.into());
		packer.write_u64(self.nonce);
		packer.write_u8(self.current_protocol_version);
		packer.write_signature(&self.signature);
		packer.finish()
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		if unpacker.read_u8()? != u8::from(CmdId::Ping) {
			return Err(MessageError::InvalidData("not a Ping message".to_owned()))
		}
		let ping = Self {
			nonce: unpacker.read_u64()?,
			current_protocol_version: unpacker.read_u8()?,
			signature: unpacker.read_signature()?,
		};
		unpacker.finish()?;
		Ok(ping)
	}

	pub fn hash(&self) -> MessageHash {
		keccak(&self.encode())
	}
}

impl SignedMessage for Ping {
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

/// Response to a Ping message.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pong {
	pub nonce: Nonce,
	#[serde(deserialize_with = "signature_from_str")]
	pub signature: Signature,
}

impl Pong {
	/// Total wire size.
	pub const SIZE: usize = 1 + 8 + 65;

	pub fn encode(&self) -> Vec<u8> {
		let mut packer = Packer::new(Self::SIZE);
		packer.write_u8(CmdId::Pong.into());
		packer.write_u64(self.nonce);
		packer.write_signature(&self.signature);
		packer.finish()
	}

	pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
		let mut unpacker = Unpacker::new(data);
		if unpacker.read_u8()? != u8::from(CmdId::Pong) {
			return Err(MessageError::InvalidData("not a Pong message".to_owned()))
		}
		let pong =
			Self { nonce: unpacker.read_u64()?, signature: unpacker.read_signature()? };
		unpacker.finish()?;
		Ok(pong)
	}

	pub fn hash(&self) -> MessageHash {
		keccak(&self.encode())
	}
}

impl SignedMessage for Pong {
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
