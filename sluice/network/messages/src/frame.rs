#![warn(clippy::missing_docs_in_private_items)]

//! Cursors over the fixed per-class wire layouts. Every peer message is a
//! fixed-length byte string: integers big-endian, addresses 20 bytes,
//! digests 32 bytes and the signature always the trailing 65 bytes.

use sluice_primitives::types::{
	Address,
	Bytes,
	Signature,
	H256,
	U256,
	U64,
};

use crate::errors::MessageError;

/// Writes message fields at their fixed offsets.
pub(crate) struct Packer {
	/// The buffer being filled.
	data: Vec<u8>,
}

impl Packer {
	pub(crate) fn new(size: usize) -> Self {
		Self { data: Vec::with_capacity(size) }
	}

	pub(crate) fn write_u8(&mut self, value: u8) {
		self.data.push(value);
	}

	pub(crate) fn write_u64(&mut self, value: U64) {
		self.data.extend_from_slice(&value.as_bytes());
	}

	pub(crate) fn write_u64_padded(&mut self, value: U64) {
		self.data.extend_from_slice(&value.to_be_bytes());
	}

	pub(crate) fn write_u256(&mut self, value: U256) {
		let mut bytes = [0u8; 32];
		value.to_big_endian(&mut bytes);
		self.data.extend_from_slice(&bytes);
	}

	pub(crate) fn write_h256(&mut self, value: H256) {
		self.data.extend_from_slice(value.as_bytes());
	}

	pub(crate) fn write_address(&mut self, value: Address) {
		self.data.extend_from_slice(value.as_bytes());
	}

	pub(crate) fn write_bytes(&mut self, value: &[u8]) {
		self.data.extend_from_slice(value);
	}

	/// Write the trailing signature slot. An unsigned message carries 65
	/// zero bytes so that the layout stays fixed.
	pub(crate) fn write_signature(&mut self, signature: &Signature) {
		if signature.0.len() == 65 {
			self.data.extend_from_slice(&signature.0);
		} else {
			self.data.extend_from_slice(&[0u8; 65]);
		}
	}

	pub(crate) fn finish(self) -> Vec<u8> {
		self.data
	}
}

/// Reads message fields at their fixed offsets, rejecting short input and
/// trailing garbage.
pub(crate) struct Unpacker<'a> {
	/// The wire bytes being consumed.
	data: &'a [u8],
	/// Read position.
	offset: usize,
}

impl<'a> Unpacker<'a> {
	pub(crate) fn new(data: &'a [u8]) -> Self {
		Self { data, offset: 0 }
	}

	/// Consume the next `len` bytes.
	fn take(&mut self, len: usize) -> Result<&'a [u8], MessageError> {
		if self.offset + len > self.data.len() {
			return Err(MessageError::InvalidData("message data too short".to_owned()))
		}
		let slice = &self.data[self.offset..self.offset + len];
		self.offset += len;
		Ok(slice)
	}

	pub(crate) fn read_u8(&mut self) -> Result<u8, MessageError> {
		Ok(self.take(1)?[0])
	}

	pub(crate) fn read_u64(&mut self) -> Result<U64, MessageError> {
		let bytes: [u8; 8] = self.take(8)?.try_into().expect("slice length is fixed");
		Ok(U64::from(u64::from_be_bytes(bytes)))
	}

	/// A u64 value stored in a 32-byte slot; the 24 leading bytes must be
	/// zero.
	pub(crate) fn read_u64_padded(&mut self) -> Result<U64, MessageError> {
		let bytes = self.take(32)?;
		if bytes[..24].iter().any(|b| *b != 0) {
			return Err(MessageError::InvalidData("value does not fit into u64".to_owned()))
		}
		let tail: [u8; 8] = bytes[24..].try_into().expect("slice length is fixed");
		Ok(U64::from(u64::from_be_bytes(tail)))
	}

	pub(crate) fn read_u256(&mut self) -> Result<U256, MessageError> {
		Ok(U256::from_big_endian(self.take(32)?))
	}

	pub(crate) fn read_h256(&mut self) -> Result<H256, MessageError> {
		Ok(H256::from_slice(self.take(32)?))
	}

	pub(crate) fn read_bytes32(&mut self) -> Result<Bytes, MessageError> {
		Ok(Bytes(self.take(32)?.to_vec()))
	}

	pub(crate) fn read_address(&mut self) -> Result<Address, MessageError> {
		Ok(Address::from_slice(self.take(20)?))
	}

	pub(crate) fn read_signature(&mut self) -> Result<Signature, MessageError> {
		Ok(Bytes(self.take(65)?.to_vec()))
	}

	/// Assert the whole buffer was consumed.
	pub(crate) fn finish(self) -> Result<(), MessageError> {
		if self.offset != self.data.len() {
			return Err(MessageError::InvalidData("trailing bytes after message".to_owned()))
		}
		Ok(())
	}
}
