#![warn(clippy::missing_docs_in_private_items)]

use crate::{
	errors::MessageError,
	messages::{
		CmdId,
		Delivered,
		LockExpired,
		LockedTransfer,
		Message,
		Ping,
		Pong,
		Processed,
		RefundTransfer,
		RevealSecret,
		SecretRequest,
		ToDevice,
		Unlock,
	},
};

/// The type tags of the structured format, a closed set. `"Secret"` is
/// the historical alias of `"Unlock"`.
const KNOWN_TYPES: [&str; 14] = [
	"Ping",
	"Pong",
	"Processed",
	"Delivered",
	"ToDevice",
	"SecretRequest",
	"RevealSecret",
	"Secret",
	"Unlock",
	"LockedTransfer",
	"RefundTransfer",
	"LockExpired",
	"RequestMonitoring",
	"UpdatePFS",
];

/// Entry points turning untrusted input into typed messages.
pub struct MessageDecoder;

impl MessageDecoder {
	/// Decode a peer message from its wire bytes. The first byte selects
	/// the message class.
	pub fn decode(data: &[u8]) -> Result<Message, MessageError> {
		let cmdid =
			*data.first().ok_or_else(|| MessageError::InvalidData("empty message".to_owned()))?;

		match cmdid {
			c if c == CmdId::Processed as u8 => Ok(Message::Processed(Processed::decode(data)?)),
			c if c == CmdId::Ping as u8 => Ok(Message::Ping(Ping::decode(data)?)),
			c if c == CmdId::Pong as u8 => Ok(Message::Pong(Pong::decode(data)?)),
			c if c == CmdId::SecretRequest as u8 =>
				Ok(Message::SecretRequest(SecretRequest::decode(data)?)),
			c if c == CmdId::Unlock as u8 => Ok(Message::Unlock(Unlock::decode(data)?)),
			c if c == CmdId::LockedTransfer as u8 =>
				Ok(Message::LockedTransfer(LockedTransfer::decode(data)?)),
			c if c == CmdId::RefundTransfer as u8 =>
				Ok(Message::RefundTransfer(RefundTransfer::decode(data)?)),
			c if c == CmdId::RevealSecret as u8 =>
				Ok(Message::RevealSecret(RevealSecret::decode(data)?)),
			c if c == CmdId::Delivered as u8 => Ok(Message::Delivered(Delivered::decode(data)?)),
			c if c == CmdId::LockExpired as u8 =>
				Ok(Message::LockExpired(LockExpired::decode(data)?)),
			c if c == CmdId::ToDevice as u8 => Ok(Message::ToDevice(ToDevice::decode(data)?)),
			_ => Err(MessageError::UnknownCmdId(cmdid)),
		}
	}

	/// Decode a message from its structured dictionary form, dispatching
	/// on the `"type"` tag.
	pub fn from_json(value: serde_json::Value) -> Result<Message, MessageError> {
		let message_type = value
			.get("type")
			.and_then(|v| v.as_str())
			.ok_or_else(|| {
				MessageError::InvalidData("Can not find the message type".to_owned())
			})?
			.to_owned();

		if !KNOWN_TYPES.contains(&message_type.as_str()) {
			return Err(MessageError::UnknownType(message_type))
		}

		let message: Message = serde_json::from_value(value)?;

		// the structured path must uphold the same invariants as the
		// binary one
		match &message {
			Message::RevealSecret(inner) => inner.validate()?,
			Message::Unlock(inner) => inner.validate()?,
			Message::LockedTransfer(inner) => inner.validate()?,
			Message::RefundTransfer(inner) => inner.validate()?,
			Message::LockExpired(inner) => inner.validate()?,
			_ => {},
		}

		Ok(message)
	}
}
