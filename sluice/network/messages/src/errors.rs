#![warn(clippy::missing_docs_in_private_items)]

use thiserror::Error;

/// Errors surfaced by the message layer.
///
/// Invariant violations are fatal at the point of construction, no partial
/// message value ever escapes. A failed sender recovery on the other hand
/// is not an error here; it surfaces as an undefined sender and the state
/// machine decides the policy.
#[derive(Error, Debug)]
pub enum MessageError {
	#[error("Invalid message type (CMDID = {0:#04x})")]
	UnknownCmdId(u8),
	#[error("Invalid message type (type = {0})")]
	UnknownType(String),
	#[error("Invalid message data: {0}")]
	InvalidData(String),
	#[error("{0}")]
	InvalidValue(String),
	#[error("Signature missing, did you forget to call sign()?")]
	MissingSignature,
	#[error("Invalid signature")]
	InvalidSignature,
	#[error("Deserialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}
