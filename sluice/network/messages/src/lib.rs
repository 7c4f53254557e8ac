#![warn(clippy::missing_docs_in_private_items)]

//! The peer-to-peer messages of the sluice protocol: fixed-layout binary
//! framing, signing and sender recovery, the structured storage format and
//! the adaptors between messages and the state machine.

/// Message decoding entry points.
pub mod decode;
/// Message errors.
pub mod errors;
/// Fixed-layout binary framing.
mod frame;
/// The message taxonomy.
pub mod messages;
