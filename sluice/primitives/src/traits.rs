#![warn(clippy::missing_docs_in_private_items)]

/// Convert type to its big-endian byte form.
pub trait ToBytes {
	fn to_bytes(&self) -> Vec<u8>;
}

/// Checksum an address.
pub trait Checksum {
	fn checksum(&self) -> String;
}
