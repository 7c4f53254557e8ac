#![warn(clippy::missing_docs_in_private_items)]

use web3::{
	signing::{
		keccak256,
		Signature,
	},
	types::{
		Address,
		U256,
	},
};

use crate::traits::{
	Checksum,
	ToBytes,
};

impl ToBytes for U256 {
	fn to_bytes(&self) -> Vec<u8> {
		let mut bytes = [0u8; 32];
		self.to_big_endian(&mut bytes);
		bytes.to_vec()
	}
}

impl ToBytes for Signature {
	fn to_bytes(&self) -> Vec<u8> {
		let rb = self.r.to_fixed_bytes();
		let sb = self.s.to_fixed_bytes();
		let sv = self.v.to_be_bytes();

		let mut b = vec![];
		b.extend(&rb);
		b.extend(&sb);
		b.push(sv[sv.len() - 1]);
		b
	}
}

/// EIP-55 mixed-case checksum encoding.
impl Checksum for Address {
	fn checksum(&self) -> String {
		let addr_hex = hex::encode(self.as_bytes());
		let hash = hex::encode(keccak256(addr_hex.as_bytes()));

		addr_hex.as_bytes().iter().zip(hash.as_bytes()).fold(
			"0x".to_owned(),
			|mut encoded, (addr, hash)| {
				encoded.push(if *hash >= 56 {
					addr.to_ascii_uppercase() as char
				} else {
					addr.to_ascii_lowercase() as char
				});
				encoded
			},
		)
	}
}
