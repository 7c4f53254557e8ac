use ethsign::SecretKey;
use web3::{
	signing::{
		self,
		keccak256,
		Key,
		RecoveryError,
	},
	types::{
		Address,
		H256,
	},
};

/// Hash `data` the way signatures commit to it: prefixed with the
/// Ethereum signed-message header and keccak-hashed.
pub fn hash_data(data: &[u8]) -> [u8; 32] {
	let prefix_msg = "\x19Ethereum Signed Message:\n";
	let len_str = data.len().to_string();
	let mut res: Vec<u8> = Vec::new();
	res.append(&mut prefix_msg.as_bytes().to_vec());
	res.append(&mut len_str.as_bytes().to_vec());
	res.append(&mut data.to_vec());

	keccak256(&res)
}

/// Recover the address which signed `data`. The signature's final byte
/// carries the recovery id offset by 27.
pub fn recover(data: &[u8], signature: &[u8]) -> Result<Address, RecoveryError> {
	if signature.len() != 65 {
		return Err(RecoveryError::InvalidSignature)
	}
	let data_hash = hash_data(data);
	let recovery_id = signature[64] as i32 - 27;
	signing::recover(&data_hash, &signature[..64], recovery_id)
}

/// A secp256k1 private key behind web3's `Key` signer abstraction.
#[derive(Clone)]
pub struct PrivateKey {
	inner: SecretKey,
}

impl PrivateKey {
	pub fn new(inner: SecretKey) -> Self {
		Self { inner }
	}
}

impl Key for PrivateKey {
	fn sign(
		&self,
		message: &[u8],
		chain_id: Option<u64>,
	) -> Result<signing::Signature, signing::SigningError> {
		let signature =
			self.inner.sign(message).map_err(|_| signing::SigningError::InvalidMessage)?;

		let standard_v = signature.v as u64;
		let v = if let Some(chain_id) = chain_id {
			standard_v + 35 + chain_id * 2
		} else {
			standard_v + 27
		};
		Ok(signing::Signature { r: H256::from(signature.r), s: H256::from(signature.s), v })
	}

	fn sign_message(&self, message: &[u8]) -> Result<signing::Signature, signing::SigningError> {
		let data_hash = hash_data(message);

		let signature =
			self.inner.sign(&data_hash).map_err(|_| signing::SigningError::InvalidMessage)?;

		Ok(signing::Signature {
			r: H256::from(signature.r),
			s: H256::from(signature.s),
			v: signature.v as u64 + 27,
		})
	}

	fn address(&self) -> Address {
		Address::from(self.inner.public().address())
	}
}
