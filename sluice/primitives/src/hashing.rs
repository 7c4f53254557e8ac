#![warn(clippy::missing_docs_in_private_items)]

use web3::signing::keccak256;

use crate::{
	constants::EMPTY_BALANCE_HASH,
	traits::ToBytes,
	types::{
		BalanceHash,
		LockedAmount,
		Locksroot,
		SecretHash,
		TokenAmount,
	},
};

/// Derive the hash a secret must unlock.
pub fn hash_secret(secret: &[u8]) -> SecretHash {
	SecretHash::from(keccak256(secret))
}

/// Hash of a channel end's balance data, as checked by the on-chain
/// verifier. The all-zero balance hashes to the all-zero digest.
pub fn hash_balance_data(
	transferred_amount: TokenAmount,
	locked_amount: LockedAmount,
	locksroot: Locksroot,
) -> BalanceHash {
	if transferred_amount.is_zero() && locked_amount.is_zero() && locksroot.is_zero() {
		return *EMPTY_BALANCE_HASH
	}

	let mut data = transferred_amount.to_bytes();
	data.extend(locked_amount.to_bytes());
	data.extend(locksroot.as_bytes());
	BalanceHash::from(keccak256(&data))
}
