#![warn(clippy::missing_docs_in_private_items)]

use std::str::FromStr;

use derive_more::Display;
use web3::types::U256;

/// The identifier of the chain a channel lives on. Well-known networks get
/// a named variant, everything else is `Private`.
#[derive(Copy, Clone, Display, Debug, Eq, Hash, PartialEq)]
pub enum ChainID {
	Mainnet,
	Ropsten,
	Rinkeby,
	Goerli,
	Private(U256),
}

impl From<u64> for ChainID {
	fn from(value: u64) -> Self {
		match value {
			1 => ChainID::Mainnet,
			3 => ChainID::Ropsten,
			4 => ChainID::Rinkeby,
			5 => ChainID::Goerli,
			id => ChainID::Private(id.into()),
		}
	}
}

impl From<U256> for ChainID {
	fn from(value: U256) -> Self {
		if value > U256::from(u64::MAX) {
			return ChainID::Private(value)
		}
		value.low_u64().into()
	}
}

impl From<ChainID> for U256 {
	fn from(val: ChainID) -> Self {
		match val {
			ChainID::Mainnet => 1u64.into(),
			ChainID::Ropsten => 3u64.into(),
			ChainID::Rinkeby => 4u64.into(),
			ChainID::Goerli => 5u64.into(),
			ChainID::Private(id) => id,
		}
	}
}

impl From<ChainID> for Vec<u8> {
	fn from(val: ChainID) -> Self {
		let chain_id: U256 = val.into();
		let mut bytes = [0u8; 32];
		chain_id.to_big_endian(&mut bytes);
		bytes.to_vec()
	}
}

impl FromStr for ChainID {
	type Err = ();

	fn from_str(s: &str) -> Result<ChainID, ()> {
		let value = U256::from_dec_str(s).map_err(|_| ())?;
		Ok(value.into())
	}
}
