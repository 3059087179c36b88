//! Tron addresses: a 0x41 prefix and 20 byte account id, base58check encoded.

use alloy::primitives::Address;
use std::{fmt, str::FromStr};

use crate::services::transaction::TransactionError;

pub const ADDRESS_PREFIX: u8 = 0x41;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TronAddress([u8; 21]);

impl TronAddress {
	pub fn from_evm(address: Address) -> Self {
		let mut bytes = [0u8; 21];
		bytes[0] = ADDRESS_PREFIX;
		bytes[1..].copy_from_slice(address.as_slice());
		Self(bytes)
	}

	/// The 20 byte account id as used in contract calldata
	pub fn evm_address(&self) -> Address {
		Address::from_slice(&self.0[1..])
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}

impl FromStr for TronAddress {
	type Err = TransactionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = bs58::decode(s)
			.with_check(Some(ADDRESS_PREFIX))
			.into_vec()
			.map_err(|e| {
				TransactionError::encoding_error(format!("Invalid Tron address {}: {}", s, e))
			})?;
		let bytes: [u8; 21] = bytes.try_into().map_err(|_| {
			TransactionError::encoding_error(format!("Tron address {} is not 21 bytes", s))
		})?;
		Ok(Self(bytes))
	}
}

impl fmt::Display for TronAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", bs58::encode(self.0).with_check().into_string())
	}
}

impl fmt::Debug for TronAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TronAddress({})", self)
	}
}
