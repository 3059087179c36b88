use alloy::primitives::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::Add;

use crate::models::AssetId;

/// Balance of one asset, split by availability.
///
/// `reserved` is an amount the chain locks permanently (e.g. an account minimum) and is not
/// part of [`Balance::total_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Balance<T> {
	pub available: T,
	pub frozen: T,
	pub locked: T,
	pub staked: T,
	pub pending: T,
	pub rewards: T,
	pub reserved: T,
}

impl<T> Balance<T>
where
	T: Copy + Add<Output = T>,
{
	pub fn total_amount(&self) -> T {
		self.available + self.frozen + self.locked + self.staked + self.pending + self.rewards
	}
}

impl Balance<U256> {
	pub fn available(available: U256) -> Self {
		Self {
			available,
			..Default::default()
		}
	}

	/// Converts to a human readable balance with `decimals` fractional digits
	pub fn to_display(&self, decimals: u32) -> Result<Balance<Decimal>, rust_decimal::Error> {
		Ok(Balance {
			available: to_decimal(self.available, decimals)?,
			frozen: to_decimal(self.frozen, decimals)?,
			locked: to_decimal(self.locked, decimals)?,
			staked: to_decimal(self.staked, decimals)?,
			pending: to_decimal(self.pending, decimals)?,
			rewards: to_decimal(self.rewards, decimals)?,
			reserved: to_decimal(self.reserved, decimals)?,
		})
	}
}

fn to_decimal(value: U256, decimals: u32) -> Result<Decimal, rust_decimal::Error> {
	let mantissa = u128::try_from(value)
		.ok()
		.and_then(|value| i128::try_from(value).ok())
		.ok_or(rust_decimal::Error::ExceedsMaximumPossibleValue)?;
	Decimal::try_from_i128_with_scale(mantissa, decimals).map(|decimal| decimal.normalize())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetBalance {
	pub asset_id: AssetId,
	pub balance: Balance<U256>,
}

impl AssetBalance {
	pub fn new(asset_id: AssetId, balance: Balance<U256>) -> Self {
		Self { asset_id, balance }
	}
}

/// Balances of one account on one chain
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountBalances {
	pub native: AssetBalance,
	/// Token balances that could be fetched; tokens whose lookup failed are absent
	pub tokens: Vec<AssetBalance>,
}

impl AccountBalances {
	pub fn token(&self, token_id: &str) -> Option<&AssetBalance> {
		self.tokens
			.iter()
			.find(|balance| balance.asset_id.token_id.as_deref() == Some(token_id))
	}
}
