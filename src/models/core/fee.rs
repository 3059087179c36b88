use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::AssetId;

/// Fee option key for creating the recipient's token account
pub const OPTION_TOKEN_ACCOUNT_CREATION: &str = "tokenAccountCreation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum FeePriority {
	Slow,
	Normal,
	Fast,
}

impl FeePriority {
	pub const ALL: [FeePriority; 3] = [FeePriority::Slow, FeePriority::Normal, FeePriority::Fast];
}

/// How the total of a gas fee relates to its components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum GasRule {
	/// `unit_limit * max_unit_price + miner_tip`
	Standard,
	/// The chain charges a flat per-kind fee; `max_unit_price` carries the whole amount
	FixedPrice,
	/// `base_fee + ceil(unit_limit * max_unit_price / 1_000_000)`; the unit price is quoted
	/// in millionths of the fee unit
	MicroUnitPrice { base_fee: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GasPricing {
	pub max_unit_price: U256,
	pub unit_limit: U256,
	pub miner_tip: U256,
	pub rule: GasRule,
}

impl GasPricing {
	pub fn new(max_unit_price: U256, unit_limit: U256, miner_tip: U256, rule: GasRule) -> Self {
		Self {
			max_unit_price,
			unit_limit,
			miner_tip,
			rule,
		}
	}

	/// Total amount implied by the pricing components
	pub fn total(&self) -> U256 {
		match self.rule {
			GasRule::Standard => self.unit_limit * self.max_unit_price + self.miner_tip,
			GasRule::FixedPrice => self.max_unit_price,
			GasRule::MicroUnitPrice { base_fee } => {
				let micro = self.unit_limit * self.max_unit_price;
				let scale = U256::from(1_000_000u64);
				U256::from(base_fee) + micro.div_ceil(scale)
			}
		}
	}
}

/// Fee for one priority tier.
///
/// `options` holds optional surcharges (e.g. creating the recipient's token account) which are
/// only added to `amount` through [`Fee::with_options`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Fee {
	pub priority: FeePriority,
	pub fee_asset_id: AssetId,
	pub amount: U256,
	pub options: BTreeMap<String, U256>,
	pub gas: Option<GasPricing>,
}

impl Fee {
	pub fn new(priority: FeePriority, fee_asset_id: AssetId, amount: U256) -> Self {
		Self {
			priority,
			fee_asset_id,
			amount,
			options: BTreeMap::new(),
			gas: None,
		}
	}

	/// Creates a gas fee whose amount is derived from its pricing
	pub fn gas(priority: FeePriority, fee_asset_id: AssetId, pricing: GasPricing) -> Self {
		Self {
			priority,
			fee_asset_id,
			amount: pricing.total(),
			options: BTreeMap::new(),
			gas: Some(pricing),
		}
	}

	pub fn with_option(mut self, key: impl Into<String>, value: U256) -> Self {
		self.options.insert(key.into(), value);
		self
	}

	/// Returns a copy whose amount additionally includes every option whose key contains
	/// `filter`. Options are accumulated, never substituted for the base amount.
	pub fn with_options(&self, filter: &str) -> Self {
		let extra = self
			.options
			.iter()
			.filter(|(key, _)| key.contains(filter))
			.fold(U256::ZERO, |acc, (_, value)| acc + *value);
		Self {
			amount: self.amount + extra,
			..self.clone()
		}
	}

	pub fn unit_limit(&self) -> Option<U256> {
		self.gas.as_ref().map(|gas| gas.unit_limit)
	}

	pub fn unit_price(&self) -> Option<U256> {
		self.gas.as_ref().map(|gas| gas.max_unit_price)
	}
}
