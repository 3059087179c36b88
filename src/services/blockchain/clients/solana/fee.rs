//! Priority-fee auction pricing for Solana.
//!
//! A transaction pays a static signature fee plus `unit_limit * unit_price` micro-lamports of
//! priority fee. The Normal unit price is the average of the highest recent prioritization fee
//! samples, rounded up to [`PRICE_GRANULARITY`] and floored at a per-kind minimum. Slow and Fast
//! scale the Normal price and recompute their totals independently.

use alloy::primitives::U256;

use crate::{
	models::{
		ChainId, Fee, FeePriority, GasPricing, GasRule, TransactionIntent, TxKind,
		OPTION_TOKEN_ACCOUNT_CREATION,
	},
	services::transaction::{FeeCalculator, TransactionError},
};

/// Lamports per signature
pub const BASE_FEE: u64 = 5_000;
/// Number of highest samples averaged
pub const TOP_SAMPLES: usize = 5;
/// Micro-lamports
pub const PRICE_GRANULARITY: u64 = 1_000;
/// Size of an SPL token account, used for its rent exemption
pub const TOKEN_ACCOUNT_SIZE: u64 = 165;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolanaFeeState {
	/// Recent prioritization fee samples in micro-lamports per compute unit
	pub prioritization_fees: Vec<u64>,
	/// Rent exemption of a token account, in lamports
	pub token_account_rent: u64,
}

pub fn unit_limit(kind: TxKind) -> Option<u64> {
	match kind {
		TxKind::Transfer
		| TxKind::TokenTransfer
		| TxKind::StakeDelegate
		| TxKind::StakeUndelegate
		| TxKind::StakeWithdraw => Some(100_000),
		TxKind::Swap => Some(420_000),
		_ => None,
	}
}

fn min_unit_price(kind: TxKind) -> u64 {
	match kind {
		TxKind::TokenTransfer | TxKind::Swap => 100_000,
		_ => 10_000,
	}
}

/// Normal tier unit price for the given samples
pub fn priority_unit_price(samples: &[u64], minimum: u64) -> u64 {
	let mut top: Vec<u64> = samples.iter().copied().filter(|fee| *fee > 0).collect();
	top.sort_unstable_by(|a, b| b.cmp(a));
	top.truncate(TOP_SAMPLES);
	if top.is_empty() {
		return minimum;
	}

	let sum: u128 = top.iter().map(|fee| *fee as u128).sum();
	let average = (sum / top.len() as u128) as u64;
	let rounded = average.div_ceil(PRICE_GRANULARITY).saturating_mul(PRICE_GRANULARITY);
	rounded.max(minimum)
}

fn tier_price(priority: FeePriority, normal: u64) -> u64 {
	match priority {
		FeePriority::Slow => normal / 2,
		FeePriority::Normal => normal,
		FeePriority::Fast => normal.saturating_mul(3),
	}
}

pub struct SolanaFeeCalculator;

impl FeeCalculator for SolanaFeeCalculator {
	type State = SolanaFeeState;

	fn calculate(
		&self,
		intent: &TransactionIntent,
		state: &SolanaFeeState,
	) -> Result<Vec<Fee>, TransactionError> {
		let kind = intent.tx_kind();
		let limit = unit_limit(kind).ok_or_else(|| {
			TransactionError::fee_calculation_error(format!(
				"No fee model for {:?} on solana",
				kind
			))
		})?;
		let normal = priority_unit_price(&state.prioritization_fees, min_unit_price(kind));

		Ok(FeePriority::ALL
			.iter()
			.map(|priority| {
				let pricing = GasPricing::new(
					U256::from(tier_price(*priority, normal)),
					U256::from(limit),
					U256::ZERO,
					GasRule::MicroUnitPrice { base_fee: BASE_FEE },
				);
				let fee = Fee::gas(*priority, ChainId::Solana.fee_asset(), pricing);
				if kind == TxKind::TokenTransfer {
					fee.with_option(
						OPTION_TOKEN_ACCOUNT_CREATION,
						U256::from(state.token_account_rent),
					)
				} else {
					fee
				}
			})
			.collect())
	}
}
