//! Gas-metered fees for Cosmos SDK chains.
//!
//! Each chain charges a flat amount per kind (transfer or staking) and every kind has a fixed
//! gas limit. The resulting [`Fee`] uses [`GasRule::FixedPrice`]: `max_unit_price` is the flat
//! amount itself.

use alloy::primitives::U256;

use crate::{
	models::{ChainId, Fee, FeePriority, GasPricing, GasRule, TransactionIntent, TxKind},
	services::{
		blockchain::cosmos::CosmosChainParams,
		transaction::{FeeCalculator, TransactionError},
	},
};

/// Gas limit per message for `kind`
pub fn gas_limit(kind: TxKind) -> Option<u64> {
	match kind {
		TxKind::Transfer | TxKind::TokenTransfer | TxKind::Swap => Some(200_000),
		TxKind::StakeDelegate | TxKind::StakeUndelegate => Some(1_000_000),
		TxKind::StakeRedelegate => Some(1_250_000),
		TxKind::StakeRewards => Some(900_000),
		TxKind::StakeWithdraw
		| TxKind::TokenApproval
		| TxKind::StakeFreeze
		| TxKind::StakeUnfreeze
		| TxKind::NftTransfer
		| TxKind::AccountActivation => None,
	}
}

pub struct CosmosFeeCalculator {
	chain: ChainId,
	params: CosmosChainParams,
}

impl CosmosFeeCalculator {
	pub fn new(chain: ChainId, params: CosmosChainParams) -> Self {
		Self { chain, params }
	}
}

impl FeeCalculator for CosmosFeeCalculator {
	type State = ();

	fn calculate(
		&self,
		intent: &TransactionIntent,
		_state: &(),
	) -> Result<Vec<Fee>, TransactionError> {
		let kind = intent.tx_kind();
		let limit = gas_limit(kind).ok_or_else(|| {
			TransactionError::fee_calculation_error(format!(
				"No fee model for {:?} on {}",
				kind, self.chain
			))
		})?;

		let amount = match kind {
			TxKind::Transfer | TxKind::TokenTransfer | TxKind::Swap => self.params.transfer_fee,
			_ if !self.params.supports_staking => {
				return Err(TransactionError::fee_calculation_error(format!(
					"{} does not support staking",
					self.chain
				)))
			}
			_ => self.params.stake_fee,
		};

		let pricing = GasPricing::new(
			U256::from(amount),
			U256::from(limit),
			U256::ZERO,
			GasRule::FixedPrice,
		);
		Ok(vec![Fee::gas(
			FeePriority::Normal,
			self.chain.fee_asset(),
			pricing,
		)])
	}
}
