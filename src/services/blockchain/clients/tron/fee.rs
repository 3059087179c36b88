//! Resource based fees for Tron.
//!
//! System contracts consume bandwidth. While the account's free bandwidth covers the
//! transaction it costs nothing, otherwise the node burns TRX. Smart contract calls consume
//! energy priced by the `getEnergyFee` chain parameter. Transfers to accounts that do not exist
//! yet also pay the account creation fee.

use alloy::primitives::U256;

use crate::{
	models::{tron::TronChainParameters, ChainId, Fee, FeePriority, TransactionIntent, TxKind},
	services::transaction::{FeeCalculator, TransactionError},
};

/// TRX (in sun) burned when bandwidth does not cover a transaction
pub const BASE_FEE: u64 = 280_000;
/// Bandwidth used by a single-contract transaction
pub const BANDWIDTH_SINGLE: u64 = 300;
/// Bandwidth used by a freeze plus vote or an unfreeze plus vote transaction pair
pub const BANDWIDTH_DOUBLE: u64 = 580;

pub const PARAM_ENERGY_FEE: &str = "getEnergyFee";
pub const PARAM_CREATE_ACCOUNT_FEE: &str = "getCreateAccountFee";
pub const PARAM_CREATE_ACCOUNT_FEE_IN_CONTRACT: &str = "getCreateNewAccountFeeInSystemContract";

#[derive(Debug, Clone, Default)]
pub struct TronFeeState {
	pub parameters: TronChainParameters,
	pub available_bandwidth: u64,
	/// Whether the transfer destination is an activated account
	pub destination_exists: bool,
	/// Frozen TRX of the owner, in sun
	pub staked: U256,
	/// Estimated energy of the contract call, if the intent makes one
	pub energy: Option<u64>,
}

impl TronFeeState {
	fn parameter(&self, key: &str) -> Result<u64, TransactionError> {
		self.parameters.get(key).ok_or_else(|| {
			TransactionError::fee_calculation_error(format!("Missing chain parameter {}", key))
		})
	}

	/// Transfers are priced only against a complete fee schedule
	fn require_transfer_parameters(&self) -> Result<(), TransactionError> {
		for key in [
			PARAM_ENERGY_FEE,
			PARAM_CREATE_ACCOUNT_FEE,
			PARAM_CREATE_ACCOUNT_FEE_IN_CONTRACT,
		] {
			self.parameter(key)?;
		}
		Ok(())
	}

	/// Adds the account creation fee `key` when the destination is not activated
	fn with_activation(&self, fee: u64, key: &str) -> Result<u64, TransactionError> {
		if self.destination_exists {
			return Ok(fee);
		}
		fee.checked_add(self.parameter(key)?).ok_or_else(|| {
			TransactionError::fee_calculation_error(format!("Fee overflow adding {}", key))
		})
	}

	fn bandwidth_fee(&self, required: u64, burn: u64) -> u64 {
		if self.available_bandwidth >= required {
			0
		} else {
			burn
		}
	}

	fn energy_fee(&self) -> Result<u64, TransactionError> {
		let energy = self.energy.ok_or_else(|| {
			TransactionError::fee_calculation_error("Missing energy estimate")
		})?;
		let price = self.parameter(PARAM_ENERGY_FEE)?;
		// 20% headroom over the estimate
		energy
			.checked_mul(6)
			.map(|energy| energy.div_ceil(5))
			.and_then(|energy| energy.checked_mul(price))
			.ok_or_else(|| {
				TransactionError::fee_calculation_error(format!(
					"Energy fee overflow for {}",
					energy
				))
			})
	}
}

pub struct TronFeeCalculator;

impl FeeCalculator for TronFeeCalculator {
	type State = TronFeeState;

	fn calculate(
		&self,
		intent: &TransactionIntent,
		state: &TronFeeState,
	) -> Result<Vec<Fee>, TransactionError> {
		let kind = intent.tx_kind();
		if matches!(kind, TxKind::Transfer | TxKind::TokenTransfer) {
			state.require_transfer_parameters()?;
		}
		let amount = match kind {
			TxKind::Transfer => state.with_activation(
				state.bandwidth_fee(BANDWIDTH_SINGLE, BASE_FEE),
				PARAM_CREATE_ACCOUNT_FEE,
			)?,
			TxKind::TokenTransfer => {
				state.with_activation(state.energy_fee()?, PARAM_CREATE_ACCOUNT_FEE_IN_CONTRACT)?
			}
			TxKind::TokenApproval | TxKind::Swap => state.energy_fee()?,
			TxKind::StakeDelegate => state.bandwidth_fee(BANDWIDTH_DOUBLE, BASE_FEE),
			TxKind::StakeUndelegate => {
				let partial = state.staked > intent.amount;
				if partial {
					// Votes remain, so the unfreeze is followed by a vote
					state.bandwidth_fee(BANDWIDTH_DOUBLE, BASE_FEE * 2)
				} else {
					state.bandwidth_fee(BANDWIDTH_SINGLE, BASE_FEE)
				}
			}
			TxKind::StakeRedelegate
			| TxKind::StakeRewards
			| TxKind::StakeWithdraw
			| TxKind::StakeFreeze
			| TxKind::StakeUnfreeze => state.bandwidth_fee(BANDWIDTH_SINGLE, BASE_FEE),
			TxKind::NftTransfer | TxKind::AccountActivation => {
				return Err(TransactionError::fee_calculation_error(format!(
					"No fee model for {:?} on tron",
					kind
				)))
			}
		};

		Ok(vec![Fee::new(
			FeePriority::Normal,
			ChainId::Tron.fee_asset(),
			U256::from(amount),
		)])
	}
}
