//! Canonical transaction state resolution.
//!
//! Chain clients translate a receipt poll into a [`ReceiptObservation`]; [`resolve`] maps it
//! onto `Pending -> {Confirmed, Reverted, Failed}` with one precedence order for every chain:
//!
//! 1. hard rejection, or receipt absent past the inclusion deadline: `Failed`
//! 2. execution error or resource exhaustion: `Reverted`, whatever the block height
//! 3. receipt absent or without a block height: `Pending`
//! 4. otherwise `Confirmed`, with the fee when the receipt reports it

use alloy::primitives::U256;

use crate::models::{TransactionChanges, TransactionState};

/// What a single receipt poll revealed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptObservation {
	pub found: bool,
	/// Explicitly refused by the chain, never included
	pub rejected: bool,
	/// Receipt absent and the inclusion deadline has passed
	pub expired: bool,
	pub execution_failed: bool,
	/// Out of gas, energy or time
	pub out_of_resource: bool,
	pub block_height: Option<u64>,
	pub fee: Option<U256>,
}

impl ReceiptObservation {
	pub fn not_found() -> Self {
		Self::default()
	}

	pub fn expired() -> Self {
		Self {
			expired: true,
			..Self::default()
		}
	}

	pub fn included(block_height: u64) -> Self {
		Self {
			found: true,
			block_height: Some(block_height),
			..Self::default()
		}
	}

	pub fn with_fee(mut self, fee: U256) -> Self {
		self.fee = Some(fee);
		self
	}
}

pub fn resolve_state(observation: &ReceiptObservation) -> TransactionState {
	if observation.rejected || (!observation.found && observation.expired) {
		return TransactionState::Failed;
	}
	if observation.execution_failed || observation.out_of_resource {
		return TransactionState::Reverted;
	}
	match observation.block_height {
		Some(height) if observation.found && height > 0 => TransactionState::Confirmed,
		_ => TransactionState::Pending,
	}
}

/// Resolves the state and attaches the observed fee for included transactions
pub fn resolve(observation: &ReceiptObservation) -> TransactionChanges {
	let state = resolve_state(observation);
	let changes = TransactionChanges::new(state);
	match (state, observation.fee) {
		(TransactionState::Confirmed | TransactionState::Reverted, Some(fee)) => {
			changes.with_fee(fee)
		}
		_ => changes,
	}
}
