use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::models::ChainId;

/// Canonical finality state of a submitted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum TransactionState {
	Pending,
	/// Included and executed successfully
	Confirmed,
	/// Included but execution failed (revert, out of gas/energy)
	Reverted,
	/// Will never be included (rejected or expired)
	Failed,
}

impl TransactionState {
	pub fn is_terminal(&self) -> bool {
		!matches!(self, Self::Pending)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HashChange {
	pub old: String,
	pub new: String,
}

/// Result of reconciling a transaction against the chain
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransactionChanges {
	pub state: TransactionState,
	/// Fee actually paid, when the receipt reports it
	pub fee: Option<U256>,
	pub hash_change: Option<HashChange>,
}

impl TransactionChanges {
	pub fn new(state: TransactionState) -> Self {
		Self {
			state,
			fee: None,
			hash_change: None,
		}
	}

	pub fn with_fee(mut self, fee: U256) -> Self {
		self.fee = Some(fee);
		self
	}

	/// Records that the transaction was resubmitted under a new hash
	pub fn with_hash_change(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
		self.hash_change = Some(HashChange {
			old: old.into(),
			new: new.into(),
		});
		self
	}
}

/// Identifies a submitted transaction to poll
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TransactionStatusRequest {
	pub chain: ChainId,
	pub hash: String,
	pub sender: String,
	/// Chain-specific inclusion deadline: last valid block height on Solana, expiration
	/// timestamp in milliseconds on Tron
	pub expiry: Option<u64>,
}

impl TransactionStatusRequest {
	pub fn new(chain: ChainId, hash: impl Into<String>, sender: impl Into<String>) -> Self {
		Self {
			chain,
			hash: hash.into(),
			sender: sender.into(),
			expiry: None,
		}
	}

	pub fn with_expiry(mut self, expiry: u64) -> Self {
		self.expiry = Some(expiry);
		self
	}
}

/// A signed transaction ready for broadcast
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignedPayload {
	/// Encoded the way the chain's broadcast endpoint expects it (base64 or hex)
	pub data: String,
	/// Hash computed locally from the signed bytes
	pub hash: String,
	/// Inclusion deadline, see [`TransactionStatusRequest::expiry`]
	pub expiry: Option<u64>,
}
