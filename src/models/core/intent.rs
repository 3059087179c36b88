use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::models::AssetId;

/// Chain-agnostic description of what a user wants to do.
///
/// Amounts are integers in the smallest unit of `asset_id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransactionIntent {
	pub asset_id: AssetId,
	/// Source address
	pub from: String,
	pub destination: Option<String>,
	pub amount: U256,
	pub memo: Option<String>,
	pub kind: IntentKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum IntentKind {
	NativeTransfer,
	TokenTransfer,
	/// Allow `spender` to move `amount` of the intent's token
	TokenApproval { spender: String },
	Swap(SwapData),
	Stake(StakeIntent),
	NftTransfer { collection_id: String, token_id: String },
	AccountActivation,
}

/// Swap quote prepared by an external provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SwapData {
	pub provider: String,
	/// Router contract (or recipient for memo based swaps)
	pub to: String,
	/// Provider payload: calldata hex, a prebuilt base64 transaction, or a swap memo
	pub data: String,
	pub value: U256,
	/// Approval that must be submitted before the swap itself
	pub approval: Option<ApprovalData>,
	pub gas_limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApprovalData {
	pub token: String,
	pub spender: String,
	pub value: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum StakeIntent {
	Delegate {
		validator: String,
	},
	Undelegate {
		validator: String,
		/// Stake account to deactivate on chains that track stake per account
		stake_id: Option<String>,
	},
	Redelegate {
		src_validator: String,
		dst_validator: String,
	},
	ClaimRewards {
		validators: Vec<String>,
	},
	Withdraw {
		stake_id: Option<String>,
	},
	Freeze {
		resource: Resource,
	},
	Unfreeze {
		resource: Resource,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Resource {
	Bandwidth,
	Energy,
}

/// Flat transaction kind, used by fee tables and broadcast options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum TxKind {
	Transfer,
	TokenTransfer,
	TokenApproval,
	Swap,
	StakeDelegate,
	StakeUndelegate,
	StakeRedelegate,
	StakeRewards,
	StakeWithdraw,
	StakeFreeze,
	StakeUnfreeze,
	NftTransfer,
	AccountActivation,
}

impl IntentKind {
	pub fn tx_kind(&self) -> TxKind {
		match self {
			Self::NativeTransfer => TxKind::Transfer,
			Self::TokenTransfer => TxKind::TokenTransfer,
			Self::TokenApproval { .. } => TxKind::TokenApproval,
			Self::Swap(_) => TxKind::Swap,
			Self::Stake(stake) => match stake {
				StakeIntent::Delegate { .. } => TxKind::StakeDelegate,
				StakeIntent::Undelegate { .. } => TxKind::StakeUndelegate,
				StakeIntent::Redelegate { .. } => TxKind::StakeRedelegate,
				StakeIntent::ClaimRewards { .. } => TxKind::StakeRewards,
				StakeIntent::Withdraw { .. } => TxKind::StakeWithdraw,
				StakeIntent::Freeze { .. } => TxKind::StakeFreeze,
				StakeIntent::Unfreeze { .. } => TxKind::StakeUnfreeze,
			},
			Self::NftTransfer { .. } => TxKind::NftTransfer,
			Self::AccountActivation => TxKind::AccountActivation,
		}
	}
}

impl TransactionIntent {
	pub fn tx_kind(&self) -> TxKind {
		self.kind.tx_kind()
	}

	/// Shorthand for a transfer of the native asset or of a token, depending on `asset_id`
	pub fn transfer(
		asset_id: AssetId,
		from: impl Into<String>,
		destination: impl Into<String>,
		amount: U256,
	) -> Self {
		let kind = if asset_id.is_native() {
			IntentKind::NativeTransfer
		} else {
			IntentKind::TokenTransfer
		};
		Self {
			asset_id,
			from: from.into(),
			destination: Some(destination.into()),
			amount,
			memo: None,
			kind,
		}
	}

	pub fn stake(
		asset_id: AssetId,
		from: impl Into<String>,
		amount: U256,
		stake: StakeIntent,
	) -> Self {
		Self {
			asset_id,
			from: from.into(),
			destination: None,
			amount,
			memo: None,
			kind: IntentKind::Stake(stake),
		}
	}

	pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
		self.memo = Some(memo.into());
		self
	}
}
