//! Tron data structures.
//!
//! Full node HTTP API shapes (queried with `visible: true`, so addresses are base58) and the
//! sign data carried between preload and signing.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference block used to anchor a transaction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TronBlockRef {
	/// Hex encoded block id
	pub id: String,
	pub number: u64,
	/// Block timestamp in milliseconds
	pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TronSignData {
	pub block: TronBlockRef,
	/// Witness address to vote count (whole TRX) after applying the intent
	pub votes: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TronBlock {
	#[serde(rename = "blockID")]
	pub block_id: Option<String>,
	pub block_header: TronBlockHeader,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TronBlockHeader {
	pub raw_data: TronBlockHeaderRaw,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TronBlockHeaderRaw {
	#[serde(default)]
	pub number: u64,
	#[serde(default)]
	pub timestamp: u64,
	#[serde(default)]
	pub tx_trie_root: String,
	#[serde(default)]
	pub parent_hash: String,
	#[serde(default, rename = "witness_address")]
	pub witness_address: String,
	#[serde(default)]
	pub version: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TronAccount {
	pub address: Option<String>,
	#[serde(default)]
	pub balance: u64,
	#[serde(default)]
	pub votes: Vec<TronVote>,
	#[serde(default, rename = "frozenV2")]
	pub frozen_v2: Vec<TronFrozen>,
	#[serde(default, rename = "unfrozenV2")]
	pub unfrozen_v2: Vec<TronUnfrozen>,
}

impl TronAccount {
	/// The node answers `{}` for accounts that were never activated
	pub fn exists(&self) -> bool {
		self.address.is_some()
	}

	/// Frozen TRX across all resources, in sun
	pub fn frozen_total(&self) -> U256 {
		self.frozen_v2
			.iter()
			.filter_map(|frozen| frozen.amount)
			.map(U256::from)
			.sum()
	}

	/// TRX unfrozen but not yet withdrawable, in sun
	pub fn unfreezing_total(&self) -> U256 {
		self.unfrozen_v2
			.iter()
			.map(|unfrozen| U256::from(unfrozen.unfreeze_amount))
			.sum()
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct TronVote {
	pub vote_address: String,
	pub vote_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TronFrozen {
	#[serde(rename = "type")]
	pub type_: Option<String>,
	pub amount: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TronUnfrozen {
	#[serde(default)]
	pub unfreeze_amount: u64,
	#[serde(default)]
	pub unfreeze_expire_time: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TronAccountResource {
	#[serde(default, rename = "freeNetLimit")]
	pub free_net_limit: u64,
	#[serde(default, rename = "freeNetUsed")]
	pub free_net_used: u64,
}

impl TronAccountResource {
	pub fn available_bandwidth(&self) -> u64 {
		self.free_net_limit.saturating_sub(self.free_net_used)
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TronChainParameters {
	#[serde(default, rename = "chainParameter")]
	pub chain_parameter: Vec<TronChainParameter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TronChainParameter {
	pub key: String,
	pub value: Option<i64>,
}

impl TronChainParameters {
	pub fn get(&self, key: &str) -> Option<u64> {
		self.chain_parameter
			.iter()
			.find(|param| param.key == key)
			.and_then(|param| param.value)
			.and_then(|value| u64::try_from(value).ok())
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TronConstantResult {
	pub energy_used: Option<u64>,
	#[serde(default)]
	pub constant_result: Vec<String>,
	pub result: Option<TronReturn>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TronReturn {
	#[serde(default)]
	pub result: bool,
	pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TronTransactionInfo {
	pub id: Option<String>,
	pub fee: Option<u64>,
	pub block_number: Option<u64>,
	pub receipt: Option<TronReceipt>,
	pub result: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TronReceipt {
	pub result: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TronBroadcastResponse {
	pub result: Option<bool>,
	pub txid: Option<String>,
	pub code: Option<String>,
	/// Hex encoded error text
	pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TronReward {
	#[serde(default)]
	pub reward: u64,
}
