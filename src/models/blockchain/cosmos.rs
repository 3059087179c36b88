//! Cosmos SDK data structures.
//!
//! Sign data produced by the preloader plus the REST (LCD) response shapes the Cosmos client
//! reads. Responses are untrusted, so every collection defaults to empty.

use serde::{Deserialize, Serialize};

/// Account and chain metadata required to sign a Cosmos transaction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CosmosSignData {
	pub account_number: u64,
	pub sequence: u64,
	pub chain_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CosmosCoin {
	pub denom: String,
	/// Integer for bank coins, decimal string for distribution rewards
	pub amount: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmosAccount {
	pub account_number: String,
	#[serde(default)]
	pub sequence: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CosmosBalancesResponse {
	#[serde(default)]
	pub balances: Vec<CosmosCoin>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CosmosDelegationsResponse {
	#[serde(default)]
	pub delegation_responses: Vec<CosmosDelegation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmosDelegation {
	pub balance: CosmosCoin,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CosmosUnbondingResponse {
	#[serde(default)]
	pub unbonding_responses: Vec<CosmosUnbonding>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmosUnbonding {
	#[serde(default)]
	pub entries: Vec<CosmosUnbondingEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmosUnbondingEntry {
	pub balance: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CosmosRewardsResponse {
	#[serde(default)]
	pub total: Vec<CosmosCoin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmosNodeInfoResponse {
	pub default_node_info: CosmosNodeInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmosNodeInfo {
	pub network: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmosTxResponse {
	pub tx_response: CosmosTxResult,
	pub tx: Option<CosmosTx>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmosTxResult {
	#[serde(default)]
	pub height: String,
	#[serde(default)]
	pub code: u32,
	#[serde(default)]
	pub txhash: String,
	#[serde(default)]
	pub raw_log: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmosTx {
	pub auth_info: Option<CosmosAuthInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmosAuthInfo {
	pub fee: Option<CosmosFee>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmosFee {
	#[serde(default)]
	pub amount: Vec<CosmosCoin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CosmosBroadcastResponse {
	pub tx_response: CosmosTxResult,
}
