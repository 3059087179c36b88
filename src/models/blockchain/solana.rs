//! Solana data structures.
//!
//! JSON-RPC result shapes (camelCase on the wire) and the sign data carried between preload
//! and signing.

use serde::{Deserialize, Serialize};

/// An SPL token account owned by a wallet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SolanaTokenAccount {
	pub pubkey: String,
	/// Token program owning the account (Token or Token-2022)
	pub program_id: String,
	pub decimals: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SolanaSignData {
	pub recent_blockhash: String,
	pub last_valid_block_height: u64,
	pub sender_token_account: Option<SolanaTokenAccount>,
	/// `None` when the recipient has no account for the mint yet and one must be created
	pub recipient_token_account: Option<SolanaTokenAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaContext<T> {
	pub value: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaBlockhash {
	pub blockhash: String,
	pub last_valid_block_height: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaPrioritizationFee {
	pub prioritization_fee: u64,
	#[serde(default)]
	pub slot: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaKeyedAccount<T> {
	pub pubkey: String,
	pub account: SolanaAccount<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaAccount<T> {
	#[serde(default)]
	pub lamports: u64,
	pub owner: String,
	pub data: SolanaParsedData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaParsedData<T> {
	pub parsed: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaParsedTokenAccount {
	pub info: SolanaTokenAccountInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaTokenAccountInfo {
	pub mint: String,
	pub token_amount: SolanaTokenAmount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaTokenAmount {
	pub amount: String,
	pub decimals: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaParsedStakeAccount {
	#[serde(rename = "type")]
	pub type_: String,
	pub info: SolanaStakeInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaStakeInfo {
	pub stake: Option<SolanaStake>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaStake {
	pub delegation: SolanaDelegation,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaDelegation {
	pub voter: String,
	pub stake: String,
	pub deactivation_epoch: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaTransaction {
	#[serde(default)]
	pub slot: u64,
	pub meta: Option<SolanaTransactionMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolanaTransactionMeta {
	pub err: Option<serde_json::Value>,
	#[serde(default)]
	pub fee: u64,
}
