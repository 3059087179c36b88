//! Domain models and data structures for the transaction core.
//!
//! - `blockchain`: per-family sign data and node response shapes (Cosmos, Solana, Tron)
//! - `config`: configuration loading and validation
//! - `core`: chain-agnostic models (chains, intents, fees, balances, transaction states)

mod blockchain;
mod config;
mod core;

pub use blockchain::{cosmos, solana, tron, ChainSignData};

pub use core::{
	Account, AccountBalances, ApprovalData, AssetBalance, AssetId, Balance, ChainConfig,
	ChainFamily, ChainId, Curve, Fee, FeePriority, GasPricing, GasRule, HashChange, IntentKind,
	PreloadResult, Resource, RpcUrl, SignedPayload, StakeIntent, SwapData, TransactionChanges,
	TransactionIntent, TransactionState, TransactionStatusRequest, TxKind,
	OPTION_TOKEN_ACCOUNT_CREATION,
};

pub use config::{ConfigError, ConfigLoader};
