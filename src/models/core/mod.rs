mod balance;
mod chain;
mod chain_config;
mod fee;
mod intent;
mod preload;
mod transaction;

pub use balance::{AccountBalances, AssetBalance, Balance};
pub use chain::{Account, AssetId, ChainFamily, ChainId, Curve};
pub use chain_config::{ChainConfig, RpcUrl};
pub use fee::{Fee, FeePriority, GasPricing, GasRule, OPTION_TOKEN_ACCOUNT_CREATION};
pub use intent::{
	ApprovalData, IntentKind, Resource, StakeIntent, SwapData, TransactionIntent, TxKind,
};
pub use preload::PreloadResult;
pub use transaction::{
	HashChange, SignedPayload, TransactionChanges, TransactionState, TransactionStatusRequest,
};
