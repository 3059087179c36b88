//! Capability interfaces implemented by every chain client.
//!
//! The registry dispatches to these traits by chain id. Each chain family provides one client
//! type implementing all of them; only the fee calculator is pure and used internally by the
//! preloader.

use async_trait::async_trait;

use crate::{
	models::{
		AccountBalances, ChainSignData, Fee, PreloadResult, SignedPayload, TransactionChanges,
		TransactionIntent, TransactionStatusRequest, TxKind,
	},
	services::transaction::{PrivateKey, Signer, TransactionError},
};

/// Fetches and merges every balance of one account
#[async_trait]
pub trait BalanceAggregator: Send + Sync {
	/// Native balance (with staking breakdown) plus the requested tokens.
	///
	/// Fails only when the native available balance cannot be fetched.
	async fn get_balances(
		&self,
		address: &str,
		token_ids: &[String],
	) -> Result<AccountBalances, TransactionError>;
}

/// Gathers chain metadata and fees for one send attempt
#[async_trait]
pub trait SignerPreloader: Send + Sync {
	async fn preload(
		&self,
		owner: &str,
		intent: TransactionIntent,
	) -> Result<PreloadResult, TransactionError>;
}

/// Pure fee computation for one resource model
pub trait FeeCalculator {
	/// Chain state the fee depends on
	type State;

	/// Fees for each available priority tier; identical input gives identical output
	fn calculate(
		&self,
		intent: &TransactionIntent,
		state: &Self::State,
	) -> Result<Vec<Fee>, TransactionError>;
}

/// Builds the exact wire messages and has them signed
#[async_trait]
pub trait SignClient: Send + Sync {
	/// Signed payloads in the order they must be broadcast
	async fn sign(
		&self,
		intent: &TransactionIntent,
		sign_data: &ChainSignData,
		fee: &Fee,
		signer: &dyn Signer,
		key: &PrivateKey,
	) -> Result<Vec<SignedPayload>, TransactionError>;
}

/// Submits a signed payload
#[async_trait]
pub trait BroadcastClient: Send + Sync {
	/// Returns the transaction hash reported by the node
	async fn broadcast(
		&self,
		payload: &SignedPayload,
		kind: TxKind,
	) -> Result<String, TransactionError>;
}

/// Reconciles a submitted transaction with the chain
#[async_trait]
pub trait TransactionStatusClient: Send + Sync {
	async fn get_transaction_status(
		&self,
		request: &TransactionStatusRequest,
	) -> Result<TransactionChanges, TransactionError>;
}

/// Every capability at once; implemented automatically for full chain clients
pub trait ChainClient:
	BalanceAggregator + SignerPreloader + SignClient + BroadcastClient + TransactionStatusClient
{
}

impl<T> ChainClient for T where
	T: BalanceAggregator + SignerPreloader + SignClient + BroadcastClient + TransactionStatusClient
{
}
