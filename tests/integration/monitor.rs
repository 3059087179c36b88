use alloy::primitives::U256;
use async_trait::async_trait;
use std::{
	future::Future,
	sync::{Arc, Mutex},
	time::Duration,
};

use gem_txcore::{
	models::{
		Account, AccountBalances, AssetBalance, AssetId, Balance, ChainId, TransactionChanges,
		TransactionState, TransactionStatusRequest,
	},
	services::{
		blockchain::CosmosClient,
		transaction::{
			BalanceAggregator, BalanceRequest, ChainClients, Registry, TransactionError,
			TransactionMonitor, TransactionStateSink, TransactionStatusClient,
		},
	},
};

use crate::integration::mocks::MockTransport;

const INTERVAL: Duration = Duration::from_millis(10);

/// Status client answering by hash
struct ScriptedStatus;

#[async_trait]
impl TransactionStatusClient for ScriptedStatus {
	async fn get_transaction_status(
		&self,
		request: &TransactionStatusRequest,
	) -> Result<TransactionChanges, TransactionError> {
		match request.hash.as_str() {
			"confirmed" => {
				Ok(TransactionChanges::new(TransactionState::Confirmed).with_fee(U256::from(10)))
			}
			"failed" => Ok(TransactionChanges::new(TransactionState::Failed)),
			"replaced" => Ok(TransactionChanges::new(TransactionState::Pending)
				.with_hash_change("replaced", "replacement")),
			"unreachable" => Err(TransactionError::chain_state_unavailable("node down")),
			_ => Ok(TransactionChanges::new(TransactionState::Pending)),
		}
	}
}

struct FixedBalances;

#[async_trait]
impl BalanceAggregator for FixedBalances {
	async fn get_balances(
		&self,
		address: &str,
		_token_ids: &[String],
	) -> Result<AccountBalances, TransactionError> {
		if address == "osmo1broken" {
			return Err(TransactionError::chain_state_unavailable("node down"));
		}
		Ok(AccountBalances {
			native: AssetBalance::new(
				AssetId::native(ChainId::Osmosis),
				Balance::available(U256::from(address.len())),
			),
			tokens: vec![],
		})
	}
}

#[derive(Default)]
struct RecordingSink {
	transactions: Mutex<Vec<(TransactionStatusRequest, TransactionChanges)>>,
	balances: Mutex<Vec<(Account, AccountBalances)>>,
}

impl RecordingSink {
	fn transactions(&self) -> Vec<(TransactionStatusRequest, TransactionChanges)> {
		self.transactions.lock().unwrap().clone()
	}

	fn balances(&self) -> Vec<(Account, AccountBalances)> {
		self.balances.lock().unwrap().clone()
	}
}

#[async_trait]
impl TransactionStateSink for RecordingSink {
	async fn record_transaction(
		&self,
		request: &TransactionStatusRequest,
		changes: &TransactionChanges,
	) {
		self.transactions
			.lock()
			.unwrap()
			.push((request.clone(), changes.clone()));
	}

	async fn record_balances(&self, account: &Account, balances: &AccountBalances) {
		self.balances
			.lock()
			.unwrap()
			.push((account.clone(), balances.clone()));
	}
}

fn registry() -> Arc<Registry> {
	let clients = ChainClients {
		status: Arc::new(ScriptedStatus),
		balances: Arc::new(FixedBalances),
		..ChainClients::from_client(
			CosmosClient::new(ChainId::Osmosis, MockTransport::new()).unwrap(),
		)
	};
	Arc::new(Registry::builder().with_chain(ChainId::Osmosis, clients).build())
}

fn request(hash: &str) -> TransactionStatusRequest {
	TransactionStatusRequest::new(ChainId::Osmosis, hash, "osmo1sender")
}

/// Waits until `condition` holds, giving up after two seconds
async fn eventually<F, Fut>(mut condition: F) -> bool
where
	F: FnMut() -> Fut,
	Fut: Future<Output = bool>,
{
	for _ in 0..200 {
		if condition().await {
			return true;
		}
		tokio::time::sleep(INTERVAL).await;
	}
	false
}

#[tokio::test]
async fn test_terminal_transactions_are_recorded_and_dropped() {
	let sink = Arc::new(RecordingSink::default());
	let monitor = TransactionMonitor::new(registry(), sink.clone(), INTERVAL).spawn();

	monitor.track(request("confirmed")).await.unwrap();
	monitor.track(request("failed")).await.unwrap();
	monitor.track(request("waiting")).await.unwrap();

	let handle = &monitor;
	assert!(eventually(move || async move { handle.pending().await.unwrap() == 1 }).await);

	let mut recorded = sink.transactions();
	recorded.sort_by(|a, b| a.0.hash.cmp(&b.0.hash));
	assert_eq!(recorded.len(), 2);
	assert_eq!(recorded[0].0.hash, "confirmed");
	assert_eq!(recorded[0].1.state, TransactionState::Confirmed);
	assert_eq!(recorded[0].1.fee, Some(U256::from(10)));
	assert_eq!(recorded[1].0.hash, "failed");
	assert_eq!(recorded[1].1.state, TransactionState::Failed);

	monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_pending_without_changes_is_not_recorded() {
	let sink = Arc::new(RecordingSink::default());
	let monitor = TransactionMonitor::new(registry(), sink.clone(), INTERVAL).spawn();

	monitor.track(request("waiting")).await.unwrap();
	monitor.track(request("unreachable")).await.unwrap();
	tokio::time::sleep(INTERVAL * 5).await;

	// Poll failures keep the transaction tracked
	assert_eq!(monitor.pending().await.unwrap(), 2);
	assert!(sink.transactions().is_empty());

	monitor.untrack(ChainId::Osmosis, "waiting").await.unwrap();
	assert_eq!(monitor.pending().await.unwrap(), 1);

	monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_hash_change_is_recorded_while_pending() {
	let sink = Arc::new(RecordingSink::default());
	let monitor = TransactionMonitor::new(registry(), sink.clone(), INTERVAL).spawn();

	monitor.track(request("replaced")).await.unwrap();

	let recorded = &*sink;
	assert!(eventually(move || async move { !recorded.transactions().is_empty() }).await);
	let (tracked, changes) = sink.transactions().remove(0);
	assert_eq!(tracked.hash, "replaced");
	assert_eq!(changes.state, TransactionState::Pending);
	assert_eq!(changes.hash_change.unwrap().new, "replacement");
	assert_eq!(monitor.pending().await.unwrap(), 1);

	// Later polls follow the replacement, so the change is recorded once
	tokio::time::sleep(INTERVAL * 5).await;
	assert_eq!(sink.transactions().len(), 1);
	monitor.untrack(ChainId::Osmosis, "replacement").await.unwrap();
	assert_eq!(monitor.pending().await.unwrap(), 0);

	monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_refresh_balances_records_successful_accounts() {
	let sink = Arc::new(RecordingSink::default());
	let monitor = TransactionMonitor::new(registry(), sink.clone(), INTERVAL).spawn();

	monitor
		.refresh_balances(vec![
			BalanceRequest {
				account: Account::new(ChainId::Osmosis, "osmo1alice"),
				token_ids: vec![],
			},
			BalanceRequest {
				account: Account::new(ChainId::Osmosis, "osmo1broken"),
				token_ids: vec![],
			},
		])
		.await
		.unwrap();

	// Commands run in order, so the refresh finished before this reply
	monitor.pending().await.unwrap();
	let balances = sink.balances();
	assert_eq!(balances.len(), 1);
	assert_eq!(balances[0].0.address, "osmo1alice");
	assert_eq!(balances[0].1.native.balance.available, U256::from(10));

	monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_stops_the_task() {
	let sink = Arc::new(RecordingSink::default());
	let monitor = TransactionMonitor::new(registry(), sink, INTERVAL).spawn();

	monitor.track(request("waiting")).await.unwrap();

	assert!(monitor.shutdown().await.is_ok());
}
