use alloy::primitives::U256;
use mockall::mock;
use std::{
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	},
	time::Duration,
};

use gem_txcore::{
	models::{
		Account, AccountBalances, AssetBalance, AssetId, Balance, ChainConfig, ChainId, RpcUrl,
		SignedPayload, TransactionChanges, TransactionIntent, TransactionState,
		TransactionStatusRequest, TxKind,
	},
	services::{
		blockchain::CosmosClient,
		transaction::{
			BalanceAggregator, BalanceRequest, BroadcastClient, ChainClients, Registry,
			TransactionError, TransactionStatusClient,
		},
	},
};

use crate::integration::mocks::MockTransport;

mock! {
	pub Balances {
		pub async fn get_balances(
			&self,
			address: &str,
			token_ids: Vec<String>,
		) -> Result<AccountBalances, TransactionError>;
	}
}

#[async_trait::async_trait]
impl BalanceAggregator for MockBalances {
	async fn get_balances(
		&self,
		address: &str,
		token_ids: &[String],
	) -> Result<AccountBalances, TransactionError> {
		self.get_balances(address, token_ids.to_vec()).await
	}
}

mock! {
	pub Broadcaster {
		pub async fn broadcast(
			&self,
			payload: SignedPayload,
			kind: TxKind,
		) -> Result<String, TransactionError>;
	}
}

#[async_trait::async_trait]
impl BroadcastClient for MockBroadcaster {
	async fn broadcast(
		&self,
		payload: &SignedPayload,
		kind: TxKind,
	) -> Result<String, TransactionError> {
		self.broadcast(payload.clone(), kind).await
	}
}

mock! {
	pub Status {
		pub async fn get_transaction_status(
			&self,
			request: TransactionStatusRequest,
		) -> Result<TransactionChanges, TransactionError>;
	}
}

#[async_trait::async_trait]
impl TransactionStatusClient for MockStatus {
	async fn get_transaction_status(
		&self,
		request: &TransactionStatusRequest,
	) -> Result<TransactionChanges, TransactionError> {
		self.get_transaction_status(request.clone()).await
	}
}

/// Osmosis client whose transport expects no calls
fn osmosis_clients() -> ChainClients {
	ChainClients::from_client(CosmosClient::new(ChainId::Osmosis, MockTransport::new()).unwrap())
}

fn payload(hash: &str) -> SignedPayload {
	SignedPayload {
		data: format!("data-{}", hash),
		hash: hash.to_string(),
		expiry: None,
	}
}

fn config(chain: ChainId, url: &str) -> ChainConfig {
	ChainConfig {
		chain,
		name: chain.to_string(),
		rpc_urls: vec![RpcUrl {
			type_: "rpc".to_string(),
			url: url.to_string(),
			weight: 100,
		}],
		timeout_ms: 1_000,
	}
}

#[tokio::test]
async fn test_unsupported_chain_is_configuration_error() {
	let registry = Registry::builder()
		.with_chain(ChainId::Osmosis, osmosis_clients())
		.build();

	let result = registry
		.get_balances(&Account::new(ChainId::Tron, "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t"), &[])
		.await;
	assert!(matches!(result, Err(TransactionError::ConfigurationError(_))));

	let intent = TransactionIntent::transfer(
		AssetId::native(ChainId::Solana),
		"payer",
		"recipient",
		U256::from(1),
	);
	let result = registry.preload("payer", intent).await;
	assert!(matches!(result, Err(TransactionError::ConfigurationError(_))));
}

#[test]
fn test_chains_are_sorted() {
	let registry = Registry::builder()
		.with_chain(ChainId::Tron, osmosis_clients())
		.with_chain(ChainId::Osmosis, osmosis_clients())
		.with_chain(ChainId::Cosmos, osmosis_clients())
		.build();

	assert_eq!(
		registry.chains(),
		vec![ChainId::Cosmos, ChainId::Osmosis, ChainId::Tron]
	);
	assert!(registry.supported(ChainId::Osmosis));
	assert!(!registry.supported(ChainId::Solana));
}

#[tokio::test]
async fn test_sync_balances_isolates_failures() {
	let mut balances = MockBalances::new();
	balances
		.expect_get_balances()
		.times(2)
		.returning(|address, _| match address {
			"osmo1good" => Ok(AccountBalances {
				native: AssetBalance::new(
					AssetId::native(ChainId::Osmosis),
					Balance::available(U256::from(42)),
				),
				tokens: vec![],
			}),
			_ => Err(TransactionError::chain_state_unavailable("node down")),
		});
	let registry = Registry::builder()
		.with_chain(
			ChainId::Osmosis,
			ChainClients {
				balances: Arc::new(balances),
				..osmosis_clients()
			},
		)
		.build();

	let requests = vec![
		BalanceRequest {
			account: Account::new(ChainId::Osmosis, "osmo1bad"),
			token_ids: vec![],
		},
		BalanceRequest {
			account: Account::new(ChainId::Osmosis, "osmo1good"),
			token_ids: vec![],
		},
		BalanceRequest {
			account: Account::new(ChainId::Tron, "T-unsupported"),
			token_ids: vec![],
		},
	];
	let results = registry.sync_balances(&requests).await;

	assert_eq!(results.len(), 3);
	assert_eq!(results[0].account.address, "osmo1bad");
	assert!(matches!(
		results[0].result,
		Err(TransactionError::ChainStateUnavailable(_))
	));
	assert_eq!(
		results[1].result.as_ref().unwrap().native.balance.available,
		U256::from(42)
	);
	assert!(matches!(
		results[2].result,
		Err(TransactionError::ConfigurationError(_))
	));
}

#[tokio::test]
async fn test_broadcast_stops_at_first_failure() {
	let mut broadcaster = MockBroadcaster::new();
	broadcaster
		.expect_broadcast()
		.withf(|payload, _| payload.hash == "freeze")
		.times(1)
		.returning(|payload, _| Ok(payload.hash));
	broadcaster
		.expect_broadcast()
		.withf(|payload, _| payload.hash == "vote")
		.times(1)
		.returning(|_, _| Err(TransactionError::broadcast_rejected("insufficient bandwidth")));
	broadcaster
		.expect_broadcast()
		.withf(|payload, _| payload.hash == "never")
		.never();
	let registry = Registry::builder()
		.with_chain(
			ChainId::Tron,
			ChainClients {
				broadcaster: Arc::new(broadcaster),
				..osmosis_clients()
			},
		)
		.build();

	let result = registry
		.broadcast(
			ChainId::Tron,
			&[payload("freeze"), payload("vote"), payload("never")],
			TxKind::StakeDelegate,
		)
		.await;

	assert!(matches!(result, Err(TransactionError::BroadcastRejected(_))));
}

#[tokio::test]
async fn test_broadcast_returns_hashes_in_order() {
	let mut broadcaster = MockBroadcaster::new();
	broadcaster
		.expect_broadcast()
		.times(2)
		.returning(|payload, _| Ok(payload.hash.to_uppercase()));
	let registry = Registry::builder()
		.with_chain(
			ChainId::Tron,
			ChainClients {
				broadcaster: Arc::new(broadcaster),
				..osmosis_clients()
			},
		)
		.build();

	let hashes = registry
		.broadcast(
			ChainId::Tron,
			&[payload("approve"), payload("swap")],
			TxKind::Swap,
		)
		.await
		.unwrap();

	assert_eq!(hashes, vec!["APPROVE".to_string(), "SWAP".to_string()]);
}

#[tokio::test]
async fn test_poll_until_terminal() {
	let polls = Arc::new(AtomicUsize::new(0));
	let counter = polls.clone();
	let mut status = MockStatus::new();
	status.expect_get_transaction_status().returning(move |_| {
		if counter.fetch_add(1, Ordering::SeqCst) < 2 {
			Ok(TransactionChanges::new(TransactionState::Pending))
		} else {
			Ok(TransactionChanges::new(TransactionState::Confirmed).with_fee(U256::from(5_000)))
		}
	});
	let registry = Registry::builder()
		.with_chain(
			ChainId::Solana,
			ChainClients {
				status: Arc::new(status),
				..osmosis_clients()
			},
		)
		.build();
	let request = TransactionStatusRequest::new(ChainId::Solana, "sig", "payer");

	let changes = registry
		.poll_until_terminal(&request, Duration::from_millis(1), 10)
		.await
		.unwrap();

	assert_eq!(changes.state, TransactionState::Confirmed);
	assert_eq!(changes.fee, Some(U256::from(5_000)));
	assert_eq!(polls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_poll_gives_up_after_max_attempts() {
	let mut status = MockStatus::new();
	status
		.expect_get_transaction_status()
		.times(2)
		.returning(|_| Ok(TransactionChanges::new(TransactionState::Pending)));
	let registry = Registry::builder()
		.with_chain(
			ChainId::Solana,
			ChainClients {
				status: Arc::new(status),
				..osmosis_clients()
			},
		)
		.build();
	let request = TransactionStatusRequest::new(ChainId::Solana, "sig", "payer");

	let changes = registry
		.poll_until_terminal(&request, Duration::from_millis(1), 2)
		.await
		.unwrap();

	assert_eq!(changes.state, TransactionState::Pending);
}

#[tokio::test]
async fn test_poll_propagates_errors() {
	let mut status = MockStatus::new();
	status
		.expect_get_transaction_status()
		.times(1)
		.returning(|_| Err(TransactionError::chain_state_unavailable("node down")));
	let registry = Registry::builder()
		.with_chain(
			ChainId::Solana,
			ChainClients {
				status: Arc::new(status),
				..osmosis_clients()
			},
		)
		.build();
	let request = TransactionStatusRequest::new(ChainId::Solana, "sig", "payer");

	let result = registry
		.poll_until_terminal(&request, Duration::from_millis(1), 5)
		.await;

	assert!(matches!(result, Err(TransactionError::ChainStateUnavailable(_))));
}

#[test]
fn test_from_configs_registers_every_chain() {
	let registry = Registry::from_configs(vec![
		config(ChainId::Tron, "https://api.trongrid.io"),
		config(ChainId::Osmosis, "https://lcd.osmosis.zone"),
		config(ChainId::Solana, "https://api.mainnet-beta.solana.com"),
	])
	.unwrap();

	assert_eq!(
		registry.chains(),
		vec![ChainId::Osmosis, ChainId::Solana, ChainId::Tron]
	);
}

#[test]
fn test_from_configs_rejects_duplicate_chain() {
	let result = Registry::from_configs(vec![
		config(ChainId::Solana, "https://api.mainnet-beta.solana.com"),
		config(ChainId::Solana, "https://solana.example.com"),
	]);

	assert!(matches!(result, Err(TransactionError::ConfigurationError(_))));
}

#[test]
fn test_from_configs_rejects_missing_endpoint() {
	let mut config = config(ChainId::Celestia, "https://celestia.example.com");
	config.rpc_urls[0].type_ = "ws".to_string();

	let result = Registry::from_configs(vec![config]);

	assert!(matches!(result, Err(TransactionError::ConfigurationError(_))));
}
