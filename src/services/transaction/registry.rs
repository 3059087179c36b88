//! Chain registry.
//!
//! Holds exactly one implementation of each capability per supported chain and routes calls by
//! chain id. It contains no chain logic of its own.

use futures::future::join_all;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tracing::instrument;

use crate::{
	models::{
		Account, AccountBalances, ChainConfig, ChainFamily, ChainId, FeePriority, PreloadResult,
		SignedPayload, TransactionChanges, TransactionIntent, TransactionStatusRequest, TxKind,
	},
	services::{
		blockchain::{CosmosClient, HttpTransportClient, SolanaClient, TronClient},
		transaction::{
			BalanceAggregator, BroadcastClient, ChainClient, PrivateKey, SignClient, Signer,
			SignerPreloader, TransactionError, TransactionStatusClient,
		},
	},
};

/// Capabilities of one chain
#[derive(Clone)]
pub struct ChainClients {
	pub balances: Arc<dyn BalanceAggregator>,
	pub preloader: Arc<dyn SignerPreloader>,
	pub signer: Arc<dyn SignClient>,
	pub broadcaster: Arc<dyn BroadcastClient>,
	pub status: Arc<dyn TransactionStatusClient>,
}

impl ChainClients {
	/// Uses one client for every capability
	pub fn from_client<C: ChainClient + 'static>(client: C) -> Self {
		let client = Arc::new(client);
		Self {
			balances: client.clone(),
			preloader: client.clone(),
			signer: client.clone(),
			broadcaster: client.clone(),
			status: client,
		}
	}
}

/// Balance lookup for one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRequest {
	pub account: Account,
	pub token_ids: Vec<String>,
}

#[derive(Debug)]
pub struct BalanceSync {
	pub account: Account,
	pub result: Result<AccountBalances, TransactionError>,
}

#[derive(Default)]
pub struct RegistryBuilder {
	chains: HashMap<ChainId, ChainClients>,
}

impl RegistryBuilder {
	pub fn with_chain(mut self, chain: ChainId, clients: ChainClients) -> Self {
		self.chains.insert(chain, clients);
		self
	}

	pub fn with_client<C: ChainClient + 'static>(self, chain: ChainId, client: C) -> Self {
		self.with_chain(chain, ChainClients::from_client(client))
	}

	pub fn build(self) -> Registry {
		Registry {
			chains: self.chains,
		}
	}
}

pub struct Registry {
	chains: HashMap<ChainId, ChainClients>,
}

impl Registry {
	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::default()
	}

	/// Wires an HTTP backed client for every configured chain.
	///
	/// A chain configured twice or an unusable endpoint is a configuration error.
	pub fn from_configs<I>(configs: I) -> Result<Self, TransactionError>
	where
		I: IntoIterator<Item = ChainConfig>,
	{
		let mut builder = Self::builder();
		for config in configs {
			if builder.chains.contains_key(&config.chain) {
				return Err(TransactionError::configuration_error(format!(
					"Chain {} is configured more than once",
					config.chain
				)));
			}

			let chain = config.chain;
			let transport = HttpTransportClient::new(&config)
				.map_err(|e| TransactionError::configuration_error(e.to_string()))?;

			builder = match chain.family() {
				ChainFamily::Cosmos => {
					builder.with_client(chain, CosmosClient::new(chain, transport)?)
				}
				ChainFamily::Solana => builder.with_client(chain, SolanaClient::new(transport)),
				ChainFamily::Tron => builder.with_client(chain, TronClient::new(transport)),
			};
			tracing::info!(chain = %chain, name = %config.name, "Registered chain");
		}
		Ok(builder.build())
	}

	pub fn supported(&self, chain: ChainId) -> bool {
		self.chains.contains_key(&chain)
	}

	pub fn chains(&self) -> Vec<ChainId> {
		let mut chains: Vec<ChainId> = self.chains.keys().copied().collect();
		chains.sort();
		chains
	}

	pub fn dispatch(&self, chain: ChainId) -> Result<&ChainClients, TransactionError> {
		self.chains.get(&chain).ok_or_else(|| {
			TransactionError::configuration_error(format!("Chain {} is not supported", chain))
		})
	}

	#[instrument(skip(self, token_ids), fields(chain = %account.chain, address = %account.address))]
	pub async fn get_balances(
		&self,
		account: &Account,
		token_ids: &[String],
	) -> Result<AccountBalances, TransactionError> {
		let clients = self.dispatch(account.chain)?;
		clients.balances.get_balances(&account.address, token_ids).await
	}

	/// Refreshes many accounts concurrently; one failed account does not affect the others
	#[instrument(skip_all, fields(accounts = requests.len()))]
	pub async fn sync_balances(&self, requests: &[BalanceRequest]) -> Vec<BalanceSync> {
		let futures = requests.iter().map(|request| async move {
			BalanceSync {
				account: request.account.clone(),
				result: self.get_balances(&request.account, &request.token_ids).await,
			}
		});
		join_all(futures).await
	}

	#[instrument(
		skip(self, intent),
		fields(chain = %intent.asset_id.chain, kind = ?intent.tx_kind())
	)]
	pub async fn preload(
		&self,
		owner: &str,
		intent: TransactionIntent,
	) -> Result<PreloadResult, TransactionError> {
		let clients = self.dispatch(intent.asset_id.chain)?;
		clients.preloader.preload(owner, intent).await
	}

	#[instrument(skip(self, preload, signer, key), fields(chain = %preload.intent.asset_id.chain))]
	pub async fn sign(
		&self,
		preload: &PreloadResult,
		priority: FeePriority,
		signer: &dyn Signer,
		key: &PrivateKey,
	) -> Result<Vec<SignedPayload>, TransactionError> {
		let clients = self.dispatch(preload.intent.asset_id.chain)?;
		clients
			.signer
			.sign(
				&preload.intent,
				&preload.sign_data,
				preload.fee(priority),
				signer,
				key,
			)
			.await
	}

	/// Broadcasts payloads one by one in order, stopping at the first failure
	#[instrument(skip(self, payloads), fields(chain = %chain, payloads = payloads.len()))]
	pub async fn broadcast(
		&self,
		chain: ChainId,
		payloads: &[SignedPayload],
		kind: TxKind,
	) -> Result<Vec<String>, TransactionError> {
		let clients = self.dispatch(chain)?;
		let mut hashes = Vec::with_capacity(payloads.len());
		for payload in payloads {
			let hash = clients.broadcaster.broadcast(payload, kind).await?;
			tracing::info!(hash = %hash, "Transaction broadcast");
			hashes.push(hash);
		}
		Ok(hashes)
	}

	#[instrument(skip(self), fields(chain = %request.chain, hash = %request.hash))]
	pub async fn get_transaction_status(
		&self,
		request: &TransactionStatusRequest,
	) -> Result<TransactionChanges, TransactionError> {
		let clients = self.dispatch(request.chain)?;
		clients.status.get_transaction_status(request).await
	}

	/// Polls until a terminal state or until `max_attempts` polls returned `Pending`, in which
	/// case the last pending changes are returned
	pub async fn poll_until_terminal(
		&self,
		request: &TransactionStatusRequest,
		interval: Duration,
		max_attempts: usize,
	) -> Result<TransactionChanges, TransactionError> {
		let mut attempt = 0;
		loop {
			attempt += 1;
			let changes = self.get_transaction_status(request).await?;
			if changes.state.is_terminal() || attempt >= max_attempts {
				return Ok(changes);
			}
			tokio::time::sleep(interval).await;
		}
	}
}
