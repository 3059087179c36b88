//! Transaction monitor.
//!
//! A single task owns the set of pending transactions. Callers control it through a
//! [`MonitorHandle`] backed by a command channel; on every tick the task polls all tracked
//! transactions concurrently, forwards state changes to a [`TransactionStateSink`] and drops
//! transactions that reached a terminal state.

use async_trait::async_trait;
use futures::future::join_all;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
	sync::{mpsc, oneshot},
	task::JoinHandle,
};

use crate::{
	models::{Account, AccountBalances, ChainId, TransactionChanges, TransactionStatusRequest},
	services::transaction::{BalanceRequest, Registry},
};

const COMMAND_BUFFER: usize = 64;

/// Persistence boundary for reconciled state
#[async_trait]
pub trait TransactionStateSink: Send + Sync {
	async fn record_transaction(
		&self,
		request: &TransactionStatusRequest,
		changes: &TransactionChanges,
	);

	async fn record_balances(&self, account: &Account, balances: &AccountBalances);
}

#[derive(Debug)]
pub enum MonitorCommand {
	Track(TransactionStatusRequest),
	Untrack { chain: ChainId, hash: String },
	RefreshBalances(Vec<BalanceRequest>),
	/// Replies with the number of tracked transactions
	Pending(oneshot::Sender<usize>),
	Shutdown,
}

pub struct TransactionMonitor {
	registry: Arc<Registry>,
	sink: Arc<dyn TransactionStateSink>,
	interval: Duration,
	pending: HashMap<(ChainId, String), TransactionStatusRequest>,
}

impl TransactionMonitor {
	pub fn new(
		registry: Arc<Registry>,
		sink: Arc<dyn TransactionStateSink>,
		interval: Duration,
	) -> Self {
		Self {
			registry,
			sink,
			interval,
			pending: HashMap::new(),
		}
	}

	/// Starts the monitor task
	pub fn spawn(self) -> MonitorHandle {
		let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
		let task = tokio::spawn(self.run(receiver));
		MonitorHandle { sender, task }
	}

	async fn run(mut self, mut receiver: mpsc::Receiver<MonitorCommand>) {
		let mut ticker = tokio::time::interval(self.interval);
		ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

		loop {
			tokio::select! {
				command = receiver.recv() => match command {
					Some(MonitorCommand::Track(request)) => {
						tracing::debug!(
							chain = %request.chain,
							hash = %request.hash,
							"Tracking transaction"
						);
						self.pending.insert((request.chain, request.hash.clone()), request);
					}
					Some(MonitorCommand::Untrack { chain, hash }) => {
						self.pending.remove(&(chain, hash));
					}
					Some(MonitorCommand::RefreshBalances(requests)) => {
						self.refresh_balances(&requests).await;
					}
					Some(MonitorCommand::Pending(reply)) => {
						let _ = reply.send(self.pending.len());
					}
					Some(MonitorCommand::Shutdown) | None => {
						tracing::info!(pending = self.pending.len(), "Transaction monitor stopped");
						break;
					}
				},
				_ = ticker.tick() => self.poll_pending().await,
			}
		}
	}

	async fn poll_pending(&mut self) {
		if self.pending.is_empty() {
			return;
		}

		let registry = &self.registry;
		let polls = self.pending.iter().map(|(key, request)| async move {
			(key.clone(), registry.get_transaction_status(request).await)
		});
		let results = join_all(polls).await;

		for (key, result) in results {
			let changes = match result {
				Ok(changes) => changes,
				Err(e) => {
					tracing::warn!(chain = %key.0, hash = %key.1, error = %e, "Status poll failed");
					continue;
				}
			};
			if !changes.state.is_terminal() && changes.hash_change.is_none() {
				continue;
			}

			if let Some(request) = self.pending.get(&key) {
				self.sink.record_transaction(request, &changes).await;
			}
			if changes.state.is_terminal() {
				tracing::info!(
					chain = %key.0,
					hash = %key.1,
					state = ?changes.state,
					"Transaction settled"
				);
				self.pending.remove(&key);
			} else if let Some(change) = &changes.hash_change {
				if let Some(mut request) = self.pending.remove(&key) {
					tracing::debug!(
						chain = %key.0,
						old = %change.old,
						new = %change.new,
						"Transaction replaced"
					);
					request.hash = change.new.clone();
					self.pending.insert((key.0, change.new.clone()), request);
				}
			}
		}
	}

	async fn refresh_balances(&self, requests: &[BalanceRequest]) {
		for sync in self.registry.sync_balances(requests).await {
			match sync.result {
				Ok(balances) => self.sink.record_balances(&sync.account, &balances).await,
				Err(e) => tracing::warn!(
					chain = %sync.account.chain,
					address = %sync.account.address,
					error = %e,
					"Balance refresh failed"
				),
			}
		}
	}
}

/// Handle to a running [`TransactionMonitor`]
pub struct MonitorHandle {
	sender: mpsc::Sender<MonitorCommand>,
	task: JoinHandle<()>,
}

impl MonitorHandle {
	pub async fn track(&self, request: TransactionStatusRequest) -> Result<(), anyhow::Error> {
		self.send(MonitorCommand::Track(request)).await
	}

	pub async fn untrack(
		&self,
		chain: ChainId,
		hash: impl Into<String>,
	) -> Result<(), anyhow::Error> {
		self.send(MonitorCommand::Untrack {
			chain,
			hash: hash.into(),
		})
		.await
	}

	pub async fn refresh_balances(
		&self,
		requests: Vec<BalanceRequest>,
	) -> Result<(), anyhow::Error> {
		self.send(MonitorCommand::RefreshBalances(requests)).await
	}

	pub async fn pending(&self) -> Result<usize, anyhow::Error> {
		let (reply, receiver) = oneshot::channel();
		self.send(MonitorCommand::Pending(reply)).await?;
		Ok(receiver.await?)
	}

	/// Stops the task and waits for it to finish
	pub async fn shutdown(self) -> Result<(), anyhow::Error> {
		self.send(MonitorCommand::Shutdown).await?;
		self.task.await?;
		Ok(())
	}

	async fn send(&self, command: MonitorCommand) -> Result<(), anyhow::Error> {
		self.sender
			.send(command)
			.await
			.map_err(|_| anyhow::anyhow!("Transaction monitor is not running"))
	}
}
