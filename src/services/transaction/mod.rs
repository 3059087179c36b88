//! Transaction lifecycle: capability traits, registry, status resolution and monitoring.

mod client;
mod error;
mod monitor;
mod registry;
mod signer;
pub mod status;

pub use client::{
	BalanceAggregator, BroadcastClient, ChainClient, FeeCalculator, SignClient, SignerPreloader,
	TransactionStatusClient,
};
pub use error::TransactionError;
pub use monitor::{MonitorCommand, MonitorHandle, TransactionMonitor, TransactionStateSink};
pub use registry::{BalanceRequest, BalanceSync, ChainClients, Registry, RegistryBuilder};
pub(crate) use signer::expect_signature_len;
pub use signer::{PrivateKey, Signer};
pub use status::{resolve, resolve_state, ReceiptObservation};
