//! Chain clients and their transport.
//!
//! - `clients`: one client per chain family implementing every transaction capability
//! - `transports`: HTTP transport shared by all clients
//! - `error`: transport errors

mod clients;
mod error;
mod transports;

pub use clients::{cosmos, solana, tron, CosmosClient, SolanaClient, TronClient};
pub use error::TransportError;
pub use transports::{rpc_result, BlockchainTransport, HttpTransportClient};
