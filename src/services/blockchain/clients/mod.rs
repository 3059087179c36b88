//! Chain client implementations.
//!
//! One client per chain family, each generic over its transport so tests can inject a mock:
//! - Cosmos SDK chains (gas-metered, flat fees)
//! - Solana (priority-fee auction)
//! - Tron (bandwidth and energy resources)

pub mod cosmos;
pub mod solana;
pub mod tron;

pub use cosmos::CosmosClient;
pub use solana::SolanaClient;
pub use tron::TronClient;
