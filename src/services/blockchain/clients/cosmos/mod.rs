//! Cosmos SDK family: Cosmos Hub, Osmosis, Celestia, Injective, Sei and Noble.

mod client;
pub mod fee;
mod params;
pub mod proto;

pub use client::CosmosClient;
pub use fee::CosmosFeeCalculator;
pub use params::{CosmosChainParams, STAKE_MEMO};
