//! Tron: TRX and TRC-20 transfers, contract calls and Stake 2.0 with witness votes.

pub mod address;
mod client;
pub mod fee;
pub mod proto;
pub mod trc20;
pub mod votes;

pub use address::TronAddress;
pub use client::TronClient;
pub use fee::{TronFeeCalculator, TronFeeState};
