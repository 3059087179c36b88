//! Solana: system, SPL token and native stake program transactions.

pub mod address;
mod client;
pub mod fee;
pub mod instructions;
pub mod message;

pub use address::Pubkey;
pub use client::SolanaClient;
pub use fee::{SolanaFeeCalculator, SolanaFeeState};
pub use message::{AccountMeta, Instruction, Message};
