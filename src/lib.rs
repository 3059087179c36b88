//! Multi-chain transaction lifecycle engine.
//!
//! For every supported chain this crate gathers the chain state needed to build a transaction,
//! computes fees under the chain's resource model, produces the exact payload to sign, submits
//! it and reconciles its on-chain outcome.
//!
//! # Architecture
//! - Models: chains, intents, fees, balances and transaction states
//! - Chain clients: one per family (Cosmos SDK, Solana, Tron), each implementing the five
//!   capabilities (balances, preload, sign, broadcast, status)
//! - Registry: routes capability calls by chain id
//! - Monitor: task that tracks pending transactions until they settle
//!
//! # Send flow
//! `Registry::preload` → `Registry::sign` → `Registry::broadcast` →
//! `Registry::get_transaction_status` until the state is terminal.

pub mod models;
pub mod services;
pub mod utils;
