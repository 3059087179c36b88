//! Blockchain-specific model implementations.
//!
//! This module contains the per-family data structures: the sign data each preloader produces
//! and the node response shapes each client reads.

pub mod cosmos;
pub mod solana;
pub mod tron;

use serde::{Deserialize, Serialize};

use crate::models::ChainFamily;

/// Chain metadata required to build a transaction, one variant per chain family.
///
/// The generic pipeline only stores and forwards this value; it is interpreted solely by the
/// sign client of the same family.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum ChainSignData {
	Cosmos(cosmos::CosmosSignData),
	Solana(solana::SolanaSignData),
	Tron(tron::TronSignData),
}

impl ChainSignData {
	pub fn family(&self) -> ChainFamily {
		match self {
			Self::Cosmos(_) => ChainFamily::Cosmos,
			Self::Solana(_) => ChainFamily::Solana,
			Self::Tron(_) => ChainFamily::Tron,
		}
	}
}
