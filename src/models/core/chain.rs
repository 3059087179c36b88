use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Chains supported by the transaction core.
///
/// Every capability (balances, preload, signing, broadcast and status) is keyed by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
	Cosmos,
	Osmosis,
	Celestia,
	Injective,
	Sei,
	Noble,
	Solana,
	Tron,
}

/// Protocol family a chain belongs to. Chains of one family share a client implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainFamily {
	/// Account/sequence chains built on the Cosmos SDK, gas-metered
	Cosmos,
	/// Priority-fee auction chain
	Solana,
	/// Bandwidth/energy resource-metered chain
	Tron,
}

/// Elliptic curve (and hashing convention) the external signer must use for a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
	/// ECDSA over secp256k1, message hashed with sha256
	Secp256k1,
	/// ECDSA over secp256k1, message hashed with keccak256
	EthSecp256k1,
	/// EdDSA over ed25519, raw message
	Ed25519,
}

impl ChainId {
	pub const ALL: [ChainId; 8] = [
		ChainId::Cosmos,
		ChainId::Osmosis,
		ChainId::Celestia,
		ChainId::Injective,
		ChainId::Sei,
		ChainId::Noble,
		ChainId::Solana,
		ChainId::Tron,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Cosmos => "cosmos",
			Self::Osmosis => "osmosis",
			Self::Celestia => "celestia",
			Self::Injective => "injective",
			Self::Sei => "sei",
			Self::Noble => "noble",
			Self::Solana => "solana",
			Self::Tron => "tron",
		}
	}

	pub fn family(&self) -> ChainFamily {
		match self {
			Self::Cosmos
			| Self::Osmosis
			| Self::Celestia
			| Self::Injective
			| Self::Sei
			| Self::Noble => ChainFamily::Cosmos,
			Self::Solana => ChainFamily::Solana,
			Self::Tron => ChainFamily::Tron,
		}
	}

	pub fn curve(&self) -> Curve {
		match self {
			Self::Injective => Curve::EthSecp256k1,
			Self::Solana => Curve::Ed25519,
			_ => Curve::Secp256k1,
		}
	}

	/// Decimals of the native asset
	pub fn decimals(&self) -> u32 {
		match self {
			Self::Injective => 18,
			Self::Solana => 9,
			_ => 6,
		}
	}

	/// Asset every fee on this chain is paid in
	pub fn fee_asset(&self) -> AssetId {
		AssetId::native(*self)
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl FromStr for ChainId {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.iter()
			.find(|chain| chain.as_str() == s)
			.copied()
			.ok_or_else(|| format!("Unsupported chain: {}", s))
	}
}

/// Identifies an asset: the native coin of a chain or one of its tokens.
///
/// The string form is `chain` for native assets and `chain_tokenId` for tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct AssetId {
	pub chain: ChainId,
	pub token_id: Option<String>,
}

impl AssetId {
	pub fn native(chain: ChainId) -> Self {
		Self {
			chain,
			token_id: None,
		}
	}

	pub fn token(chain: ChainId, token_id: impl Into<String>) -> Self {
		Self {
			chain,
			token_id: Some(token_id.into()),
		}
	}

	pub fn is_native(&self) -> bool {
		self.token_id.is_none()
	}
}

impl fmt::Display for AssetId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.token_id {
			Some(token_id) => write!(f, "{}_{}", self.chain, token_id),
			None => write!(f, "{}", self.chain),
		}
	}
}

impl FromStr for AssetId {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.split_once('_') {
			Some((chain, token_id)) if !token_id.is_empty() => {
				Ok(Self::token(chain.parse()?, token_id))
			}
			Some(_) => Err(format!("Invalid asset id: {}", s)),
			None => Ok(Self::native(s.parse()?)),
		}
	}
}

/// An address on a specific chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Account {
	pub chain: ChainId,
	pub address: String,
}

impl Account {
	pub fn new(chain: ChainId, address: impl Into<String>) -> Self {
		Self {
			chain,
			address: address.into(),
		}
	}
}
