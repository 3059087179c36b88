use crate::models::ChainId;

pub const STAKE_MEMO: &str = "Stake via Gem Wallet";

const SECP256K1_PUBKEY_TYPE: &str = "/cosmos.crypto.secp256k1.PubKey";
const ETHSECP256K1_PUBKEY_TYPE: &str = "/injective.crypto.v1beta1.ethsecp256k1.PubKey";

/// Static parameters of a Cosmos SDK chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CosmosChainParams {
	pub denom: &'static str,
	/// Flat fee for transfers and swaps
	pub transfer_fee: u64,
	/// Flat fee for every staking message
	pub stake_fee: u64,
	pub supports_staking: bool,
	pub pubkey_type: &'static str,
}

impl CosmosChainParams {
	pub fn for_chain(chain: ChainId) -> Option<Self> {
		let params = match chain {
			ChainId::Cosmos => Self::secp256k1("uatom", 3_000, 25_000, true),
			ChainId::Osmosis => Self::secp256k1("uosmo", 10_000, 100_000, true),
			ChainId::Celestia => Self::secp256k1("utia", 3_000, 10_000, true),
			ChainId::Sei => Self::secp256k1("usei", 100_000, 200_000, true),
			ChainId::Noble => Self::secp256k1("uusdc", 25_000, 25_000, false),
			ChainId::Injective => Self {
				denom: "inj",
				transfer_fee: 100_000_000_000_000,
				stake_fee: 1_000_000_000_000_000,
				supports_staking: true,
				pubkey_type: ETHSECP256K1_PUBKEY_TYPE,
			},
			ChainId::Solana | ChainId::Tron => return None,
		};
		Some(params)
	}

	fn secp256k1(
		denom: &'static str,
		transfer_fee: u64,
		stake_fee: u64,
		supports_staking: bool,
	) -> Self {
		Self {
			denom,
			transfer_fee,
			stake_fee,
			supports_staking,
			pubkey_type: SECP256K1_PUBKEY_TYPE,
		}
	}
}
