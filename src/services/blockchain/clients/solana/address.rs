//! Solana public keys and derived addresses.

use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr};

use crate::services::transaction::TransactionError;

pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";
pub const COMPUTE_BUDGET_PROGRAM_ID: &str = "ComputeBudget111111111111111111111111111111";
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const TOKEN_2022_PROGRAM_ID: &str = "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb";
pub const ASSOCIATED_TOKEN_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
pub const MEMO_PROGRAM_ID: &str = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr";
pub const STAKE_PROGRAM_ID: &str = "Stake11111111111111111111111111111111111111";
pub const STAKE_CONFIG_ID: &str = "StakeConfig11111111111111111111111111111111";
pub const SYSVAR_RENT_ID: &str = "SysvarRent111111111111111111111111111111111";
pub const SYSVAR_CLOCK_ID: &str = "SysvarC1ock11111111111111111111111111111111";
pub const SYSVAR_STAKE_HISTORY_ID: &str = "SysvarStakeHistory1111111111111111111111111";

const MAX_SEED_LEN: usize = 32;
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pubkey(pub [u8; 32]);

impl Pubkey {
	/// Parses a well-known program id; panics only on a malformed constant
	pub(crate) fn constant(id: &'static str) -> Self {
		match id.parse() {
			Ok(pubkey) => pubkey,
			Err(_) => unreachable!("invalid program id constant {}", id),
		}
	}

	pub fn to_bytes(&self) -> [u8; 32] {
		self.0
	}

	pub fn is_on_curve(&self) -> bool {
		CompressedEdwardsY(self.0).decompress().is_some()
	}

	/// Address derived from `base`, a seed string and the owning program
	pub fn create_with_seed(
		base: &Pubkey,
		seed: &str,
		owner: &Pubkey,
	) -> Result<Pubkey, TransactionError> {
		if seed.len() > MAX_SEED_LEN {
			return Err(TransactionError::encoding_error(format!(
				"Seed '{}' exceeds {} bytes",
				seed, MAX_SEED_LEN
			)));
		}
		let hash = Sha256::new()
			.chain_update(base.0)
			.chain_update(seed.as_bytes())
			.chain_update(owner.0)
			.finalize();
		Ok(Pubkey(hash.into()))
	}

	/// First off-curve program address for `seeds`, searching bump seeds from 255 down
	pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Option<(Pubkey, u8)> {
		(0..=u8::MAX).rev().find_map(|bump| {
			let mut hasher = Sha256::new();
			for seed in seeds {
				hasher.update(seed);
			}
			hasher.update([bump]);
			hasher.update(program_id.0);
			hasher.update(PDA_MARKER);
			let candidate = Pubkey(hasher.finalize().into());
			(!candidate.is_on_curve()).then_some((candidate, bump))
		})
	}

	/// Associated token account of `wallet` for `mint` under `token_program`
	pub fn associated_token_address(
		wallet: &Pubkey,
		mint: &Pubkey,
		token_program: &Pubkey,
	) -> Result<Pubkey, TransactionError> {
		let program = Pubkey::constant(ASSOCIATED_TOKEN_PROGRAM_ID);
		Self::find_program_address(&[&wallet.0, &token_program.0, &mint.0], &program)
			.map(|(address, _)| address)
			.ok_or_else(|| {
				TransactionError::encoding_error(format!(
					"No associated token address for {} and mint {}",
					wallet, mint
				))
			})
	}
}

impl FromStr for Pubkey {
	type Err = TransactionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = bs58::decode(s)
			.into_vec()
			.map_err(|e| {
				TransactionError::encoding_error(format!("Invalid address {}: {}", s, e))
			})?;
		let bytes: [u8; 32] = bytes.try_into().map_err(|_| {
			TransactionError::encoding_error(format!("Address {} is not 32 bytes", s))
		})?;
		Ok(Pubkey(bytes))
	}
}

impl fmt::Display for Pubkey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", bs58::encode(self.0).into_string())
	}
}

impl fmt::Debug for Pubkey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Pubkey({})", self)
	}
}
