//! Vote bookkeeping for Tron staking.
//!
//! Every stake change rewrites the owner's full vote list. Votes are whole TRX.

use alloy::primitives::U256;
use std::collections::BTreeMap;

use crate::{
	models::{tron::TronVote, StakeIntent},
	services::transaction::TransactionError,
};

const SUN_PER_TRX: u64 = 1_000_000;

fn whole_trx(amount: U256) -> u64 {
	u64::try_from(amount / U256::from(SUN_PER_TRX)).unwrap_or(u64::MAX)
}

fn add_votes(
	votes: &mut BTreeMap<String, u64>,
	validator: &str,
	count: u64,
) -> Result<(), TransactionError> {
	let entry = votes.entry(validator.to_string()).or_default();
	*entry = entry.checked_add(count).ok_or_else(|| {
		TransactionError::chain_state_unavailable(format!("Vote count overflow for {}", validator))
	})?;
	Ok(())
}

/// Vote list after applying `stake` to the current votes
pub fn apply(
	current: &[TronVote],
	stake: &StakeIntent,
	amount: U256,
) -> Result<BTreeMap<String, u64>, TransactionError> {
	let mut votes: BTreeMap<String, u64> = BTreeMap::new();
	for vote in current {
		add_votes(&mut votes, &vote.vote_address, vote.vote_count)?;
	}
	let count = whole_trx(amount);

	match stake {
		StakeIntent::Delegate { validator } => add_votes(&mut votes, validator, count)?,
		StakeIntent::Undelegate { validator, .. } => {
			if let Some(entry) = votes.get_mut(validator) {
				*entry = entry.saturating_sub(count);
			}
		}
		StakeIntent::Redelegate {
			src_validator,
			dst_validator,
		} => {
			let moved = votes
				.get(src_validator)
				.map(|current| (*current).min(count))
				.unwrap_or_default();
			if let Some(entry) = votes.get_mut(src_validator) {
				*entry -= moved;
			}
			add_votes(&mut votes, dst_validator, moved)?;
		}
		StakeIntent::ClaimRewards { .. }
		| StakeIntent::Withdraw { .. }
		| StakeIntent::Freeze { .. }
		| StakeIntent::Unfreeze { .. } => {}
	}

	votes.retain(|_, count| *count > 0);
	Ok(votes)
}
