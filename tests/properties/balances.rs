use alloy::primitives::U256;
use proptest::prelude::*;
use rust_decimal::Decimal;

use gem_txcore::{
	models::StakeIntent,
	services::blockchain::tron::votes,
	utils::encoding::{parse_amount, parse_hex_amount, parse_truncated_amount},
};

use crate::properties::strategies::{balance_strategy, votes_strategy, WITNESSES};

const SUN_PER_TRX: u64 = 1_000_000;

fn total_votes(votes: &std::collections::BTreeMap<String, u64>) -> u64 {
	votes.values().sum()
}

proptest! {
	#[test]
	fn total_excludes_reserved(balance in balance_strategy()) {
		let expected = balance.available
			+ balance.frozen
			+ balance.locked
			+ balance.staked
			+ balance.pending
			+ balance.rewards;

		prop_assert_eq!(balance.total_amount(), expected);
	}

	#[test]
	fn display_keeps_every_digit(balance in balance_strategy(), decimals in 0u32..19) {
		let display = balance.to_display(decimals).unwrap();

		let scale = Decimal::from(10u64.pow(decimals));
		let available = (display.available * scale).normalize();
		prop_assert_eq!(available.to_string(), balance.available.to_string());
		prop_assert!(display.available.scale() <= decimals);
	}

	#[test]
	fn node_amounts_parse_in_any_radix(value in any::<u128>(), fraction in "[0-9]{0,9}") {
		prop_assert_eq!(parse_amount(&value.to_string()).unwrap(), U256::from(value));
		prop_assert_eq!(parse_hex_amount(&format!("0x{:x}", value)).unwrap(), U256::from(value));
		prop_assert_eq!(
			parse_truncated_amount(&format!("{}.{}", value, fraction)).unwrap(),
			U256::from(value)
		);
	}

	#[test]
	fn delegation_adds_whole_trx(current in votes_strategy(), amount in 0u64..1_000_000_000_000) {
		let stake = StakeIntent::Delegate {
			validator: WITNESSES[0].to_string(),
		};
		let before: u64 = current.iter().map(|vote| vote.vote_count).sum();

		let after = votes::apply(&current, &stake, U256::from(amount)).unwrap();

		prop_assert_eq!(total_votes(&after), before + amount / SUN_PER_TRX);
		prop_assert!(after.values().all(|count| *count > 0));
	}

	#[test]
	fn redelegation_preserves_total(
		current in votes_strategy(),
		amount in 0u64..1_000_000_000_000,
	) {
		let stake = StakeIntent::Redelegate {
			src_validator: WITNESSES[1].to_string(),
			dst_validator: WITNESSES[2].to_string(),
		};
		let before: u64 = current.iter().map(|vote| vote.vote_count).sum();

		let after = votes::apply(&current, &stake, U256::from(amount)).unwrap();

		prop_assert_eq!(total_votes(&after), before);
		prop_assert!(after.values().all(|count| *count > 0));
	}

	#[test]
	fn undelegation_never_adds_votes(
		current in votes_strategy(),
		amount in 0u64..1_000_000_000_000,
	) {
		let stake = StakeIntent::Undelegate {
			validator: WITNESSES[0].to_string(),
			stake_id: None,
		};
		let before: u64 = current.iter().map(|vote| vote.vote_count).sum();

		let after = votes::apply(&current, &stake, U256::from(amount)).unwrap();

		prop_assert!(total_votes(&after) <= before);
		prop_assert!(total_votes(&after) + amount / SUN_PER_TRX >= before);
	}
}
