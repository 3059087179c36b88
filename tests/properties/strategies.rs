use alloy::primitives::U256;
use proptest::{option, prelude::*};

use gem_txcore::{
	models::{
		tron::TronVote, AssetId, Balance, ChainId, IntentKind, Resource, StakeIntent,
		TransactionIntent,
	},
	services::transaction::ReceiptObservation,
};

const MAX_SAMPLES: usize = 150;
const MAX_VOTES: usize = 8;

pub const COSMOS_CHAINS: [ChainId; 6] = [
	ChainId::Cosmos,
	ChainId::Osmosis,
	ChainId::Celestia,
	ChainId::Injective,
	ChainId::Sei,
	ChainId::Noble,
];

/// Witness addresses used by generated votes
pub const WITNESSES: [&str; 3] = [
	"TGCAjMXComunWZEXCT1LPBdcYbDVuyexBv",
	"TEdvoHEatmDKvTh3o9vBRB9Vdtbhn4QFhy",
	"TLa2f6VPqDgRE67v1736s7bJ8Ray5wYjU7",
];

pub fn prioritization_fees_strategy() -> impl Strategy<Value = Vec<u64>> {
	prop::collection::vec(
		prop_oneof![
			3 => 0u64..50_000,
			1 => Just(0u64),
			1 => 50_000u64..5_000_000,
		],
		0..MAX_SAMPLES,
	)
}

pub fn cosmos_chain_strategy() -> impl Strategy<Value = ChainId> {
	prop::sample::select(COSMOS_CHAINS.to_vec())
}

pub fn stake_strategy() -> impl Strategy<Value = StakeIntent> {
	let validator = prop::sample::select(WITNESSES.to_vec()).prop_map(|s| s.to_string());
	prop_oneof![
		validator.clone().prop_map(|validator| StakeIntent::Delegate { validator }),
		(validator.clone(), option::of("[0-9a-f]{8}")).prop_map(|(validator, stake_id)| {
			StakeIntent::Undelegate {
				validator,
				stake_id,
			}
		}),
		(validator.clone(), validator.clone()).prop_map(|(src_validator, dst_validator)| {
			StakeIntent::Redelegate {
				src_validator,
				dst_validator,
			}
		}),
		prop::collection::vec(validator, 1..3)
			.prop_map(|validators| StakeIntent::ClaimRewards { validators }),
		prop_oneof![Just(Resource::Bandwidth), Just(Resource::Energy)]
			.prop_map(|resource| StakeIntent::Freeze { resource }),
	]
}

/// Transfers and stake actions on `chain`
pub fn intent_strategy(chain: ChainId) -> impl Strategy<Value = TransactionIntent> {
	let native = (1u64..u64::MAX / 2).prop_map(move |amount| {
		TransactionIntent::transfer(
			AssetId::native(chain),
			"sender",
			"recipient",
			U256::from(amount),
		)
	});
	let token = (1u64..u64::MAX / 2).prop_map(move |amount| {
		TransactionIntent::transfer(
			AssetId::token(chain, "token"),
			"sender",
			"recipient",
			U256::from(amount),
		)
	});
	let stake = (1u64..1_000_000_000_000, stake_strategy()).prop_map(move |(amount, stake)| {
		TransactionIntent::stake(AssetId::native(chain), "sender", U256::from(amount), stake)
	});
	prop_oneof![native, token, stake]
}

pub fn is_stake(intent: &TransactionIntent) -> bool {
	matches!(intent.kind, IntentKind::Stake(_))
}

pub fn balance_strategy() -> impl Strategy<Value = Balance<U256>> {
	let amount = || any::<u64>().prop_map(U256::from);
	(amount(), amount(), amount(), amount(), amount(), amount(), amount()).prop_map(
		|(available, frozen, locked, staked, pending, rewards, reserved)| Balance {
			available,
			frozen,
			locked,
			staked,
			pending,
			rewards,
			reserved,
		},
	)
}

pub fn votes_strategy() -> impl Strategy<Value = Vec<TronVote>> {
	prop::collection::vec(
		(prop::sample::select(WITNESSES.to_vec()), 0u64..1_000_000).prop_map(
			|(vote_address, vote_count)| TronVote {
				vote_address: vote_address.to_string(),
				vote_count,
			},
		),
		0..MAX_VOTES,
	)
}

pub fn observation_strategy() -> impl Strategy<Value = ReceiptObservation> {
	(
		any::<bool>(),
		any::<bool>(),
		any::<bool>(),
		any::<bool>(),
		any::<bool>(),
		option::of(0u64..1_000_000),
		option::of(any::<u64>().prop_map(U256::from)),
	)
		.prop_map(
			|(found, rejected, expired, execution_failed, out_of_resource, block_height, fee)| {
				ReceiptObservation {
					found,
					rejected,
					expired,
					execution_failed,
					out_of_resource,
					block_height,
					fee,
				}
			},
		)
}
