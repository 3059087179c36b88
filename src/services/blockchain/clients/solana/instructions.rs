//! Instruction builders for the programs this crate uses.

use crate::services::blockchain::solana::{
	address::{
		ASSOCIATED_TOKEN_PROGRAM_ID, COMPUTE_BUDGET_PROGRAM_ID, MEMO_PROGRAM_ID, STAKE_CONFIG_ID,
		STAKE_PROGRAM_ID, SYSTEM_PROGRAM_ID, SYSVAR_CLOCK_ID, SYSVAR_RENT_ID,
		SYSVAR_STAKE_HISTORY_ID,
	},
	AccountMeta, Instruction, Pubkey,
};

/// Size of a stake account
pub const STAKE_ACCOUNT_SPACE: u64 = 200;

pub fn set_compute_unit_limit(units: u32) -> Instruction {
	let mut data = vec![2u8];
	data.extend_from_slice(&units.to_le_bytes());
	Instruction {
		program_id: Pubkey::constant(COMPUTE_BUDGET_PROGRAM_ID),
		accounts: vec![],
		data,
	}
}

pub fn set_compute_unit_price(micro_lamports: u64) -> Instruction {
	let mut data = vec![3u8];
	data.extend_from_slice(&micro_lamports.to_le_bytes());
	Instruction {
		program_id: Pubkey::constant(COMPUTE_BUDGET_PROGRAM_ID),
		accounts: vec![],
		data,
	}
}

pub fn transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
	let mut data = 2u32.to_le_bytes().to_vec();
	data.extend_from_slice(&lamports.to_le_bytes());
	Instruction {
		program_id: Pubkey::constant(SYSTEM_PROGRAM_ID),
		accounts: vec![
			AccountMeta::writable(*from, true),
			AccountMeta::writable(*to, false),
		],
		data,
	}
}

pub fn create_account_with_seed(
	from: &Pubkey,
	to: &Pubkey,
	base: &Pubkey,
	seed: &str,
	lamports: u64,
	space: u64,
	owner: &Pubkey,
) -> Instruction {
	let mut data = 3u32.to_le_bytes().to_vec();
	data.extend_from_slice(&base.0);
	data.extend_from_slice(&(seed.len() as u64).to_le_bytes());
	data.extend_from_slice(seed.as_bytes());
	data.extend_from_slice(&lamports.to_le_bytes());
	data.extend_from_slice(&space.to_le_bytes());
	data.extend_from_slice(&owner.0);
	Instruction {
		program_id: Pubkey::constant(SYSTEM_PROGRAM_ID),
		accounts: vec![
			AccountMeta::writable(*from, true),
			AccountMeta::writable(*to, false),
			AccountMeta::readonly(*base, true),
		],
		data,
	}
}

/// Initializes a stake account with `authority` as both staker and withdrawer and no lockup
pub fn stake_initialize(stake: &Pubkey, authority: &Pubkey) -> Instruction {
	let mut data = 0u32.to_le_bytes().to_vec();
	data.extend_from_slice(&authority.0);
	data.extend_from_slice(&authority.0);
	// lockup: unix_timestamp, epoch, custodian
	data.extend_from_slice(&0i64.to_le_bytes());
	data.extend_from_slice(&0u64.to_le_bytes());
	data.extend_from_slice(&[0u8; 32]);
	Instruction {
		program_id: Pubkey::constant(STAKE_PROGRAM_ID),
		accounts: vec![
			AccountMeta::writable(*stake, false),
			AccountMeta::readonly(Pubkey::constant(SYSVAR_RENT_ID), false),
		],
		data,
	}
}

pub fn stake_delegate(stake: &Pubkey, vote: &Pubkey, authority: &Pubkey) -> Instruction {
	Instruction {
		program_id: Pubkey::constant(STAKE_PROGRAM_ID),
		accounts: vec![
			AccountMeta::writable(*stake, false),
			AccountMeta::readonly(*vote, false),
			AccountMeta::readonly(Pubkey::constant(SYSVAR_CLOCK_ID), false),
			AccountMeta::readonly(Pubkey::constant(SYSVAR_STAKE_HISTORY_ID), false),
			AccountMeta::readonly(Pubkey::constant(STAKE_CONFIG_ID), false),
			AccountMeta::readonly(*authority, true),
		],
		data: 2u32.to_le_bytes().to_vec(),
	}
}

pub fn stake_deactivate(stake: &Pubkey, authority: &Pubkey) -> Instruction {
	Instruction {
		program_id: Pubkey::constant(STAKE_PROGRAM_ID),
		accounts: vec![
			AccountMeta::writable(*stake, false),
			AccountMeta::readonly(Pubkey::constant(SYSVAR_CLOCK_ID), false),
			AccountMeta::readonly(*authority, true),
		],
		data: 5u32.to_le_bytes().to_vec(),
	}
}

pub fn stake_withdraw(
	stake: &Pubkey,
	authority: &Pubkey,
	to: &Pubkey,
	lamports: u64,
) -> Instruction {
	let mut data = 4u32.to_le_bytes().to_vec();
	data.extend_from_slice(&lamports.to_le_bytes());
	Instruction {
		program_id: Pubkey::constant(STAKE_PROGRAM_ID),
		accounts: vec![
			AccountMeta::writable(*stake, false),
			AccountMeta::writable(*to, false),
			AccountMeta::readonly(Pubkey::constant(SYSVAR_CLOCK_ID), false),
			AccountMeta::readonly(Pubkey::constant(SYSVAR_STAKE_HISTORY_ID), false),
			AccountMeta::readonly(*authority, true),
		],
		data,
	}
}

pub fn transfer_checked(
	source: &Pubkey,
	mint: &Pubkey,
	destination: &Pubkey,
	owner: &Pubkey,
	amount: u64,
	decimals: u8,
	token_program: &Pubkey,
) -> Instruction {
	let mut data = vec![12u8];
	data.extend_from_slice(&amount.to_le_bytes());
	data.push(decimals);
	Instruction {
		program_id: *token_program,
		accounts: vec![
			AccountMeta::writable(*source, false),
			AccountMeta::readonly(*mint, false),
			AccountMeta::writable(*destination, false),
			AccountMeta::readonly(*owner, true),
		],
		data,
	}
}

/// Creates `wallet`'s associated token account unless it already exists
pub fn create_associated_token_account_idempotent(
	payer: &Pubkey,
	associated_account: &Pubkey,
	wallet: &Pubkey,
	mint: &Pubkey,
	token_program: &Pubkey,
) -> Instruction {
	Instruction {
		program_id: Pubkey::constant(ASSOCIATED_TOKEN_PROGRAM_ID),
		accounts: vec![
			AccountMeta::writable(*payer, true),
			AccountMeta::writable(*associated_account, false),
			AccountMeta::readonly(*wallet, false),
			AccountMeta::readonly(*mint, false),
			AccountMeta::readonly(Pubkey::constant(SYSTEM_PROGRAM_ID), false),
			AccountMeta::readonly(*token_program, false),
		],
		data: vec![1u8],
	}
}

pub fn memo(text: &str) -> Instruction {
	Instruction {
		program_id: Pubkey::constant(MEMO_PROGRAM_ID),
		accounts: vec![],
		data: text.as_bytes().to_vec(),
	}
}
