//! Legacy Solana message and transaction wire format.
//!
//! Message layout: header (3 bytes), compact array of account keys, recent blockhash,
//! compact array of compiled instructions. A transaction is a compact array of 64 byte
//! signatures followed by the message.

use std::collections::BTreeMap;

use crate::services::{blockchain::solana::Pubkey, transaction::TransactionError};

pub const SIGNATURE_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
	pub pubkey: Pubkey,
	pub is_signer: bool,
	pub is_writable: bool,
}

impl AccountMeta {
	pub fn writable(pubkey: Pubkey, is_signer: bool) -> Self {
		Self {
			pubkey,
			is_signer,
			is_writable: true,
		}
	}

	pub fn readonly(pubkey: Pubkey, is_signer: bool) -> Self {
		Self {
			pubkey,
			is_signer,
			is_writable: false,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
	pub program_id: Pubkey,
	pub accounts: Vec<AccountMeta>,
	pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompiledInstruction {
	program_id_index: u8,
	accounts: Vec<u8>,
	data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
	pub num_required_signatures: u8,
	pub num_readonly_signed: u8,
	pub num_readonly_unsigned: u8,
	pub account_keys: Vec<Pubkey>,
	pub recent_blockhash: [u8; 32],
	instructions: Vec<CompiledInstruction>,
}

impl Message {
	/// Compiles instructions with `payer` as the fee payer.
	///
	/// Keys are ordered payer first, then writable signers, readonly signers, writable
	/// non-signers and readonly non-signers, each group sorted by key.
	pub fn compile(
		payer: &Pubkey,
		instructions: &[Instruction],
		recent_blockhash: [u8; 32],
	) -> Result<Self, TransactionError> {
		// (is_signer, is_writable) per key
		let mut metas: BTreeMap<Pubkey, (bool, bool)> = BTreeMap::new();
		for instruction in instructions {
			metas.entry(instruction.program_id).or_insert((false, false));
			for account in &instruction.accounts {
				let meta = metas.entry(account.pubkey).or_insert((false, false));
				meta.0 |= account.is_signer;
				meta.1 |= account.is_writable;
			}
		}
		metas.remove(payer);

		let group = |signer: bool, writable: bool| -> Vec<Pubkey> {
			metas
				.iter()
				.filter(|(_, meta)| **meta == (signer, writable))
				.map(|(key, _)| *key)
				.collect()
		};
		let writable_signers = group(true, true);
		let readonly_signers = group(true, false);
		let writable_unsigned = group(false, true);
		let readonly_unsigned = group(false, false);

		let mut account_keys = Vec::with_capacity(metas.len() + 1);
		account_keys.push(*payer);
		account_keys.extend(writable_signers.iter());
		account_keys.extend(readonly_signers.iter());
		account_keys.extend(writable_unsigned.iter());
		account_keys.extend(readonly_unsigned.iter());

		if account_keys.len() > u8::MAX as usize {
			return Err(TransactionError::encoding_error("Too many accounts in message"));
		}
		let index_of = |key: &Pubkey| -> u8 {
			account_keys
				.iter()
				.position(|candidate| candidate == key)
				.unwrap_or_default() as u8
		};

		let compiled = instructions
			.iter()
			.map(|instruction| CompiledInstruction {
				program_id_index: index_of(&instruction.program_id),
				accounts: instruction
					.accounts
					.iter()
					.map(|account| index_of(&account.pubkey))
					.collect(),
				data: instruction.data.clone(),
			})
			.collect();

		Ok(Self {
			num_required_signatures: (1 + writable_signers.len() + readonly_signers.len()) as u8,
			num_readonly_signed: readonly_signers.len() as u8,
			num_readonly_unsigned: readonly_unsigned.len() as u8,
			account_keys,
			recent_blockhash,
			instructions: compiled,
		})
	}

	pub fn serialize(&self) -> Vec<u8> {
		let mut out = vec![
			self.num_required_signatures,
			self.num_readonly_signed,
			self.num_readonly_unsigned,
		];
		encode_compact_u16(self.account_keys.len(), &mut out);
		for key in &self.account_keys {
			out.extend_from_slice(&key.0);
		}
		out.extend_from_slice(&self.recent_blockhash);
		encode_compact_u16(self.instructions.len(), &mut out);
		for instruction in &self.instructions {
			out.push(instruction.program_id_index);
			encode_compact_u16(instruction.accounts.len(), &mut out);
			out.extend_from_slice(&instruction.accounts);
			encode_compact_u16(instruction.data.len(), &mut out);
			out.extend_from_slice(&instruction.data);
		}
		out
	}
}

/// Serializes a transaction from its signatures and message bytes
pub fn serialize_transaction(signatures: &[Vec<u8>], message: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(1 + signatures.len() * SIGNATURE_LEN + message.len());
	encode_compact_u16(signatures.len(), &mut out);
	for signature in signatures {
		out.extend_from_slice(signature);
	}
	out.extend_from_slice(message);
	out
}

/// Splits a serialized transaction into its signature slots and message bytes
pub fn split_transaction(bytes: &[u8]) -> Result<(Vec<Vec<u8>>, &[u8]), TransactionError> {
	let (count, offset) = decode_compact_u16(bytes)
		.ok_or_else(|| TransactionError::encoding_error("Truncated transaction"))?;
	let message_start = offset + count * SIGNATURE_LEN;
	if count == 0 || bytes.len() <= message_start {
		return Err(TransactionError::encoding_error(
			"Transaction has no signature slot or message",
		));
	}
	let signatures = bytes[offset..message_start]
		.chunks(SIGNATURE_LEN)
		.map(|chunk| chunk.to_vec())
		.collect();
	Ok((signatures, &bytes[message_start..]))
}

pub fn encode_compact_u16(value: usize, out: &mut Vec<u8>) {
	let mut remaining = value as u16;
	loop {
		let mut byte = (remaining & 0x7f) as u8;
		remaining >>= 7;
		if remaining == 0 {
			out.push(byte);
			return;
		}
		byte |= 0x80;
		out.push(byte);
	}
}

/// Returns the decoded value and the number of bytes it occupied
pub fn decode_compact_u16(bytes: &[u8]) -> Option<(usize, usize)> {
	let mut value = 0usize;
	for (index, byte) in bytes.iter().take(3).enumerate() {
		value |= ((byte & 0x7f) as usize) << (7 * index);
		if byte & 0x80 == 0 {
			return Some((value, index + 1));
		}
	}
	None
}
