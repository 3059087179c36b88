//! Protobuf messages of the Tron `protocol` package.
//!
//! Only the fields this crate writes are declared. Addresses are the raw 21 byte form.

use prost::Message;
use sha2::{Digest, Sha256};

pub const TRANSFER_CONTRACT: i32 = 1;
pub const VOTE_WITNESS_CONTRACT: i32 = 4;
pub const WITHDRAW_BALANCE_CONTRACT: i32 = 13;
pub const TRIGGER_SMART_CONTRACT: i32 = 31;
pub const FREEZE_BALANCE_V2_CONTRACT: i32 = 54;
pub const UNFREEZE_BALANCE_V2_CONTRACT: i32 = 55;
pub const WITHDRAW_EXPIRE_UNFREEZE_CONTRACT: i32 = 56;

pub const RESOURCE_BANDWIDTH: i32 = 0;
pub const RESOURCE_ENERGY: i32 = 1;

const TYPE_URL_PREFIX: &str = "type.googleapis.com/protocol.";

#[derive(Clone, PartialEq, Message)]
pub struct Any {
	#[prost(string, tag = "1")]
	pub type_url: String,
	#[prost(bytes = "vec", tag = "2")]
	pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Contract {
	#[prost(int32, tag = "1")]
	pub r#type: i32,
	#[prost(message, optional, tag = "2")]
	pub parameter: Option<Any>,
}

impl Contract {
	/// Wraps a contract message with its type and type url
	pub fn new<M: Message>(contract_type: i32, name: &str, message: &M) -> Self {
		Self {
			r#type: contract_type,
			parameter: Some(Any {
				type_url: format!("{}{}", TYPE_URL_PREFIX, name),
				value: message.encode_to_vec(),
			}),
		}
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct TransactionRaw {
	#[prost(bytes = "vec", tag = "1")]
	pub ref_block_bytes: Vec<u8>,
	#[prost(int64, tag = "3")]
	pub ref_block_num: i64,
	#[prost(bytes = "vec", tag = "4")]
	pub ref_block_hash: Vec<u8>,
	#[prost(int64, tag = "8")]
	pub expiration: i64,
	#[prost(bytes = "vec", tag = "10")]
	pub data: Vec<u8>,
	#[prost(message, repeated, tag = "11")]
	pub contract: Vec<Contract>,
	#[prost(int64, tag = "14")]
	pub timestamp: i64,
	#[prost(int64, tag = "18")]
	pub fee_limit: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct Transaction {
	#[prost(message, optional, tag = "1")]
	pub raw_data: Option<TransactionRaw>,
	#[prost(bytes = "vec", repeated, tag = "2")]
	pub signature: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TransferContract {
	#[prost(bytes = "vec", tag = "1")]
	pub owner_address: Vec<u8>,
	#[prost(bytes = "vec", tag = "2")]
	pub to_address: Vec<u8>,
	#[prost(int64, tag = "3")]
	pub amount: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct TriggerSmartContract {
	#[prost(bytes = "vec", tag = "1")]
	pub owner_address: Vec<u8>,
	#[prost(bytes = "vec", tag = "2")]
	pub contract_address: Vec<u8>,
	#[prost(int64, tag = "3")]
	pub call_value: i64,
	#[prost(bytes = "vec", tag = "4")]
	pub data: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct FreezeBalanceV2Contract {
	#[prost(bytes = "vec", tag = "1")]
	pub owner_address: Vec<u8>,
	#[prost(int64, tag = "2")]
	pub frozen_balance: i64,
	#[prost(int32, tag = "3")]
	pub resource: i32,
}

#[derive(Clone, PartialEq, Message)]
pub struct UnfreezeBalanceV2Contract {
	#[prost(bytes = "vec", tag = "1")]
	pub owner_address: Vec<u8>,
	#[prost(int64, tag = "2")]
	pub unfreeze_balance: i64,
	#[prost(int32, tag = "3")]
	pub resource: i32,
}

#[derive(Clone, PartialEq, Message)]
pub struct Vote {
	#[prost(bytes = "vec", tag = "1")]
	pub vote_address: Vec<u8>,
	#[prost(int64, tag = "2")]
	pub vote_count: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct VoteWitnessContract {
	#[prost(bytes = "vec", tag = "1")]
	pub owner_address: Vec<u8>,
	#[prost(message, repeated, tag = "2")]
	pub votes: Vec<Vote>,
	#[prost(bool, tag = "3")]
	pub support: bool,
}

/// Shape of `WithdrawBalanceContract` and `WithdrawExpireUnfreezeContract`
#[derive(Clone, PartialEq, Message)]
pub struct OwnerOnlyContract {
	#[prost(bytes = "vec", tag = "1")]
	pub owner_address: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct BlockHeaderRaw {
	#[prost(int64, tag = "1")]
	pub timestamp: i64,
	#[prost(bytes = "vec", tag = "2")]
	pub tx_trie_root: Vec<u8>,
	#[prost(bytes = "vec", tag = "3")]
	pub parent_hash: Vec<u8>,
	#[prost(int64, tag = "7")]
	pub number: i64,
	#[prost(bytes = "vec", tag = "9")]
	pub witness_address: Vec<u8>,
	#[prost(int32, tag = "10")]
	pub version: i32,
}

impl BlockHeaderRaw {
	/// Block id: sha256 of the header with the first 8 bytes replaced by the block number
	pub fn block_id(&self) -> [u8; 32] {
		let mut id: [u8; 32] = Sha256::digest(self.encode_to_vec()).into();
		id[..8].copy_from_slice(&(self.number as u64).to_be_bytes());
		id
	}
}
