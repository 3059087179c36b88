//! Protobuf messages of the Cosmos SDK transaction format (SIGN_MODE_DIRECT).
//!
//! Only the fields this crate writes are declared; field numbers follow
//! `cosmos.tx.v1beta1`, `cosmos.bank.v1beta1`, `cosmos.staking.v1beta1` and
//! `cosmos.distribution.v1beta1`.

use prost::Message;

pub const SIGN_MODE_DIRECT: i32 = 1;

pub const MSG_SEND_TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgSend";
pub const MSG_DELEGATE_TYPE_URL: &str = "/cosmos.staking.v1beta1.MsgDelegate";
pub const MSG_UNDELEGATE_TYPE_URL: &str = "/cosmos.staking.v1beta1.MsgUndelegate";
pub const MSG_BEGIN_REDELEGATE_TYPE_URL: &str = "/cosmos.staking.v1beta1.MsgBeginRedelegate";
pub const MSG_WITHDRAW_REWARD_TYPE_URL: &str =
	"/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward";

#[derive(Clone, PartialEq, Message)]
pub struct Any {
	#[prost(string, tag = "1")]
	pub type_url: String,
	#[prost(bytes = "vec", tag = "2")]
	pub value: Vec<u8>,
}

impl Any {
	pub fn pack<M: Message>(type_url: &str, message: &M) -> Self {
		Self {
			type_url: type_url.to_string(),
			value: message.encode_to_vec(),
		}
	}
}

#[derive(Clone, PartialEq, Message)]
pub struct Coin {
	#[prost(string, tag = "1")]
	pub denom: String,
	#[prost(string, tag = "2")]
	pub amount: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgSend {
	#[prost(string, tag = "1")]
	pub from_address: String,
	#[prost(string, tag = "2")]
	pub to_address: String,
	#[prost(message, repeated, tag = "3")]
	pub amount: Vec<Coin>,
}

/// Shared shape of `MsgDelegate` and `MsgUndelegate`
#[derive(Clone, PartialEq, Message)]
pub struct MsgDelegate {
	#[prost(string, tag = "1")]
	pub delegator_address: String,
	#[prost(string, tag = "2")]
	pub validator_address: String,
	#[prost(message, optional, tag = "3")]
	pub amount: Option<Coin>,
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgBeginRedelegate {
	#[prost(string, tag = "1")]
	pub delegator_address: String,
	#[prost(string, tag = "2")]
	pub validator_src_address: String,
	#[prost(string, tag = "3")]
	pub validator_dst_address: String,
	#[prost(message, optional, tag = "4")]
	pub amount: Option<Coin>,
}

#[derive(Clone, PartialEq, Message)]
pub struct MsgWithdrawDelegatorReward {
	#[prost(string, tag = "1")]
	pub delegator_address: String,
	#[prost(string, tag = "2")]
	pub validator_address: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct TxBody {
	#[prost(message, repeated, tag = "1")]
	pub messages: Vec<Any>,
	#[prost(string, tag = "2")]
	pub memo: String,
	#[prost(uint64, tag = "3")]
	pub timeout_height: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct PubKey {
	#[prost(bytes = "vec", tag = "1")]
	pub key: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ModeInfo {
	/// `sum` oneof; only `single` is ever set
	#[prost(message, optional, tag = "1")]
	pub single: Option<ModeInfoSingle>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ModeInfoSingle {
	#[prost(int32, tag = "1")]
	pub mode: i32,
}

#[derive(Clone, PartialEq, Message)]
pub struct SignerInfo {
	#[prost(message, optional, tag = "1")]
	pub public_key: Option<Any>,
	#[prost(message, optional, tag = "2")]
	pub mode_info: Option<ModeInfo>,
	#[prost(uint64, tag = "3")]
	pub sequence: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct Fee {
	#[prost(message, repeated, tag = "1")]
	pub amount: Vec<Coin>,
	#[prost(uint64, tag = "2")]
	pub gas_limit: u64,
	#[prost(string, tag = "3")]
	pub payer: String,
	#[prost(string, tag = "4")]
	pub granter: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct AuthInfo {
	#[prost(message, repeated, tag = "1")]
	pub signer_infos: Vec<SignerInfo>,
	#[prost(message, optional, tag = "2")]
	pub fee: Option<Fee>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SignDoc {
	#[prost(bytes = "vec", tag = "1")]
	pub body_bytes: Vec<u8>,
	#[prost(bytes = "vec", tag = "2")]
	pub auth_info_bytes: Vec<u8>,
	#[prost(string, tag = "3")]
	pub chain_id: String,
	#[prost(uint64, tag = "4")]
	pub account_number: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct TxRaw {
	#[prost(bytes = "vec", tag = "1")]
	pub body_bytes: Vec<u8>,
	#[prost(bytes = "vec", tag = "2")]
	pub auth_info_bytes: Vec<u8>,
	#[prost(bytes = "vec", repeated, tag = "3")]
	pub signatures: Vec<Vec<u8>>,
}
