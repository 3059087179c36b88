//! Transaction lifecycle error types.
//!
//! Every capability returns [`TransactionError`]. Transport failures are mapped per phase:
//! during preload, balance and status queries they mean the chain state is unavailable, during
//! broadcast they are split into rejections and network failures.

use log::error;

use crate::{
	models::{ChainId, TxKind},
	services::blockchain::TransportError,
};

#[derive(Debug)]
pub enum TransactionError {
	/// Unsupported chain or invalid wiring
	ConfigurationError(String),

	/// Chain metadata or balances could not be fetched or decoded
	ChainStateUnavailable(String),

	/// A protocol constant needed for the fee was missing or the kind has no fee model
	FeeCalculationError(String),

	/// The intent cannot be expressed on the target chain
	InvalidIntentForChain(String),

	/// The node refused the transaction; resubmitting it unchanged will fail again
	BroadcastRejected(String),

	/// The node could not be reached; the caller may retry
	NetworkUnavailable(String),

	/// The external signer failed
	SigningError(String),

	/// Untrusted input (address, payload) could not be encoded
	EncodingError(String),
}

impl TransactionError {
	fn format_message(&self) -> String {
		match self {
			Self::ConfigurationError(msg) => format!("Configuration error: {}", msg),
			Self::ChainStateUnavailable(msg) => format!("Chain state unavailable: {}", msg),
			Self::FeeCalculationError(msg) => format!("Fee calculation error: {}", msg),
			Self::InvalidIntentForChain(msg) => format!("Invalid intent for chain: {}", msg),
			Self::BroadcastRejected(msg) => format!("Broadcast rejected: {}", msg),
			Self::NetworkUnavailable(msg) => format!("Network unavailable: {}", msg),
			Self::SigningError(msg) => format!("Signing error: {}", msg),
			Self::EncodingError(msg) => format!("Encoding error: {}", msg),
		}
	}

	pub fn configuration_error(msg: impl Into<String>) -> Self {
		let error = Self::ConfigurationError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn chain_state_unavailable(msg: impl Into<String>) -> Self {
		let error = Self::ChainStateUnavailable(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn fee_calculation_error(msg: impl Into<String>) -> Self {
		let error = Self::FeeCalculationError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn invalid_intent_for_chain(msg: impl Into<String>) -> Self {
		let error = Self::InvalidIntentForChain(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn broadcast_rejected(msg: impl Into<String>) -> Self {
		let error = Self::BroadcastRejected(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn network_unavailable(msg: impl Into<String>) -> Self {
		let error = Self::NetworkUnavailable(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn signing_error(msg: impl Into<String>) -> Self {
		let error = Self::SigningError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn encoding_error(msg: impl Into<String>) -> Self {
		let error = Self::EncodingError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Intent kind that has no encoding on `chain`
	pub fn unsupported_kind(chain: ChainId, kind: TxKind) -> Self {
		Self::invalid_intent_for_chain(format!("{:?} is not supported on {}", kind, chain))
	}

	/// Maps a transport failure that happened while submitting a transaction
	pub fn from_broadcast(err: TransportError) -> Self {
		if err.is_rejection() {
			Self::broadcast_rejected(err.to_string())
		} else {
			Self::network_unavailable(err.to_string())
		}
	}
}

impl std::fmt::Display for TransactionError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for TransactionError {}

/// Outside of broadcast every transport failure means the chain state is unavailable
impl From<TransportError> for TransactionError {
	fn from(err: TransportError) -> Self {
		Self::chain_state_unavailable(err.to_string())
	}
}

impl From<serde_json::Error> for TransactionError {
	fn from(err: serde_json::Error) -> Self {
		Self::chain_state_unavailable(format!("Unexpected node response: {}", err))
	}
}
