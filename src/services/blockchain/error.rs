//! Transport error types.
//!
//! Errors raised while talking to a node. They carry no interpretation of the phase they
//! happened in; the transaction layer maps them to its own error kinds.

use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
	/// The node could not be reached or did not answer in time
	#[error("Network error: {0}")]
	Network(String),

	/// The node answered with a non-success HTTP status
	#[error("HTTP error {status}: {body}")]
	Http { status: u16, body: String },

	/// The node answered with a JSON-RPC error object
	#[error("RPC error {code}: {message}")]
	Rpc { code: i64, message: String },

	/// The response could not be decoded into the expected shape
	#[error("Response parse error: {0}")]
	ResponseParse(String),
}

impl TransportError {
	pub fn network(msg: impl Into<String>) -> Self {
		let error = Self::Network(msg.into());
		error!("{}", error);
		error
	}

	pub fn http(status: u16, body: impl Into<String>) -> Self {
		let error = Self::Http {
			status,
			body: body.into(),
		};
		error!("{}", error);
		error
	}

	pub fn rpc(code: i64, message: impl Into<String>) -> Self {
		let error = Self::Rpc {
			code,
			message: message.into(),
		};
		error!("{}", error);
		error
	}

	pub fn response_parse(msg: impl Into<String>) -> Self {
		let error = Self::ResponseParse(msg.into());
		error!("{}", error);
		error
	}

	/// Whether the node refused the request, as opposed to being unreachable
	pub fn is_rejection(&self) -> bool {
		match self {
			Self::Rpc { .. } => true,
			Self::Http { status, .. } => (400..500).contains(status) && *status != 429,
			Self::Network(_) | Self::ResponseParse(_) => false,
		}
	}

	pub fn is_not_found(&self) -> bool {
		match self {
			Self::Http { status, body } => *status == 404 || body.contains("not found"),
			_ => false,
		}
	}
}

impl From<serde_json::Error> for TransportError {
	fn from(err: serde_json::Error) -> Self {
		Self::response_parse(err.to_string())
	}
}

impl From<reqwest::Error> for TransportError {
	fn from(err: reqwest::Error) -> Self {
		match err.status() {
			Some(status) => Self::http(status.as_u16(), err.to_string()),
			None if err.is_decode() => Self::response_parse(err.to_string()),
			None => Self::network(err.to_string()),
		}
	}
}
