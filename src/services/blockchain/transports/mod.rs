//! Network transport for chain clients.
//!
//! A transport issues requests and returns raw JSON. It never interprets results or retries;
//! clients decide what a response means.

mod http;

pub use http::HttpTransportClient;

use serde::Serialize;
use serde_json::{json, Value};

use crate::services::blockchain::TransportError;

/// Base trait for all blockchain transport clients
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Get the current URL being used by the transport
	async fn get_current_url(&self) -> String;

	/// Send a JSON-RPC request and return the whole response envelope
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize;

	/// GET a REST path relative to the node URL
	async fn get(&self, path: &str) -> Result<Value, TransportError>;

	/// POST a JSON body to a REST path relative to the node URL
	async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError>;

	/// Customizes the request for specific blockchain requirements
	fn customize_request(&self, method: &str, params: Option<Value>) -> Value {
		json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params
		})
	}
}

/// Extracts `result` from a JSON-RPC response, turning an `error` object into a
/// [`TransportError::Rpc`]
pub fn rpc_result(response: Value) -> Result<Value, TransportError> {
	if let Some(error) = response.get("error").filter(|error| !error.is_null()) {
		let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
		let message = error
			.get("message")
			.and_then(Value::as_str)
			.unwrap_or("unknown error");
		return Err(TransportError::rpc(code, message));
	}

	match response {
		Value::Object(mut map) => Ok(map.remove("result").unwrap_or(Value::Null)),
		other => Err(TransportError::response_parse(format!(
			"Unexpected JSON-RPC response: {}",
			other
		))),
	}
}
