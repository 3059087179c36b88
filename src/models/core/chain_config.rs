use serde::{Deserialize, Serialize};

use crate::models::ChainId;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpcUrl {
	pub type_: String,
	pub url: String,
	pub weight: u32,
}

/// Node endpoints for one chain, loaded from `config/chains/*.json`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
	pub chain: ChainId,
	pub name: String,
	pub rpc_urls: Vec<RpcUrl>,
	/// Per-request timeout applied to every node call
	pub timeout_ms: u64,
}

impl ChainConfig {
	/// Highest weighted `rpc` endpoint
	pub fn primary_url(&self) -> Option<&RpcUrl> {
		self.rpc_urls
			.iter()
			.filter(|rpc_url| rpc_url.type_ == "rpc" && rpc_url.weight > 0)
			.max_by_key(|rpc_url| rpc_url.weight)
	}
}
