//! HTTP transport implementation for node interactions.
//!
//! Serves both JSON-RPC (posted to the node root) and REST paths. Requests are sent once to the
//! highest weighted endpoint with the configured timeout.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use url::Url;

use crate::{
	models::ChainConfig,
	services::blockchain::{transports::BlockchainTransport, TransportError},
};

/// HTTP transport for a single chain.
///
/// The client is cheap to clone and can be shared across tasks.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	pub client: Arc<Client>,
	url: Url,
}

impl HttpTransportClient {
	/// Creates a transport for the highest weighted `rpc` endpoint of `config`
	pub fn new(config: &ChainConfig) -> Result<Self, TransportError> {
		let rpc_url = config.primary_url().ok_or_else(|| {
			TransportError::network(format!("No usable RPC URL configured for {}", config.chain))
		})?;
		let url = Url::parse(&rpc_url.url)
			.map_err(|e| TransportError::network(format!("Invalid URL {}: {}", rpc_url.url, e)))?;

		let client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(32)
			.timeout(Duration::from_millis(config.timeout_ms))
			.connect_timeout(Duration::from_millis(config.timeout_ms))
			.build()
			.map_err(|e| TransportError::network(format!("Failed to create HTTP client: {}", e)))?;

		Ok(Self {
			client: Arc::new(client),
			url,
		})
	}

	fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
		let base = self.url.as_str().trim_end_matches('/');
		let path = path.trim_start_matches('/');
		Url::parse(&format!("{}/{}", base, path))
			.map_err(|e| TransportError::network(format!("Invalid path {}: {}", path, e)))
	}

	async fn read_json(response: Response) -> Result<Value, TransportError> {
		let status = response.status();
		let body = response.text().await?;
		if !status.is_success() {
			return Err(TransportError::http(status.as_u16(), body));
		}
		Ok(serde_json::from_str(&body)?)
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.url.to_string()
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let request_body = self.customize_request(method, params.map(|p| p.into()));
		tracing::debug!(method, url = %self.url, "Sending JSON-RPC request");

		let response = self
			.client
			.post(self.url.clone())
			.header("Content-Type", "application/json")
			.json(&request_body)
			.send()
			.await?;

		Self::read_json(response).await
	}

	async fn get(&self, path: &str) -> Result<Value, TransportError> {
		let url = self.endpoint(path)?;
		tracing::debug!(%url, "Sending GET request");
		let response = self.client.get(url).send().await?;
		Self::read_json(response).await
	}

	async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
		let url = self.endpoint(path)?;
		tracing::debug!(%url, "Sending POST request");
		let response = self.client.post(url).json(&body).send().await?;
		Self::read_json(response).await
	}
}
