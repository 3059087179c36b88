use mockito::{Matcher, Server};
use serde_json::{json, Value};

use gem_txcore::{
	models::{ChainConfig, ChainId, RpcUrl},
	services::blockchain::{rpc_result, BlockchainTransport, HttpTransportClient, TransportError},
};

fn rpc_url(url: &str, weight: u32) -> RpcUrl {
	RpcUrl {
		type_: "rpc".to_string(),
		url: url.to_string(),
		weight,
	}
}

fn config(rpc_urls: Vec<RpcUrl>) -> ChainConfig {
	ChainConfig {
		chain: ChainId::Solana,
		name: "Solana".to_string(),
		rpc_urls,
		timeout_ms: 5_000,
	}
}

#[tokio::test]
async fn test_json_rpc_posts_to_root() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_header("content-type", "application/json")
		.match_body(Matcher::PartialJson(json!({
			"jsonrpc": "2.0",
			"method": "getSlot",
			"params": [{"commitment": "confirmed"}]
		})))
		.with_status(200)
		.with_body(r#"{"jsonrpc": "2.0", "result": 250000000, "id": 1}"#)
		.create_async()
		.await;
	let transport = HttpTransportClient::new(&config(vec![rpc_url(&server.url(), 100)])).unwrap();

	let response = transport
		.send_raw_request("getSlot", Some(json!([{"commitment": "confirmed"}])))
		.await
		.unwrap();

	assert_eq!(rpc_result(response).unwrap(), json!(250_000_000u64));
	mock.assert_async().await;
}

#[tokio::test]
async fn test_rpc_error_envelope_is_returned() {
	let mut server = Server::new_async().await;
	server
		.mock("POST", "/")
		.with_status(200)
		.with_body(
			r#"{"jsonrpc": "2.0", "error": {"code": -32002, "message": "Blockhash not found"}, "id": 1}"#,
		)
		.create_async()
		.await;
	let transport = HttpTransportClient::new(&config(vec![rpc_url(&server.url(), 100)])).unwrap();

	let response = transport
		.send_raw_request::<Value>("sendTransaction", None)
		.await
		.unwrap();

	match rpc_result(response) {
		Err(TransportError::Rpc { code, message }) => {
			assert_eq!(code, -32002);
			assert_eq!(message, "Blockhash not found");
		}
		other => panic!("unexpected result: {:?}", other),
	}
}

#[tokio::test]
async fn test_rest_paths_join_base_url() {
	let mut server = Server::new_async().await;
	let get = server
		.mock("GET", "/cosmos/base/tendermint/v1beta1/node_info")
		.with_status(200)
		.with_body(r#"{"default_node_info": {"network": "osmosis-1"}}"#)
		.create_async()
		.await;
	let post = server
		.mock("POST", "/wallet/getaccount")
		.match_body(Matcher::Json(json!({
			"address": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t",
			"visible": true
		})))
		.with_status(200)
		.with_body(r#"{"balance": 5}"#)
		.create_async()
		.await;
	let base = format!("{}/", server.url());
	let transport = HttpTransportClient::new(&config(vec![rpc_url(&base, 100)])).unwrap();

	let info = transport
		.get("/cosmos/base/tendermint/v1beta1/node_info")
		.await
		.unwrap();
	let account = transport
		.post(
			"wallet/getaccount",
			json!({"address": "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t", "visible": true}),
		)
		.await
		.unwrap();

	assert_eq!(info["default_node_info"]["network"], "osmosis-1");
	assert_eq!(account["balance"], 5);
	get.assert_async().await;
	post.assert_async().await;
}

#[tokio::test]
async fn test_non_success_status_is_http_error() {
	let mut server = Server::new_async().await;
	server
		.mock("GET", "/cosmos/tx/v1beta1/txs/ABCD")
		.with_status(404)
		.with_body(r#"{"code": 5, "message": "tx not found"}"#)
		.create_async()
		.await;
	server
		.mock("POST", "/")
		.with_status(429)
		.with_body("Rate limited")
		.create_async()
		.await;
	let transport = HttpTransportClient::new(&config(vec![rpc_url(&server.url(), 100)])).unwrap();

	let error = transport.get("cosmos/tx/v1beta1/txs/ABCD").await.unwrap_err();
	assert!(matches!(error, TransportError::Http { status: 404, .. }));
	assert!(error.is_not_found());
	assert!(error.is_rejection());

	let error = transport
		.send_raw_request::<Value>("getHealth", None)
		.await
		.unwrap_err();
	assert!(matches!(error, TransportError::Http { status: 429, .. }));
	assert!(!error.is_rejection());
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
	let mut server = Server::new_async().await;
	server
		.mock("GET", "/health")
		.with_status(200)
		.with_body("<html>ok</html>")
		.create_async()
		.await;
	let transport = HttpTransportClient::new(&config(vec![rpc_url(&server.url(), 100)])).unwrap();

	let error = transport.get("health").await.unwrap_err();

	assert!(matches!(error, TransportError::ResponseParse(_)));
}

#[tokio::test]
async fn test_uses_highest_weighted_endpoint() {
	let transport = HttpTransportClient::new(&config(vec![
		rpc_url("https://backup.example.com", 10),
		rpc_url("https://primary.example.com", 90),
		RpcUrl {
			type_: "ws".to_string(),
			url: "wss://stream.example.com".to_string(),
			weight: 100,
		},
	]))
	.unwrap();

	assert_eq!(transport.get_current_url().await, "https://primary.example.com/");
}

#[test]
fn test_rejects_config_without_rpc_endpoint() {
	let result = HttpTransportClient::new(&config(vec![]));

	assert!(matches!(result, Err(TransportError::Network(_))));
}

#[test]
fn test_rejects_invalid_url() {
	let result = HttpTransportClient::new(&config(vec![rpc_url("not a url", 100)]));

	assert!(result.is_err());
}
