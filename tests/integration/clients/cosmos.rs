use alloy::primitives::U256;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use prost::Message;
use serde_json::{json, Value};

use gem_txcore::{
	models::{
		cosmos::CosmosSignData, AssetId, ChainId, ChainSignData, FeePriority, StakeIntent,
		TransactionIntent, TransactionState, TransactionStatusRequest, TxKind,
	},
	services::{
		blockchain::{cosmos::proto, CosmosClient, TransportError},
		transaction::{
			BalanceAggregator, BroadcastClient, SignClient, SignerPreloader, TransactionError,
			TransactionStatusClient,
		},
	},
};

use crate::integration::mocks::{test_key, unexpected, FailingSigner, FakeSigner, MockTransport};

const DELEGATOR: &str = "osmo1rcjvzz8wzktqfz8qjf0l9q45kzxvd0z0n7ppmp";
const VALIDATOR: &str = "osmovaloper1pxphtfhqnx9ny27d53z4052e3r76e7qq495ehm";

/// `TxRaw` of a 10 uosmo delegation (account 2913388, sequence 10) signed by [`FakeSigner`]
const SIGNED_DELEGATION: &str = "Cq4BCpUBCiMvY29zbW9zLnN0YWtpbmcudjFiZXRhMS5Nc2dEZWxlZ2F0ZRJuCitvc21vMXJjanZ6ejh3emt0cWZ6OHFqZjBsOXE0NWt6eHZkMHowbjdwcG1wEjJvc21vdmFsb3BlcjFweHBodGZocW54OW55MjdkNTN6NDA1MmUzcjc2ZTdxcTQ5NWVobRoLCgV1b3NtbxICMTASFFN0YWtlIHZpYSBHZW0gV2FsbGV0EmkKUApGCh8vY29zbW9zLmNyeXB0by5zZWNwMjU2azEuUHViS2V5EiMKIQIRERERERERERERERERERERERERERERERERERERERERERIECgIIARgKEhUKDwoFdW9zbW8SBjEwMDAwMBDAhD0aQKA1krojVEuOIo1t4M9fgY5aPfTvjs9wu36hT3CAU/h1Q0L2nETeOKZu9VHI4BsRKz26a66SiUOBQUV33yYy7ao=";
const SIGNED_DELEGATION_HASH: &str =
	"D86AAEA8F3526D135F7587AE9DD265D797B2DA455A4103A80EB112CD42C30BC7";

fn account_response() -> Value {
	json!({
		"account": {
			"@type": "/cosmos.auth.v1beta1.BaseAccount",
			"address": DELEGATOR,
			"pub_key": null,
			"account_number": "2913388",
			"sequence": "10"
		}
	})
}

fn node_info_response() -> Value {
	json!({"default_node_info": {"network": "osmosis-1", "moniker": "node"}})
}

fn preload_transport() -> MockTransport {
	let mut transport = MockTransport::new();
	transport.expect_get().returning(|path| {
		if path == format!("cosmos/auth/v1beta1/accounts/{}", DELEGATOR) {
			Ok(account_response())
		} else if path == "cosmos/base/tendermint/v1beta1/node_info" {
			Ok(node_info_response())
		} else {
			Err(unexpected(path))
		}
	});
	transport
}

fn delegation() -> TransactionIntent {
	TransactionIntent::stake(
		AssetId::native(ChainId::Osmosis),
		DELEGATOR,
		U256::from(10),
		StakeIntent::Delegate {
			validator: VALIDATOR.to_string(),
		},
	)
}

#[tokio::test]
async fn test_preload_and_sign_delegation() {
	let client = CosmosClient::new(ChainId::Osmosis, preload_transport()).unwrap();

	let preload = client.preload(DELEGATOR, delegation()).await.unwrap();
	assert_eq!(
		preload.sign_data,
		ChainSignData::Cosmos(CosmosSignData {
			account_number: 2_913_388,
			sequence: 10,
			chain_id: "osmosis-1".to_string(),
		})
	);
	assert_eq!(preload.priorities(), vec![FeePriority::Normal]);
	let fee = preload.fee(FeePriority::Fast);
	assert_eq!(fee.amount, U256::from(100_000));

	let signer = FakeSigner::default();
	let payloads = client
		.sign(&preload.intent, &preload.sign_data, fee, &signer, &test_key())
		.await
		.unwrap();

	assert_eq!(payloads.len(), 1);
	assert_eq!(payloads[0].data, SIGNED_DELEGATION);
	assert_eq!(payloads[0].hash, SIGNED_DELEGATION_HASH);
	assert_eq!(payloads[0].expiry, None);
	assert_eq!(signer.signed_messages().len(), 1);
}

#[tokio::test]
async fn test_preload_reads_nested_vesting_account() {
	let mut transport = MockTransport::new();
	transport.expect_get().returning(|path| {
		if path.starts_with("cosmos/auth/v1beta1/accounts/") {
			Ok(json!({
				"account": {
					"@type": "/cosmos.vesting.v1beta1.ContinuousVestingAccount",
					"base_vesting_account": {
						"base_account": {"account_number": "77", "sequence": ""}
					}
				}
			}))
		} else if path == "cosmos/base/tendermint/v1beta1/node_info" {
			Ok(node_info_response())
		} else {
			Err(unexpected(path))
		}
	});
	let client = CosmosClient::new(ChainId::Osmosis, transport).unwrap();

	let preload = client.preload(DELEGATOR, delegation()).await.unwrap();
	let ChainSignData::Cosmos(data) = preload.sign_data else {
		panic!("expected Cosmos sign data");
	};
	assert_eq!(data.account_number, 77);
	assert_eq!(data.sequence, 0);
}

#[tokio::test]
async fn test_preload_fails_when_account_is_unavailable() {
	let mut transport = MockTransport::new();
	transport.expect_get().returning(|path| {
		if path == "cosmos/base/tendermint/v1beta1/node_info" {
			Ok(node_info_response())
		} else {
			Err(TransportError::http(404, "account not found"))
		}
	});
	let client = CosmosClient::new(ChainId::Osmosis, transport).unwrap();

	let result = client.preload(DELEGATOR, delegation()).await;
	assert!(matches!(result, Err(TransactionError::ChainStateUnavailable(_))));
}

#[tokio::test]
async fn test_stake_withdraw_has_no_fee_model() {
	let client = CosmosClient::new(ChainId::Osmosis, preload_transport()).unwrap();
	let intent = TransactionIntent::stake(
		AssetId::native(ChainId::Osmosis),
		DELEGATOR,
		U256::from(10),
		StakeIntent::Withdraw { stake_id: None },
	);

	let result = client.preload(DELEGATOR, intent).await;
	assert!(matches!(result, Err(TransactionError::FeeCalculationError(_))));
}

#[tokio::test]
async fn test_claim_rewards_scales_gas_per_message() {
	let client = CosmosClient::new(ChainId::Osmosis, preload_transport()).unwrap();
	let intent = TransactionIntent::stake(
		AssetId::native(ChainId::Osmosis),
		DELEGATOR,
		U256::ZERO,
		StakeIntent::ClaimRewards {
			validators: vec![VALIDATOR.to_string(), "osmovaloper1other".to_string()],
		},
	);

	let preload = client.preload(DELEGATOR, intent).await.unwrap();
	let payloads = client
		.sign(
			&preload.intent,
			&preload.sign_data,
			preload.fee(FeePriority::Normal),
			&FakeSigner::default(),
			&test_key(),
		)
		.await
		.unwrap();

	let tx = proto::TxRaw::decode(BASE64.decode(&payloads[0].data).unwrap().as_slice()).unwrap();
	let body = proto::TxBody::decode(tx.body_bytes.as_slice()).unwrap();
	let auth_info = proto::AuthInfo::decode(tx.auth_info_bytes.as_slice()).unwrap();

	assert_eq!(body.messages.len(), 2);
	assert!(body
		.messages
		.iter()
		.all(|msg| msg.type_url == proto::MSG_WITHDRAW_REWARD_TYPE_URL));
	assert_eq!(body.memo, "Stake via Gem Wallet");
	assert_eq!(auth_info.fee.unwrap().gas_limit, 1_800_000);
	assert_eq!(tx.signatures[0].len(), 64);
}

#[tokio::test]
async fn test_transfer_keeps_user_memo() {
	let client = CosmosClient::new(ChainId::Osmosis, preload_transport()).unwrap();
	let intent = TransactionIntent::transfer(
		AssetId::native(ChainId::Osmosis),
		DELEGATOR,
		"osmo1recipient",
		U256::from(1_000),
	)
	.with_memo("invoice 42");

	let preload = client.preload(DELEGATOR, intent).await.unwrap();
	let payloads = client
		.sign(
			&preload.intent,
			&preload.sign_data,
			preload.fee(FeePriority::Normal),
			&FakeSigner::default(),
			&test_key(),
		)
		.await
		.unwrap();

	let tx = proto::TxRaw::decode(BASE64.decode(&payloads[0].data).unwrap().as_slice()).unwrap();
	let body = proto::TxBody::decode(tx.body_bytes.as_slice()).unwrap();
	let send = proto::MsgSend::decode(body.messages[0].value.as_slice()).unwrap();
	assert_eq!(body.memo, "invoice 42");
	assert_eq!(send.to_address, "osmo1recipient");
	assert_eq!(send.amount[0].amount, "1000");
	assert_eq!(send.amount[0].denom, "uosmo");
}

#[tokio::test]
async fn test_sign_propagates_signer_failure() {
	let client = CosmosClient::new(ChainId::Osmosis, preload_transport()).unwrap();
	let preload = client.preload(DELEGATOR, delegation()).await.unwrap();

	let result = client
		.sign(
			&preload.intent,
			&preload.sign_data,
			preload.fee(FeePriority::Normal),
			&FailingSigner,
			&test_key(),
		)
		.await;
	assert!(matches!(result, Err(TransactionError::SigningError(_))));
}

#[tokio::test]
async fn test_balances_with_staking() {
	let mut transport = MockTransport::new();
	transport.expect_get().returning(|path| {
		if path.starts_with("cosmos/bank/v1beta1/balances/") {
			Ok(json!({
				"balances": [
					{"denom": "ibc/27394FB0", "amount": "55"},
					{"denom": "uosmo", "amount": "1000"}
				],
				"pagination": {"next_key": null, "total": "2"}
			}))
		} else if path.starts_with("cosmos/staking/v1beta1/delegations/") {
			Ok(json!({
				"delegation_responses": [
					{"delegation": {"shares": "500.0"}, "balance": {"denom": "uosmo", "amount": "500"}},
					{"delegation": {"shares": "250.0"}, "balance": {"denom": "uosmo", "amount": "250"}}
				]
			}))
		} else if path.ends_with("/unbonding_delegations") {
			Ok(json!({
				"unbonding_responses": [
					{"entries": [{"balance": "100"}, {"balance": "20"}]}
				]
			}))
		} else if path.ends_with("/rewards") {
			Ok(json!({"total": [{"denom": "uosmo", "amount": "12.945000000000000000"}]}))
		} else {
			Err(unexpected(path))
		}
	});
	let client = CosmosClient::new(ChainId::Osmosis, transport).unwrap();

	let balances = client
		.get_balances(DELEGATOR, &["ibc/27394FB0".to_string(), "uion".to_string()])
		.await
		.unwrap();

	let native = balances.native.balance;
	assert_eq!(balances.native.asset_id, AssetId::native(ChainId::Osmosis));
	assert_eq!(native.available, U256::from(1000));
	assert_eq!(native.staked, U256::from(750));
	assert_eq!(native.pending, U256::from(120));
	assert_eq!(native.rewards, U256::from(12));

	assert_eq!(balances.tokens.len(), 2);
	assert_eq!(
		balances.token("ibc/27394FB0").unwrap().balance.available,
		U256::from(55)
	);
	assert_eq!(balances.token("uion").unwrap().balance.available, U256::ZERO);
}

#[tokio::test]
async fn test_staking_failures_degrade_to_zero() {
	let mut transport = MockTransport::new();
	transport.expect_get().returning(|path| {
		if path.starts_with("cosmos/bank/v1beta1/balances/") {
			Ok(json!({"balances": [{"denom": "uosmo", "amount": "1000"}]}))
		} else {
			Err(TransportError::http(503, "unavailable"))
		}
	});
	let client = CosmosClient::new(ChainId::Osmosis, transport).unwrap();

	let balances = client.get_balances(DELEGATOR, &[]).await.unwrap();
	assert_eq!(balances.native.balance.available, U256::from(1000));
	assert_eq!(balances.native.balance.staked, U256::ZERO);
	assert_eq!(balances.native.balance.rewards, U256::ZERO);
}

#[tokio::test]
async fn test_bank_failure_fails_balances() {
	let mut transport = MockTransport::new();
	transport
		.expect_get()
		.returning(|_| Err(TransportError::network("connection refused")));
	let client = CosmosClient::new(ChainId::Osmosis, transport).unwrap();

	let result = client.get_balances(DELEGATOR, &[]).await;
	assert!(matches!(result, Err(TransactionError::ChainStateUnavailable(_))));
}

#[tokio::test]
async fn test_chain_without_staking_skips_staking_queries() {
	let mut transport = MockTransport::new();
	transport
		.expect_get()
		.withf(|path| path.starts_with("cosmos/bank/v1beta1/balances/"))
		.times(1)
		.returning(|_| Ok(json!({"balances": [{"denom": "uusdc", "amount": "42"}]})));
	let client = CosmosClient::new(ChainId::Noble, transport).unwrap();

	let balances = client.get_balances("noble1owner", &[]).await.unwrap();
	assert_eq!(balances.native.balance.available, U256::from(42));
	assert_eq!(balances.native.balance.staked, U256::ZERO);
}

#[tokio::test]
async fn test_broadcast_returns_hash() {
	let mut transport = MockTransport::new();
	transport
		.expect_post()
		.withf(|path, body| {
			path == "cosmos/tx/v1beta1/txs"
				&& body["mode"] == "BROADCAST_MODE_SYNC"
				&& body["tx_bytes"] == "dHg="
		})
		.times(1)
		.returning(|_, _| {
			Ok(json!({
				"tx_response": {"height": "0", "txhash": "ABCDEF", "code": 0, "raw_log": ""}
			}))
		});
	let client = CosmosClient::new(ChainId::Osmosis, transport).unwrap();

	let payload = gem_txcore::models::SignedPayload {
		data: "dHg=".to_string(),
		hash: "ABCDEF".to_string(),
		expiry: None,
	};
	let hash = client.broadcast(&payload, TxKind::Transfer).await.unwrap();
	assert_eq!(hash, "ABCDEF");
}

#[tokio::test]
async fn test_broadcast_rejection() {
	let mut transport = MockTransport::new();
	transport.expect_post().returning(|_, _| {
		Ok(json!({
			"tx_response": {
				"height": "0",
				"txhash": "ABCDEF",
				"code": 5,
				"raw_log": "insufficient funds"
			}
		}))
	});
	let client = CosmosClient::new(ChainId::Osmosis, transport).unwrap();

	let payload = gem_txcore::models::SignedPayload {
		data: "dHg=".to_string(),
		hash: "ABCDEF".to_string(),
		expiry: None,
	};
	let error = client.broadcast(&payload, TxKind::Transfer).await.unwrap_err();
	assert!(matches!(
		error,
		TransactionError::BroadcastRejected(ref msg) if msg == "insufficient funds"
	));
}

#[tokio::test]
async fn test_broadcast_network_failure_is_retryable() {
	let mut transport = MockTransport::new();
	transport
		.expect_post()
		.returning(|_, _| Err(TransportError::http(502, "bad gateway")));
	let client = CosmosClient::new(ChainId::Osmosis, transport).unwrap();

	let payload = gem_txcore::models::SignedPayload {
		data: "dHg=".to_string(),
		hash: "ABCDEF".to_string(),
		expiry: None,
	};
	let error = client.broadcast(&payload, TxKind::Transfer).await.unwrap_err();
	assert!(matches!(error, TransactionError::NetworkUnavailable(_)));
}

fn status_transport(response: Result<Value, (u16, &'static str)>) -> MockTransport {
	let mut transport = MockTransport::new();
	transport
		.expect_get()
		.withf(|path| path == "cosmos/tx/v1beta1/txs/ABCDEF")
		.returning(move |_| match &response {
			Ok(value) => Ok(value.clone()),
			Err((status, body)) => Err(TransportError::http(*status, *body)),
		});
	transport
}

fn tx_response(height: &str, code: u32) -> Value {
	json!({
		"tx": {"auth_info": {"fee": {
			"amount": [{"denom": "uosmo", "amount": "10000"}],
			"gas_limit": "200000"
		}}},
		"tx_response": {"height": height, "txhash": "ABCDEF", "code": code, "raw_log": ""}
	})
}

#[tokio::test]
async fn test_status_confirmed_with_fee() {
	let client =
		CosmosClient::new(ChainId::Osmosis, status_transport(Ok(tx_response("123", 0)))).unwrap();
	let request = TransactionStatusRequest::new(ChainId::Osmosis, "ABCDEF", DELEGATOR);

	let changes = client.get_transaction_status(&request).await.unwrap();
	assert_eq!(changes.state, TransactionState::Confirmed);
	assert_eq!(changes.fee, Some(U256::from(10_000)));
}

#[tokio::test]
async fn test_status_out_of_gas_reverts() {
	let client =
		CosmosClient::new(ChainId::Osmosis, status_transport(Ok(tx_response("123", 11)))).unwrap();
	let request = TransactionStatusRequest::new(ChainId::Osmosis, "ABCDEF", DELEGATOR);

	let changes = client.get_transaction_status(&request).await.unwrap();
	assert_eq!(changes.state, TransactionState::Reverted);
	assert_eq!(changes.fee, Some(U256::from(10_000)));
}

#[tokio::test]
async fn test_status_unknown_hash_is_pending() {
	let client = CosmosClient::new(ChainId::Osmosis, status_transport(Err((404, "")))).unwrap();
	let request = TransactionStatusRequest::new(ChainId::Osmosis, "ABCDEF", DELEGATOR);

	let changes = client.get_transaction_status(&request).await.unwrap();
	assert_eq!(changes.state, TransactionState::Pending);
	assert_eq!(changes.fee, None);
}

#[tokio::test]
async fn test_status_not_found_body_is_pending() {
	// Some LCD nodes answer unknown hashes with a 400 and a "not found" message
	let transport = status_transport(Err((400, "tx not found: ABCDEF")));
	let client = CosmosClient::new(ChainId::Osmosis, transport).unwrap();
	let request = TransactionStatusRequest::new(ChainId::Osmosis, "ABCDEF", DELEGATOR);

	let changes = client.get_transaction_status(&request).await.unwrap();
	assert_eq!(changes.state, TransactionState::Pending);
}

#[tokio::test]
async fn test_status_node_failure_is_an_error() {
	let transport = status_transport(Err((500, "internal error")));
	let client = CosmosClient::new(ChainId::Osmosis, transport).unwrap();
	let request = TransactionStatusRequest::new(ChainId::Osmosis, "ABCDEF", DELEGATOR);

	let result = client.get_transaction_status(&request).await;
	assert!(matches!(result, Err(TransactionError::ChainStateUnavailable(_))));
}

#[test]
fn test_rejects_non_cosmos_chain() {
	assert!(matches!(
		CosmosClient::new(ChainId::Solana, MockTransport::new()),
		Err(TransactionError::ConfigurationError(_))
	));
}
