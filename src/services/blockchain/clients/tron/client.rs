//! Tron full node HTTP client.
//!
//! Each contract is its own transaction, so a single intent may sign several payloads (a
//! freeze followed by a vote, an approval followed by a swap). All of them reference the block
//! fetched during preload.

use alloy::primitives::U256;
use async_trait::async_trait;
use futures::future::join_all;
use prost::Message;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::instrument;

use crate::{
	models::{
		tron::{
			TronAccount, TronAccountResource, TronBlock, TronBlockHeaderRaw, TronBlockRef,
			TronBroadcastResponse, TronChainParameters, TronConstantResult, TronReward,
			TronSignData, TronTransactionInfo,
		},
		AccountBalances, AssetBalance, AssetId, Balance, ChainId, ChainSignData, Curve, Fee,
		IntentKind, PreloadResult, Resource, SignedPayload, StakeIntent, TransactionChanges,
		TransactionIntent, TransactionStatusRequest, TxKind,
	},
	services::{
		blockchain::{
			tron::{proto, trc20, votes, TronAddress, TronFeeCalculator, TronFeeState},
			BlockchainTransport,
		},
		transaction::{
			expect_signature_len, resolve, BalanceAggregator, BroadcastClient, FeeCalculator,
			PrivateKey, ReceiptObservation, SignClient, Signer, SignerPreloader, TransactionError,
			TransactionStatusClient,
		},
	},
	utils::encoding::{amount_to_i64, parse_hex_amount},
};

/// Transactions expire ten hours after their reference block
const EXPIRATION_MS: u64 = 10 * 60 * 60 * 1000;

const RECEIPT_SUCCESS: &str = "SUCCESS";
const RECEIPT_OUT_OF_RESOURCE: [&str; 2] = ["OUT_OF_ENERGY", "OUT_OF_TIME"];
const RESULT_FAILED: &str = "FAILED";

/// A smart contract call
#[derive(Debug, Clone, PartialEq, Eq)]
struct ContractCall {
	contract: TronAddress,
	data: Vec<u8>,
	call_value: U256,
}

pub struct TronClient<T> {
	transport: T,
}

impl<T: BlockchainTransport> TronClient<T> {
	pub fn new(transport: T) -> Self {
		Self { transport }
	}

	async fn post<D: DeserializeOwned>(
		&self,
		path: &str,
		body: Value,
	) -> Result<D, TransactionError> {
		let response = self.transport.post(path, body).await?;
		Ok(serde_json::from_value(response)?)
	}

	async fn get_now_block(&self) -> Result<TronBlockRef, TransactionError> {
		let block: TronBlock = self.post("wallet/getnowblock", json!({})).await?;
		let raw = &block.block_header.raw_data;
		let id = match block.block_id.filter(|id| !id.is_empty()) {
			Some(id) => id,
			None => hex::encode(block_header(raw)?.block_id()),
		};
		Ok(TronBlockRef {
			id,
			number: raw.number,
			timestamp: raw.timestamp,
		})
	}

	async fn get_account(&self, address: &str) -> Result<TronAccount, TransactionError> {
		self.post("wallet/getaccount", json!({"address": address, "visible": true}))
			.await
	}

	async fn get_account_resource(
		&self,
		address: &str,
	) -> Result<TronAccountResource, TransactionError> {
		self.post(
			"wallet/getaccountresource",
			json!({"address": address, "visible": true}),
		)
		.await
	}

	async fn get_chain_parameters(&self) -> Result<TronChainParameters, TransactionError> {
		self.post("wallet/getchainparameters", json!({})).await
	}

	/// Whether every transfer destination of `intent` is an activated account
	async fn destination_exists(
		&self,
		intent: &TransactionIntent,
	) -> Result<bool, TransactionError> {
		match (&intent.kind, intent.destination.as_deref()) {
			(IntentKind::NativeTransfer | IntentKind::TokenTransfer, Some(destination)) => {
				Ok(self.get_account(destination).await?.exists())
			}
			_ => Ok(true),
		}
	}

	async fn constant_call(
		&self,
		owner: &str,
		call: &ContractCall,
	) -> Result<TronConstantResult, TransactionError> {
		let call_value =
			amount_to_i64(call.call_value).map_err(TransactionError::invalid_intent_for_chain)?;
		let result: TronConstantResult = self
			.post(
				"wallet/triggerconstantcontract",
				json!({
					"owner_address": owner,
					"contract_address": call.contract.to_string(),
					"data": hex::encode(&call.data),
					"call_value": call_value,
					"visible": true,
				}),
			)
			.await?;
		match result.result.as_ref() {
			Some(ret) if ret.result => Ok(result),
			Some(ret) => Err(TransactionError::chain_state_unavailable(format!(
				"Contract call failed: {}",
				ret.message.as_deref().map(decode_message).unwrap_or_default()
			))),
			None => Err(TransactionError::chain_state_unavailable(
				"Contract call failed: no result from node",
			)),
		}
	}

	/// Energy of the last contract call `intent` makes, if any
	async fn estimate_energy(
		&self,
		owner: &str,
		intent: &TransactionIntent,
	) -> Result<Option<u64>, TransactionError> {
		let Some(call) = contract_calls(intent)?.pop() else {
			return Ok(None);
		};
		match self.constant_call(owner, &call).await {
			Ok(result) => result
				.energy_used
				.map(Some)
				.ok_or_else(|| TransactionError::fee_calculation_error("Missing energy estimate")),
			// A swap behind an unconfirmed approval cannot be simulated yet
			Err(e) => match &intent.kind {
				IntentKind::Swap(swap) if swap.gas_limit.is_some() => {
					tracing::debug!(error = %e, "Using provider gas limit for swap energy");
					Ok(swap.gas_limit)
				}
				_ => Err(e),
			},
		}
	}

	async fn get_token_balance(
		&self,
		owner: &TronAddress,
		token_id: &str,
	) -> Result<U256, TransactionError> {
		let call = ContractCall {
			contract: token_id.parse()?,
			data: trc20::balance_of_data(owner),
			call_value: U256::ZERO,
		};
		let result = self.constant_call(&owner.to_string(), &call).await?;
		let word = result.constant_result.first().ok_or_else(|| {
			TransactionError::chain_state_unavailable(format!(
				"No balanceOf result for {}",
				token_id
			))
		})?;
		parse_hex_amount(word).map_err(TransactionError::chain_state_unavailable)
	}
}

fn block_header(raw: &TronBlockHeaderRaw) -> Result<proto::BlockHeaderRaw, TransactionError> {
	let decode = |field: &str, value: &str| {
		hex::decode(value).map_err(|e| {
			TransactionError::chain_state_unavailable(format!("Invalid block {}: {}", field, e))
		})
	};
	Ok(proto::BlockHeaderRaw {
		timestamp: raw.timestamp as i64,
		tx_trie_root: decode("txTrieRoot", &raw.tx_trie_root)?,
		parent_hash: decode("parentHash", &raw.parent_hash)?,
		number: raw.number as i64,
		witness_address: decode("witness_address", &raw.witness_address)?,
		version: raw.version,
	})
}

/// Node messages are hex encoded text
fn decode_message(message: &str) -> String {
	hex::decode(message)
		.ok()
		.and_then(|bytes| String::from_utf8(bytes).ok())
		.unwrap_or_else(|| message.to_string())
}

fn destination(intent: &TransactionIntent) -> Result<TronAddress, TransactionError> {
	intent
		.destination
		.as_deref()
		.ok_or_else(|| {
			TransactionError::invalid_intent_for_chain(format!(
				"{:?} on tron requires a destination",
				intent.tx_kind()
			))
		})?
		.parse()
}

fn token_contract(intent: &TransactionIntent) -> Result<TronAddress, TransactionError> {
	intent
		.asset_id
		.token_id
		.as_deref()
		.ok_or_else(|| {
			TransactionError::invalid_intent_for_chain("Token intent without a contract")
		})?
		.parse()
}

/// Smart contract calls of `intent`, in submission order
fn contract_calls(intent: &TransactionIntent) -> Result<Vec<ContractCall>, TransactionError> {
	match &intent.kind {
		IntentKind::TokenTransfer => Ok(vec![ContractCall {
			contract: token_contract(intent)?,
			data: trc20::transfer_data(&destination(intent)?, intent.amount),
			call_value: U256::ZERO,
		}]),
		IntentKind::TokenApproval { spender } => Ok(vec![ContractCall {
			contract: token_contract(intent)?,
			data: trc20::approve_data(&spender.parse()?, intent.amount),
			call_value: U256::ZERO,
		}]),
		IntentKind::Swap(swap) => {
			let mut calls = Vec::with_capacity(2);
			if let Some(approval) = &swap.approval {
				calls.push(ContractCall {
					contract: approval.token.parse()?,
					data: trc20::approve_data(&approval.spender.parse()?, approval.value),
					call_value: U256::ZERO,
				});
			}
			let data = hex::decode(swap.data.trim_start_matches("0x")).map_err(|e| {
				TransactionError::invalid_intent_for_chain(format!("Invalid swap calldata: {}", e))
			})?;
			calls.push(ContractCall {
				contract: swap.to.parse()?,
				data,
				call_value: swap.value,
			});
			Ok(calls)
		}
		_ => Ok(vec![]),
	}
}

fn resource_code(resource: Resource) -> i32 {
	match resource {
		Resource::Bandwidth => proto::RESOURCE_BANDWIDTH,
		Resource::Energy => proto::RESOURCE_ENERGY,
	}
}

fn vote_contract(
	owner: &[u8],
	votes: &BTreeMap<String, u64>,
) -> Result<proto::Contract, TransactionError> {
	let votes = votes
		.iter()
		.map(|(address, count)| -> Result<proto::Vote, TransactionError> {
			Ok(proto::Vote {
				vote_address: address.parse::<TronAddress>()?.as_bytes().to_vec(),
				vote_count: i64::try_from(*count).map_err(|_| {
					TransactionError::invalid_intent_for_chain(format!(
						"Vote count {} is too large",
						count
					))
				})?,
			})
		})
		.collect::<Result<Vec<_>, TransactionError>>()?;
	Ok(proto::Contract::new(
		proto::VOTE_WITNESS_CONTRACT,
		"VoteWitnessContract",
		&proto::VoteWitnessContract {
			owner_address: owner.to_vec(),
			votes,
			support: true,
		},
	))
}

/// Contracts to sign for `intent`, each flagged when it is a smart contract call
fn build_contracts(
	intent: &TransactionIntent,
	data: &TronSignData,
) -> Result<Vec<(proto::Contract, bool)>, TransactionError> {
	let owner = intent.from.parse::<TronAddress>()?.as_bytes().to_vec();
	let amount =
		|| amount_to_i64(intent.amount).map_err(TransactionError::invalid_intent_for_chain);
	let freeze = |resource: i32| -> Result<proto::Contract, TransactionError> {
		Ok(proto::Contract::new(
			proto::FREEZE_BALANCE_V2_CONTRACT,
			"FreezeBalanceV2Contract",
			&proto::FreezeBalanceV2Contract {
				owner_address: owner.clone(),
				frozen_balance: amount()?,
				resource,
			},
		))
	};
	let unfreeze = |resource: i32| -> Result<proto::Contract, TransactionError> {
		Ok(proto::Contract::new(
			proto::UNFREEZE_BALANCE_V2_CONTRACT,
			"UnfreezeBalanceV2Contract",
			&proto::UnfreezeBalanceV2Contract {
				owner_address: owner.clone(),
				unfreeze_balance: amount()?,
				resource,
			},
		))
	};
	let owner_only = |contract_type: i32, name: &str| {
		proto::Contract::new(
			contract_type,
			name,
			&proto::OwnerOnlyContract {
				owner_address: owner.clone(),
			},
		)
	};

	let contracts = match &intent.kind {
		IntentKind::NativeTransfer => vec![(
			proto::Contract::new(
				proto::TRANSFER_CONTRACT,
				"TransferContract",
				&proto::TransferContract {
					owner_address: owner.clone(),
					to_address: destination(intent)?.as_bytes().to_vec(),
					amount: amount()?,
				},
			),
			false,
		)],
		IntentKind::TokenTransfer | IntentKind::TokenApproval { .. } | IntentKind::Swap(_) => {
			contract_calls(intent)?
				.into_iter()
				.map(|call| -> Result<(proto::Contract, bool), TransactionError> {
					let trigger = proto::TriggerSmartContract {
						owner_address: owner.clone(),
						contract_address: call.contract.as_bytes().to_vec(),
						call_value: amount_to_i64(call.call_value)
							.map_err(TransactionError::invalid_intent_for_chain)?,
						data: call.data,
					};
					Ok((
						proto::Contract::new(
							proto::TRIGGER_SMART_CONTRACT,
							"TriggerSmartContract",
							&trigger,
						),
						true,
					))
				})
				.collect::<Result<Vec<_>, TransactionError>>()?
		}
		IntentKind::Stake(stake) => match stake {
			StakeIntent::Delegate { .. } => vec![
				(freeze(proto::RESOURCE_BANDWIDTH)?, false),
				(vote_contract(&owner, &data.votes)?, false),
			],
			StakeIntent::Undelegate { .. } => {
				let mut contracts = vec![(unfreeze(proto::RESOURCE_BANDWIDTH)?, false)];
				if !data.votes.is_empty() {
					contracts.push((vote_contract(&owner, &data.votes)?, false));
				}
				contracts
			}
			StakeIntent::Redelegate { .. } => vec![(vote_contract(&owner, &data.votes)?, false)],
			StakeIntent::ClaimRewards { .. } => vec![(
				owner_only(proto::WITHDRAW_BALANCE_CONTRACT, "WithdrawBalanceContract"),
				false,
			)],
			StakeIntent::Withdraw { .. } => vec![(
				owner_only(
					proto::WITHDRAW_EXPIRE_UNFREEZE_CONTRACT,
					"WithdrawExpireUnfreezeContract",
				),
				false,
			)],
			StakeIntent::Freeze { resource } => vec![(freeze(resource_code(*resource))?, false)],
			StakeIntent::Unfreeze { resource } => {
				vec![(unfreeze(resource_code(*resource))?, false)]
			}
		},
		IntentKind::NftTransfer { .. } | IntentKind::AccountActivation => {
			return Err(TransactionError::unsupported_kind(ChainId::Tron, intent.tx_kind()))
		}
	};
	Ok(contracts)
}

/// Unsigned transaction for one contract anchored at `block`
fn build_raw(
	contract: proto::Contract,
	block: &TronBlockRef,
	memo: Option<&str>,
	fee_limit: i64,
) -> Result<proto::TransactionRaw, TransactionError> {
	let block_id = hex::decode(&block.id)
		.map_err(|e| TransactionError::encoding_error(format!("Invalid block id: {}", e)))?;
	if block_id.len() != 32 {
		return Err(TransactionError::encoding_error(format!(
			"Block id {} is not 32 bytes",
			block.id
		)));
	}
	let out_of_range = || {
		TransactionError::chain_state_unavailable(format!(
			"Block timestamp {} out of range",
			block.timestamp
		))
	};
	let timestamp = i64::try_from(block.timestamp).map_err(|_| out_of_range())?;
	let expiration = block
		.timestamp
		.checked_add(EXPIRATION_MS)
		.and_then(|expiration| i64::try_from(expiration).ok())
		.ok_or_else(out_of_range)?;
	Ok(proto::TransactionRaw {
		ref_block_bytes: block.number.to_be_bytes()[6..8].to_vec(),
		ref_block_num: 0,
		ref_block_hash: block_id[8..16].to_vec(),
		expiration,
		data: memo.map(|memo| memo.as_bytes().to_vec()).unwrap_or_default(),
		contract: vec![contract],
		timestamp,
		fee_limit,
	})
}

#[async_trait]
impl<T: BlockchainTransport> BalanceAggregator for TronClient<T> {
	#[instrument(skip(self, token_ids), fields(chain = "tron"))]
	async fn get_balances(
		&self,
		address: &str,
		token_ids: &[String],
	) -> Result<AccountBalances, TransactionError> {
		let owner: TronAddress = address.parse()?;
		let (account, reward, tokens) = tokio::join!(
			self.get_account(address),
			self.post::<TronReward>(
				"wallet/getReward",
				json!({"address": address, "visible": true}),
			),
			join_all(token_ids.iter().map(|token_id| async move {
				(token_id, self.get_token_balance(&owner, token_id).await)
			})),
		);
		let account = account?;

		let rewards = match reward {
			Ok(reward) => U256::from(reward.reward),
			Err(e) => {
				tracing::warn!(error = %e, "Staking rewards unavailable");
				U256::ZERO
			}
		};
		let tokens = tokens
			.into_iter()
			.filter_map(|(token_id, result)| match result {
				Ok(amount) => Some(AssetBalance::new(
					AssetId::token(ChainId::Tron, token_id.clone()),
					Balance::available(amount),
				)),
				Err(e) => {
					tracing::warn!(token = %token_id, error = %e, "Skipping token balance");
					None
				}
			})
			.collect();

		Ok(AccountBalances {
			native: AssetBalance::new(
				AssetId::native(ChainId::Tron),
				Balance {
					staked: account.frozen_total(),
					pending: account.unfreezing_total(),
					rewards,
					..Balance::available(U256::from(account.balance))
				},
			),
			tokens,
		})
	}
}

#[async_trait]
impl<T: BlockchainTransport> SignerPreloader for TronClient<T> {
	#[instrument(skip(self, intent), fields(chain = "tron"))]
	async fn preload(
		&self,
		owner: &str,
		intent: TransactionIntent,
	) -> Result<PreloadResult, TransactionError> {
		let (block, account, resource, parameters, destination_exists, energy) = tokio::join!(
			self.get_now_block(),
			self.get_account(owner),
			self.get_account_resource(owner),
			self.get_chain_parameters(),
			self.destination_exists(&intent),
			self.estimate_energy(owner, &intent),
		);
		let account = account?;

		let state = TronFeeState {
			parameters: parameters?,
			available_bandwidth: resource?.available_bandwidth(),
			destination_exists: destination_exists?,
			staked: account.frozen_total(),
			energy: energy?,
		};
		let fees = TronFeeCalculator.calculate(&intent, &state)?;

		let votes = match &intent.kind {
			IntentKind::Stake(stake) => votes::apply(&account.votes, stake, intent.amount)?,
			_ => BTreeMap::new(),
		};
		let sign_data = ChainSignData::Tron(TronSignData {
			block: block?,
			votes,
		});
		PreloadResult::new(intent, owner, sign_data, fees)
			.ok_or_else(|| TransactionError::fee_calculation_error("No fee tiers available"))
	}
}

#[async_trait]
impl<T: BlockchainTransport> SignClient for TronClient<T> {
	async fn sign(
		&self,
		intent: &TransactionIntent,
		sign_data: &ChainSignData,
		fee: &Fee,
		signer: &dyn Signer,
		key: &PrivateKey,
	) -> Result<Vec<SignedPayload>, TransactionError> {
		let ChainSignData::Tron(data) = sign_data else {
			return Err(TransactionError::invalid_intent_for_chain("Expected Tron sign data"));
		};
		let fee_limit = amount_to_i64(fee.amount).map_err(TransactionError::fee_calculation_error)?;
		let memo = intent.memo.as_deref().filter(|memo| !memo.is_empty());

		build_contracts(intent, data)?
			.into_iter()
			.map(|(contract, is_call)| -> Result<SignedPayload, TransactionError> {
				let limit = if is_call { fee_limit } else { 0 };
				let raw = build_raw(contract, &data.block, memo, limit)?;
				let raw_bytes = raw.encode_to_vec();
				let signature =
					expect_signature_len(signer.sign(&raw_bytes, key, Curve::Secp256k1)?, 65)?;
				let expiry = raw.expiration as u64;
				let transaction = proto::Transaction {
					raw_data: Some(raw),
					signature: vec![signature],
				};
				Ok(SignedPayload {
					data: hex::encode(transaction.encode_to_vec()),
					hash: hex::encode(Sha256::digest(&raw_bytes)),
					expiry: Some(expiry),
				})
			})
			.collect()
	}
}

#[async_trait]
impl<T: BlockchainTransport> BroadcastClient for TronClient<T> {
	#[instrument(skip(self, payload), fields(chain = "tron"))]
	async fn broadcast(
		&self,
		payload: &SignedPayload,
		_kind: TxKind,
	) -> Result<String, TransactionError> {
		let response = self
			.transport
			.post("wallet/broadcasthex", json!({"transaction": payload.data}))
			.await
			.map_err(TransactionError::from_broadcast)?;
		let response: TronBroadcastResponse = serde_json::from_value(response).map_err(|e| {
			TransactionError::network_unavailable(format!("Unexpected broadcast response: {}", e))
		})?;

		if response.result != Some(true) {
			let reason = response
				.message
				.as_deref()
				.map(decode_message)
				.or(response.code)
				.unwrap_or_else(|| "unknown error".to_string());
			return Err(TransactionError::broadcast_rejected(reason));
		}
		Ok(response.txid.unwrap_or_else(|| payload.hash.clone()))
	}
}

#[async_trait]
impl<T: BlockchainTransport> TransactionStatusClient for TronClient<T> {
	#[instrument(skip(self), fields(chain = "tron"))]
	async fn get_transaction_status(
		&self,
		request: &TransactionStatusRequest,
	) -> Result<TransactionChanges, TransactionError> {
		let info: TronTransactionInfo = self
			.post("wallet/gettransactioninfobyid", json!({"value": request.hash}))
			.await?;

		if info.id.is_none() {
			if let Some(expiry) = request.expiry {
				let block = self.get_now_block().await?;
				if block.timestamp > expiry {
					return Ok(resolve(&ReceiptObservation::expired()));
				}
			}
			return Ok(resolve(&ReceiptObservation::not_found()));
		}

		let receipt = info.receipt.and_then(|receipt| receipt.result);
		let observation = ReceiptObservation {
			found: true,
			execution_failed: receipt.as_deref().is_some_and(|result| result != RECEIPT_SUCCESS)
				|| info.result.as_deref() == Some(RESULT_FAILED),
			out_of_resource: receipt
				.as_deref()
				.is_some_and(|result| RECEIPT_OUT_OF_RESOURCE.contains(&result)),
			block_height: info.block_number,
			fee: Some(U256::from(info.fee.unwrap_or_default())),
			..Default::default()
		};
		Ok(resolve(&observation))
	}
}
