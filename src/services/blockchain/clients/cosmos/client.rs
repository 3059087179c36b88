//! Cosmos SDK chain client.
//!
//! Talks to the LCD (REST) API of a node. Transactions are protobuf `TxRaw` signed in
//! SIGN_MODE_DIRECT and broadcast in sync mode.

use alloy::primitives::U256;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use prost::Message;
use serde::de::DeserializeOwned;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::{
	models::{
		cosmos::{
			CosmosAccount, CosmosBalancesResponse, CosmosBroadcastResponse,
			CosmosDelegationsResponse, CosmosNodeInfoResponse, CosmosRewardsResponse,
			CosmosSignData, CosmosTxResponse, CosmosUnbondingResponse,
		},
		AccountBalances, AssetBalance, AssetId, Balance, ChainId, ChainSignData, Fee, IntentKind,
		PreloadResult, SignedPayload, StakeIntent, TransactionChanges, TransactionIntent,
		TransactionStatusRequest, TxKind,
	},
	services::{
		blockchain::{
			cosmos::{fee::gas_limit, proto, CosmosChainParams, CosmosFeeCalculator, STAKE_MEMO},
			BlockchainTransport,
		},
		transaction::{
			expect_signature_len, resolve, BalanceAggregator, BroadcastClient, FeeCalculator,
			PrivateKey, ReceiptObservation, SignClient, Signer, SignerPreloader, TransactionError,
			TransactionStatusClient,
		},
	},
	utils::encoding::{parse_amount, parse_truncated_amount},
};

/// Cosmos SDK error code for an out of gas execution
const CODE_OUT_OF_GAS: u32 = 11;

/// Client for one Cosmos SDK chain
pub struct CosmosClient<T> {
	chain: ChainId,
	params: CosmosChainParams,
	transport: T,
}

impl<T: BlockchainTransport> CosmosClient<T> {
	/// Creates a client for `chain`, which must belong to the Cosmos family
	pub fn new(chain: ChainId, transport: T) -> Result<Self, TransactionError> {
		let params = CosmosChainParams::for_chain(chain).ok_or_else(|| {
			TransactionError::configuration_error(format!("{} is not a Cosmos SDK chain", chain))
		})?;
		Ok(Self {
			chain,
			params,
			transport,
		})
	}

	pub fn fee_calculator(&self) -> CosmosFeeCalculator {
		CosmosFeeCalculator::new(self.chain, self.params)
	}

	async fn fetch<D: DeserializeOwned>(&self, path: &str) -> Result<D, TransactionError> {
		let response = self.transport.get(path).await?;
		Ok(serde_json::from_value(response)?)
	}

	async fn get_account(&self, address: &str) -> Result<(u64, u64), TransactionError> {
		let response = self
			.transport
			.get(&format!("cosmos/auth/v1beta1/accounts/{}", address))
			.await?;
		let account = &response["account"];
		// Injective wraps the base account, vesting accounts nest it one level deeper
		let base = if !account["base_account"].is_null() {
			&account["base_account"]
		} else if !account["base_vesting_account"]["base_account"].is_null() {
			&account["base_vesting_account"]["base_account"]
		} else {
			account
		};
		let parsed: CosmosAccount = serde_json::from_value(base.clone())?;

		let account_number = parsed.account_number.parse::<u64>().map_err(|_| {
			TransactionError::chain_state_unavailable(format!(
				"Invalid account number: {}",
				parsed.account_number
			))
		})?;
		let sequence = if parsed.sequence.is_empty() {
			0
		} else {
			parsed.sequence.parse::<u64>().map_err(|_| {
				TransactionError::chain_state_unavailable(format!(
					"Invalid sequence: {}",
					parsed.sequence
				))
			})?
		};
		Ok((account_number, sequence))
	}

	async fn get_chain_id(&self) -> Result<String, TransactionError> {
		let node_info: CosmosNodeInfoResponse = self
			.fetch("cosmos/base/tendermint/v1beta1/node_info")
			.await?;
		Ok(node_info.default_node_info.network)
	}

	fn coin(&self, denom: &str, amount: U256) -> proto::Coin {
		proto::Coin {
			denom: denom.to_string(),
			amount: amount.to_string(),
		}
	}

	fn destination<'a>(&self, intent: &'a TransactionIntent) -> Result<&'a str, TransactionError> {
		intent.destination.as_deref().ok_or_else(|| {
			TransactionError::invalid_intent_for_chain(format!(
				"{:?} on {} requires a destination",
				intent.tx_kind(),
				self.chain
			))
		})
	}

	/// Messages and memo for an intent
	fn build_messages(
		&self,
		intent: &TransactionIntent,
	) -> Result<(Vec<proto::Any>, String), TransactionError> {
		let denom = intent
			.asset_id
			.token_id
			.as_deref()
			.unwrap_or(self.params.denom);
		let from = intent.from.clone();
		let amount = self.coin(denom, intent.amount);
		let user_memo = intent.memo.clone().unwrap_or_default();

		let unsupported = || TransactionError::unsupported_kind(self.chain, intent.tx_kind());

		match &intent.kind {
			IntentKind::NativeTransfer | IntentKind::TokenTransfer => {
				let msg = proto::MsgSend {
					from_address: from,
					to_address: self.destination(intent)?.to_string(),
					amount: vec![amount],
				};
				Ok((vec![proto::Any::pack(proto::MSG_SEND_TYPE_URL, &msg)], user_memo))
			}
			// Cross-chain swaps are routed by memo on a plain transfer to the provider vault
			IntentKind::Swap(swap) => {
				let msg = proto::MsgSend {
					from_address: from,
					to_address: swap.to.clone(),
					amount: vec![amount],
				};
				Ok((
					vec![proto::Any::pack(proto::MSG_SEND_TYPE_URL, &msg)],
					swap.data.clone(),
				))
			}
			IntentKind::Stake(stake) => {
				let messages = match stake {
					StakeIntent::Delegate { validator } => {
						let msg = proto::MsgDelegate {
							delegator_address: from,
							validator_address: validator.clone(),
							amount: Some(amount),
						};
						vec![proto::Any::pack(proto::MSG_DELEGATE_TYPE_URL, &msg)]
					}
					StakeIntent::Undelegate { validator, .. } => {
						let msg = proto::MsgDelegate {
							delegator_address: from,
							validator_address: validator.clone(),
							amount: Some(amount),
						};
						vec![proto::Any::pack(proto::MSG_UNDELEGATE_TYPE_URL, &msg)]
					}
					StakeIntent::Redelegate {
						src_validator,
						dst_validator,
					} => {
						let msg = proto::MsgBeginRedelegate {
							delegator_address: from,
							validator_src_address: src_validator.clone(),
							validator_dst_address: dst_validator.clone(),
							amount: Some(amount),
						};
						vec![proto::Any::pack(proto::MSG_BEGIN_REDELEGATE_TYPE_URL, &msg)]
					}
					StakeIntent::ClaimRewards { validators } => {
						if validators.is_empty() {
							return Err(TransactionError::invalid_intent_for_chain(
								"Claiming rewards requires at least one validator",
							));
						}
						validators
							.iter()
							.map(|validator| {
								let msg = proto::MsgWithdrawDelegatorReward {
									delegator_address: from.clone(),
									validator_address: validator.clone(),
								};
								proto::Any::pack(proto::MSG_WITHDRAW_REWARD_TYPE_URL, &msg)
							})
							.collect()
					}
					StakeIntent::Withdraw { .. }
					| StakeIntent::Freeze { .. }
					| StakeIntent::Unfreeze { .. } => return Err(unsupported()),
				};
				Ok((messages, STAKE_MEMO.to_string()))
			}
			IntentKind::TokenApproval { .. }
			| IntentKind::NftTransfer { .. }
			| IntentKind::AccountActivation => Err(unsupported()),
		}
	}

	fn sum_native(
		&self,
		coins: impl Iterator<Item = (String, String)>,
		truncate: bool,
	) -> Result<U256, String> {
		coins
			.filter(|(denom, _)| denom == self.params.denom)
			.try_fold(U256::ZERO, |acc, (_, amount)| {
				let amount = if truncate {
					parse_truncated_amount(&amount)?
				} else {
					parse_amount(&amount)?
				};
				Ok(acc + amount)
			})
	}

	async fn get_staked(&self, address: &str) -> Result<U256, TransactionError> {
		let response: CosmosDelegationsResponse = self
			.fetch(&format!("cosmos/staking/v1beta1/delegations/{}", address))
			.await?;
		self.sum_native(
			response
				.delegation_responses
				.into_iter()
				.map(|delegation| (delegation.balance.denom, delegation.balance.amount)),
			false,
		)
		.map_err(TransactionError::chain_state_unavailable)
	}

	async fn get_unbonding(&self, address: &str) -> Result<U256, TransactionError> {
		let response: CosmosUnbondingResponse = self
			.fetch(&format!(
				"cosmos/staking/v1beta1/delegators/{}/unbonding_delegations",
				address
			))
			.await?;
		let denom = self.params.denom.to_string();
		self.sum_native(
			response
				.unbonding_responses
				.into_iter()
				.flat_map(|unbonding| unbonding.entries)
				.map(|entry| (denom.clone(), entry.balance)),
			false,
		)
		.map_err(TransactionError::chain_state_unavailable)
	}

	async fn get_rewards(&self, address: &str) -> Result<U256, TransactionError> {
		let response: CosmosRewardsResponse = self
			.fetch(&format!(
				"cosmos/distribution/v1beta1/delegators/{}/rewards",
				address
			))
			.await?;
		self.sum_native(
			response.total.into_iter().map(|coin| (coin.denom, coin.amount)),
			true,
		)
		.map_err(TransactionError::chain_state_unavailable)
	}

	/// Staking sub-balances are not critical and degrade to zero
	async fn staking_or_zero(
		&self,
		what: &str,
		fetch: impl std::future::Future<Output = Result<U256, TransactionError>>,
	) -> U256 {
		if !self.params.supports_staking {
			return U256::ZERO;
		}
		match fetch.await {
			Ok(amount) => amount,
			Err(e) => {
				tracing::warn!(
					chain = %self.chain,
					what,
					error = %e,
					"Staking balance unavailable"
				);
				U256::ZERO
			}
		}
	}
}

#[async_trait]
impl<T: BlockchainTransport> BalanceAggregator for CosmosClient<T> {
	#[instrument(skip(self, token_ids), fields(chain = %self.chain))]
	async fn get_balances(
		&self,
		address: &str,
		token_ids: &[String],
	) -> Result<AccountBalances, TransactionError> {
		let bank_path = format!("cosmos/bank/v1beta1/balances/{}", address);
		let (bank, staked, pending, rewards) = tokio::join!(
			self.fetch::<CosmosBalancesResponse>(&bank_path),
			self.staking_or_zero("delegations", self.get_staked(address)),
			self.staking_or_zero("unbonding", self.get_unbonding(address)),
			self.staking_or_zero("rewards", self.get_rewards(address)),
		);
		let bank = bank?;

		let available = self
			.sum_native(
				bank.balances
					.iter()
					.map(|coin| (coin.denom.clone(), coin.amount.clone())),
				false,
			)
			.map_err(TransactionError::chain_state_unavailable)?;

		let native = AssetBalance::new(
			AssetId::native(self.chain),
			Balance {
				staked,
				pending,
				rewards,
				..Balance::available(available)
			},
		);

		let mut tokens = Vec::with_capacity(token_ids.len());
		for token_id in token_ids {
			let amount = match bank.balances.iter().find(|coin| &coin.denom == token_id) {
				Some(coin) => match parse_amount(&coin.amount) {
					Ok(amount) => amount,
					Err(e) => {
						tracing::warn!(
							chain = %self.chain,
							token = %token_id,
							error = %e,
							"Skipping token balance"
						);
						continue;
					}
				},
				None => U256::ZERO,
			};
			tokens.push(AssetBalance::new(
				AssetId::token(self.chain, token_id.clone()),
				Balance::available(amount),
			));
		}

		Ok(AccountBalances { native, tokens })
	}
}

#[async_trait]
impl<T: BlockchainTransport> SignerPreloader for CosmosClient<T> {
	#[instrument(skip(self, intent), fields(chain = %self.chain))]
	async fn preload(
		&self,
		owner: &str,
		intent: TransactionIntent,
	) -> Result<PreloadResult, TransactionError> {
		let (account, chain_id) = tokio::join!(self.get_account(owner), self.get_chain_id());
		let (account_number, sequence) = account?;
		let chain_id = chain_id?;

		let fees = self.fee_calculator().calculate(&intent, &())?;
		let sign_data = ChainSignData::Cosmos(CosmosSignData {
			account_number,
			sequence,
			chain_id,
		});

		PreloadResult::new(intent, owner, sign_data, fees)
			.ok_or_else(|| TransactionError::fee_calculation_error("No fee tiers available"))
	}
}

#[async_trait]
impl<T: BlockchainTransport> SignClient for CosmosClient<T> {
	async fn sign(
		&self,
		intent: &TransactionIntent,
		sign_data: &ChainSignData,
		fee: &Fee,
		signer: &dyn Signer,
		key: &PrivateKey,
	) -> Result<Vec<SignedPayload>, TransactionError> {
		let ChainSignData::Cosmos(data) = sign_data else {
			return Err(TransactionError::invalid_intent_for_chain(format!(
				"Expected Cosmos sign data for {}",
				self.chain
			)));
		};

		let (messages, memo) = self.build_messages(intent)?;
		let message_count = messages.len() as u64;
		let unit_limit = match fee.unit_limit() {
			Some(limit) => u64::try_from(limit).map_err(|_| {
				TransactionError::encoding_error(format!("Gas limit {} is too large", limit))
			})?,
			None => gas_limit(intent.tx_kind())
				.ok_or_else(|| TransactionError::unsupported_kind(self.chain, intent.tx_kind()))?,
		};

		let curve = self.chain.curve();
		let public_key = signer.public_key(key, curve)?;

		let body = proto::TxBody {
			messages,
			memo,
			timeout_height: 0,
		};
		let auth_info = proto::AuthInfo {
			signer_infos: vec![proto::SignerInfo {
				public_key: Some(proto::Any::pack(
					self.params.pubkey_type,
					&proto::PubKey { key: public_key },
				)),
				mode_info: Some(proto::ModeInfo {
					single: Some(proto::ModeInfoSingle {
						mode: proto::SIGN_MODE_DIRECT,
					}),
				}),
				sequence: data.sequence,
			}],
			fee: Some(proto::Fee {
				amount: vec![self.coin(self.params.denom, fee.amount)],
				gas_limit: unit_limit * message_count,
				payer: String::new(),
				granter: String::new(),
			}),
		};

		let body_bytes = body.encode_to_vec();
		let auth_info_bytes = auth_info.encode_to_vec();
		let sign_doc = proto::SignDoc {
			body_bytes: body_bytes.clone(),
			auth_info_bytes: auth_info_bytes.clone(),
			chain_id: data.chain_id.clone(),
			account_number: data.account_number,
		};

		let mut signature =
			expect_signature_len(signer.sign(&sign_doc.encode_to_vec(), key, curve)?, 65)?;
		signature.truncate(64);

		let tx_bytes = proto::TxRaw {
			body_bytes,
			auth_info_bytes,
			signatures: vec![signature],
		}
		.encode_to_vec();

		Ok(vec![SignedPayload {
			data: BASE64.encode(&tx_bytes),
			hash: hex::encode_upper(Sha256::digest(&tx_bytes)),
			expiry: None,
		}])
	}
}

#[async_trait]
impl<T: BlockchainTransport> BroadcastClient for CosmosClient<T> {
	#[instrument(skip(self, payload), fields(chain = %self.chain))]
	async fn broadcast(
		&self,
		payload: &SignedPayload,
		_kind: TxKind,
	) -> Result<String, TransactionError> {
		let body = json!({
			"tx_bytes": payload.data,
			"mode": "BROADCAST_MODE_SYNC",
		});
		let response = self
			.transport
			.post("cosmos/tx/v1beta1/txs", body)
			.await
			.map_err(TransactionError::from_broadcast)?;

		let response: CosmosBroadcastResponse = serde_json::from_value(response)
			.map_err(|e| {
				TransactionError::network_unavailable(format!(
					"Unexpected broadcast response: {}",
					e
				))
			})?;
		if response.tx_response.code != 0 {
			return Err(TransactionError::broadcast_rejected(response.tx_response.raw_log));
		}
		Ok(response.tx_response.txhash)
	}
}

#[async_trait]
impl<T: BlockchainTransport> TransactionStatusClient for CosmosClient<T> {
	#[instrument(skip(self), fields(chain = %self.chain))]
	async fn get_transaction_status(
		&self,
		request: &TransactionStatusRequest,
	) -> Result<TransactionChanges, TransactionError> {
		let response = match self
			.transport
			.get(&format!("cosmos/tx/v1beta1/txs/{}", request.hash))
			.await
		{
			Ok(response) => response,
			Err(e) if e.is_not_found() => return Ok(resolve(&ReceiptObservation::not_found())),
			Err(e) => return Err(e.into()),
		};
		let response: CosmosTxResponse = serde_json::from_value(response)?;

		let code = response.tx_response.code;
		let fee = response
			.tx
			.and_then(|tx| tx.auth_info)
			.and_then(|auth_info| auth_info.fee)
			.map(|fee| {
				self.sum_native(
					fee.amount.into_iter().map(|coin| (coin.denom, coin.amount)),
					false,
				)
			})
			.transpose()
			.map_err(TransactionError::chain_state_unavailable)?;

		let observation = ReceiptObservation {
			found: true,
			execution_failed: code != 0,
			out_of_resource: code == CODE_OUT_OF_GAS,
			block_height: response.tx_response.height.parse::<u64>().ok(),
			fee,
			..Default::default()
		};
		Ok(resolve(&observation))
	}
}
