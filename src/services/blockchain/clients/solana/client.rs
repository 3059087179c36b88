//! Solana JSON-RPC client.
//!
//! Builds legacy messages for transfers and native staking, signs provider-built swap
//! transactions in place, and reads balances including stake accounts.

use alloy::primitives::U256;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
	models::{
		solana::{
			SolanaBlockhash, SolanaContext, SolanaKeyedAccount, SolanaParsedStakeAccount,
			SolanaParsedTokenAccount, SolanaPrioritizationFee, SolanaSignData, SolanaTokenAccount,
			SolanaTransaction,
		},
		AccountBalances, AssetBalance, AssetId, Balance, ChainId, ChainSignData, Curve, Fee,
		IntentKind, PreloadResult, SignedPayload, StakeIntent, TransactionChanges,
		TransactionIntent, TransactionStatusRequest, TxKind, OPTION_TOKEN_ACCOUNT_CREATION,
	},
	services::{
		blockchain::{
			rpc_result,
			solana::{
				address::STAKE_PROGRAM_ID,
				fee::{unit_limit, TOKEN_ACCOUNT_SIZE},
				instructions,
				message::{serialize_transaction, split_transaction, SIGNATURE_LEN},
				Instruction, Message, Pubkey, SolanaFeeCalculator, SolanaFeeState,
			},
			BlockchainTransport,
		},
		transaction::{
			expect_signature_len, resolve, BalanceAggregator, BroadcastClient, FeeCalculator,
			PrivateKey, ReceiptObservation, SignClient, Signer, SignerPreloader, TransactionError,
			TransactionStatusClient,
		},
	},
	utils::encoding::{amount_to_u64, parse_amount},
};

/// `deactivationEpoch` of a stake account that was never deactivated
const ACTIVE_STAKE_EPOCH: &str = "18446744073709551615";
/// Offset of the withdraw authority in stake account data
const STAKE_WITHDRAWER_OFFSET: u64 = 44;
const STAKE_SEED_PREFIX: &str = "stake:";

pub struct SolanaClient<T> {
	transport: T,
}

impl<T: BlockchainTransport> SolanaClient<T> {
	pub fn new(transport: T) -> Self {
		Self { transport }
	}

	async fn call<D: DeserializeOwned>(
		&self,
		method: &str,
		params: Value,
	) -> Result<D, TransactionError> {
		let response = self.transport.send_raw_request(method, Some(params)).await?;
		Ok(serde_json::from_value(rpc_result(response)?)?)
	}

	async fn get_latest_blockhash(&self) -> Result<SolanaBlockhash, TransactionError> {
		let context: SolanaContext<SolanaBlockhash> = self
			.call("getLatestBlockhash", json!([{"commitment": "finalized"}]))
			.await?;
		Ok(context.value)
	}

	async fn get_prioritization_fees(&self) -> Result<Vec<u64>, TransactionError> {
		let samples: Vec<SolanaPrioritizationFee> =
			self.call("getRecentPrioritizationFees", json!([])).await?;
		Ok(samples.into_iter().map(|sample| sample.prioritization_fee).collect())
	}

	async fn get_token_accounts(
		&self,
		owner: &str,
		mint: &str,
	) -> Result<Vec<SolanaKeyedAccount<SolanaParsedTokenAccount>>, TransactionError> {
		let context: SolanaContext<Vec<SolanaKeyedAccount<SolanaParsedTokenAccount>>> = self
			.call(
				"getTokenAccountsByOwner",
				json!([owner, {"mint": mint}, {"encoding": "jsonParsed"}]),
			)
			.await?;
		Ok(context.value)
	}

	/// First token account of `owner` for `mint`, if any
	async fn get_token_account(
		&self,
		owner: &str,
		mint: &str,
	) -> Result<Option<SolanaTokenAccount>, TransactionError> {
		let accounts = self.get_token_accounts(owner, mint).await?;
		Ok(accounts.into_iter().next().map(|account| SolanaTokenAccount {
			pubkey: account.pubkey,
			program_id: account.account.owner,
			decimals: account.account.data.parsed.info.token_amount.decimals,
		}))
	}

	/// Token accounts of sender and recipient plus the rent a new account would need
	async fn token_transfer_state(
		&self,
		owner: &str,
		intent: &TransactionIntent,
	) -> Result<(Option<SolanaTokenAccount>, Option<SolanaTokenAccount>, u64), TransactionError> {
		let (Some(mint), IntentKind::TokenTransfer) =
			(intent.asset_id.token_id.as_deref(), &intent.kind)
		else {
			return Ok((None, None, 0));
		};
		let destination = destination(intent)?;

		let (sender, recipient, rent) = tokio::join!(
			self.get_token_account(owner, mint),
			self.get_token_account(destination, mint),
			self.call::<u64>("getMinimumBalanceForRentExemption", json!([TOKEN_ACCOUNT_SIZE])),
		);
		let sender = sender?.ok_or_else(|| {
			TransactionError::chain_state_unavailable(format!(
				"{} has no token account for {}",
				owner, mint
			))
		})?;
		Ok((Some(sender), recipient?, rent?))
	}

	async fn get_stake_balances(&self, address: &str) -> Result<(U256, U256), TransactionError> {
		let accounts: Vec<SolanaKeyedAccount<SolanaParsedStakeAccount>> = self
			.call(
				"getProgramAccounts",
				json!([
					STAKE_PROGRAM_ID,
					{
						"encoding": "jsonParsed",
						"filters": [{
							"memcmp": {"offset": STAKE_WITHDRAWER_OFFSET, "bytes": address}
						}]
					}
				]),
			)
			.await?;

		let mut staked = U256::ZERO;
		let mut pending = U256::ZERO;
		for account in accounts {
			let lamports = U256::from(account.account.lamports);
			let active = account
				.account
				.data
				.parsed
				.info
				.stake
				.is_some_and(|stake| stake.delegation.deactivation_epoch == ACTIVE_STAKE_EPOCH);
			if active {
				staked += lamports;
			} else {
				pending += lamports;
			}
		}
		Ok((staked, pending))
	}

	async fn get_token_balance(&self, address: &str, mint: &str) -> Result<U256, TransactionError> {
		let accounts = self.get_token_accounts(address, mint).await?;
		accounts.iter().try_fold(U256::ZERO, |total, account| {
			let amount = parse_amount(&account.account.data.parsed.info.token_amount.amount)
				.map_err(TransactionError::chain_state_unavailable)?;
			Ok(total + amount)
		})
	}

	fn build_instructions(
		&self,
		payer: &Pubkey,
		intent: &TransactionIntent,
		data: &SolanaSignData,
	) -> Result<Vec<Instruction>, TransactionError> {
		let amount =
			amount_to_u64(intent.amount).map_err(TransactionError::invalid_intent_for_chain)?;
		let unsupported = || TransactionError::unsupported_kind(ChainId::Solana, intent.tx_kind());

		let mut result = Vec::new();
		match &intent.kind {
			IntentKind::NativeTransfer => {
				let to: Pubkey = destination(intent)?.parse()?;
				result.push(instructions::transfer(payer, &to, amount));
			}
			IntentKind::TokenTransfer => {
				let mint: Pubkey = intent
					.asset_id
					.token_id
					.as_deref()
					.ok_or_else(|| {
						TransactionError::invalid_intent_for_chain("Token transfer without a mint")
					})?
					.parse()?;
				let sender = data.sender_token_account.as_ref().ok_or_else(|| {
					TransactionError::chain_state_unavailable("Missing sender token account")
				})?;
				let token_program: Pubkey = sender.program_id.parse()?;
				let source: Pubkey = sender.pubkey.parse()?;
				let wallet: Pubkey = destination(intent)?.parse()?;

				let recipient = match &data.recipient_token_account {
					Some(account) => account.pubkey.parse()?,
					None => {
						let address =
							Pubkey::associated_token_address(&wallet, &mint, &token_program)?;
						result.push(instructions::create_associated_token_account_idempotent(
							payer,
							&address,
							&wallet,
							&mint,
							&token_program,
						));
						address
					}
				};
				result.push(instructions::transfer_checked(
					&source,
					&mint,
					&recipient,
					payer,
					amount,
					sender.decimals,
					&token_program,
				));
			}
			IntentKind::Stake(StakeIntent::Delegate { validator }) => {
				let vote: Pubkey = validator.parse()?;
				let stake_program = Pubkey::constant(STAKE_PROGRAM_ID);
				let seed = stake_seed(&data.recent_blockhash);
				let stake = Pubkey::create_with_seed(payer, &seed, &stake_program)?;
				result.push(instructions::create_account_with_seed(
					payer,
					&stake,
					payer,
					&seed,
					amount,
					instructions::STAKE_ACCOUNT_SPACE,
					&stake_program,
				));
				result.push(instructions::stake_initialize(&stake, payer));
				result.push(instructions::stake_delegate(&stake, &vote, payer));
			}
			IntentKind::Stake(StakeIntent::Undelegate { stake_id, .. }) => {
				let stake: Pubkey = required_stake_id(stake_id.as_deref())?.parse()?;
				result.push(instructions::stake_deactivate(&stake, payer));
			}
			IntentKind::Stake(StakeIntent::Withdraw { stake_id }) => {
				let stake: Pubkey = required_stake_id(stake_id.as_deref())?.parse()?;
				result.push(instructions::stake_withdraw(&stake, payer, payer, amount));
			}
			_ => return Err(unsupported()),
		}

		if let Some(memo) = intent.memo.as_deref().filter(|memo| !memo.is_empty()) {
			result.push(instructions::memo(memo));
		}
		Ok(result)
	}

	/// Signs a provider-built transaction, filling the fee payer signature slot
	fn sign_prebuilt(
		&self,
		encoded: &str,
		data: &SolanaSignData,
		signer: &dyn Signer,
		key: &PrivateKey,
	) -> Result<SignedPayload, TransactionError> {
		let bytes = BASE64
			.decode(encoded)
			.map_err(|e| {
				TransactionError::encoding_error(format!("Invalid swap transaction: {}", e))
			})?;
		let (mut signatures, message) = split_transaction(&bytes)?;
		let signature =
			expect_signature_len(signer.sign(message, key, Curve::Ed25519)?, SIGNATURE_LEN)?;
		signatures[0] = signature.clone();

		Ok(SignedPayload {
			data: BASE64.encode(serialize_transaction(&signatures, message)),
			hash: bs58::encode(signature).into_string(),
			expiry: Some(data.last_valid_block_height),
		})
	}
}

fn destination(intent: &TransactionIntent) -> Result<&str, TransactionError> {
	intent.destination.as_deref().ok_or_else(|| {
		TransactionError::invalid_intent_for_chain(format!(
			"{:?} on solana requires a destination",
			intent.tx_kind()
		))
	})
}

fn required_stake_id(stake_id: Option<&str>) -> Result<&str, TransactionError> {
	stake_id.ok_or_else(|| TransactionError::invalid_intent_for_chain("Missing stake account"))
}

/// Seed for a new stake account, unique per blockhash
fn stake_seed(blockhash: &str) -> String {
	format!("{}{}", STAKE_SEED_PREFIX, blockhash.chars().take(16).collect::<String>())
}

fn decode_blockhash(blockhash: &str) -> Result<[u8; 32], TransactionError> {
	let pubkey: Pubkey = blockhash.parse()?;
	Ok(pubkey.to_bytes())
}

#[async_trait]
impl<T: BlockchainTransport> BalanceAggregator for SolanaClient<T> {
	#[instrument(skip(self, token_ids), fields(chain = "solana"))]
	async fn get_balances(
		&self,
		address: &str,
		token_ids: &[String],
	) -> Result<AccountBalances, TransactionError> {
		let (balance, stake, tokens) = tokio::join!(
			self.call::<SolanaContext<u64>>("getBalance", json!([address])),
			self.get_stake_balances(address),
			join_all(token_ids.iter().map(|mint| async move {
				(mint, self.get_token_balance(address, mint).await)
			})),
		);
		let available = U256::from(balance?.value);

		let (staked, pending) = stake.unwrap_or_else(|e| {
			tracing::warn!(error = %e, "Stake accounts unavailable");
			(U256::ZERO, U256::ZERO)
		});

		let tokens = tokens
			.into_iter()
			.filter_map(|(mint, result)| match result {
				Ok(amount) => Some(AssetBalance::new(
					AssetId::token(ChainId::Solana, mint.clone()),
					Balance::available(amount),
				)),
				Err(e) => {
					tracing::warn!(token = %mint, error = %e, "Skipping token balance");
					None
				}
			})
			.collect();

		Ok(AccountBalances {
			native: AssetBalance::new(
				AssetId::native(ChainId::Solana),
				Balance {
					staked,
					pending,
					..Balance::available(available)
				},
			),
			tokens,
		})
	}
}

#[async_trait]
impl<T: BlockchainTransport> SignerPreloader for SolanaClient<T> {
	#[instrument(skip(self, intent), fields(chain = "solana"))]
	async fn preload(
		&self,
		owner: &str,
		intent: TransactionIntent,
	) -> Result<PreloadResult, TransactionError> {
		let (blockhash, prioritization_fees, token_state) = tokio::join!(
			self.get_latest_blockhash(),
			self.get_prioritization_fees(),
			self.token_transfer_state(owner, &intent),
		);
		let blockhash = blockhash?;
		let (sender_token_account, recipient_token_account, token_account_rent) = token_state?;

		let state = SolanaFeeState {
			prioritization_fees: prioritization_fees?,
			token_account_rent,
		};
		let mut fees = SolanaFeeCalculator.calculate(&intent, &state)?;
		// The recipient pays nothing for a new token account; the sender funds its rent
		if intent.tx_kind() == TxKind::TokenTransfer && recipient_token_account.is_none() {
			fees = fees
				.iter()
				.map(|fee| fee.with_options(OPTION_TOKEN_ACCOUNT_CREATION))
				.collect();
		}

		let sign_data = ChainSignData::Solana(SolanaSignData {
			recent_blockhash: blockhash.blockhash,
			last_valid_block_height: blockhash.last_valid_block_height,
			sender_token_account,
			recipient_token_account,
		});
		PreloadResult::new(intent, owner, sign_data, fees)
			.ok_or_else(|| TransactionError::fee_calculation_error("No fee tiers available"))
	}
}

#[async_trait]
impl<T: BlockchainTransport> SignClient for SolanaClient<T> {
	async fn sign(
		&self,
		intent: &TransactionIntent,
		sign_data: &ChainSignData,
		fee: &Fee,
		signer: &dyn Signer,
		key: &PrivateKey,
	) -> Result<Vec<SignedPayload>, TransactionError> {
		let ChainSignData::Solana(data) = sign_data else {
			return Err(TransactionError::invalid_intent_for_chain(
				"Expected Solana sign data",
			));
		};
		if let IntentKind::Swap(swap) = &intent.kind {
			return Ok(vec![self.sign_prebuilt(&swap.data, data, signer, key)?]);
		}

		let payer: Pubkey = intent.from.parse()?;
		let limit = match fee.unit_limit() {
			Some(limit) => u32::try_from(limit).map_err(|_| {
				TransactionError::encoding_error(format!(
					"Compute unit limit {} is too large",
					limit
				))
			})?,
			None => unit_limit(intent.tx_kind())
				.and_then(|limit| u32::try_from(limit).ok())
				.ok_or_else(|| {
					TransactionError::unsupported_kind(ChainId::Solana, intent.tx_kind())
				})?,
		};
		let price = u64::try_from(fee.unit_price().unwrap_or_default()).map_err(|_| {
			TransactionError::encoding_error("Compute unit price does not fit in 64 bits")
		})?;

		let mut all_instructions = vec![
			instructions::set_compute_unit_limit(limit),
			instructions::set_compute_unit_price(price),
		];
		all_instructions.extend(self.build_instructions(&payer, intent, data)?);

		let message = Message::compile(
			&payer,
			&all_instructions,
			decode_blockhash(&data.recent_blockhash)?,
		)?;
		if message.num_required_signatures != 1 {
			return Err(TransactionError::signing_error(
				"Transaction requires signers other than the fee payer",
			));
		}
		let message = message.serialize();
		let signature =
			expect_signature_len(signer.sign(&message, key, Curve::Ed25519)?, SIGNATURE_LEN)?;
		let hash = bs58::encode(&signature).into_string();

		Ok(vec![SignedPayload {
			data: BASE64.encode(serialize_transaction(&[signature], &message)),
			hash,
			expiry: Some(data.last_valid_block_height),
		}])
	}
}

#[async_trait]
impl<T: BlockchainTransport> BroadcastClient for SolanaClient<T> {
	#[instrument(skip(self, payload), fields(chain = "solana"))]
	async fn broadcast(
		&self,
		payload: &SignedPayload,
		kind: TxKind,
	) -> Result<String, TransactionError> {
		// Provider-built swaps were simulated by the provider
		let params = json!([
			payload.data,
			{"encoding": "base64", "skipPreflight": kind == TxKind::Swap}
		]);
		let result = self
			.transport
			.send_raw_request("sendTransaction", Some(params))
			.await
			.and_then(rpc_result)
			.map_err(TransactionError::from_broadcast)?;

		result.as_str().map(str::to_string).ok_or_else(|| {
			TransactionError::network_unavailable(format!(
				"Unexpected broadcast result: {}",
				result
			))
		})
	}
}

#[async_trait]
impl<T: BlockchainTransport> TransactionStatusClient for SolanaClient<T> {
	#[instrument(skip(self), fields(chain = "solana"))]
	async fn get_transaction_status(
		&self,
		request: &TransactionStatusRequest,
	) -> Result<TransactionChanges, TransactionError> {
		let result: Value = self
			.call(
				"getTransaction",
				json!([
					request.hash,
					{
						"encoding": "json",
						"commitment": "confirmed",
						"maxSupportedTransactionVersion": 0
					}
				]),
			)
			.await?;

		if result.is_null() {
			if let Some(expiry) = request.expiry {
				let height: u64 = self.call("getBlockHeight", json!([])).await?;
				if height > expiry {
					return Ok(resolve(&ReceiptObservation::expired()));
				}
			}
			return Ok(resolve(&ReceiptObservation::not_found()));
		}

		let transaction: SolanaTransaction = serde_json::from_value(result)?;
		let observation = ReceiptObservation {
			found: true,
			execution_failed: transaction
				.meta
				.as_ref()
				.is_some_and(|meta| meta.err.is_some()),
			block_height: Some(transaction.slot),
			fee: transaction.meta.map(|meta| U256::from(meta.fee)),
			..Default::default()
		};
		Ok(resolve(&observation))
	}
}
