//! Command line front end for the transaction engine.
//!
//! Loads chain configurations, wires one client per chain and runs a single read-only query:
//! balances, fee quotes or the status of a submitted transaction. Signing keys never pass
//! through this binary.

use alloy::primitives::U256;
use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use dotenvy::dotenv;
use std::{
	collections::HashMap,
	env::{set_var, var},
	path::Path,
};
use tracing::instrument;

use gem_txcore::{
	models::{
		Account, AssetId, ChainConfig, ChainId, ConfigLoader, TransactionIntent,
		TransactionStatusRequest,
	},
	services::transaction::Registry,
	utils::logging::setup_logging,
};

fn chain_arg() -> Arg {
	Arg::new("chain")
		.long("chain")
		.help("Chain id (cosmos, osmosis, celestia, injective, sei, noble, solana, tron)")
		.value_name("CHAIN")
		.required(true)
}

fn cli() -> Command {
	Command::new("gem-txcore")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Builds, prices and tracks wallet transactions on Cosmos, Solana and Tron")
		.subcommand_required(true)
		.arg(
			Arg::new("config-dir")
				.long("config-dir")
				.help("Directory of chain configurations (default: config/chains)")
				.value_name("PATH")
				.global(true),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL")
				.global(true),
		)
		.subcommand(Command::new("chains").about("List configured chains"))
		.subcommand(
			Command::new("balance")
				.about("Show the balances of an address")
				.arg(chain_arg())
				.arg(
					Arg::new("address")
						.long("address")
						.value_name("ADDRESS")
						.required(true),
				)
				.arg(
					Arg::new("token")
						.long("token")
						.help("Token id to include; may be repeated")
						.value_name("TOKEN_ID")
						.action(clap::ArgAction::Append),
				),
		)
		.subcommand(
			Command::new("fee")
				.about("Quote the fee tiers of a transfer")
				.arg(chain_arg())
				.arg(Arg::new("from").long("from").value_name("ADDRESS").required(true))
				.arg(Arg::new("to").long("to").value_name("ADDRESS").required(true))
				.arg(
					Arg::new("amount")
						.long("amount")
						.help("Amount in the asset's smallest unit")
						.value_name("AMOUNT")
						.required(true),
				)
				.arg(
					Arg::new("token")
						.long("token")
						.help("Token id; the native asset when omitted")
						.value_name("TOKEN_ID"),
				),
		)
		.subcommand(
			Command::new("status")
				.about("Show the state of a submitted transaction")
				.arg(chain_arg())
				.arg(Arg::new("hash").long("hash").value_name("HASH").required(true))
				.arg(
					Arg::new("sender")
						.long("sender")
						.value_name("ADDRESS")
						.required(true),
				)
				.arg(
					Arg::new("expiry")
						.long("expiry")
						.help("Expiry returned at signing (block height or timestamp)")
						.value_name("EXPIRY"),
				),
		)
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
	matches
		.get_one::<String>(name)
		.map(String::as_str)
		.ok_or_else(|| anyhow!("missing --{}", name))
}

fn parse_chain(matches: &ArgMatches) -> Result<ChainId> {
	let chain = required(matches, "chain")?;
	chain.parse::<ChainId>().map_err(|e| anyhow!(e))
}

#[instrument(skip_all, fields(chain = %chain))]
async fn show_balance(registry: &Registry, chain: ChainId, matches: &ArgMatches) -> Result<()> {
	let account = Account::new(chain, required(matches, "address")?);
	let tokens: Vec<String> = matches
		.get_many::<String>("token")
		.map(|tokens| tokens.cloned().collect())
		.unwrap_or_default();

	let balances = registry.get_balances(&account, &tokens).await?;
	let native = balances
		.native
		.balance
		.to_display(chain.decimals())
		.context("native balance out of range")?;
	println!(
		"{}: available {} staked {} pending {} rewards {}",
		balances.native.asset_id,
		native.available,
		native.staked,
		native.pending,
		native.rewards
	);
	for token in &balances.tokens {
		println!("{}: {}", token.asset_id, token.balance.available);
	}
	Ok(())
}

#[instrument(skip_all, fields(chain = %chain))]
async fn show_fee(registry: &Registry, chain: ChainId, matches: &ArgMatches) -> Result<()> {
	let asset = match matches.get_one::<String>("token") {
		Some(token) => AssetId::token(chain, token.clone()),
		None => AssetId::native(chain),
	};
	let amount = U256::from_str_radix(required(matches, "amount")?, 10).context("invalid amount")?;
	let from = required(matches, "from")?;
	let intent = TransactionIntent::transfer(asset, from, required(matches, "to")?, amount);

	let preload = registry.preload(from, intent).await?;
	for priority in preload.priorities() {
		let fee = preload.fee(priority);
		println!("{:?}: {} {}", priority, fee.amount, fee.fee_asset_id);
	}
	Ok(())
}

#[instrument(skip_all, fields(chain = %chain))]
async fn show_status(registry: &Registry, chain: ChainId, matches: &ArgMatches) -> Result<()> {
	let mut request = TransactionStatusRequest::new(
		chain,
		required(matches, "hash")?,
		required(matches, "sender")?,
	);
	if let Some(expiry) = matches.get_one::<String>("expiry") {
		request = request.with_expiry(expiry.parse().context("invalid expiry")?);
	}

	let changes = registry.get_transaction_status(&request).await?;
	match changes.fee {
		Some(fee) => println!("{:?} (fee {})", changes.state, fee),
		None => println!("{:?}", changes.state),
	}
	Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
	let matches = cli().get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	if let Some(level) = matches.get_one::<String>("log-level") {
		if var("RUST_LOG").is_err() {
			set_var("RUST_LOG", level);
		}
	}
	setup_logging().map_err(|e| anyhow!("failed to set up logging: {}", e))?;

	let config_dir = matches.get_one::<String>("config-dir").map(Path::new);
	let configs: HashMap<String, ChainConfig> =
		ChainConfig::load_all(config_dir).context("failed to load chain configurations")?;
	let registry = Registry::from_configs(configs.into_values())?;

	match matches.subcommand() {
		Some(("chains", _)) => {
			for chain in registry.chains() {
				println!("{}", chain);
			}
			Ok(())
		}
		Some(("balance", sub)) => show_balance(&registry, parse_chain(sub)?, sub).await,
		Some(("fee", sub)) => show_fee(&registry, parse_chain(sub)?, sub).await,
		Some(("status", sub)) => show_status(&registry, parse_chain(sub)?, sub).await,
		_ => Err(anyhow!("unknown command")),
	}
}
