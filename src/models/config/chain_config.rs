use std::path::Path;

use crate::models::{ChainConfig, ConfigLoader};

use super::error::ConfigError;

const DEFAULT_CHAINS_DIR: &str = "config/chains";
const MIN_TIMEOUT_MS: u64 = 100;

impl ConfigLoader for ChainConfig {
	fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let chains_dir = path.unwrap_or(Path::new(DEFAULT_CHAINS_DIR));
		if !chains_dir.exists() {
			return Err(ConfigError::file_error(format!(
				"chains directory not found: {}",
				chains_dir.display()
			)));
		}

		let mut pairs = Vec::new();
		for entry in std::fs::read_dir(chains_dir)? {
			let path = entry?.path();
			if !Self::is_json_file(&path) {
				continue;
			}

			let name = path
				.file_stem()
				.and_then(|s| s.to_str())
				.unwrap_or("unknown")
				.to_string();

			match Self::load_from_path(&path) {
				Ok(config) => pairs.push((name, config)),
				Err(e) => {
					tracing::warn!(file = %path.display(), error = %e, "Skipping chain config")
				}
			}
		}

		Ok(T::from_iter(pairs))
	}

	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path)?;
		let config: ChainConfig = serde_json::from_reader(file)?;

		if let Err(validation_error) = config.validate() {
			return Err(ConfigError::validation_error(validation_error));
		}

		Ok(config)
	}

	fn validate(&self) -> Result<(), String> {
		if self.name.trim().is_empty() {
			return Err("Chain name must not be empty".to_string());
		}

		if self.rpc_urls.iter().any(|rpc_url| rpc_url.type_ != "rpc") {
			return Err("RPC URL type must be one of: rpc".to_string());
		}

		if !self.rpc_urls.iter().all(|rpc_url| {
			rpc_url.url.starts_with("http://") || rpc_url.url.starts_with("https://")
		}) {
			return Err("All RPC URLs must start with http:// or https://".to_string());
		}

		if !self.rpc_urls.iter().all(|rpc_url| rpc_url.weight <= 100) {
			return Err("All RPC URL weights must be between 0 and 100".to_string());
		}

		if self.primary_url().is_none() {
			return Err("At least one RPC URL must have a positive weight".to_string());
		}

		if self.timeout_ms < MIN_TIMEOUT_MS {
			return Err(format!("Timeout must be at least {}ms", MIN_TIMEOUT_MS));
		}

		Ok(())
	}
}
