//! Configuration error types.
//!
//! Errors raised while reading chain configuration files from disk and validating them.

use log::error;
use std::{error::Error, fmt};

#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
	/// A configuration file was read but its content is not acceptable
	ValidationError(String),

	/// A configuration file is not valid JSON for the expected shape
	ParseError(String),

	/// The configuration directory or a file in it could not be read
	FileError(String),
}

impl ConfigError {
	fn format_message(&self) -> String {
		match self {
			Self::ValidationError(msg) => format!("Invalid chain configuration: {}", msg),
			Self::ParseError(msg) => format!("Malformed chain configuration: {}", msg),
			Self::FileError(msg) => format!("Unreadable chain configuration: {}", msg),
		}
	}

	pub fn validation_error(msg: impl Into<String>) -> Self {
		let error = Self::ValidationError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn parse_error(msg: impl Into<String>) -> Self {
		let error = Self::ParseError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn file_error(msg: impl Into<String>) -> Self {
		let error = Self::FileError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
	fn from(err: std::io::Error) -> Self {
		Self::file_error(err.to_string())
	}
}

impl From<serde_json::Error> for ConfigError {
	fn from(err: serde_json::Error) -> Self {
		Self::parse_error(format!("line {}: {}", err.line(), err))
	}
}
