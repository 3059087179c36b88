//! Amount parsing for untrusted node responses.

use alloy::primitives::U256;

/// Parses a base-10 integer string
pub fn parse_amount(value: &str) -> Result<U256, String> {
	U256::from_str_radix(value.trim(), 10).map_err(|e| format!("Invalid amount '{}': {}", value, e))
}

/// Parses a decimal string and drops its fractional part ("123.999" is 123)
pub fn parse_truncated_amount(value: &str) -> Result<U256, String> {
	let integer = value.trim().split('.').next().unwrap_or_default();
	if integer.is_empty() {
		return Ok(U256::ZERO);
	}
	parse_amount(integer)
}

/// Parses a hex word as returned by contract calls, with or without `0x`
pub fn parse_hex_amount(value: &str) -> Result<U256, String> {
	let digits = value.trim().trim_start_matches("0x");
	if digits.is_empty() {
		return Ok(U256::ZERO);
	}
	U256::from_str_radix(digits, 16).map_err(|e| format!("Invalid hex amount '{}': {}", value, e))
}

/// Converts to `u64`, failing for amounts the wire format cannot carry
pub fn amount_to_u64(value: U256) -> Result<u64, String> {
	u64::try_from(value).map_err(|_| format!("Amount {} does not fit in 64 bits", value))
}

/// Converts to `i64` for protobuf int64 fields
pub fn amount_to_i64(value: U256) -> Result<i64, String> {
	let value = amount_to_u64(value)?;
	i64::try_from(value).map_err(|_| format!("Amount {} does not fit in int64", value))
}
