//! TRC-20 calldata. Tron contracts share the EVM ABI with 20 byte addresses.

use alloy::{primitives::U256, sol, sol_types::SolCall};

use crate::services::blockchain::tron::TronAddress;

sol! {
	function transfer(address to, uint256 amount) external returns (bool);
	function approve(address spender, uint256 amount) external returns (bool);
	function balanceOf(address account) external view returns (uint256);
}

pub fn transfer_data(to: &TronAddress, amount: U256) -> Vec<u8> {
	transferCall {
		to: to.evm_address(),
		amount,
	}
	.abi_encode()
}

pub fn approve_data(spender: &TronAddress, amount: U256) -> Vec<u8> {
	approveCall {
		spender: spender.evm_address(),
		amount,
	}
	.abi_encode()
}

pub fn balance_of_data(account: &TronAddress) -> Vec<u8> {
	balanceOfCall {
		account: account.evm_address(),
	}
	.abi_encode()
}
