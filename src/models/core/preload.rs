use serde::{Deserialize, Serialize};

use crate::models::{ChainSignData, Fee, FeePriority, TransactionIntent};

/// Everything needed to sign one send attempt: the intent, the chain metadata and the fee for
/// each available priority tier. Fees and sign data always come from the same preload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PreloadResult {
	pub intent: TransactionIntent,
	pub owner_address: String,
	pub sign_data: ChainSignData,
	primary: Fee,
	others: Vec<Fee>,
}

impl PreloadResult {
	/// Builds a preload result, keeping one fee per tier (the first one wins).
	///
	/// Returns `None` when `fees` is empty.
	pub fn new(
		intent: TransactionIntent,
		owner_address: impl Into<String>,
		sign_data: ChainSignData,
		fees: Vec<Fee>,
	) -> Option<Self> {
		let mut fees = fees.into_iter();
		let primary = fees.next()?;
		let mut others: Vec<Fee> = Vec::new();
		for fee in fees {
			if fee.priority != primary.priority
				&& !others.iter().any(|other| other.priority == fee.priority)
			{
				others.push(fee);
			}
		}
		others.sort_by_key(|fee| fee.priority);
		Some(Self {
			intent,
			owner_address: owner_address.into(),
			sign_data,
			primary,
			others,
		})
	}

	/// Fee for `priority`, falling back to the first available tier
	pub fn fee(&self, priority: FeePriority) -> &Fee {
		if self.primary.priority == priority {
			return &self.primary;
		}
		self.others
			.iter()
			.find(|fee| fee.priority == priority)
			.unwrap_or(&self.primary)
	}

	pub fn fees(&self) -> impl Iterator<Item = &Fee> {
		std::iter::once(&self.primary).chain(self.others.iter())
	}

	pub fn priorities(&self) -> Vec<FeePriority> {
		let mut priorities: Vec<FeePriority> = self.fees().map(|fee| fee.priority).collect();
		priorities.sort();
		priorities
	}
}
