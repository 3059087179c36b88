//! Boundary to the external signing primitive.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{models::Curve, services::transaction::TransactionError};

/// Raw private key bytes. Wiped on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(Vec<u8>);

impl PrivateKey {
	pub fn new(bytes: Vec<u8>) -> Self {
		Self(bytes)
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}

impl fmt::Debug for PrivateKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("PrivateKey(<redacted>)")
	}
}

/// External signer.
///
/// The signer applies the hashing convention of `curve` to `message` before signing:
/// sha256 for [`Curve::Secp256k1`], keccak256 for [`Curve::EthSecp256k1`] and none for
/// [`Curve::Ed25519`]. ECDSA signatures are 65 bytes (`r || s || recovery id`), EdDSA
/// signatures 64 bytes.
pub trait Signer: Send + Sync {
	fn sign(
		&self,
		message: &[u8],
		key: &PrivateKey,
		curve: Curve,
	) -> Result<Vec<u8>, TransactionError>;

	/// Public key for `key`; compressed SEC1 for secp256k1 curves
	fn public_key(&self, key: &PrivateKey, curve: Curve) -> Result<Vec<u8>, TransactionError>;
}

/// Checks the signature length produced by the external signer
pub(crate) fn expect_signature_len(
	signature: Vec<u8>,
	len: usize,
) -> Result<Vec<u8>, TransactionError> {
	if signature.len() != len {
		return Err(TransactionError::signing_error(format!(
			"Expected a {} byte signature, got {}",
			len,
			signature.len()
		)));
	}
	Ok(signature)
}
