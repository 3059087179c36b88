use sha2::{Digest, Sha256};
use std::sync::Mutex;

use gem_txcore::{
	models::Curve,
	services::transaction::{PrivateKey, Signer, TransactionError},
};

/// Deterministic stand-in for the external signer.
///
/// Signatures are `sha256(message) || sha256(sha256(message))`, followed by a recovery id for
/// the secp256k1 curves, so tests can recompute them.
#[derive(Default)]
pub struct FakeSigner {
	pub messages: Mutex<Vec<(Vec<u8>, Curve)>>,
}

impl FakeSigner {
	pub fn public_key_for(curve: Curve) -> Vec<u8> {
		match curve {
			Curve::Ed25519 => vec![0x11; 32],
			Curve::Secp256k1 | Curve::EthSecp256k1 => {
				let mut key = vec![0x02];
				key.extend_from_slice(&[0x11; 32]);
				key
			}
		}
	}

	pub fn signature_for(message: &[u8], curve: Curve) -> Vec<u8> {
		let digest = Sha256::digest(message);
		let mut signature = digest.to_vec();
		signature.extend_from_slice(&Sha256::digest(digest));
		if curve != Curve::Ed25519 {
			signature.push(1);
		}
		signature
	}

	pub fn signed_messages(&self) -> Vec<(Vec<u8>, Curve)> {
		self.messages.lock().unwrap().clone()
	}
}

impl Signer for FakeSigner {
	fn sign(
		&self,
		message: &[u8],
		_key: &PrivateKey,
		curve: Curve,
	) -> Result<Vec<u8>, TransactionError> {
		self.messages.lock().unwrap().push((message.to_vec(), curve));
		Ok(Self::signature_for(message, curve))
	}

	fn public_key(&self, _key: &PrivateKey, curve: Curve) -> Result<Vec<u8>, TransactionError> {
		Ok(Self::public_key_for(curve))
	}
}

/// Signer that always fails
pub struct FailingSigner;

impl Signer for FailingSigner {
	fn sign(
		&self,
		_message: &[u8],
		_key: &PrivateKey,
		_curve: Curve,
	) -> Result<Vec<u8>, TransactionError> {
		Err(TransactionError::signing_error("device locked"))
	}

	fn public_key(&self, _key: &PrivateKey, curve: Curve) -> Result<Vec<u8>, TransactionError> {
		Ok(FakeSigner::public_key_for(curve))
	}
}

pub fn test_key() -> PrivateKey {
	PrivateKey::new(vec![7u8; 32])
}
