mod signer;

pub use signer::*;
pub use transports::*;
