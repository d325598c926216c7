mod aggregate_public_key;
mod aggregate_signature;
mod keypair;
mod public_key;
mod public_key_bytes;
mod secret_key;
mod signature;
mod signature_bytes;

pub use aggregate_public_key::AggregatePublicKey;
pub use aggregate_signature::AggregateSignature;
pub use keypair::Keypair;
pub use public_key::PublicKey;
pub use public_key_bytes::PublicKeyBytes;
pub use secret_key::SecretKey;
pub use signature::Signature;
pub use signature_bytes::SignatureBytes;

pub const PUBLIC_KEY_BYTES_LEN: usize = 48;
pub const SECRET_KEY_BYTES_LEN: usize = 32;
pub const SIGNATURE_BYTES_LEN: usize = 96;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    InvalidByteLength { got: usize, expected: usize },
    MilagroError(milagro_bls::AmclError),
}

impl From<milagro_bls::AmclError> for Error {
    fn from(error: milagro_bls::AmclError) -> Self {
        Error::MilagroError(error)
    }
}
