use crate::{Error, PublicKey, SecretKey, SIGNATURE_BYTES_LEN};
use std::fmt;

/// A BLS signature over a `(message, domain)` pair, backed by `milagro_bls`. The domain is mixed
/// into the hash-to-curve input rather than carried as a separate signing-root field, matching
/// the pre-merge draft scheme this crate's `milagro_bls` dependency implements.
#[derive(Clone)]
pub struct Signature(milagro_bls::Signature);

impl Signature {
    pub fn new(message: &[u8], domain: u64, secret_key: &SecretKey) -> Self {
        Self(milagro_bls::Signature::new(message, domain, secret_key.as_raw()))
    }

    pub fn verify(&self, message: &[u8], domain: u64, public_key: &PublicKey) -> bool {
        self.0.verify(message, domain, public_key.as_raw())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(Error::InvalidByteLength {
                got: bytes.len(),
                expected: SIGNATURE_BYTES_LEN,
            });
        }
        Ok(Self(milagro_bls::Signature::from_bytes(bytes)?))
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }

    pub(crate) fn as_raw(&self) -> &milagro_bls::Signature {
        &self.0
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.as_bytes()))
    }
}
