use crate::{AggregatePublicKey, Error, PublicKey, Signature, SIGNATURE_BYTES_LEN};
use std::fmt;

/// The sum of a set of signatures, verified either against one aggregate public key (when every
/// signer attested the same message) or against per-signer messages via `verify_multiple`.
#[derive(Clone)]
pub struct AggregateSignature(milagro_bls::AggregateSignature);

impl AggregateSignature {
    pub fn new() -> Self {
        Self(milagro_bls::AggregateSignature::new())
    }

    pub fn add(&mut self, signature: &Signature) {
        self.0.add(signature.as_raw())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(Error::InvalidByteLength {
                got: bytes.len(),
                expected: SIGNATURE_BYTES_LEN,
            });
        }
        Ok(Self(milagro_bls::AggregateSignature::from_bytes(bytes)?))
    }

    pub fn fast_aggregate_verify(&self, message: &[u8], domain: u64, public_keys: &[&PublicKey]) -> bool {
        let mut aggregate = AggregatePublicKey::new();
        for public_key in public_keys {
            aggregate.add(public_key);
        }
        self.0.verify(message, domain, aggregate.as_raw())
    }

    pub fn verify_multiple(&self, messages: &[&[u8]], domain: u64, public_keys: &[&PublicKey]) -> bool {
        if messages.len() != public_keys.len() {
            return false;
        }
        let raw_keys: Vec<&milagro_bls::PublicKey> = public_keys.iter().map(|pk| pk.as_raw()).collect();
        self.0.verify_multiple(messages, domain, &raw_keys)
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }
}

impl Default for AggregateSignature {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AggregateSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.as_bytes()))
    }
}
