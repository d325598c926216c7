use crate::{Error, SecretKey, PUBLIC_KEY_BYTES_LEN};
use std::fmt;

/// A BLS public key, backed by `milagro_bls`.
#[derive(Clone)]
pub struct PublicKey(milagro_bls::PublicKey);

impl PublicKey {
    pub fn from_secret_key(secret_key: &SecretKey) -> Self {
        Self(milagro_bls::PublicKey::from_secret_key(secret_key.as_raw()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != PUBLIC_KEY_BYTES_LEN {
            return Err(Error::InvalidByteLength {
                got: bytes.len(),
                expected: PUBLIC_KEY_BYTES_LEN,
            });
        }
        Ok(Self(milagro_bls::PublicKey::from_bytes(bytes)?))
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }

    pub fn as_uncompressed_bytes(&self) -> Vec<u8> {
        self.0.as_uncompressed_bytes()
    }

    pub fn concatenated_hex_id(&self) -> String {
        hex::encode(self.as_bytes())
    }

    pub(crate) fn as_raw(&self) -> &milagro_bls::PublicKey {
        &self.0
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.as_bytes()))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.as_bytes()))
    }
}
