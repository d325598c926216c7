use crate::{Error, PublicKey, PUBLIC_KEY_BYTES_LEN};
use serde::{Deserialize, Serialize};
use serde_hex::{encode as hex_encode, PrefixedHexVisitor};
use ssz_new::{SszDecode, SszDecodeError, SszEncode};
use ssz_types::FixedVector;
use std::convert::TryFrom;
use std::fmt;
use tree_hash::{TreeHash, TreeHashType};
use typenum::U48;

/// The raw, possibly-invalid compressed encoding of a public key as it appears on the wire —
/// containers hold this rather than `PublicKey` so that decoding a block never fails on a bad
/// key; the key is only deserialized into curve points where it's actually used.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PublicKeyBytes(FixedVector<u8, U48>);

impl PublicKeyBytes {
    pub fn empty() -> Self {
        Self(FixedVector::from(vec![0; PUBLIC_KEY_BYTES_LEN]))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != PUBLIC_KEY_BYTES_LEN {
            return Err(Error::InvalidByteLength {
                got: bytes.len(),
                expected: PUBLIC_KEY_BYTES_LEN,
            });
        }
        Ok(Self(FixedVector::from(bytes.to_vec())))
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl Default for PublicKeyBytes {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<&PublicKeyBytes> for PublicKey {
    type Error = Error;

    fn try_from(bytes: &PublicKeyBytes) -> Result<Self, Error> {
        PublicKey::from_bytes(&bytes.as_bytes())
    }
}

impl fmt::Display for PublicKeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex_encode(self.as_bytes()))
    }
}

impl Serialize for PublicKeyBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex_encode(self.as_bytes()))
    }
}

impl<'de> Deserialize<'de> for PublicKeyBytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = deserializer.deserialize_str(PrefixedHexVisitor)?;
        Self::from_bytes(&bytes).map_err(|e| serde::de::Error::custom(format!("{:?}", e)))
    }
}

impl SszDecode for PublicKeyBytes {
    fn is_ssz_fixed_len() -> bool {
        <FixedVector<u8, U48> as SszDecode>::is_ssz_fixed_len()
    }

    fn ssz_fixed_len() -> usize {
        <FixedVector<u8, U48> as SszDecode>::ssz_fixed_len()
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, SszDecodeError> {
        FixedVector::<u8, U48>::from_ssz_bytes(bytes).map(Self)
    }
}

impl SszEncode for PublicKeyBytes {
    fn is_ssz_fixed_len() -> bool {
        <FixedVector<u8, U48> as SszEncode>::is_ssz_fixed_len()
    }

    fn as_ssz_bytes(&self) -> Vec<u8> {
        self.0.as_ssz_bytes()
    }
}

impl TreeHash for PublicKeyBytes {
    fn tree_hash_type() -> TreeHashType {
        FixedVector::<u8, U48>::tree_hash_type()
    }

    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        self.0.tree_hash_packed_encoding()
    }

    fn tree_hash_packing_factor() -> usize {
        FixedVector::<u8, U48>::tree_hash_packing_factor()
    }

    fn tree_hash_root(&self) -> Vec<u8> {
        self.0.tree_hash_root()
    }
}
