use crate::PublicKey;

/// The sum of a set of public keys on the curve, used for `fast_aggregate_verify`-style checks
/// where every signer attests to the exact same message.
#[derive(Clone)]
pub struct AggregatePublicKey(milagro_bls::AggregatePublicKey);

impl AggregatePublicKey {
    pub fn new() -> Self {
        Self(milagro_bls::AggregatePublicKey::new())
    }

    pub fn add(&mut self, public_key: &PublicKey) {
        self.0.add(public_key.as_raw())
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }

    pub(crate) fn as_raw(&self) -> &milagro_bls::AggregatePublicKey {
        &self.0
    }
}

impl Default for AggregatePublicKey {
    fn default() -> Self {
        Self::new()
    }
}
