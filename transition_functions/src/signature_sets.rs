use std::convert::TryInto;

use bls::{AggregateSignature, PublicKey, SignatureBytes};
use tree_hash::TreeHash;
use types::primitives::{Domain, H256};

use error_utils::{Error, SignatureSetKind};

/// Wraps one already-signed `SignatureBytes` as an `AggregateSignature` of one signer, the shape
/// every `SignatureSet` needs regardless of whether the underlying operation had one signer or
/// many. Malformed bytes are treated as an immediate verification failure rather than a separate
/// error category — either way the signature doesn't check out.
pub fn aggregate_from_bytes(
    signature_bytes: &SignatureBytes,
    kind: SignatureSetKind,
    index: usize,
) -> Result<AggregateSignature, Error> {
    let signature: bls::Signature = signature_bytes
        .try_into()
        .map_err(|_err| Error::InvalidSignature { kind, index })?;
    let mut aggregate = AggregateSignature::new();
    aggregate.add(&signature);
    Ok(aggregate)
}

/// The message a signature is actually taken over. This crate's BLS layer mixes the domain into
/// the hash-to-curve input at verification time (see `bls::Signature::verify`) rather than into
/// an SSZ-wrapped signing root, so the signed message is simply the object's own hash-tree-root;
/// the domain travels alongside it as its own `SignatureSet` field.
pub fn signing_message<T: TreeHash>(ssz_object: &T) -> H256 {
    H256::from_slice(&ssz_object.tree_hash_root())
}

/// One not-yet-verified signature set pulled out of a block during processing: a signing root,
/// the domain it was signed under, the public key(s) that should have produced it, and the
/// signature itself (already an `AggregateSignature` even for single-signer sets, since the
/// underlying curve type is the same either way).
pub struct SignatureSet {
    pub kind: SignatureSetKind,
    pub index: usize,
    pub pubkeys: Vec<PublicKey>,
    pub message: H256,
    pub domain: Domain,
    pub signature: AggregateSignature,
}

/// Accumulates every signature set a block's operations produce so they can be checked together
/// at a single join point rather than as each operation is processed, matching the requirement
/// that signature failure never leaves partial state mutation visible.
#[derive(Default)]
pub struct SignatureSetCollector {
    sets: Vec<SignatureSet>,
}

impl SignatureSetCollector {
    pub fn new() -> Self {
        Self { sets: Vec::new() }
    }

    pub fn push(
        &mut self,
        kind: SignatureSetKind,
        pubkeys: Vec<PublicKey>,
        message: H256,
        domain: Domain,
        signature: AggregateSignature,
    ) {
        let index = self.sets.iter().filter(|set| set.kind == kind).count();
        self.sets.push(SignatureSet {
            kind,
            index,
            pubkeys,
            message,
            domain,
            signature,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Verifies every collected set, in order, stopping at (and reporting) the first one that
    /// fails. Sets sharing a kind and domain could in principle be pairing-batched together, but
    /// checking sequentially keeps the deterministic single-threaded path simple and gives exact
    /// bisection diagnostics for free; batching is an optimization this crate doesn't need to
    /// take for correctness.
    pub fn verify_all(&self) -> Result<(), Error> {
        for set in &self.sets {
            let pubkey_refs: Vec<&PublicKey> = set.pubkeys.iter().collect();
            let verified = set
                .signature
                .fast_aggregate_verify(set.message.as_bytes(), set.domain.to_integer(), &pubkey_refs);
            if !verified {
                return Err(Error::InvalidSignature {
                    kind: set.kind,
                    index: set.index,
                });
            }
        }
        Ok(())
    }
}
