use bls::{AggregatePublicKey, Error as BlsError, PublicKey, PublicKeyBytes, Signature, SignatureBytes};
use ring::digest::{digest, SHA256};
use std::convert::TryInto;
use tree_hash::TreeHash;
use types::fork::ForkData;
use types::primitives::{Domain, DomainType, H256, Version};

pub fn hash(input: &[u8]) -> Vec<u8> {
    digest(&SHA256, input).as_ref().to_vec()
}

pub fn bls_verify(
    pubkey: &PublicKeyBytes,
    message: &[u8],
    signature: &SignatureBytes,
    domain: Domain,
) -> Result<bool, BlsError> {
    let public_key: PublicKey = pubkey.try_into()?;
    let signature: Signature = signature.try_into()?;

    Ok(signature.verify(message, domain.to_integer(), &public_key))
}

pub fn bls_aggregate_pubkeys(pubkeys: &[PublicKey]) -> AggregatePublicKey {
    let mut aggregated = AggregatePublicKey::new();
    for pubkey in pubkeys {
        aggregated.add(pubkey);
    }
    aggregated
}

/// Verifies one aggregate signature against every signer's public key over a single shared
/// message, as used for indexed attestations and sync aggregates.
pub fn bls_fast_aggregate_verify(
    pubkeys: &[PublicKey],
    message: &[u8],
    signature: &bls::AggregateSignature,
    domain: Domain,
) -> bool {
    let refs: Vec<&PublicKey> = pubkeys.iter().collect();
    signature.fast_aggregate_verify(message, domain.to_integer(), &refs)
}

/// Binds a signature domain to a specific fork version and to the chain's genesis, so a
/// signature valid on one chain can't replay on a different one sharing the same domain type.
pub fn compute_fork_data_root(current_version: Version, genesis_validators_root: H256) -> H256 {
    let fork_data = ForkData {
        current_version,
        genesis_validators_root,
    };
    H256::from_slice(&fork_data.tree_hash_root()[..])
}

/// The domain value mixed into every BLS signature's hash-to-curve input: the low 4 bytes of the
/// domain type concatenated with the high 4 bytes of the fork data root.
pub fn compute_domain(
    domain_type: DomainType,
    fork_version: Version,
    genesis_validators_root: H256,
) -> Domain {
    let fork_data_root = compute_fork_data_root(fork_version, genesis_validators_root);

    let mut bytes = [0u8; 8];
    bytes[..4].copy_from_slice(&domain_type.to_le_bytes());
    bytes[4..].copy_from_slice(&fork_data_root.as_bytes()[..4]);

    Domain::from(u64::from_le_bytes(bytes))
}
