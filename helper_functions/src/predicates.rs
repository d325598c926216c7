use std::convert::TryFrom;

use bls::PublicKey;
use tree_hash::TreeHash;
use typenum::marker_traits::Unsigned;
use types::{
    beacon_state::BeaconState,
    config::{Config, ExpConst},
    primitives::*,
    types::{AttestationData, IndexedAttestation, Validator},
};

use crate::{
    beacon_state_accessors::get_domain,
    crypto::{bls_fast_aggregate_verify, hash},
    error::Error,
};

pub fn is_slashable_validator(validator: &Validator, epoch: Epoch) -> bool {
    !validator.slashed
        && validator.activation_epoch <= epoch
        && epoch < validator.withdrawable_epoch
}

pub fn is_active_validator(validator: &Validator, epoch: Epoch) -> bool {
    validator.activation_epoch <= epoch && epoch < validator.exit_epoch
}

pub fn is_slashable_attestation_data(data_1: &AttestationData, data_2: &AttestationData) -> bool {
    // Double vote
    (data_1 != data_2 && data_1.target.epoch == data_2.target.epoch) ||
    // Surround vote
    (data_1.source.epoch < data_2.source.epoch && data_2.target.epoch < data_1.target.epoch)
}

/// Validates an indexed attestation's index list shape and its aggregate BLS signature. Replaces
/// the custody-bit scheme from the original sharding design: attesters now sign a single set of
/// indices, with no bit-0/bit-1 split.
pub fn is_valid_indexed_attestation<C: Config + ExpConst>(
    state: &BeaconState<C>,
    indexed_attestation: &IndexedAttestation<C>,
) -> Result<(), Error> {
    let indices = &indexed_attestation.attesting_indices;

    if indices.is_empty() {
        return Err(Error::ArrayIsEmpty);
    }
    if indices.len() > C::MaxValidatorsPerCommittee::to_usize() {
        return Err(Error::IndicesExceedMaxValidators);
    }
    if !indices.windows(2).all(|pair| pair[0] < pair[1]) {
        return Err(Error::IndicesNotSorted);
    }

    let validators = state.validators();
    let mut pubkeys = Vec::with_capacity(indices.len());
    for &index in indices.iter() {
        let validator_index =
            usize::try_from(index).map_err(|_err| Error::ConversionToUsize)?;
        let validator = validators.get(validator_index).ok_or(Error::IndexOutOfRange)?;
        let pubkey = PublicKey::try_from(&validator.pubkey)
            .map_err(|_err| Error::PubKeyConversionError)?;
        pubkeys.push(pubkey);
    }

    let domain = get_domain(
        state,
        C::domain_beacon_attester(),
        Some(indexed_attestation.data.target.epoch),
    );
    let signing_root = indexed_attestation.data.tree_hash_root();
    let signature = bls::AggregateSignature::try_from(&indexed_attestation.signature)
        .map_err(|_err| Error::SignatureConversionError)?;

    if !bls_fast_aggregate_verify(&pubkeys, &signing_root, &signature, domain) {
        return Err(Error::InvalidSignature);
    }

    Ok(())
}

pub fn is_valid_merkle_branch(
    leaf: &H256,
    branch: &[H256],
    depth: u64,
    index: u64,
    root: &H256,
) -> bool {
    let mut value: H256 = *leaf;

    for i in 0..depth {
        if (index / (1 << i)) % 2 == 0 {
            value = H256::from_slice(&hash(&join_hashes(&value, &branch[i as usize])));
        } else {
            value = H256::from_slice(&hash(&join_hashes(&branch[i as usize], &value)));
        }
    }

    value == *root
}

fn join_hashes<'a>(hash1: &'a H256, hash2: &H256) -> Vec<u8> {
    hash1
        .as_bytes()
        .iter()
        .chain(hash2.as_bytes())
        .copied()
        .collect::<Vec<u8>>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssz_types::VariableList;
    use types::config::MainnetConfig;
    use types::types::Checkpoint;

    #[test]
    fn test_is_slashable_validator() {
        let v = Validator {
            slashed: false,
            activation_epoch: 0,
            withdrawable_epoch: 1,
            ..Validator::default()
        };
        assert_eq!(is_slashable_validator(&v, 0), true);
    }

    #[test]
    fn test_is_slashable_validator_already_slashed() {
        let v = Validator {
            slashed: true,
            activation_epoch: 0,
            withdrawable_epoch: 1,
            ..Validator::default()
        };
        assert_eq!(is_slashable_validator(&v, 0), false);
    }

    #[test]
    fn test_is_active_validator() {
        let v = Validator {
            activation_epoch: 0,
            exit_epoch: 1,
            ..Validator::default()
        };
        assert_eq!(is_active_validator(&v, 0), true);
    }

    #[test]
    fn test_is_active_validator_activation_epoch_greater_than_epoch() {
        let v = Validator {
            activation_epoch: 1,
            exit_epoch: 2,
            ..Validator::default()
        };
        assert_eq!(is_active_validator(&v, 0), false);
    }

    #[test]
    fn test_is_slashable_attestation_data_double_vote_true() {
        let attestation_data_1 = AttestationData {
            target: Checkpoint {
                epoch: 1,
                root: H256::from([0; 32]),
            },
            ..AttestationData::default()
        };
        let attestation_data_2 = AttestationData {
            target: Checkpoint {
                epoch: 1,
                root: H256::from([1; 32]),
            },
            ..AttestationData::default()
        };
        assert_eq!(
            is_slashable_attestation_data(&attestation_data_1, &attestation_data_2),
            true
        );
    }

    #[test]
    fn test_is_slashable_attestation_data_surround_vote_true() {
        let attestation_data_1 = AttestationData {
            source: Checkpoint {
                epoch: 0,
                root: H256::from([0; 32]),
            },
            target: Checkpoint {
                epoch: 3,
                root: H256::from([0; 32]),
            },
            ..AttestationData::default()
        };
        let attestation_data_2 = AttestationData {
            source: Checkpoint {
                epoch: 1,
                root: H256::from([1; 32]),
            },
            target: Checkpoint {
                epoch: 2,
                root: H256::from([0; 32]),
            },
            ..AttestationData::default()
        };
        assert_eq!(
            is_slashable_attestation_data(&attestation_data_1, &attestation_data_2),
            true
        );
    }

    #[test]
    fn test_is_valid_indexed_attestation_empty_indices() {
        let state: BeaconState<MainnetConfig> = BeaconState::default();
        let attestation: IndexedAttestation<MainnetConfig> = IndexedAttestation::default();
        assert_eq!(
            is_valid_indexed_attestation(&state, &attestation),
            Err(Error::ArrayIsEmpty),
        );
    }

    #[test]
    fn test_is_valid_indexed_attestation_too_many_indices() {
        let state: BeaconState<MainnetConfig> = BeaconState::default();
        let too_many: Vec<u64> = (0_u64..3000_u64).collect();
        let attestation: IndexedAttestation<MainnetConfig> = IndexedAttestation {
            attesting_indices: VariableList::from(too_many),
            ..IndexedAttestation::default()
        };
        assert_eq!(
            is_valid_indexed_attestation(&state, &attestation),
            Err(Error::IndicesExceedMaxValidators),
        );
    }

    #[test]
    fn test_is_valid_indexed_attestation_indices_not_sorted() {
        let state: BeaconState<MainnetConfig> = BeaconState::default();
        let attestation: IndexedAttestation<MainnetConfig> = IndexedAttestation {
            attesting_indices: VariableList::from(vec![2_u64, 1_u64]),
            ..IndexedAttestation::default()
        };
        assert_eq!(
            is_valid_indexed_attestation(&state, &attestation),
            Err(Error::IndicesNotSorted),
        );
    }

    #[test]
    fn test_is_valid_merkle_branch_single_sibling() {
        let leaf = H256::from([1; 32]);
        let sibling = H256::from([2; 32]);
        let root = H256::from_slice(&hash(&join_hashes(&leaf, &sibling)));

        assert!(is_valid_merkle_branch(&leaf, &[sibling], 1, 0, &root));
    }

    #[test]
    fn test_is_valid_merkle_branch_rejects_wrong_root() {
        let leaf = H256::from([1; 32]);
        let sibling = H256::from([2; 32]);
        let wrong_root = H256::from([9; 32]);

        assert!(!is_valid_merkle_branch(&leaf, &[sibling], 1, 0, &wrong_root));
    }
}
