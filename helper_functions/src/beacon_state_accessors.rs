use std::cmp;
use std::collections::BTreeSet;

use ssz_types::BitList;
use typenum::marker_traits::Unsigned;
use types::{
    beacon_state::BeaconState,
    config::{Config, ExpConst},
    primitives::*,
    types::{Attestation, AttestationData, IndexedAttestation},
};

use crate::{
    crypto::{compute_domain, hash},
    error::Error,
    math::{int_to_bytes, int_to_bytes_32},
    misc::{compute_committee, compute_epoch_at_slot, compute_shuffled_index},
};

/// The randomness a fork-choice epoch's shuffling, proposer selection, and attester selection
/// are all derived from: one RANDAO mix, domain-separated and epoch-separated, hashed once.
pub fn get_seed<C: Config + ExpConst>(
    state: &BeaconState<C>,
    epoch: Epoch,
    domain_type: DomainType,
) -> Result<H256, Error> {
    let lookback = C::EpochsPerHistoricalVector::to_u64() - C::min_seed_lookahead() - 1;
    let mix = state.get_randao_mix(epoch + lookback)?;

    let mut seed = Vec::new();
    seed.extend_from_slice(&int_to_bytes_32(domain_type, 4));
    seed.extend_from_slice(&int_to_bytes(epoch, 8));
    seed.extend_from_slice(mix.as_bytes());

    Ok(H256::from_slice(&hash(&seed)))
}

pub fn get_committee_count_per_slot<C: Config + ExpConst>(
    state: &BeaconState<C>,
    epoch: Epoch,
) -> u64 {
    let active_validator_count = state.get_active_validator_indices(epoch).len() as u64;

    cmp::max(
        1,
        cmp::min(
            C::max_committees_per_slot(),
            active_validator_count / C::SLOTS_PER_EPOCH / C::target_committee_size(),
        ),
    )
}

pub fn get_beacon_committee<C: Config + ExpConst>(
    state: &BeaconState<C>,
    slot: Slot,
    committee_index: CommitteeIndex,
) -> Result<Vec<ValidatorIndex>, Error> {
    let epoch = compute_epoch_at_slot::<C>(slot);
    let committees_per_slot = get_committee_count_per_slot(state, epoch);
    let indices = state.get_active_validator_indices(epoch);
    let seed = get_seed(state, epoch, C::domain_beacon_attester())?;

    let index = (slot % C::SLOTS_PER_EPOCH) * committees_per_slot + committee_index;
    let count = committees_per_slot * C::SLOTS_PER_EPOCH;

    compute_committee::<C>(&indices, &seed, index, count)
}

/// The fork-relative signature domain a message of `domain_type` should be signed/verified
/// under. `message_epoch` lets callers compute the domain for a message about a different epoch
/// than the state's current one (e.g. a voluntary exit that only activates in the future).
pub fn get_domain<C: Config + ExpConst>(
    state: &BeaconState<C>,
    domain_type: DomainType,
    message_epoch: Option<Epoch>,
) -> Domain {
    let epoch = message_epoch.unwrap_or_else(|| state.get_current_epoch());
    let fork = state.fork();
    let fork_version = if epoch < fork.epoch {
        fork.previous_version
    } else {
        fork.current_version
    };

    compute_domain(domain_type, fork_version, state.genesis_validators_root())
}

pub fn get_attesting_indices<C: Config + ExpConst>(
    state: &BeaconState<C>,
    data: &AttestationData,
    bits: &BitList<C::MaxValidatorsPerCommittee>,
) -> Result<BTreeSet<ValidatorIndex>, Error> {
    let committee = get_beacon_committee(state, data.slot, data.index)?;
    if bits.len() != committee.len() {
        return Err(Error::AttestationBitsInvalid);
    }

    Ok(committee
        .iter()
        .enumerate()
        .filter_map(|(i, index)| match bits.get(i) {
            Ok(true) => Some(*index),
            _ => None,
        })
        .collect())
}

pub fn get_indexed_attestation<C: Config + ExpConst>(
    state: &BeaconState<C>,
    attestation: &Attestation<C>,
) -> Result<IndexedAttestation<C>, Error> {
    let attesting_indices = get_attesting_indices(state, &attestation.data, &attestation.aggregation_bits)?;

    Ok(IndexedAttestation {
        attesting_indices: attesting_indices.into_iter().collect::<Vec<_>>().into(),
        data: attestation.data.clone(),
        signature: attestation.signature.clone(),
    })
}

/// Weighted-by-effective-balance sampling over a shuffled candidate list: the validator a
/// candidate index names is accepted with probability proportional to its effective balance.
fn compute_proposer_index<C: Config + ExpConst>(
    state: &BeaconState<C>,
    indices: &[ValidatorIndex],
    seed: H256,
) -> Result<ValidatorIndex, Error> {
    if indices.is_empty() {
        return Err(Error::ArrayIsEmpty);
    }

    const MAX_RANDOM_BYTE: u64 = 255;
    let total = indices.len() as u64;
    let mut i: u64 = 0;

    loop {
        let shuffled = compute_shuffled_index::<C>(i % total, total, seed)?;
        let candidate_index = indices[shuffled as usize];

        let mut hash_input = seed.as_bytes().to_vec();
        hash_input.extend_from_slice(&int_to_bytes(i / 32, 8));
        let random_byte = u64::from(hash(&hash_input)[(i % 32) as usize]);

        let effective_balance = state.validators()[candidate_index as usize].effective_balance;
        if effective_balance * MAX_RANDOM_BYTE >= C::max_effective_balance() * random_byte {
            return Ok(candidate_index);
        }
        i += 1;
    }
}

pub fn get_beacon_proposer_index<C: Config + ExpConst>(
    state: &BeaconState<C>,
) -> Result<ValidatorIndex, Error> {
    let epoch = state.get_current_epoch();
    let mut seed_input = get_seed(state, epoch, C::domain_beacon_proposer())?
        .as_bytes()
        .to_vec();
    seed_input.extend_from_slice(&int_to_bytes(state.slot(), 8));
    let seed = H256::from_slice(&hash(&seed_input));

    compute_proposer_index(state, &state.get_active_validator_indices(epoch), seed)
}
