use std::collections::BTreeSet;

use helper_functions::beacon_state_accessors::get_attesting_indices;
use helper_functions::math::integer_squareroot;
use types::beacon_state::BeaconState;
use types::config::{Config, ExpConst};
use types::consts::{TIMELY_HEAD_FLAG_INDEX, TIMELY_SOURCE_FLAG_INDEX, TIMELY_TARGET_FLAG_INDEX};
use types::primitives::{Epoch, Gwei, ValidatorIndex};
use types::types::{AttestationData, PendingAttestation};

use error_utils::Error;

use crate::cached_beacon_state::helper_error_to_stf;

/// Phase0's own attestation bookkeeping: before Altair, a validator's epoch participation is
/// reconstructed from the list of `PendingAttestation`s the state accumulated rather than tracked
/// as a running set of flags, so rewards processing has to re-derive "did this validator attest
/// to the right source/target/head" by re-walking that list every epoch.
pub fn matching_source_attestations<C: Config + ExpConst>(
    state: &BeaconState<C>,
    epoch: Epoch,
) -> Result<Vec<PendingAttestation<C>>, Error> {
    let current_epoch = state.get_current_epoch();
    let previous_epoch = state.get_previous_epoch();
    if epoch != current_epoch && epoch != previous_epoch {
        return Err(Error::InvalidOperation {
            kind: error_utils::OperationKind::Attestation,
            reason: "matching_source_attestations called with neither current nor previous epoch".to_owned(),
        });
    }

    let attestations = if epoch == current_epoch {
        state.current_epoch_attestations()
    } else {
        state.previous_epoch_attestations()
    };

    Ok(attestations
        .expect("phase0 state always carries pending-attestation lists")
        .iter()
        .cloned()
        .collect())
}

pub fn matching_target_attestations<C: Config + ExpConst>(
    state: &BeaconState<C>,
    epoch: Epoch,
) -> Result<Vec<PendingAttestation<C>>, Error> {
    let block_root = state.get_block_root(epoch).map_err(helper_error_to_stf)?;
    Ok(matching_source_attestations(state, epoch)?
        .into_iter()
        .filter(|attestation| attestation.data.target.root == block_root)
        .collect())
}

pub fn matching_head_attestations<C: Config + ExpConst>(
    state: &BeaconState<C>,
    epoch: Epoch,
) -> Result<Vec<PendingAttestation<C>>, Error> {
    let mut head_attestations = Vec::new();
    for attestation in matching_source_attestations(state, epoch)? {
        let block_root = state
            .get_block_root_at_slot(attestation.data.slot)
            .map_err(helper_error_to_stf)?;
        if attestation.data.beacon_block_root == block_root {
            head_attestations.push(attestation);
        }
    }
    Ok(head_attestations)
}

pub fn unslashed_attesting_indices<C: Config + ExpConst>(
    state: &BeaconState<C>,
    attestations: &[PendingAttestation<C>],
) -> Result<BTreeSet<ValidatorIndex>, Error> {
    let mut output = BTreeSet::new();
    for attestation in attestations {
        let indices = get_attesting_indices(state, &attestation.data, &attestation.aggregation_bits)
            .map_err(helper_error_to_stf)?;
        for index in indices {
            if !state.validators()[index as usize].slashed {
                output.insert(index);
            }
        }
    }
    Ok(output)
}

pub fn attesting_balance<C: Config + ExpConst>(
    state: &BeaconState<C>,
    attestations: &[PendingAttestation<C>],
) -> Result<Gwei, Error> {
    let indices: Vec<ValidatorIndex> = unslashed_attesting_indices(state, attestations)?
        .into_iter()
        .collect();
    state.get_total_balance(&indices).map_err(helper_error_to_stf)
}

/// Which of source/target/head an attestation matched, expressed as the participation-flag
/// indices Altair pays a reward for. A later match implies every earlier one: head implies
/// target implies source, so each later check is gated on the earlier one having already held.
pub fn attestation_participation_flag_indices<C: Config + ExpConst>(
    state: &BeaconState<C>,
    data: &AttestationData,
    inclusion_delay: u64,
) -> Result<Vec<usize>, Error> {
    let justified_checkpoint = if data.target.epoch == state.get_current_epoch() {
        state.current_justified_checkpoint()
    } else {
        state.previous_justified_checkpoint()
    };

    let is_matching_source = data.source == justified_checkpoint;
    let is_matching_target = is_matching_source
        && data.target.root == state.get_block_root(data.target.epoch).map_err(helper_error_to_stf)?;
    let is_matching_head = is_matching_target
        && data.beacon_block_root
            == state.get_block_root_at_slot(data.slot).map_err(helper_error_to_stf)?;

    let mut indices = Vec::new();
    if is_matching_source && inclusion_delay <= integer_squareroot(C::SLOTS_PER_EPOCH) {
        indices.push(TIMELY_SOURCE_FLAG_INDEX);
    }
    if is_matching_target && inclusion_delay <= C::SLOTS_PER_EPOCH {
        indices.push(TIMELY_TARGET_FLAG_INDEX);
    }
    if is_matching_head && inclusion_delay == C::min_attestation_inclusion_delay() {
        indices.push(TIMELY_HEAD_FLAG_INDEX);
    }
    Ok(indices)
}
