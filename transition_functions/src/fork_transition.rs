use std::convert::TryInto;

use ssz_types::FixedVector;
use typenum::marker_traits::Unsigned;

use bls::{AggregatePublicKey, PublicKey, PublicKeyBytes};
use error_utils::Error;
use helper_functions::{
    beacon_state_accessors::get_seed,
    crypto::hash,
    math::int_to_bytes,
    misc::compute_shuffled_index,
};
use types::beacon_state::{BeaconState, BeaconStateAltair, BeaconStateBellatrix};
use types::config::{Config, ExpConst};
use types::fork::ForkName;
use types::primitives::*;
use types::types::{ExecutionPayloadHeader, SyncCommittee};

use crate::cached_beacon_state::CachedBeaconState;

/// Rewrites the state in place to the shape of the fork whose first epoch `state.slot()` now
/// falls on. A no-op if the current fork already matches, so callers can invoke it unconditionally
/// right after an epoch transition without checking first.
pub fn upgrade_to_fork_at_current_slot<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    spec: &types::config::ChainSpec,
) -> Result<(), Error> {
    let epoch = cached.state().get_current_epoch();
    let target = spec.fork_name_at_epoch(epoch);
    loop {
        let current = match cached.state() {
            BeaconState::Phase0(_) => ForkName::Phase0,
            BeaconState::Altair(_) => ForkName::Altair,
            BeaconState::Bellatrix(_) => ForkName::Bellatrix,
        };
        if current == target {
            return Ok(());
        }
        match current {
            ForkName::Phase0 => upgrade_to_altair(cached, spec)?,
            ForkName::Altair => upgrade_to_bellatrix(cached, spec)?,
            ForkName::Bellatrix => unreachable!("bellatrix has no further upgrade"),
        }
    }
}

fn upgrade_to_altair<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    spec: &types::config::ChainSpec,
) -> Result<(), Error> {
    let phase0 = match cached.state() {
        BeaconState::Phase0(state) => state.clone(),
        _ => unreachable!("upgrade_to_altair called on a non-phase0 state"),
    };

    let validator_count = phase0.validators.len();
    let current_epoch = phase0.slot / C::SLOTS_PER_EPOCH;
    let mut altair = BeaconStateAltair {
        genesis_time: phase0.genesis_time,
        genesis_validators_root: phase0.genesis_validators_root,
        slot: phase0.slot,
        fork: types::fork::Fork {
            previous_version: phase0.fork.current_version,
            current_version: spec.altair_fork_version,
            epoch: current_epoch,
        },
        latest_block_header: phase0.latest_block_header.clone(),
        block_roots: phase0.block_roots.clone(),
        state_roots: phase0.state_roots.clone(),
        historical_roots: phase0.historical_roots.clone(),
        eth1_data: phase0.eth1_data.clone(),
        eth1_data_votes: phase0.eth1_data_votes.clone(),
        eth1_deposit_index: phase0.eth1_deposit_index,
        validators: phase0.validators.clone(),
        balances: phase0.balances.clone(),
        randao_mixes: phase0.randao_mixes.clone(),
        slashings: phase0.slashings.clone(),
        justification_bits: phase0.justification_bits.clone(),
        previous_justified_checkpoint: phase0.previous_justified_checkpoint,
        current_justified_checkpoint: phase0.current_justified_checkpoint,
        finalized_checkpoint: phase0.finalized_checkpoint,
        previous_epoch_participation: vec![0u8; validator_count].into(),
        current_epoch_participation: vec![0u8; validator_count].into(),
        inactivity_scores: vec![0u64; validator_count].into(),
        current_sync_committee: SyncCommittee::default(),
        next_sync_committee: SyncCommittee::default(),
    };

    let committee = compute_sync_committee(&BeaconState::Altair(altair.clone()), current_epoch)?;
    altair.current_sync_committee = committee.clone();
    altair.next_sync_committee = committee;

    *cached.state_mut()? = BeaconState::Altair(altair);
    log::debug!("upgraded state to altair at epoch {}", current_epoch);
    Ok(())
}

fn upgrade_to_bellatrix<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    spec: &types::config::ChainSpec,
) -> Result<(), Error> {
    let altair = match cached.state() {
        BeaconState::Altair(state) => state.clone(),
        _ => unreachable!("upgrade_to_bellatrix called on a non-altair state"),
    };

    let current_epoch = altair.slot / C::SLOTS_PER_EPOCH;
    let bellatrix = BeaconStateBellatrix {
        genesis_time: altair.genesis_time,
        genesis_validators_root: altair.genesis_validators_root,
        slot: altair.slot,
        fork: types::fork::Fork {
            previous_version: altair.fork.current_version,
            current_version: spec.bellatrix_fork_version,
            epoch: current_epoch,
        },
        latest_block_header: altair.latest_block_header.clone(),
        block_roots: altair.block_roots.clone(),
        state_roots: altair.state_roots.clone(),
        historical_roots: altair.historical_roots.clone(),
        eth1_data: altair.eth1_data.clone(),
        eth1_data_votes: altair.eth1_data_votes.clone(),
        eth1_deposit_index: altair.eth1_deposit_index,
        validators: altair.validators.clone(),
        balances: altair.balances.clone(),
        randao_mixes: altair.randao_mixes.clone(),
        slashings: altair.slashings.clone(),
        justification_bits: altair.justification_bits.clone(),
        previous_justified_checkpoint: altair.previous_justified_checkpoint,
        current_justified_checkpoint: altair.current_justified_checkpoint,
        finalized_checkpoint: altair.finalized_checkpoint,
        previous_epoch_participation: altair.previous_epoch_participation.clone(),
        current_epoch_participation: altair.current_epoch_participation.clone(),
        inactivity_scores: altair.inactivity_scores.clone(),
        current_sync_committee: altair.current_sync_committee.clone(),
        next_sync_committee: altair.next_sync_committee.clone(),
        latest_execution_payload_header: ExecutionPayloadHeader::default(),
    };

    *cached.state_mut()? = BeaconState::Bellatrix(bellatrix);
    log::debug!("upgraded state to bellatrix at epoch {}", current_epoch);
    Ok(())
}

/// Selects the next period's sync committee by effective-balance-weighted sampling over the
/// active set, the same acceptance rule `get_beacon_proposer_index` uses, run
/// `SyncCommitteeSize` times against the sync-committee domain's seed.
pub(crate) fn compute_sync_committee<C: Config + ExpConst>(
    state: &BeaconState<C>,
    epoch: Epoch,
) -> Result<SyncCommittee<C>, Error> {
    let active_indices = state.get_active_validator_indices(epoch);
    if active_indices.is_empty() {
        return Ok(SyncCommittee::default());
    }
    let seed = get_seed(state, epoch, C::domain_sync_committee())
        .map_err(crate::cached_beacon_state::helper_error_to_stf)?;
    let count = active_indices.len() as u64;

    const MAX_RANDOM_BYTE: u64 = 255;
    let size = C::SyncCommitteeSize::to_usize();
    let mut sync_indices = Vec::with_capacity(size);
    let mut i: u64 = 0;
    while sync_indices.len() < size {
        let shuffled = compute_shuffled_index::<C>(i % count, count, seed)
            .map_err(crate::cached_beacon_state::helper_error_to_stf)?;
        let candidate_index = active_indices[shuffled as usize];

        let mut hash_input = seed.as_bytes().to_vec();
        hash_input.extend_from_slice(&int_to_bytes(i / 32, 8));
        let random_byte = u64::from(hash(&hash_input)[(i % 32) as usize]);

        let effective_balance = state.validators()[candidate_index as usize].effective_balance;
        if effective_balance * MAX_RANDOM_BYTE >= C::max_effective_balance() * random_byte {
            sync_indices.push(candidate_index);
        }
        i += 1;
    }

    let pubkeys: Vec<PublicKeyBytes> = sync_indices
        .iter()
        .map(|&index| state.validators()[index as usize].pubkey.clone())
        .collect();

    let mut aggregate = AggregatePublicKey::new();
    for pubkey_bytes in &pubkeys {
        let pubkey: PublicKey = pubkey_bytes
            .try_into()
            .map_err(|_| Error::InvalidOperation {
                kind: error_utils::OperationKind::Deposit,
                reason: "invalid public key while computing sync committee".to_owned(),
            })?;
        aggregate.add(&pubkey);
    }
    let aggregate_pubkey = PublicKeyBytes::from_bytes(&aggregate.as_bytes()).map_err(|_| {
        Error::InvalidOperation {
            kind: error_utils::OperationKind::Deposit,
            reason: "failed to encode aggregate sync committee public key".to_owned(),
        }
    })?;

    Ok(SyncCommittee {
        pubkeys: FixedVector::from(pubkeys),
        aggregate_pubkey,
    })
}
