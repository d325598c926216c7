use ssz_types::VariableList;
use tree_hash::TreeHash;
use typenum::marker_traits::Unsigned;
use types::beacon_state::BeaconState;
use types::config::{Config, ExpConst};
use types::primitives::H256;
use types::types::HistoricalBatch;

use error_utils::Error;

use crate::cached_beacon_state::{helper_error_to_stf, CachedBeaconState};
use crate::fork_transition::compute_sync_committee;

/// The grab-bag of bookkeeping that resets or rotates once per epoch regardless of fork: eth1
/// vote tally, the slashings and randao-mix ring buffers, the historical-roots accumulator, each
/// validator's rolling participation record, and — from Altair on — the sync committee period.
pub fn process_final_updates<C: Config + ExpConst>(cached: &mut CachedBeaconState<C>) -> Result<(), Error> {
    let current_epoch = cached.state().get_current_epoch();
    let next_epoch = current_epoch + 1;
    let slot = cached.state().slot();

    if (slot + 1) % C::SlotsPerEth1VotingPeriod::to_u64() == 0 {
        *cached.state_mut()?.eth1_data_votes_mut() = VariableList::from(vec![]);
    }

    let slashings_index = (next_epoch % C::EpochsPerSlashingsVector::to_u64()) as usize;
    cached.state_mut()?.slashings_mut()[slashings_index] = 0;

    let randao_mix = cached.state().get_randao_mix(current_epoch).map_err(helper_error_to_stf)?;
    let randao_index = (next_epoch % C::EpochsPerHistoricalVector::to_u64()) as usize;
    cached.state_mut()?.randao_mixes_mut()[randao_index] = randao_mix;

    if next_epoch % (C::SlotsPerHistoricalRoot::to_u64() / C::SLOTS_PER_EPOCH) == 0 {
        let historical_batch = {
            let state = cached.state_mut()?;
            HistoricalBatch::<C> {
                block_roots: state.block_roots_mut().clone(),
                state_roots: state.state_roots_mut().clone(),
            }
        };
        let root = H256::from_slice(&historical_batch.tree_hash_root());
        cached
            .state_mut()?
            .historical_roots_mut()
            .push(root)
            .map_err(|_err| Error::InvalidOperation {
                kind: error_utils::OperationKind::Attestation,
                reason: "historical roots accumulator is full".to_owned(),
            })?;
    }

    rotate_participation_record(cached)?;

    if next_epoch % C::EPOCHS_PER_SYNC_COMMITTEE_PERIOD == 0 {
        update_sync_committees(cached)?;
    }

    Ok(())
}

fn rotate_participation_record<C: Config + ExpConst>(cached: &mut CachedBeaconState<C>) -> Result<(), Error> {
    match cached.state() {
        BeaconState::Phase0(_) => {
            let state = cached.state_mut()?;
            let current = std::mem::replace(
                state.current_epoch_attestations_mut().expect("phase0 state carries pending attestations"),
                VariableList::from(vec![]),
            );
            *state.previous_epoch_attestations_mut().expect("phase0 state carries pending attestations") = current;
        }
        BeaconState::Altair(_) | BeaconState::Bellatrix(_) => {
            let validator_count = cached.state().validators().len();
            let state = cached.state_mut()?;
            let current = std::mem::replace(
                state
                    .current_epoch_participation_mut()
                    .expect("altair and bellatrix states carry participation flags"),
                vec![0u8; validator_count].into(),
            );
            *state
                .previous_epoch_participation_mut()
                .expect("altair and bellatrix states carry participation flags") = current;
        }
    }

    Ok(())
}

fn update_sync_committees<C: Config + ExpConst>(cached: &mut CachedBeaconState<C>) -> Result<(), Error> {
    if matches!(cached.state(), BeaconState::Phase0(_)) {
        return Ok(());
    }

    let next_epoch = cached.state().get_current_epoch() + 1;
    let next_sync_committee = cached
        .state()
        .next_sync_committee()
        .expect("altair and bellatrix states carry a next sync committee")
        .clone();
    let following_committee = compute_sync_committee(cached.state(), next_epoch)?;
    cached.state_mut()?.set_sync_committees(next_sync_committee, following_committee);

    Ok(())
}
