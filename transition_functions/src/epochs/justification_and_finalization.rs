use ssz_types::BitVector;
use types::beacon_state::BeaconState;
use types::config::{Config, ExpConst};
use types::consts::{self, TIMELY_TARGET_FLAG_INDEX};
use types::primitives::{Epoch, Gwei};
use types::types::Checkpoint;

use error_utils::Error;

use crate::attestations;
use crate::cached_beacon_state::{helper_error_to_stf, CachedBeaconState};

/// Weighs the previous and current epoch's FFG-target support against the active balance and
/// advances the justification/finalization checkpoints, the one sub-phase of epoch processing
/// whose algorithm is identical whether a validator's participation is tracked via pending
/// attestations (phase0) or participation-flag bytes (Altair onward) — only how the target
/// balance is summed differs.
pub fn process_justification_and_finalization<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
) -> Result<(), Error> {
    let current_epoch = cached.state().get_current_epoch();
    if current_epoch <= C::genesis_epoch() + 1 {
        return Ok(());
    }

    let previous_epoch = cached.state().get_previous_epoch();
    let total_active_balance = cached
        .state()
        .get_total_active_balance()
        .map_err(helper_error_to_stf)?;
    let previous_target_balance = matching_target_balance(cached.state(), previous_epoch)?;
    let current_target_balance = matching_target_balance(cached.state(), current_epoch)?;

    let old_previous_justified = cached.state().previous_justified_checkpoint();
    let old_current_justified = cached.state().current_justified_checkpoint();

    let mut bits = [false; 4];
    let old_bits = cached.state().justification_bits().clone();
    for i in 1..4 {
        bits[i] = old_bits.get(i - 1).unwrap_or(false);
    }

    if previous_target_balance * 3 >= total_active_balance * 2 {
        bits[1] = true;
        *cached.state_mut()?.current_justified_checkpoint_mut() = Checkpoint {
            epoch: previous_epoch,
            root: cached_block_root(cached, previous_epoch)?,
        };
    }
    if current_target_balance * 3 >= total_active_balance * 2 {
        bits[0] = true;
        *cached.state_mut()?.current_justified_checkpoint_mut() = Checkpoint {
            epoch: current_epoch,
            root: cached_block_root(cached, current_epoch)?,
        };
    }

    let mut new_bits = BitVector::<consts::JustificationBitsLength>::new();
    for (i, &bit) in bits.iter().enumerate() {
        new_bits
            .set(i, bit)
            .expect("justification bit index is always in range");
    }
    *cached.state_mut()?.justification_bits_mut() = new_bits;
    *cached.state_mut()?.previous_justified_checkpoint_mut() = old_current_justified;

    // Each rule is independent and unconditionally overwrites the finalized checkpoint, so when
    // more than one holds at once the later (more recent) rule wins.
    if bits[1] && bits[2] && bits[3] && old_previous_justified.epoch + 3 == current_epoch {
        *cached.state_mut()?.finalized_checkpoint_mut() = old_previous_justified;
    }
    if bits[1] && bits[2] && old_previous_justified.epoch + 2 == current_epoch {
        *cached.state_mut()?.finalized_checkpoint_mut() = old_previous_justified;
    }
    if bits[0] && bits[1] && bits[2] && old_current_justified.epoch + 2 == current_epoch {
        *cached.state_mut()?.finalized_checkpoint_mut() = old_current_justified;
    }
    if bits[0] && bits[1] && old_current_justified.epoch + 1 == current_epoch {
        *cached.state_mut()?.finalized_checkpoint_mut() = old_current_justified;
    }

    Ok(())
}

fn cached_block_root<C: Config + ExpConst>(
    cached: &CachedBeaconState<C>,
    epoch: Epoch,
) -> Result<types::primitives::H256, Error> {
    cached.state().get_block_root(epoch).map_err(helper_error_to_stf)
}

fn matching_target_balance<C: Config + ExpConst>(
    state: &BeaconState<C>,
    epoch: Epoch,
) -> Result<Gwei, Error> {
    match state {
        BeaconState::Phase0(_) => {
            let target_attestations = attestations::matching_target_attestations(state, epoch)?;
            attestations::attesting_balance(state, &target_attestations)
        }
        BeaconState::Altair(_) | BeaconState::Bellatrix(_) => {
            let current_epoch = state.get_current_epoch();
            let participation = if epoch == current_epoch {
                state.current_epoch_participation()
            } else {
                state.previous_epoch_participation()
            }
            .expect("altair and bellatrix states always carry participation flags");

            let indices: Vec<_> = state
                .validators()
                .iter()
                .enumerate()
                .zip(participation.iter())
                .filter(|((_, validator), &flags)| {
                    !validator.slashed && flags & (1 << TIMELY_TARGET_FLAG_INDEX) != 0
                })
                .map(|((index, _), _)| index as u64)
                .collect();

            state.get_total_balance(&indices).map_err(helper_error_to_stf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::config::MinimalConfig;

    #[test]
    fn process_justification_and_finalization_is_a_noop_before_epoch_two() {
        let mut cached: CachedBeaconState<MinimalConfig> = CachedBeaconState::new(BeaconState::default());
        cached.set_caches_transient();
        process_justification_and_finalization(&mut cached).expect("should succeed");
        assert_eq!(cached.state().current_justified_checkpoint().epoch, 0);
    }
}
