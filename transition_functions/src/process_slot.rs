use typenum::marker_traits::Unsigned;
use types::config::{Config, ChainSpec, ExpConst};
use types::primitives::{Slot, H256};

use error_utils::Error;
use metrics_core::{validator_status, MetricsSink};

use crate::cached_beacon_state::CachedBeaconState;
use crate::epochs::process_epoch;
use crate::fork_transition::upgrade_to_fork_at_current_slot;

/// The per-slot bookkeeping that runs for every slot a chain advances through, block or no block:
/// caches this slot's pre-mutation state root, backfills it into `latest_block_header` if a block
/// hasn't done so yet this slot, and caches the resulting block root.
pub fn process_slot<C: Config + ExpConst>(cached: &mut CachedBeaconState<C>) -> Result<(), Error> {
    let previous_state_root = cached.tree_hash_root_unchecked();
    let slot = cached.state().slot();
    let root_index = (slot % C::SlotsPerHistoricalRoot::to_u64()) as usize;

    {
        let state = cached.state_mut()?;
        state.state_roots_mut()[root_index] = previous_state_root;

        if state.latest_block_header().state_root == H256::zero() {
            state.latest_block_header_mut().state_root = previous_state_root;
        }
    }

    let previous_block_root = cached.state().latest_block_header().canonical_root();
    cached.state_mut()?.block_roots_mut()[root_index] = previous_block_root;
    Ok(())
}

/// Advances `cached` slot by slot up to and including `target_slot`, running epoch processing on
/// the last slot of each epoch (before the slot counter itself advances) and any fork upgrade
/// whose epoch boundary the new slot now starts, in that order — the only order that matches the
/// rest of the ecosystem's consensus-critical sequencing.
pub fn process_slots<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    target_slot: Slot,
    spec: &ChainSpec,
    metrics: Option<&dyn MetricsSink>,
) -> Result<(), Error> {
    let current_slot = cached.state().slot();
    if current_slot > target_slot {
        return Err(Error::SlotInPast {
            current: current_slot,
            target: target_slot,
        });
    }

    while cached.state().slot() < target_slot {
        process_slot(cached)?;

        let slot = cached.state().slot();
        if (slot + 1) % C::SLOTS_PER_EPOCH == 0 {
            let timer = metrics.map(|sink| sink.stfn_epoch_transition_start_timer());
            process_epoch::process_epoch(cached)?;
            if let Some(timer) = timer {
                timer.stop();
            }

            if let Some(sink) = metrics {
                let epoch = cached.state().get_current_epoch();
                let statuses: Vec<_> = cached
                    .state()
                    .validators()
                    .iter()
                    .map(|validator| validator_status(validator, epoch))
                    .collect();
                let balances: Vec<_> = cached.state().balances().iter().copied().collect();
                sink.register_validator_statuses(epoch, &statuses, &balances);
            }
        }

        cached.state_mut()?.set_slot(slot + 1);

        if spec.is_fork_boundary_epoch(cached.state().get_current_epoch())
            && cached.state().slot() == cached.state().compute_start_slot_of_epoch(cached.state().get_current_epoch())
        {
            upgrade_to_fork_at_current_slot(cached, spec)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::beacon_state::BeaconState;
    use types::config::MinimalConfig;

    #[test]
    fn process_slots_advances_slot_and_rejects_going_backwards() {
        let mut cached: CachedBeaconState<MinimalConfig> = CachedBeaconState::new(BeaconState::default());
        cached.set_caches_transient();
        let spec = ChainSpec::minimal();

        process_slots(&mut cached, 4, &spec, None).expect("advancing forward should succeed");
        assert_eq!(cached.state().slot(), 4);

        assert_eq!(
            process_slots(&mut cached, 1, &spec, None),
            Err(Error::SlotInPast {
                current: 4,
                target: 1,
            })
        );
    }

    #[test]
    fn process_slot_fills_in_latest_block_header_state_root_once() {
        let mut cached: CachedBeaconState<MinimalConfig> = CachedBeaconState::new(BeaconState::default());
        cached.set_caches_transient();

        process_slot(&mut cached).expect("process_slot should succeed");
        assert_ne!(cached.state().latest_block_header().state_root, H256::zero());
    }
}
