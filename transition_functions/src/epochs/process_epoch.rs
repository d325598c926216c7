use types::config::{Config, ExpConst};

use error_utils::Error;

use crate::cached_beacon_state::CachedBeaconState;
use crate::epochs::{
    effective_balance_updates, final_updates, inactivity_updates, justification_and_finalization,
    registry_updates, slashings,
};
use crate::rewards_and_penalties;

/// Runs the ten epoch-processing sub-phases in the one order the rest of the ecosystem relies on:
/// justification/finalization before rewards (so the leak condition they share is settled first),
/// rewards before registry updates (so the exit queue sees this epoch's balances), and the
/// grab-bag of per-epoch resets last so every other phase still sees last epoch's bookkeeping.
pub fn process_epoch<C: Config + ExpConst>(cached: &mut CachedBeaconState<C>) -> Result<(), Error> {
    justification_and_finalization::process_justification_and_finalization(cached)?;
    inactivity_updates::process_inactivity_updates(cached)?;
    rewards_and_penalties::process_rewards_and_penalties(cached)?;
    registry_updates::process_registry_updates(cached)?;
    slashings::process_slashings(cached)?;
    effective_balance_updates::process_effective_balance_updates(cached)?;
    final_updates::process_final_updates(cached)?;
    Ok(())
}
