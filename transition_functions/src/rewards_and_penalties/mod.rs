pub mod altair;
pub mod phase0;

use types::beacon_state::BeaconState;
use types::config::{Config, ExpConst};

use error_utils::Error;

use crate::cached_beacon_state::CachedBeaconState;

/// Applies the current epoch's rewards and penalties, dispatching on fork: phase0 derives
/// participation from pending-attestation lists, Altair onward from participation-flag bytes and
/// an explicit inactivity score.
pub fn process_rewards_and_penalties<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
) -> Result<(), Error> {
    if cached.state().get_current_epoch() == C::genesis_epoch() {
        return Ok(());
    }

    let (rewards, penalties) = match cached.state() {
        BeaconState::Phase0(_) => phase0::attestation_deltas(cached.state())?,
        BeaconState::Altair(_) | BeaconState::Bellatrix(_) => altair::attestation_deltas(cached.state())?,
    };

    for (index, &reward) in rewards.iter().enumerate() {
        cached.increase_balance(index as u64, reward)?;
    }
    for (index, &penalty) in penalties.iter().enumerate() {
        cached.decrease_balance(index as u64, penalty)?;
    }

    Ok(())
}
