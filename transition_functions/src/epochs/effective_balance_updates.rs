use std::cmp;

use types::config::{Config, ExpConst};

use error_utils::Error;

use crate::cached_beacon_state::CachedBeaconState;

/// Re-derives every validator's effective balance from its actual balance with hysteresis: only
/// moves when the actual balance has drifted far enough from the current effective balance to
/// cross the down/up thresholds, so a validator's effective balance doesn't chase small reward
/// noise every epoch.
pub fn process_effective_balance_updates<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
) -> Result<(), Error> {
    let half_increment = C::effective_balance_increment() / 2;
    let state = cached.state_mut()?;
    let balances = state.balances().clone();

    for (index, validator) in state.validators_mut().iter_mut().enumerate() {
        let balance = balances[index];
        if balance + half_increment < validator.effective_balance
            || validator.effective_balance + 3 * half_increment < balance
        {
            validator.effective_balance = cmp::min(
                balance - balance % C::effective_balance_increment(),
                C::max_effective_balance(),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::beacon_state::BeaconState;
    use types::config::MinimalConfig;
    use types::types::Validator;

    #[test]
    fn process_effective_balance_updates_tracks_a_balance_increase_past_the_hysteresis_band() {
        let mut state: BeaconState<MinimalConfig> = BeaconState::default();
        *state.validators_mut() = vec![Validator {
            effective_balance: 30_000_000_000,
            ..Validator::default()
        }]
        .into();
        *state.balances_mut() = vec![32_000_000_000].into();

        let mut cached = CachedBeaconState::new(state);
        cached.set_caches_transient();
        process_effective_balance_updates(&mut cached).expect("should succeed");
        assert_eq!(cached.state().validators()[0].effective_balance, 32_000_000_000);
    }
}
