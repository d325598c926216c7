use types::beacon_state::BeaconState;
use types::config::{Config, ExpConst};
use types::consts::{INACTIVITY_SCORE_BIAS, INACTIVITY_SCORE_RECOVERY_RATE, TIMELY_TARGET_FLAG_INDEX};

use error_utils::Error;

use crate::cached_beacon_state::CachedBeaconState;

/// Altair onward tracks a per-validator inactivity score instead of leaning solely on the
/// quadratic leak: a validator that kept voting for the right target during a non-finalizing
/// period has its score walked back down; one that didn't has it bumped up. A no-op before
/// Altair, since phase0 states carry no inactivity scores at all.
pub fn process_inactivity_updates<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
) -> Result<(), Error> {
    if matches!(cached.state(), BeaconState::Phase0(_)) {
        return Ok(());
    }

    let current_epoch = cached.state().get_current_epoch();
    if current_epoch == C::genesis_epoch() {
        return Ok(());
    }

    let previous_epoch = cached.state().get_previous_epoch();
    let finality_delay = previous_epoch - cached.state().finalized_checkpoint().epoch;
    let in_inactivity_leak = finality_delay > C::min_epochs_to_inactivity_penalty();

    let participation = cached
        .state()
        .previous_epoch_participation()
        .expect("altair and bellatrix states always carry participation flags")
        .clone();

    let eligible_indices: Vec<usize> = cached
        .state()
        .validators()
        .iter()
        .enumerate()
        .filter(|(_, validator)| {
            validator.is_active_at(previous_epoch) || (validator.slashed && previous_epoch + 1 < validator.withdrawable_epoch)
        })
        .map(|(index, _)| index)
        .collect();

    let state = cached.state_mut()?;
    let scores = state
        .inactivity_scores_mut()
        .expect("altair and bellatrix states always carry inactivity scores");

    for index in eligible_indices {
        let timely_target = participation[index] & (1 << TIMELY_TARGET_FLAG_INDEX) != 0;
        if timely_target {
            scores[index] = scores[index].saturating_sub(1);
        } else {
            scores[index] += INACTIVITY_SCORE_BIAS;
        }

        if !in_inactivity_leak {
            scores[index] = scores[index].saturating_sub(INACTIVITY_SCORE_RECOVERY_RATE.min(scores[index]));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::config::MinimalConfig;
    use types::types::Validator;

    fn altair_state_with_one_validator() -> BeaconState<MinimalConfig> {
        let mut state = BeaconState::Altair(types::beacon_state::BeaconStateAltair::default());
        *state.validators_mut() = vec![Validator {
            exit_epoch: types::consts::FAR_FUTURE_EPOCH,
            ..Validator::default()
        }]
        .into();
        *state.balances_mut() = vec![MinimalConfig::max_effective_balance()].into();
        *state.current_epoch_participation_mut().unwrap() = vec![0u8].into();
        *state.previous_epoch_participation_mut().unwrap() = vec![0u8].into();
        *state.inactivity_scores_mut().unwrap() = vec![0u64].into();
        state
    }

    #[test]
    fn process_inactivity_updates_penalizes_validators_missing_the_target() {
        let mut cached = CachedBeaconState::new(altair_state_with_one_validator());
        cached.set_caches_transient();
        process_inactivity_updates(&mut cached).expect("should succeed");
        assert_eq!(cached.state().inactivity_scores().unwrap()[0], INACTIVITY_SCORE_BIAS);
    }

    #[test]
    fn process_inactivity_updates_is_a_noop_for_phase0() {
        let mut cached: CachedBeaconState<MinimalConfig> = CachedBeaconState::new(BeaconState::default());
        cached.set_caches_transient();
        process_inactivity_updates(&mut cached).expect("should succeed");
    }
}
