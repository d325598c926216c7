use helper_functions::{beacon_state_mutators::initiate_validator_exit, predicates::is_active_validator};
use types::config::{Config, ExpConst};

use error_utils::Error;

use crate::cached_beacon_state::{helper_error_to_stf, CachedBeaconState};

/// Marks validators eligible for activation, ejects those that dropped below the ejection
/// balance, and dequeues the activation queue up to the current epoch's churn limit.
pub fn process_registry_updates<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
) -> Result<(), Error> {
    let current_epoch = cached.state().get_current_epoch();
    let finalized_epoch = cached.state().finalized_checkpoint().epoch;

    let eligible: Vec<usize> = cached
        .state()
        .validators()
        .iter()
        .enumerate()
        .filter(|(_, validator)| {
            validator.activation_eligibility_epoch == C::far_future_epoch()
                && validator.effective_balance == C::max_effective_balance()
        })
        .map(|(index, _)| index)
        .collect();

    let exiting: Vec<u64> = cached
        .state()
        .validators()
        .iter()
        .enumerate()
        .filter(|(_, validator)| {
            is_active_validator(validator, current_epoch) && validator.effective_balance <= C::ejection_balance()
        })
        .map(|(index, _)| index as u64)
        .collect();

    {
        let state = cached.state_mut()?;
        for index in eligible {
            state.validators_mut()[index].activation_eligibility_epoch = current_epoch;
        }
    }

    for index in exiting {
        initiate_validator_exit(cached.state_mut()?, index).map_err(helper_error_to_stf)?;
    }

    let activation_exit_epoch = cached.state().compute_activation_exit_epoch(finalized_epoch);
    let mut activation_queue: Vec<usize> = cached
        .state()
        .validators()
        .iter()
        .enumerate()
        .filter(|(_, validator)| {
            validator.activation_eligibility_epoch != C::far_future_epoch()
                && validator.activation_epoch >= activation_exit_epoch
        })
        .map(|(index, _)| index)
        .collect();
    activation_queue.sort_by_key(|&index| cached.state().validators()[index].activation_eligibility_epoch);

    let churn_limit = cached.state().get_validator_churn_limit().map_err(helper_error_to_stf)?;
    let delayed_activation_epoch = cached.state().compute_activation_exit_epoch(current_epoch);

    let state = cached.state_mut()?;
    for index in activation_queue.into_iter().take(churn_limit as usize) {
        let validator = &mut state.validators_mut()[index];
        if validator.activation_epoch == C::far_future_epoch() {
            validator.activation_epoch = delayed_activation_epoch;
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
    fn process_registry_updates_marks_low_balance_validators_as_eligible_for_activation() {
        let mut state: BeaconState<MinimalConfig> = BeaconState::default();
        *state.validators_mut() = vec![Validator {
            effective_balance: MinimalConfig::max_effective_balance(),
            activation_eligibility_epoch: types::consts::FAR_FUTURE_EPOCH,
            exit_epoch: types::consts::FAR_FUTURE_EPOCH,
            ..Validator::default()
        }]
        .into();
        *state.balances_mut() = vec![MinimalConfig::max_effective_balance()].into();

        let mut cached = CachedBeaconState::new(state);
        cached.set_caches_transient();
        process_registry_updates(&mut cached).expect("should succeed");
        assert_eq!(cached.state().validators()[0].activation_eligibility_epoch, 0);
    }
}
