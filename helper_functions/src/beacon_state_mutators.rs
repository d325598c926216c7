use std::cmp;
use std::convert::TryFrom;

use typenum::marker_traits::Unsigned;
use types::{
    beacon_state::BeaconState,
    config::{Config, ExpConst},
    consts::FAR_FUTURE_EPOCH,
    primitives::*,
};

use crate::{beacon_state_accessors::get_beacon_proposer_index, error::Error};

pub fn increase_balance<C: Config>(state: &mut BeaconState<C>, index: ValidatorIndex, delta: Gwei) {
    state.increase_balance(index, delta);
}

pub fn decrease_balance<C: Config>(state: &mut BeaconState<C>, index: ValidatorIndex, delta: Gwei) {
    state.decrease_balance(index, delta);
}

/// Queues a validator for exit at the earliest epoch the churn limit allows, pushing the queue
/// out by one epoch whenever the epoch it would otherwise land on is already full.
pub fn initiate_validator_exit<C: Config + ExpConst>(
    state: &mut BeaconState<C>,
    index: ValidatorIndex,
) -> Result<(), Error> {
    let id = usize::try_from(index).map_err(|_err| Error::ConversionToUsize)?;
    if state.validators()[id].exit_epoch != FAR_FUTURE_EPOCH {
        return Ok(());
    }

    let delayed_activation_exit_epoch =
        state.compute_activation_exit_epoch(state.get_current_epoch());

    let exit_queue_epoch = state
        .validators()
        .iter()
        .map(|validator| validator.exit_epoch)
        .filter(|&exit_epoch| exit_epoch != FAR_FUTURE_EPOCH)
        .chain(std::iter::once(delayed_activation_exit_epoch))
        .max()
        .unwrap_or(delayed_activation_exit_epoch);

    let exit_queue_churn = state
        .validators()
        .iter()
        .filter(|validator| validator.exit_epoch == exit_queue_epoch)
        .count() as u64;

    let exit_queue_epoch = if exit_queue_churn >= state.get_validator_churn_limit()? {
        exit_queue_epoch + 1
    } else {
        exit_queue_epoch
    };

    let validator = &mut state.validators_mut()[id];
    validator.exit_epoch = exit_queue_epoch;
    validator.withdrawable_epoch = exit_queue_epoch + C::min_validator_withdrawability_delay();

    Ok(())
}

/// Slashes a validator: marks it slashed, queues it for exit, extends its withdrawability delay
/// to cover the slashings-vector window, records the loss for the current epoch's slashings
/// accumulator, and splits the penalty between burning the slashed balance and rewarding the
/// proposer/whistleblower. `min_slashing_penalty_quotient` is fork-dependent (stricter from
/// Altair on) and is therefore supplied by the caller rather than read off `C`.
pub fn slash_validator<C: Config + ExpConst>(
    state: &mut BeaconState<C>,
    slashed_index: ValidatorIndex,
    whistleblower_index: Option<ValidatorIndex>,
    min_slashing_penalty_quotient: u64,
) -> Result<(), Error> {
    let epoch = state.get_current_epoch();
    initiate_validator_exit(state, slashed_index)?;

    let id = usize::try_from(slashed_index).map_err(|_err| Error::ConversionToUsize)?;
    let effective_balance = {
        let validator = &mut state.validators_mut()[id];
        validator.slashed = true;
        validator.withdrawable_epoch = cmp::max(
            validator.withdrawable_epoch,
            epoch + C::EpochsPerSlashingsVector::to_u64(),
        );
        validator.effective_balance
    };

    let slashings_index = (epoch % C::EpochsPerSlashingsVector::to_u64()) as usize;
    state.slashings_mut()[slashings_index] += effective_balance;

    decrease_balance(
        state,
        slashed_index,
        effective_balance / min_slashing_penalty_quotient,
    );

    let proposer_index = get_beacon_proposer_index(state)?;
    let whistleblower_index = whistleblower_index.unwrap_or(proposer_index);
    let whistleblower_reward = effective_balance / C::whistleblower_reward_quotient();
    let proposer_reward = whistleblower_reward / C::proposer_reward_quotient();

    increase_balance(state, proposer_index, proposer_reward);
    increase_balance(
        state,
        whistleblower_index,
        whistleblower_reward - proposer_reward,
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssz_types::VariableList;
    use types::config::MainnetConfig;
    use types::types::Validator;

    fn state_with_validators(count: usize) -> BeaconState<MainnetConfig> {
        let mut state = BeaconState::default();
        *state.validators_mut() = VariableList::from(
            (0..count)
                .map(|_| Validator {
                    effective_balance: MainnetConfig::max_effective_balance(),
                    exit_epoch: FAR_FUTURE_EPOCH,
                    ..Validator::default()
                })
                .collect::<Vec<_>>(),
        );
        *state.balances_mut() =
            VariableList::from(vec![MainnetConfig::max_effective_balance(); count]);
        state
    }

    #[test]
    fn test_increase_balance() {
        let mut bs = state_with_validators(1);
        let before = bs.balances()[0];
        increase_balance(&mut bs, 0, 1);
        assert_eq!(bs.balances()[0], before + 1);
    }

    #[test]
    fn test_decrease_balance_to_negative_saturates() {
        let mut bs = state_with_validators(1);
        decrease_balance(&mut bs, 0, bs.balances()[0] + 1);
        assert_eq!(bs.balances()[0], 0);
    }

    #[test]
    fn test_initiate_validator_exit_sets_exit_epoch() {
        let mut bs = state_with_validators(4);
        initiate_validator_exit(&mut bs, 0).expect("exit should be queued");
        assert_ne!(bs.validators()[0].exit_epoch, FAR_FUTURE_EPOCH);
    }

    #[test]
    fn test_initiate_validator_exit_is_idempotent() {
        let mut bs = state_with_validators(4);
        initiate_validator_exit(&mut bs, 0).expect("first exit");
        let first_exit_epoch = bs.validators()[0].exit_epoch;
        initiate_validator_exit(&mut bs, 0).expect("second exit is a no-op");
        assert_eq!(bs.validators()[0].exit_epoch, first_exit_epoch);
    }

    #[test]
    fn test_slash_validator_marks_slashed_and_burns_balance() {
        let mut bs = state_with_validators(4);
        let before = bs.balances()[1];
        slash_validator(&mut bs, 1, None, 128).expect("slashing should succeed");
        assert!(bs.validators()[1].slashed);
        assert!(bs.balances()[1] < before);
    }
}
