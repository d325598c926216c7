use helper_functions::math::integer_squareroot;
use types::beacon_state::BeaconState;
use types::config::{Config, ExpConst};
use types::consts::{PARTICIPATION_FLAG_WEIGHTS, TIMELY_HEAD_FLAG_INDEX, WEIGHT_DENOMINATOR};
use types::primitives::{Gwei, ValidatorIndex};

use error_utils::Error;

use crate::cached_beacon_state::helper_error_to_stf;

pub fn base_reward<C: Config + ExpConst>(state: &BeaconState<C>, index: ValidatorIndex) -> Result<Gwei, Error> {
    let total_balance = state.get_total_active_balance().map_err(helper_error_to_stf)?;
    let effective_balance = state.validators()[index as usize].effective_balance;
    Ok(effective_balance * C::base_reward_factor() / integer_squareroot(total_balance)
        / types::consts::BASE_REWARDS_PER_EPOCH)
}

/// The per-effective-balance-increment share of a base reward, the unit sync-committee rewards
/// are paid out in rather than the per-validator `base_reward` attestation rewards use.
pub fn base_reward_per_increment<C: Config + ExpConst>(state: &BeaconState<C>) -> Result<Gwei, Error> {
    let total_balance = state.get_total_active_balance().map_err(helper_error_to_stf)?;
    Ok(C::effective_balance_increment() * C::base_reward_factor() / integer_squareroot(total_balance))
}

/// Altair's reward scheme replaces the three independent FFG micro-rewards with three weighted
/// slices of one base reward (source/target/head), each either fully paid out or, for target and
/// head, fully withheld while an inactivity leak is active — the flag bit is the ground truth, no
/// pending-attestation list to re-derive it from.
pub fn attestation_deltas<C: Config + ExpConst>(
    state: &BeaconState<C>,
) -> Result<(Vec<Gwei>, Vec<Gwei>), Error> {
    let previous_epoch = state.get_previous_epoch();
    let validator_count = state.validators().len();
    let mut rewards = vec![0; validator_count];
    let mut penalties = vec![0; validator_count];

    let finality_delay = previous_epoch - state.finalized_checkpoint().epoch;
    let in_inactivity_leak = finality_delay > C::min_epochs_to_inactivity_penalty();

    let participation = state
        .previous_epoch_participation()
        .expect("altair and bellatrix states always carry participation flags");
    let inactivity_scores = state
        .inactivity_scores()
        .expect("altair and bellatrix states always carry inactivity scores");

    for (flag_index, &weight) in PARTICIPATION_FLAG_WEIGHTS.iter().enumerate() {
        let unslashed_indices: Vec<ValidatorIndex> = state
            .validators()
            .iter()
            .enumerate()
            .filter(|(_, validator)| !validator.slashed)
            .map(|(index, _)| index as ValidatorIndex)
            .collect();

        let matching_indices: Vec<ValidatorIndex> = unslashed_indices
            .iter()
            .copied()
            .filter(|&index| participation[index as usize] & (1 << flag_index) != 0)
            .collect();

        let total_active_balance = state.get_total_active_balance().map_err(helper_error_to_stf)?;
        let matching_balance = state.get_total_balance(&matching_indices).map_err(helper_error_to_stf)?;

        for index in eligible_indices(state, previous_epoch) {
            let reward = base_reward(state, index)?;
            let is_matching = participation[index as usize] & (1 << flag_index) != 0;
            if is_matching {
                if !in_inactivity_leak {
                    rewards[index as usize] += reward * weight * matching_balance / (total_active_balance * WEIGHT_DENOMINATOR);
                }
            } else if flag_index != TIMELY_HEAD_FLAG_INDEX {
                // A missed head vote is never penalized, only a missed source or target vote.
                penalties[index as usize] += reward * weight / WEIGHT_DENOMINATOR;
            }
        }
    }

    for index in eligible_indices(state, previous_epoch) {
        if inactivity_scores[index as usize] > 0 {
            let effective_balance = state.validators()[index as usize].effective_balance;
            let penalty_numerator = effective_balance * inactivity_scores[index as usize];
            let penalty_denominator = C::inactivity_penalty_quotient_altair();
            penalties[index as usize] += penalty_numerator / penalty_denominator;
        }
    }

    Ok((rewards, penalties))
}

fn eligible_indices<C: Config + ExpConst>(state: &BeaconState<C>, previous_epoch: types::primitives::Epoch) -> Vec<ValidatorIndex> {
    state
        .validators()
        .iter()
        .enumerate()
        .filter(|(_, validator)| {
            validator.is_active_at(previous_epoch) || (validator.slashed && previous_epoch + 1 < validator.withdrawable_epoch)
        })
        .map(|(index, _)| index as ValidatorIndex)
        .collect()
}
