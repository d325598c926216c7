use helper_functions::math::integer_squareroot;
use types::beacon_state::BeaconState;
use types::config::{Config, ExpConst};
use types::consts::BASE_REWARDS_PER_EPOCH;
use types::primitives::{Gwei, ValidatorIndex};
use types::types::PendingAttestation;

use error_utils::Error;

use crate::attestations;
use crate::cached_beacon_state::helper_error_to_stf;

pub fn base_reward<C: Config + ExpConst>(state: &BeaconState<C>, index: ValidatorIndex) -> Result<Gwei, Error> {
    let total_balance = state.get_total_active_balance().map_err(helper_error_to_stf)?;
    let effective_balance = state.validators()[index as usize].effective_balance;
    Ok(effective_balance * C::base_reward_factor() / integer_squareroot(total_balance) / BASE_REWARDS_PER_EPOCH)
}

/// The pre-Altair reward scheme: separate micro-rewards for matching FFG source/target/head,
/// a proposer/inclusion-delay bonus for the earliest attestation that included a validator's
/// vote, and a quadratic-leak inactivity penalty once finality has stalled for too long.
pub fn attestation_deltas<C: Config + ExpConst>(
    state: &BeaconState<C>,
) -> Result<(Vec<Gwei>, Vec<Gwei>), Error> {
    let previous_epoch = state.get_previous_epoch();
    let total_balance = state.get_total_active_balance().map_err(helper_error_to_stf)?;
    let validator_count = state.validators().len();
    let mut rewards = vec![0; validator_count];
    let mut penalties = vec![0; validator_count];

    let eligible_validator_indices: Vec<ValidatorIndex> = state
        .validators()
        .iter()
        .enumerate()
        .filter(|(_, validator)| {
            validator.is_active_at(previous_epoch) || (validator.slashed && previous_epoch + 1 < validator.withdrawable_epoch)
        })
        .map(|(index, _)| index as ValidatorIndex)
        .collect();

    let matching_source_attestations = attestations::matching_source_attestations(state, previous_epoch)?;
    let matching_target_attestations = attestations::matching_target_attestations(state, previous_epoch)?;
    let matching_head_attestations = attestations::matching_head_attestations(state, previous_epoch)?;

    for attestation_set in [
        &matching_source_attestations,
        &matching_target_attestations,
        &matching_head_attestations,
    ] {
        let unslashed_attesting_indices = attestations::unslashed_attesting_indices(state, attestation_set)?;
        let attesting_balance = attestations::attesting_balance(state, attestation_set)?;

        for &index in &eligible_validator_indices {
            if unslashed_attesting_indices.contains(&index) {
                rewards[index as usize] += base_reward(state, index)? * attesting_balance / total_balance;
            } else {
                penalties[index as usize] += base_reward(state, index)?;
            }
        }
    }

    let source_attesting_indices =
        attestations::unslashed_attesting_indices(state, &matching_source_attestations)?;
    for &index in &source_attesting_indices {
        let attestation = earliest_attestation(state, &matching_source_attestations, index)?;
        let reward = base_reward(state, index)?;
        let proposer_reward = reward / C::proposer_reward_quotient();
        rewards[attestation.proposer_index as usize] += proposer_reward;
        let max_attester_reward = reward - proposer_reward;
        rewards[index as usize] += max_attester_reward / attestation.inclusion_delay;
    }

    let finality_delay = previous_epoch - state.finalized_checkpoint().epoch;
    if finality_delay > C::min_epochs_to_inactivity_penalty() {
        let matching_target_attesting_indices =
            attestations::unslashed_attesting_indices(state, &matching_target_attestations)?;
        for &index in &eligible_validator_indices {
            penalties[index as usize] += BASE_REWARDS_PER_EPOCH * base_reward(state, index)?;
            if !matching_target_attesting_indices.contains(&index) {
                let effective_balance = state.validators()[index as usize].effective_balance;
                penalties[index as usize] += effective_balance * finality_delay / C::inactivity_penalty_quotient();
            }
        }
    }

    Ok((rewards, penalties))
}

fn earliest_attestation<'a, C: Config + ExpConst>(
    state: &BeaconState<C>,
    attestations: &'a [PendingAttestation<C>],
    index: ValidatorIndex,
) -> Result<&'a PendingAttestation<C>, Error> {
    let mut earliest: Option<&PendingAttestation<C>> = None;
    for attestation in attestations {
        let attesting_indices = helper_functions::beacon_state_accessors::get_attesting_indices(
            state,
            &attestation.data,
            &attestation.aggregation_bits,
        )
        .map_err(helper_error_to_stf)?;
        if !attesting_indices.contains(&index) {
            continue;
        }
        earliest = match earliest {
            None => Some(attestation),
            Some(current) if attestation.inclusion_delay < current.inclusion_delay => Some(attestation),
            Some(current) => Some(current),
        };
    }
    earliest.ok_or_else(|| Error::InvalidOperation {
        kind: error_utils::OperationKind::Attestation,
        reason: "no matching source attestation found for an attesting validator".to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::config::MainnetConfig;
    use types::types::Validator;

    #[test]
    fn base_reward_scales_with_effective_balance() {
        let mut state: BeaconState<MainnetConfig> = BeaconState::default();
        *state.validators_mut() = vec![Validator {
            effective_balance: 32_000_000_000,
            exit_epoch: types::consts::FAR_FUTURE_EPOCH,
            ..Validator::default()
        }]
        .into();
        *state.balances_mut() = vec![32_000_000_000].into();

        let reward = base_reward(&state, 0).expect("should succeed");
        assert!(reward > 0);
    }
}
