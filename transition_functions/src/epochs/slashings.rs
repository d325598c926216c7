use std::cmp;

use typenum::marker_traits::Unsigned;
use types::config::{Config, ExpConst};
use types::primitives::Gwei;

use error_utils::Error;

use crate::cached_beacon_state::{helper_error_to_stf, CachedBeaconState};

/// Burns a share of every still-slashed validator's effective balance at the midpoint of its
/// slashings-vector window, proportional to how much of the active balance the whole slashings
/// accumulator represents.
pub fn process_slashings<C: Config + ExpConst>(cached: &mut CachedBeaconState<C>) -> Result<(), Error> {
    let epoch = cached.state().get_current_epoch();
    let total_balance = cached.state().get_total_active_balance().map_err(helper_error_to_stf)?;
    let slashings_sum: Gwei = cached.state().slashings().iter().sum();
    let increment = C::effective_balance_increment();
    let half_epochs_per_slashings_vector = C::EpochsPerSlashingsVector::to_u64() / 2;

    let penalties: Vec<(usize, Gwei)> = cached
        .state()
        .validators()
        .iter()
        .enumerate()
        .filter(|(_, validator)| {
            validator.slashed && epoch + half_epochs_per_slashings_vector == validator.withdrawable_epoch
        })
        .map(|(index, validator)| {
            let penalty_numerator =
                validator.effective_balance / increment * cmp::min(slashings_sum * 3, total_balance);
            let penalty = penalty_numerator / total_balance * increment;
            (index, penalty)
        })
        .collect();

    for (index, penalty) in penalties {
        cached.decrease_balance(index as u64, penalty)?;
    }

    Ok(())
}
