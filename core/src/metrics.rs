use types::primitives::{Epoch, Gwei};

/// A validator's participation classification for the epoch a metrics sink is told about, mirroring
/// the handful of states a consensus client reports per validator (active/slashed/exited, …).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ValidatorStatus {
    PendingInitialized,
    PendingQueued,
    ActiveOngoing,
    ActiveSlashed,
    ActiveExiting,
    ExitedSlashed,
    ExitedUnslashed,
    WithdrawalPossible,
    WithdrawalDone,
}

/// A running timer handle a sink hands back from `start_timer`. Dropping it (or calling
/// `stop` explicitly) records the elapsed duration; a `NoOpMetrics` timer does neither.
pub trait StopTimer {
    fn stop(self: Box<Self>);
}

/// The observers a state transition function may report to without ever depending on their
/// implementation: wall-clock timings around block and epoch processing, and a snapshot of
/// validator participation taken once per epoch transition. Every method must be non-throwing —
/// a broken metrics backend must never fail block processing.
#[cfg_attr(test, mockall::automock)]
pub trait MetricsSink: Send + Sync {
    fn stfn_process_block_start_timer(&self) -> Box<dyn StopTimer>;
    fn stfn_epoch_transition_start_timer(&self) -> Box<dyn StopTimer>;
    fn stfn_elapsed_time_till_processed_observe(&self, delay_seconds: f64);
    fn register_validator_statuses(
        &self,
        epoch: Epoch,
        statuses: &[ValidatorStatus],
        balances: &[Gwei],
    );
}

struct NoOpStopTimer;

impl StopTimer for NoOpStopTimer {
    fn stop(self: Box<Self>) {}
}

/// The default sink wired in when a caller doesn't supply one: every method is a no-op, so the
/// hot path carries no branch and no allocation beyond the boxed timer handle.
#[derive(Clone, Copy, Default, Debug)]
pub struct NoOpMetrics;

impl MetricsSink for NoOpMetrics {
    fn stfn_process_block_start_timer(&self) -> Box<dyn StopTimer> {
        Box::new(NoOpStopTimer)
    }

    fn stfn_epoch_transition_start_timer(&self) -> Box<dyn StopTimer> {
        Box::new(NoOpStopTimer)
    }

    fn stfn_elapsed_time_till_processed_observe(&self, _delay_seconds: f64) {}

    fn register_validator_statuses(
        &self,
        _epoch: Epoch,
        _statuses: &[ValidatorStatus],
        _balances: &[Gwei],
    ) {
    }
}

/// Classifies a single validator into the participation bucket a metrics sink reports, following
/// the same activation/exit/slashed ordering `is_active_validator`/`is_slashable_validator` use.
pub fn validator_status(validator: &types::types::Validator, epoch: Epoch) -> ValidatorStatus {
    use types::consts::FAR_FUTURE_EPOCH;

    let active = validator.activation_epoch <= epoch && epoch < validator.exit_epoch;
    let exited = validator.exit_epoch <= epoch;
    let withdrawable = validator.withdrawable_epoch <= epoch;

    if exited {
        if withdrawable {
            if validator.effective_balance == 0 {
                return ValidatorStatus::WithdrawalDone;
            }
            return ValidatorStatus::WithdrawalPossible;
        }
        return if validator.slashed {
            ValidatorStatus::ExitedSlashed
        } else {
            ValidatorStatus::ExitedUnslashed
        };
    }

    if active {
        return if validator.slashed {
            ValidatorStatus::ActiveSlashed
        } else if validator.exit_epoch != FAR_FUTURE_EPOCH {
            ValidatorStatus::ActiveExiting
        } else {
            ValidatorStatus::ActiveOngoing
        };
    }

    if validator.activation_eligibility_epoch == FAR_FUTURE_EPOCH {
        ValidatorStatus::PendingInitialized
    } else {
        ValidatorStatus::PendingQueued
    }
}
