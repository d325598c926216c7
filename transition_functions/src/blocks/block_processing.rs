use std::collections::BTreeSet;
use std::convert::TryInto;

use bls::PublicKey;
use rayon::prelude::*;
use typenum::marker_traits::Unsigned;

use metrics_core::MetricsSink;

use helper_functions::{
    beacon_state_accessors::{get_attesting_indices, get_committee_count_per_slot, get_domain, get_indexed_attestation},
    beacon_state_mutators as mutators,
    crypto::{bls_verify, compute_domain, hash},
    math::xor,
    misc::compute_epoch_at_slot,
    predicates::{is_slashable_attestation_data, is_valid_indexed_attestation, is_valid_merkle_branch},
};
use types::beacon_state::BeaconState;
use types::config::{ChainSpec, Config, ExpConst};
use types::consts::{FAR_FUTURE_EPOCH, PARTICIPATION_FLAG_WEIGHTS, PROPOSER_WEIGHT, SYNC_REWARD_WEIGHT, WEIGHT_DENOMINATOR};
use types::primitives::*;
use types::types::{
    Attestation, AttesterSlashing, BeaconBlock, BeaconBlockHeader, Deposit, DepositMessage,
    ExecutionPayload, ExecutionPayloadHeader, ProposerSlashing, SignedVoluntaryExit, SyncAggregate,
    Validator,
};

use error_utils::{Error, OperationKind, SignatureSetKind};

use crate::attestations::attestation_participation_flag_indices;
use crate::cached_beacon_state::{helper_error_to_stf, CachedBeaconState};
use crate::rewards_and_penalties::altair::{base_reward, base_reward_per_increment};
use crate::signature_sets::{aggregate_from_bytes, signing_message, SignatureSetCollector};

fn invalid_operation(kind: OperationKind, reason: impl Into<String>) -> Error {
    Error::InvalidOperation {
        kind,
        reason: reason.into(),
    }
}

/// Applies one block's worth of operations to `cached`, which must already be in transient mode
/// and already advanced (via slot processing) to the block's own slot. Every operation list runs
/// in the fixed order the rest of the ecosystem relies on; BLS signatures other than indexed
/// attestations' are collected rather than checked inline, so a signature failure surfaces only
/// after every other shape/limit check in the block has already passed.
pub fn process_block<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    block: &BeaconBlock<C>,
    spec: &ChainSpec,
    verify_signatures: bool,
    metrics: Option<&dyn MetricsSink>,
) -> Result<(), Error> {
    let _timer = metrics.map(|sink| sink.stfn_process_block_start_timer());

    let mut collector = SignatureSetCollector::new();

    process_block_header(cached, block)?;

    if let Some(execution_payload) = block.body.execution_payload() {
        process_execution_payload(cached, execution_payload, spec)?;
    }

    process_randao(cached, block, &mut collector)?;
    process_eth1_data(cached, block)?;
    process_operations(cached, block, spec, verify_signatures, &mut collector)?;

    if let Some(sync_aggregate) = block.body.sync_aggregate() {
        process_sync_aggregate(cached, sync_aggregate, &mut collector)?;
    }

    if verify_signatures {
        collector.verify_all()?;
    }

    if let Some(timer) = _timer {
        timer.stop();
    }

    Ok(())
}

/// Validates every attestation's indexed form independently and in parallel, the one point in
/// block processing where per-item work genuinely has no shared state to serialize on — ahead of
/// the single aggregate join-point (`SignatureSetCollector::verify_all`) the rest of the block's
/// signatures go through.
fn verify_attestation_signatures<C: Config + ExpConst>(
    state: &BeaconState<C>,
    attestations: &[&Attestation<C>],
) -> Result<(), Error> {
    attestations
        .par_iter()
        .try_for_each(|attestation| -> Result<(), Error> {
            let indexed_attestation = get_indexed_attestation(state, attestation).map_err(helper_error_to_stf)?;
            is_valid_indexed_attestation(state, &indexed_attestation).map_err(helper_error_to_stf)
        })
}

fn process_block_header<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    block: &BeaconBlock<C>,
) -> Result<(), Error> {
    let state = cached.state();

    if block.slot != state.slot() {
        return Err(invalid_operation(
            OperationKind::BlockHeader,
            format!("block slot {} does not match state slot {}", block.slot, state.slot()),
        ));
    }
    if block.slot <= state.latest_block_header().slot {
        return Err(invalid_operation(
            OperationKind::BlockHeader,
            "block slot is not later than the state's latest block header",
        ));
    }
    if block.parent_root != state.latest_block_header().canonical_root() {
        return Err(invalid_operation(
            OperationKind::BlockHeader,
            "block's parent root does not match the latest block header",
        ));
    }

    let proposer_index = cached.get_beacon_proposer_index()?;
    if cached.state().validators()[proposer_index as usize].slashed {
        return Err(invalid_operation(OperationKind::BlockHeader, "proposer has been slashed"));
    }

    let body_root = H256::from_slice(&tree_hash::TreeHash::tree_hash_root(&block.body));
    let new_header = BeaconBlockHeader {
        slot: block.slot,
        parent_root: block.parent_root,
        state_root: H256::zero(),
        body_root,
    };
    *cached.state_mut()?.latest_block_header_mut() = new_header;

    Ok(())
}

fn process_randao<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    block: &BeaconBlock<C>,
    collector: &mut SignatureSetCollector,
) -> Result<(), Error> {
    let epoch = cached.state().get_current_epoch();
    let proposer_index = cached.get_beacon_proposer_index()?;
    let proposer_pubkey_bytes = cached.state().validators()[proposer_index as usize].pubkey.clone();
    let domain = get_domain(cached.state(), C::domain_randao(), None);

    let pubkey: PublicKey = (&proposer_pubkey_bytes)
        .try_into()
        .map_err(|_err| Error::InvalidSignature {
            kind: SignatureSetKind::Randao,
            index: 0,
        })?;
    let message = signing_message(&epoch);
    let signature = aggregate_from_bytes(block.body.randao_reveal(), SignatureSetKind::Randao, 0)?;
    collector.push(SignatureSetKind::Randao, vec![pubkey], message, domain, signature);

    let mix = xor(
        cached
            .state()
            .get_randao_mix(epoch)
            .map_err(helper_error_to_stf)?
            .as_bytes(),
        &hash(block.body.randao_reveal().as_bytes().as_slice()),
    );
    let mut mix_bytes = [0u8; 32];
    mix_bytes.copy_from_slice(&mix[..32]);

    let index = (epoch % C::EpochsPerHistoricalVector::to_u64()) as usize;
    cached.state_mut()?.randao_mixes_mut()[index] = H256::from(mix_bytes);

    Ok(())
}

fn process_eth1_data<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    block: &BeaconBlock<C>,
) -> Result<(), Error> {
    let vote = block.body.eth1_data().clone();
    {
        let state = cached.state_mut()?;
        state
            .eth1_data_votes_mut()
            .push(vote.clone())
            .map_err(|_err| invalid_operation(OperationKind::Eth1Data, "eth1 data votes list is full"))?;
    }

    let voting_period_slots = C::SlotsPerEth1VotingPeriod::to_u64();
    let matching_votes = cached
        .state()
        .eth1_data_votes()
        .iter()
        .filter(|candidate| **candidate == vote)
        .count() as u64;

    if matching_votes * 2 > voting_period_slots {
        *cached.state_mut()?.eth1_data_mut() = vote;
    }

    Ok(())
}

fn process_operations<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    block: &BeaconBlock<C>,
    spec: &ChainSpec,
    verify_signatures: bool,
    collector: &mut SignatureSetCollector,
) -> Result<(), Error> {
    let body = &block.body;

    let expected_deposits = std::cmp::min(
        C::max_deposits(),
        cached.state().eth1_data().deposit_count - cached.state().eth1_deposit_index(),
    ) as usize;
    if body.deposits().len() != expected_deposits {
        return Err(Error::OperationLimitExceeded {
            kind: OperationKind::Deposit,
            limit: expected_deposits,
            got: body.deposits().len(),
        });
    }

    for proposer_slashing in body.proposer_slashings().iter() {
        process_proposer_slashing(cached, proposer_slashing, collector)?;
    }
    for attester_slashing in body.attester_slashings().iter() {
        process_attester_slashing(cached, attester_slashing, verify_signatures)?;
    }

    if verify_signatures {
        let attestations: Vec<&Attestation<C>> = body.attestations().iter().collect();
        verify_attestation_signatures(cached.state(), &attestations)?;
    }
    for attestation in body.attestations().iter() {
        process_attestation(cached, attestation)?;
    }
    for deposit in body.deposits().iter() {
        process_deposit(cached, deposit, spec)?;
    }
    for signed_exit in body.voluntary_exits().iter() {
        process_voluntary_exit(cached, signed_exit, collector)?;
    }

    Ok(())
}

fn process_proposer_slashing<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    slashing: &ProposerSlashing,
    collector: &mut SignatureSetCollector,
) -> Result<(), Error> {
    let header_1 = &slashing.signed_header_1.message;
    let header_2 = &slashing.signed_header_2.message;

    if header_1.slot != header_2.slot {
        return Err(invalid_operation(
            OperationKind::ProposerSlashing,
            "headers are not for the same slot",
        ));
    }
    if header_1 == header_2 {
        return Err(invalid_operation(OperationKind::ProposerSlashing, "headers are identical"));
    }

    let proposer_index = slashing.proposer_index;
    let validator = cached
        .state()
        .validators()
        .get(proposer_index as usize)
        .ok_or_else(|| invalid_operation(OperationKind::ProposerSlashing, "proposer index out of range"))?
        .clone();

    if !validator.is_slashable_at(cached.state().get_current_epoch()) {
        return Err(invalid_operation(
            OperationKind::ProposerSlashing,
            "proposer is not slashable at the current epoch",
        ));
    }

    for (index, (header, signature_bytes)) in [
        (header_1, &slashing.signed_header_1.signature),
        (header_2, &slashing.signed_header_2.signature),
    ]
    .into_iter()
    .enumerate()
    {
        let epoch = compute_epoch_at_slot::<C>(header.slot);
        let domain = get_domain(cached.state(), C::domain_beacon_proposer(), Some(epoch));
        let pubkey: PublicKey = (&validator.pubkey).try_into().map_err(|_err| Error::InvalidSignature {
            kind: SignatureSetKind::ProposerSlashing,
            index,
        })?;
        let message = signing_message(header);
        let signature = aggregate_from_bytes(signature_bytes, SignatureSetKind::ProposerSlashing, index)?;
        collector.push(SignatureSetKind::ProposerSlashing, vec![pubkey], message, domain, signature);
    }

    mutators::slash_validator(
        cached.state_mut()?,
        proposer_index,
        None,
        C::min_slashing_penalty_quotient(),
    )
    .map_err(helper_error_to_stf)
}

fn process_attester_slashing<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    slashing: &AttesterSlashing<C>,
    verify_signatures: bool,
) -> Result<(), Error> {
    let attestation_1 = &slashing.attestation_1;
    let attestation_2 = &slashing.attestation_2;

    if !is_slashable_attestation_data(&attestation_1.data, &attestation_2.data) {
        return Err(invalid_operation(
            OperationKind::AttesterSlashing,
            "attestation data is not slashable",
        ));
    }

    if verify_signatures {
        is_valid_indexed_attestation(cached.state(), attestation_1).map_err(helper_error_to_stf)?;
        is_valid_indexed_attestation(cached.state(), attestation_2).map_err(helper_error_to_stf)?;
    }

    let indices_1: BTreeSet<u64> = attestation_1.attesting_indices.iter().copied().collect();
    let indices_2: BTreeSet<u64> = attestation_2.attesting_indices.iter().copied().collect();

    let current_epoch = cached.state().get_current_epoch();
    let mut slashed_any = false;
    for &index in indices_1.intersection(&indices_2) {
        if cached.state().validators()[index as usize].is_slashable_at(current_epoch) {
            mutators::slash_validator(cached.state_mut()?, index, None, C::min_slashing_penalty_quotient())
                .map_err(helper_error_to_stf)?;
            slashed_any = true;
        }
    }

    if !slashed_any {
        return Err(invalid_operation(
            OperationKind::AttesterSlashing,
            "no intersecting validator was slashable",
        ));
    }

    Ok(())
}

fn process_attestation<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    attestation: &Attestation<C>,
) -> Result<(), Error> {
    let data = &attestation.data;
    let state = cached.state();

    let current_epoch = state.get_current_epoch();
    let previous_epoch = state.get_previous_epoch();
    if data.target.epoch != current_epoch && data.target.epoch != previous_epoch {
        return Err(invalid_operation(
            OperationKind::Attestation,
            "target epoch is neither the current nor the previous epoch",
        ));
    }
    if data.target.epoch != compute_epoch_at_slot::<C>(data.slot) {
        return Err(invalid_operation(
            OperationKind::Attestation,
            "target epoch does not match the attested slot's epoch",
        ));
    }
    if data.slot + C::min_attestation_inclusion_delay() > state.slot()
        || state.slot() > data.slot + C::SLOTS_PER_EPOCH
    {
        return Err(invalid_operation(OperationKind::Attestation, "attestation slot out of range"));
    }
    let committee_count = get_committee_count_per_slot(state, data.target.epoch);
    if data.index >= committee_count {
        return Err(invalid_operation(
            OperationKind::Attestation,
            "committee index out of range for this slot",
        ));
    }

    match cached.state() {
        BeaconState::Phase0(_) => {
            let proposer_index = cached.get_beacon_proposer_index()?;
            let inclusion_delay = cached.state().slot() - data.slot;
            let pending_attestation = types::types::PendingAttestation {
                aggregation_bits: attestation.aggregation_bits.clone(),
                data: data.clone(),
                inclusion_delay,
                proposer_index,
            };

            let target_epoch = data.target.epoch;
            let state = cached.state_mut()?;
            let current_epoch = state.get_current_epoch();
            let list = if target_epoch == current_epoch {
                state
                    .current_epoch_attestations_mut()
                    .expect("phase0 state always carries pending-attestation lists")
            } else {
                state
                    .previous_epoch_attestations_mut()
                    .expect("phase0 state always carries pending-attestation lists")
            };
            list.push(pending_attestation)
                .map_err(|_err| invalid_operation(OperationKind::Attestation, "pending attestations list is full"))?;
        }
        BeaconState::Altair(_) | BeaconState::Bellatrix(_) => {
            let inclusion_delay = cached.state().slot() - data.slot;
            let flag_indices = attestation_participation_flag_indices(cached.state(), data, inclusion_delay)?;
            let attesting_indices =
                get_attesting_indices(cached.state(), data, &attestation.aggregation_bits).map_err(helper_error_to_stf)?;

            let mut proposer_reward_numerator: u64 = 0;
            for index in attesting_indices {
                let reward = base_reward(cached.state(), index)?;
                for (flag_index, &weight) in PARTICIPATION_FLAG_WEIGHTS.iter().enumerate() {
                    if !flag_indices.contains(&flag_index) {
                        continue;
                    }
                    let use_current = data.target.epoch == cached.state().get_current_epoch();
                    let state = cached.state_mut()?;
                    let participation = if use_current {
                        state
                            .current_epoch_participation_mut()
                            .expect("altair and bellatrix states always carry participation flags")
                    } else {
                        state
                            .previous_epoch_participation_mut()
                            .expect("altair and bellatrix states always carry participation flags")
                    };
                    let flag_bit = 1 << flag_index;
                    if participation[index as usize] & flag_bit == 0 {
                        participation[index as usize] |= flag_bit;
                        proposer_reward_numerator += reward * weight;
                    }
                }
            }

            let proposer_reward_denominator = (WEIGHT_DENOMINATOR - PROPOSER_WEIGHT) * WEIGHT_DENOMINATOR / PROPOSER_WEIGHT;
            let proposer_reward = proposer_reward_numerator / proposer_reward_denominator;
            let proposer_index = cached.get_beacon_proposer_index()?;
            cached.increase_balance(proposer_index, proposer_reward)?;
        }
    }

    Ok(())
}

fn process_deposit<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    deposit: &Deposit,
    spec: &ChainSpec,
) -> Result<(), Error> {
    let leaf = H256::from_slice(&tree_hash::TreeHash::tree_hash_root(&deposit.data));
    let index = cached.state().eth1_deposit_index();
    let depth = types::consts::DEPOSIT_CONTRACT_TREE_DEPTH + 1;
    if !is_valid_merkle_branch(&leaf, &deposit.proof, depth, index, &cached.state().eth1_data().deposit_root) {
        return Err(invalid_operation(OperationKind::Deposit, "invalid deposit merkle proof"));
    }

    *cached.state_mut()?.eth1_deposit_index_mut() += 1;

    let pubkey = deposit.data.pubkey.clone();
    let amount = deposit.data.amount;

    if let Some(existing_index) = cached.pubkey_to_index(&pubkey.as_bytes()) {
        cached.increase_balance(existing_index, amount)?;
        return Ok(());
    }

    let deposit_message = DepositMessage {
        pubkey: pubkey.clone(),
        withdrawal_credentials: deposit.data.withdrawal_credentials,
        amount,
    };
    let domain = compute_domain(C::domain_deposit(), spec.genesis_fork_version, H256::zero());
    let message = signing_message(&deposit_message);

    let signature_valid = bls_verify(&pubkey, message.as_bytes(), &deposit.data.signature, domain).unwrap_or(false);
    if !signature_valid {
        // An invalid deposit signature is tolerated rather than rejected: deposits already
        // included on the execution chain cannot be un-included, so a bad proof of possession
        // just means the validator never gets registered.
        return Ok(());
    }

    let effective_balance = std::cmp::min(
        amount - amount % C::effective_balance_increment(),
        C::max_effective_balance(),
    );
    let validator = Validator {
        pubkey,
        withdrawal_credentials: deposit.data.withdrawal_credentials,
        effective_balance,
        slashed: false,
        activation_eligibility_epoch: FAR_FUTURE_EPOCH,
        activation_epoch: FAR_FUTURE_EPOCH,
        exit_epoch: FAR_FUTURE_EPOCH,
        withdrawable_epoch: FAR_FUTURE_EPOCH,
    };
    cached.push_validator(validator, amount)?;

    Ok(())
}

fn process_voluntary_exit<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    signed_exit: &SignedVoluntaryExit,
    collector: &mut SignatureSetCollector,
) -> Result<(), Error> {
    let exit = &signed_exit.message;
    let validator = cached
        .state()
        .validators()
        .get(exit.validator_index as usize)
        .ok_or_else(|| invalid_operation(OperationKind::VoluntaryExit, "validator index out of range"))?
        .clone();

    let current_epoch = cached.state().get_current_epoch();
    if !validator.is_active_at(current_epoch) {
        return Err(invalid_operation(OperationKind::VoluntaryExit, "validator is not active"));
    }
    if validator.exit_epoch != FAR_FUTURE_EPOCH {
        return Err(invalid_operation(
            OperationKind::VoluntaryExit,
            "validator has already initiated exit",
        ));
    }
    if current_epoch < exit.epoch {
        return Err(invalid_operation(OperationKind::VoluntaryExit, "exit epoch is in the future"));
    }
    if current_epoch < validator.activation_epoch + C::persistent_committee_period() {
        return Err(invalid_operation(
            OperationKind::VoluntaryExit,
            "validator has not been active long enough to exit",
        ));
    }

    let domain = get_domain(cached.state(), C::domain_voluntary_exit(), Some(exit.epoch));
    let pubkey: PublicKey = (&validator.pubkey).try_into().map_err(|_err| Error::InvalidSignature {
        kind: SignatureSetKind::VoluntaryExit,
        index: 0,
    })?;
    let message = signing_message(exit);
    let signature = aggregate_from_bytes(&signed_exit.signature, SignatureSetKind::VoluntaryExit, 0)?;
    collector.push(SignatureSetKind::VoluntaryExit, vec![pubkey], message, domain, signature);

    mutators::initiate_validator_exit(cached.state_mut()?, exit.validator_index).map_err(helper_error_to_stf)
}

fn process_sync_aggregate<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    sync_aggregate: &SyncAggregate<C>,
    collector: &mut SignatureSetCollector,
) -> Result<(), Error> {
    let committee = cached
        .state()
        .current_sync_committee()
        .expect("altair and bellatrix states always carry a sync committee")
        .clone();

    let previous_slot = std::cmp::max(cached.state().slot(), 1) - 1;
    let domain = get_domain(
        cached.state(),
        C::domain_sync_committee(),
        Some(compute_epoch_at_slot::<C>(previous_slot)),
    );
    let message = cached
        .state()
        .get_block_root_at_slot(previous_slot)
        .map_err(helper_error_to_stf)?;

    let mut participant_pubkeys = Vec::new();
    let mut committee_indices = Vec::with_capacity(committee.pubkeys.len());
    for (i, pubkey_bytes) in committee.pubkeys.iter().enumerate() {
        let participating = matches!(sync_aggregate.sync_committee_bits.get(i), Ok(true));
        let validator_index = cached.pubkey_to_index(&pubkey_bytes.as_bytes()).ok_or_else(|| {
            invalid_operation(OperationKind::SyncAggregate, "sync committee member is not a known validator")
        })?;
        committee_indices.push((validator_index, participating));

        if participating {
            let pubkey: PublicKey = pubkey_bytes.try_into().map_err(|_err| Error::InvalidSignature {
                kind: SignatureSetKind::SyncAggregate,
                index: 0,
            })?;
            participant_pubkeys.push(pubkey);
        }
    }

    let signature = aggregate_from_bytes(&sync_aggregate.sync_committee_signature, SignatureSetKind::SyncAggregate, 0)?;
    collector.push(SignatureSetKind::SyncAggregate, participant_pubkeys, message, domain, signature);

    let total_active_increments =
        cached.state().get_total_active_balance().map_err(helper_error_to_stf)? / C::effective_balance_increment();
    let total_base_rewards = base_reward_per_increment(cached.state())? * total_active_increments;
    let max_participant_reward = total_base_rewards * SYNC_REWARD_WEIGHT / WEIGHT_DENOMINATOR / C::SLOTS_PER_EPOCH;
    let participant_reward = max_participant_reward / C::SyncCommitteeSize::to_u64();
    let proposer_reward = participant_reward * PROPOSER_WEIGHT / (WEIGHT_DENOMINATOR - PROPOSER_WEIGHT);

    let proposer_index = cached.get_beacon_proposer_index()?;
    for (validator_index, participating) in committee_indices {
        if participating {
            cached.increase_balance(validator_index, participant_reward)?;
            cached.increase_balance(proposer_index, proposer_reward)?;
        } else {
            cached.decrease_balance(validator_index, participant_reward)?;
        }
    }

    Ok(())
}

/// Structural checks only: full execution-layer payload validation (state transition inside the
/// EVM, gas accounting, transaction execution) is an execution engine's job, not this crate's.
fn process_execution_payload<C: Config + ExpConst>(
    cached: &mut CachedBeaconState<C>,
    payload: &ExecutionPayload<C>,
    spec: &ChainSpec,
) -> Result<(), Error> {
    let state = cached.state();
    let header = state
        .latest_execution_payload_header()
        .expect("bellatrix state always carries an execution payload header");

    let merge_complete = *header != ExecutionPayloadHeader::default();
    if merge_complete && payload.parent_hash != header.block_hash {
        return Err(invalid_operation(
            OperationKind::ExecutionPayload,
            "parent hash does not match the latest execution payload header",
        ));
    }

    let current_epoch = state.get_current_epoch();
    if payload.prev_randao != state.get_randao_mix(current_epoch).map_err(helper_error_to_stf)? {
        return Err(invalid_operation(
            OperationKind::ExecutionPayload,
            "prev_randao does not match the current epoch's randao mix",
        ));
    }

    let expected_timestamp =
        state.genesis_time() + (state.slot() - types::consts::GENESIS_SLOT) * spec.seconds_per_slot;
    if payload.timestamp != expected_timestamp {
        return Err(invalid_operation(
            OperationKind::ExecutionPayload,
            "timestamp does not match the expected slot time",
        ));
    }

    let new_header = ExecutionPayloadHeader::from_payload(payload);
    cached.state_mut()?.set_latest_execution_payload_header(new_header);

    Ok(())
}
