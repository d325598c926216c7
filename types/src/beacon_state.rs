use serde::{Deserialize, Serialize};
use ssz_new_derive::{SszDecode, SszEncode};
use ssz_types::{BitVector, FixedVector, VariableList};
use std::cmp;
use std::convert::TryFrom;
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;
use typenum::marker_traits::Unsigned;

use crate::{config::*, consts, error::Error, primitives::*, types::*};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, SszEncode, SszDecode, TreeHash)]
pub struct BeaconStatePhase0<C: Config> {
    pub genesis_time: u64,
    pub genesis_validators_root: H256,
    pub slot: Slot,
    pub fork: Fork,

    pub latest_block_header: BeaconBlockHeader,
    pub block_roots: FixedVector<H256, C::SlotsPerHistoricalRoot>,
    pub state_roots: FixedVector<H256, C::SlotsPerHistoricalRoot>,
    pub historical_roots: VariableList<H256, C::HistoricalRootsLimit>,

    pub eth1_data: Eth1Data,
    pub eth1_data_votes: VariableList<Eth1Data, C::SlotsPerEth1VotingPeriod>,
    pub eth1_deposit_index: u64,

    pub validators: VariableList<Validator, C::ValidatorRegistryLimit>,
    pub balances: VariableList<u64, C::ValidatorRegistryLimit>,

    pub randao_mixes: FixedVector<H256, C::EpochsPerHistoricalVector>,

    pub slashings: FixedVector<u64, C::EpochsPerSlashingsVector>,

    pub justification_bits: BitVector<consts::JustificationBitsLength>,
    pub previous_justified_checkpoint: Checkpoint,
    pub current_justified_checkpoint: Checkpoint,
    pub finalized_checkpoint: Checkpoint,

    pub previous_epoch_attestations: VariableList<PendingAttestation<C>, C::MaxAttestationsPerEpoch>,
    pub current_epoch_attestations: VariableList<PendingAttestation<C>, C::MaxAttestationsPerEpoch>,
}

impl<C: Config> Default for BeaconStatePhase0<C> {
    fn default() -> Self {
        Self {
            genesis_time: Default::default(),
            genesis_validators_root: Default::default(),
            slot: Default::default(),
            fork: Default::default(),
            latest_block_header: Default::default(),
            block_roots: Default::default(),
            state_roots: Default::default(),
            historical_roots: Default::default(),
            eth1_data: Default::default(),
            eth1_data_votes: Default::default(),
            eth1_deposit_index: Default::default(),
            validators: Default::default(),
            balances: Default::default(),
            randao_mixes: Default::default(),
            slashings: Default::default(),
            justification_bits: BitVector::new(),
            previous_justified_checkpoint: Default::default(),
            current_justified_checkpoint: Default::default(),
            finalized_checkpoint: Default::default(),
            previous_epoch_attestations: Default::default(),
            current_epoch_attestations: Default::default(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, SszEncode, SszDecode, TreeHash)]
pub struct BeaconStateAltair<C: Config> {
    pub genesis_time: u64,
    pub genesis_validators_root: H256,
    pub slot: Slot,
    pub fork: Fork,

    pub latest_block_header: BeaconBlockHeader,
    pub block_roots: FixedVector<H256, C::SlotsPerHistoricalRoot>,
    pub state_roots: FixedVector<H256, C::SlotsPerHistoricalRoot>,
    pub historical_roots: VariableList<H256, C::HistoricalRootsLimit>,

    pub eth1_data: Eth1Data,
    pub eth1_data_votes: VariableList<Eth1Data, C::SlotsPerEth1VotingPeriod>,
    pub eth1_deposit_index: u64,

    pub validators: VariableList<Validator, C::ValidatorRegistryLimit>,
    pub balances: VariableList<u64, C::ValidatorRegistryLimit>,

    pub randao_mixes: FixedVector<H256, C::EpochsPerHistoricalVector>,

    pub slashings: FixedVector<u64, C::EpochsPerSlashingsVector>,

    pub justification_bits: BitVector<consts::JustificationBitsLength>,
    pub previous_justified_checkpoint: Checkpoint,
    pub current_justified_checkpoint: Checkpoint,
    pub finalized_checkpoint: Checkpoint,

    pub previous_epoch_participation: VariableList<ParticipationFlags, C::ValidatorRegistryLimit>,
    pub current_epoch_participation: VariableList<ParticipationFlags, C::ValidatorRegistryLimit>,
    pub inactivity_scores: VariableList<u64, C::ValidatorRegistryLimit>,
    pub current_sync_committee: SyncCommittee<C>,
    pub next_sync_committee: SyncCommittee<C>,
}

impl<C: Config> Default for BeaconStateAltair<C> {
    fn default() -> Self {
        Self {
            genesis_time: Default::default(),
            genesis_validators_root: Default::default(),
            slot: Default::default(),
            fork: Default::default(),
            latest_block_header: Default::default(),
            block_roots: Default::default(),
            state_roots: Default::default(),
            historical_roots: Default::default(),
            eth1_data: Default::default(),
            eth1_data_votes: Default::default(),
            eth1_deposit_index: Default::default(),
            validators: Default::default(),
            balances: Default::default(),
            randao_mixes: Default::default(),
            slashings: Default::default(),
            justification_bits: BitVector::new(),
            previous_justified_checkpoint: Default::default(),
            current_justified_checkpoint: Default::default(),
            finalized_checkpoint: Default::default(),
            previous_epoch_participation: Default::default(),
            current_epoch_participation: Default::default(),
            inactivity_scores: Default::default(),
            current_sync_committee: Default::default(),
            next_sync_committee: Default::default(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, SszEncode, SszDecode, TreeHash)]
pub struct BeaconStateBellatrix<C: Config> {
    pub genesis_time: u64,
    pub genesis_validators_root: H256,
    pub slot: Slot,
    pub fork: Fork,

    pub latest_block_header: BeaconBlockHeader,
    pub block_roots: FixedVector<H256, C::SlotsPerHistoricalRoot>,
    pub state_roots: FixedVector<H256, C::SlotsPerHistoricalRoot>,
    pub historical_roots: VariableList<H256, C::HistoricalRootsLimit>,

    pub eth1_data: Eth1Data,
    pub eth1_data_votes: VariableList<Eth1Data, C::SlotsPerEth1VotingPeriod>,
    pub eth1_deposit_index: u64,

    pub validators: VariableList<Validator, C::ValidatorRegistryLimit>,
    pub balances: VariableList<u64, C::ValidatorRegistryLimit>,

    pub randao_mixes: FixedVector<H256, C::EpochsPerHistoricalVector>,

    pub slashings: FixedVector<u64, C::EpochsPerSlashingsVector>,

    pub justification_bits: BitVector<consts::JustificationBitsLength>,
    pub previous_justified_checkpoint: Checkpoint,
    pub current_justified_checkpoint: Checkpoint,
    pub finalized_checkpoint: Checkpoint,

    pub previous_epoch_participation: VariableList<ParticipationFlags, C::ValidatorRegistryLimit>,
    pub current_epoch_participation: VariableList<ParticipationFlags, C::ValidatorRegistryLimit>,
    pub inactivity_scores: VariableList<u64, C::ValidatorRegistryLimit>,
    pub current_sync_committee: SyncCommittee<C>,
    pub next_sync_committee: SyncCommittee<C>,
    pub latest_execution_payload_header: ExecutionPayloadHeader<C>,
}

impl<C: Config> Default for BeaconStateBellatrix<C> {
    fn default() -> Self {
        Self {
            genesis_time: Default::default(),
            genesis_validators_root: Default::default(),
            slot: Default::default(),
            fork: Default::default(),
            latest_block_header: Default::default(),
            block_roots: Default::default(),
            state_roots: Default::default(),
            historical_roots: Default::default(),
            eth1_data: Default::default(),
            eth1_data_votes: Default::default(),
            eth1_deposit_index: Default::default(),
            validators: Default::default(),
            balances: Default::default(),
            randao_mixes: Default::default(),
            slashings: Default::default(),
            justification_bits: BitVector::new(),
            previous_justified_checkpoint: Default::default(),
            current_justified_checkpoint: Default::default(),
            finalized_checkpoint: Default::default(),
            previous_epoch_participation: Default::default(),
            current_epoch_participation: Default::default(),
            inactivity_scores: Default::default(),
            current_sync_committee: Default::default(),
            next_sync_committee: Default::default(),
            latest_execution_payload_header: Default::default(),
        }
    }
}

/// The state, one shape per fork. As with `BeaconBlockBody`, the fork is known from context
/// (slot plus the chain's configured fork schedule) rather than self-described.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum BeaconState<C: Config> {
    Phase0(BeaconStatePhase0<C>),
    Altair(BeaconStateAltair<C>),
    Bellatrix(BeaconStateBellatrix<C>),
}

impl<C: Config> Default for BeaconState<C> {
    fn default() -> Self {
        BeaconState::Phase0(BeaconStatePhase0::default())
    }
}

impl<C: Config> TreeHash for BeaconState<C> {
    fn tree_hash_type() -> tree_hash::TreeHashType {
        tree_hash::TreeHashType::Container
    }

    fn tree_hash_packed_encoding(&self) -> Vec<u8> {
        unreachable!("struct/enum container types should never be packed")
    }

    fn tree_hash_packing_factor() -> usize {
        unreachable!("struct/enum container types should never be packed")
    }

    fn tree_hash_root(&self) -> Vec<u8> {
        match self {
            Self::Phase0(state) => state.tree_hash_root(),
            Self::Altair(state) => state.tree_hash_root(),
            Self::Bellatrix(state) => state.tree_hash_root(),
        }
    }
}

macro_rules! common_field {
    ($self:expr, $field:ident) => {
        match $self {
            BeaconState::Phase0(state) => &state.$field,
            BeaconState::Altair(state) => &state.$field,
            BeaconState::Bellatrix(state) => &state.$field,
        }
    };
}

macro_rules! common_field_mut {
    ($self:expr, $field:ident) => {
        match $self {
            BeaconState::Phase0(state) => &mut state.$field,
            BeaconState::Altair(state) => &mut state.$field,
            BeaconState::Bellatrix(state) => &mut state.$field,
        }
    };
}

impl<C: Config> BeaconState<C> {
    pub fn slot(&self) -> Slot {
        *common_field!(self, slot)
    }

    pub fn set_slot(&mut self, slot: Slot) {
        *common_field_mut!(self, slot) = slot;
    }

    pub fn genesis_time(&self) -> u64 {
        *common_field!(self, genesis_time)
    }

    pub fn fork(&self) -> &Fork {
        common_field!(self, fork)
    }

    pub fn fork_mut(&mut self) -> &mut Fork {
        common_field_mut!(self, fork)
    }

    pub fn genesis_validators_root(&self) -> H256 {
        *common_field!(self, genesis_validators_root)
    }

    pub fn latest_block_header(&self) -> &BeaconBlockHeader {
        common_field!(self, latest_block_header)
    }

    pub fn latest_block_header_mut(&mut self) -> &mut BeaconBlockHeader {
        common_field_mut!(self, latest_block_header)
    }

    pub fn validators(&self) -> &VariableList<Validator, C::ValidatorRegistryLimit> {
        common_field!(self, validators)
    }

    pub fn validators_mut(&mut self) -> &mut VariableList<Validator, C::ValidatorRegistryLimit> {
        common_field_mut!(self, validators)
    }

    pub fn balances(&self) -> &VariableList<u64, C::ValidatorRegistryLimit> {
        common_field!(self, balances)
    }

    pub fn balances_mut(&mut self) -> &mut VariableList<u64, C::ValidatorRegistryLimit> {
        common_field_mut!(self, balances)
    }

    pub fn randao_mixes(&self) -> &FixedVector<H256, C::EpochsPerHistoricalVector> {
        common_field!(self, randao_mixes)
    }

    pub fn randao_mixes_mut(&mut self) -> &mut FixedVector<H256, C::EpochsPerHistoricalVector> {
        common_field_mut!(self, randao_mixes)
    }

    pub fn slashings(&self) -> &FixedVector<u64, C::EpochsPerSlashingsVector> {
        common_field!(self, slashings)
    }

    pub fn slashings_mut(&mut self) -> &mut FixedVector<u64, C::EpochsPerSlashingsVector> {
        common_field_mut!(self, slashings)
    }

    pub fn eth1_data(&self) -> &Eth1Data {
        common_field!(self, eth1_data)
    }

    pub fn eth1_data_mut(&mut self) -> &mut Eth1Data {
        common_field_mut!(self, eth1_data)
    }

    pub fn eth1_deposit_index(&self) -> u64 {
        *common_field!(self, eth1_deposit_index)
    }

    pub fn eth1_deposit_index_mut(&mut self) -> &mut u64 {
        common_field_mut!(self, eth1_deposit_index)
    }

    pub fn eth1_data_votes(&self) -> &VariableList<Eth1Data, C::SlotsPerEth1VotingPeriod> {
        common_field!(self, eth1_data_votes)
    }

    pub fn eth1_data_votes_mut(&mut self) -> &mut VariableList<Eth1Data, C::SlotsPerEth1VotingPeriod> {
        common_field_mut!(self, eth1_data_votes)
    }

    pub fn block_roots_mut(&mut self) -> &mut FixedVector<H256, C::SlotsPerHistoricalRoot> {
        common_field_mut!(self, block_roots)
    }

    pub fn state_roots_mut(&mut self) -> &mut FixedVector<H256, C::SlotsPerHistoricalRoot> {
        common_field_mut!(self, state_roots)
    }

    pub fn historical_roots_mut(&mut self) -> &mut VariableList<H256, C::HistoricalRootsLimit> {
        common_field_mut!(self, historical_roots)
    }

    pub fn justification_bits(&self) -> &BitVector<consts::JustificationBitsLength> {
        common_field!(self, justification_bits)
    }

    pub fn justification_bits_mut(&mut self) -> &mut BitVector<consts::JustificationBitsLength> {
        common_field_mut!(self, justification_bits)
    }

    pub fn previous_justified_checkpoint(&self) -> Checkpoint {
        *common_field!(self, previous_justified_checkpoint)
    }

    pub fn current_justified_checkpoint(&self) -> Checkpoint {
        *common_field!(self, current_justified_checkpoint)
    }

    pub fn finalized_checkpoint(&self) -> Checkpoint {
        *common_field!(self, finalized_checkpoint)
    }

    pub fn current_justified_checkpoint_mut(&mut self) -> &mut Checkpoint {
        common_field_mut!(self, current_justified_checkpoint)
    }

    pub fn previous_justified_checkpoint_mut(&mut self) -> &mut Checkpoint {
        common_field_mut!(self, previous_justified_checkpoint)
    }

    pub fn finalized_checkpoint_mut(&mut self) -> &mut Checkpoint {
        common_field_mut!(self, finalized_checkpoint)
    }

    /// Participation flags, for Altair and later. `None` on a `Phase0` state: callers that reach
    /// this on a `Phase0` state have a fork-dispatch bug, since phase0 tracks participation via
    /// `PendingAttestation` instead.
    pub fn previous_epoch_participation(
        &self,
    ) -> Option<&VariableList<ParticipationFlags, C::ValidatorRegistryLimit>> {
        match self {
            Self::Phase0(_) => None,
            Self::Altair(state) => Some(&state.previous_epoch_participation),
            Self::Bellatrix(state) => Some(&state.previous_epoch_participation),
        }
    }

    pub fn current_epoch_participation(
        &self,
    ) -> Option<&VariableList<ParticipationFlags, C::ValidatorRegistryLimit>> {
        match self {
            Self::Phase0(_) => None,
            Self::Altair(state) => Some(&state.current_epoch_participation),
            Self::Bellatrix(state) => Some(&state.current_epoch_participation),
        }
    }

    pub fn current_epoch_participation_mut(
        &mut self,
    ) -> Option<&mut VariableList<ParticipationFlags, C::ValidatorRegistryLimit>> {
        match self {
            Self::Phase0(_) => None,
            Self::Altair(state) => Some(&mut state.current_epoch_participation),
            Self::Bellatrix(state) => Some(&mut state.current_epoch_participation),
        }
    }

    pub fn previous_epoch_participation_mut(
        &mut self,
    ) -> Option<&mut VariableList<ParticipationFlags, C::ValidatorRegistryLimit>> {
        match self {
            Self::Phase0(_) => None,
            Self::Altair(state) => Some(&mut state.previous_epoch_participation),
            Self::Bellatrix(state) => Some(&mut state.previous_epoch_participation),
        }
    }

    pub fn inactivity_scores(&self) -> Option<&VariableList<u64, C::ValidatorRegistryLimit>> {
        match self {
            Self::Phase0(_) => None,
            Self::Altair(state) => Some(&state.inactivity_scores),
            Self::Bellatrix(state) => Some(&state.inactivity_scores),
        }
    }

    pub fn inactivity_scores_mut(&mut self) -> Option<&mut VariableList<u64, C::ValidatorRegistryLimit>> {
        match self {
            Self::Phase0(_) => None,
            Self::Altair(state) => Some(&mut state.inactivity_scores),
            Self::Bellatrix(state) => Some(&mut state.inactivity_scores),
        }
    }

    pub fn current_sync_committee(&self) -> Option<&SyncCommittee<C>> {
        match self {
            Self::Phase0(_) => None,
            Self::Altair(state) => Some(&state.current_sync_committee),
            Self::Bellatrix(state) => Some(&state.current_sync_committee),
        }
    }

    pub fn next_sync_committee(&self) -> Option<&SyncCommittee<C>> {
        match self {
            Self::Phase0(_) => None,
            Self::Altair(state) => Some(&state.next_sync_committee),
            Self::Bellatrix(state) => Some(&state.next_sync_committee),
        }
    }

    pub fn set_sync_committees(&mut self, current: SyncCommittee<C>, next: SyncCommittee<C>) {
        match self {
            Self::Phase0(_) => {}
            Self::Altair(state) => {
                state.current_sync_committee = current;
                state.next_sync_committee = next;
            }
            Self::Bellatrix(state) => {
                state.current_sync_committee = current;
                state.next_sync_committee = next;
            }
        }
    }

    pub fn latest_execution_payload_header(&self) -> Option<&ExecutionPayloadHeader<C>> {
        match self {
            Self::Phase0(_) | Self::Altair(_) => None,
            Self::Bellatrix(state) => Some(&state.latest_execution_payload_header),
        }
    }

    pub fn set_latest_execution_payload_header(&mut self, header: ExecutionPayloadHeader<C>) {
        if let Self::Bellatrix(state) = self {
            state.latest_execution_payload_header = header;
        }
    }

    pub fn previous_epoch_attestations(
        &self,
    ) -> Option<&VariableList<PendingAttestation<C>, C::MaxAttestationsPerEpoch>> {
        match self {
            Self::Phase0(state) => Some(&state.previous_epoch_attestations),
            Self::Altair(_) | Self::Bellatrix(_) => None,
        }
    }

    pub fn current_epoch_attestations(
        &self,
    ) -> Option<&VariableList<PendingAttestation<C>, C::MaxAttestationsPerEpoch>> {
        match self {
            Self::Phase0(state) => Some(&state.current_epoch_attestations),
            Self::Altair(_) | Self::Bellatrix(_) => None,
        }
    }

    pub fn current_epoch_attestations_mut(
        &mut self,
    ) -> Option<&mut VariableList<PendingAttestation<C>, C::MaxAttestationsPerEpoch>> {
        match self {
            Self::Phase0(state) => Some(&mut state.current_epoch_attestations),
            Self::Altair(_) | Self::Bellatrix(_) => None,
        }
    }

    pub fn previous_epoch_attestations_mut(
        &mut self,
    ) -> Option<&mut VariableList<PendingAttestation<C>, C::MaxAttestationsPerEpoch>> {
        match self {
            Self::Phase0(state) => Some(&mut state.previous_epoch_attestations),
            Self::Altair(_) | Self::Bellatrix(_) => None,
        }
    }

    pub fn compute_activation_exit_epoch(&self, epoch: Epoch) -> Epoch
    where
        C: ExpConst,
    {
        epoch + 1 + C::activation_exit_delay()
    }

    pub fn get_block_root_at_slot(&self, slot: Slot) -> Result<H256, Error> {
        let current_slot = self.slot();
        if !(slot < current_slot && current_slot <= slot + C::SlotsPerHistoricalRoot::to_u64()) {
            return Err(Error::SlotOutOfRange);
        }

        match usize::try_from(slot % C::SlotsPerHistoricalRoot::to_u64()) {
            Err(_err) => Err(Error::IndexOutOfRange),
            Ok(id) => Ok(common_field!(self, block_roots)[id]),
        }
    }

    pub fn get_block_root(&self, epoch: Epoch) -> Result<H256, Error> {
        self.get_block_root_at_slot(self.compute_start_slot_of_epoch(epoch))
    }

    pub fn get_active_validator_indices(&self, epoch: Epoch) -> Vec<ValidatorIndex> {
        self.validators()
            .iter()
            .enumerate()
            .filter(|(_, validator)| validator.is_active_at(epoch))
            .map(|(index, _)| index as u64)
            .collect()
    }

    pub fn increase_balance(&mut self, index: ValidatorIndex, delta: Gwei) {
        if let Ok(id) = usize::try_from(index) {
            self.balances_mut()[id] += delta;
        }
    }

    pub fn decrease_balance(&mut self, index: ValidatorIndex, delta: Gwei) {
        if let Ok(id) = usize::try_from(index) {
            let balances = self.balances_mut();
            balances[id] = balances[id].saturating_sub(delta);
        }
    }

    pub fn get_current_epoch(&self) -> Epoch {
        self.slot() / C::SLOTS_PER_EPOCH
    }

    pub fn get_previous_epoch(&self) -> Epoch
    where
        C: ExpConst,
    {
        let current_epoch = self.get_current_epoch();
        let genesis_epoch = C::genesis_epoch();

        if current_epoch > genesis_epoch {
            current_epoch - 1
        } else {
            genesis_epoch
        }
    }

    pub fn get_randao_mix(&self, epoch: Epoch) -> Result<H256, Error> {
        match usize::try_from(epoch) {
            Err(_err) => Err(Error::IndexOutOfRange),
            Ok(id) => Ok(common_field!(self, randao_mixes)[id % C::EpochsPerHistoricalVector::to_usize()]),
        }
    }

    pub fn get_validator_churn_limit(&self) -> Result<u64, Error>
    where
        C: ExpConst,
    {
        let active_validator_indices = self.get_active_validator_indices(self.get_current_epoch());

        Ok(cmp::max(
            C::min_per_epoch_churn_limit(),
            active_validator_indices.len() as u64 / C::churn_limit_quotient(),
        ))
    }

    pub fn get_total_balance(&self, indices: &[ValidatorIndex]) -> Result<u64, Error> {
        let mut sum = 0;
        for index in indices {
            match usize::try_from(*index) {
                Err(_err) => return Err(Error::IndexOutOfRange),
                Ok(id) => sum += self.validators()[id].effective_balance,
            }
        }
        Ok(sum)
    }

    pub fn get_total_active_balance(&self) -> Result<u64, Error>
    where
        C: ExpConst,
    {
        self.get_total_balance(&self.get_active_validator_indices(self.get_current_epoch()))
    }

    pub fn compute_start_slot_of_epoch(&self, epoch: Epoch) -> Slot {
        epoch * C::SLOTS_PER_EPOCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_activation_exit_epoch() {
        let bs: BeaconState<MainnetConfig> = BeaconState::default();
        assert_eq!(bs.compute_activation_exit_epoch(0), 5);
    }

    #[test]
    fn get_block_root_at_slot() {
        let mut bs: BeaconState<MainnetConfig> = BeaconState::default();
        bs.set_slot(2);
        *bs.block_roots_mut() = FixedVector::from(vec![H256::from([0; 32]), H256::from([1; 32])]);
        assert_eq!(bs.get_block_root_at_slot(1), Ok(H256::from([1; 32])));
    }

    #[test]
    fn get_block_root_at_slot_slot_equals_beacon_state_slot() {
        let bs: BeaconState<MainnetConfig> = BeaconState::default();
        assert_eq!(
            bs.get_block_root_at_slot(0).err(),
            Some(Error::SlotOutOfRange),
        );
    }

    #[test]
    fn get_active_validator_indices() {
        let v1 = Validator {
            activation_epoch: 1,
            exit_epoch: 2,
            ..Validator::default()
        };
        let v2 = Validator {
            activation_epoch: 0,
            exit_epoch: 1,
            ..Validator::default()
        };
        let mut bs: BeaconState<MainnetConfig> = BeaconState::default();
        *bs.validators_mut() = VariableList::from(vec![v1, v2]);
        assert_eq!(bs.get_active_validator_indices(0), vec![1]);
    }

    #[test]
    fn increase_balance() {
        let mut bs: BeaconState<MainnetConfig> = BeaconState::default();
        *bs.balances_mut() = VariableList::from(vec![0]);
        bs.increase_balance(0, 1);
        assert_eq!(bs.balances()[0], 1);
    }

    #[test]
    fn test_decrease_balance() {
        let mut bs: BeaconState<MainnetConfig> = BeaconState::default();
        *bs.balances_mut() = VariableList::from(vec![5]);
        bs.decrease_balance(0, 3);
        assert_eq!(bs.balances()[0], 2);
    }

    #[test]
    fn test_decrease_balance_to_negative() {
        let mut bs: BeaconState<MainnetConfig> = BeaconState::default();
        *bs.balances_mut() = VariableList::from(vec![0]);
        bs.decrease_balance(0, 1);
        assert_eq!(bs.balances()[0], 0);
    }

    #[test]
    fn get_current_epoch() {
        let mut bs: BeaconState<MainnetConfig> = BeaconState::default();
        bs.set_slot(9);
        assert_eq!(bs.get_current_epoch(), 0);
    }

    #[test]
    fn test_get_previous_epoch() {
        let mut bs: BeaconState<MainnetConfig> = BeaconState::default();
        bs.set_slot(17 * 32);
        assert_eq!(bs.get_previous_epoch(), 16);
    }

    #[test]
    fn test_get_previous_epoch_genesis() {
        let bs: BeaconState<MainnetConfig> = BeaconState::default();
        assert_eq!(bs.get_previous_epoch(), MainnetConfig::genesis_epoch());
    }

    #[test]
    fn test_compute_start_slot_of_epoch() {
        let bs: BeaconState<MainnetConfig> = BeaconState::default();
        assert_eq!(
            bs.compute_start_slot_of_epoch(10_u64),
            <MainnetConfig as Config>::SLOTS_PER_EPOCH * 10_u64
        )
    }

    #[test]
    fn test_get_total_active_balance() {
        let v1 = Validator {
            effective_balance: 10,
            activation_epoch: 0,
            exit_epoch: 2,
            ..Validator::default()
        };
        let v2 = Validator {
            effective_balance: 2,
            activation_epoch: 0,
            exit_epoch: 1,
            ..Validator::default()
        };
        let mut bs: BeaconState<MainnetConfig> = BeaconState::default();
        *bs.validators_mut() = VariableList::from(vec![v1, v2]);

        assert_eq!(bs.get_total_active_balance(), Ok(12_u64))
    }

    #[test]
    fn test_get_active_balance() {
        let v1 = Validator {
            effective_balance: 11,
            ..Validator::default()
        };
        let v2 = Validator {
            effective_balance: 7,
            ..Validator::default()
        };
        let v3 = Validator {
            effective_balance: 5,
            ..Validator::default()
        };
        let mut bs: BeaconState<MainnetConfig> = BeaconState::default();
        *bs.validators_mut() = VariableList::from(vec![v1, v2, v3]);

        assert_eq!(bs.get_total_balance(&[0, 2]), Ok(16_u64))
    }

    #[test]
    fn test_get_validator_churn_limit() {
        let v1 = Validator {
            effective_balance: 11,
            activation_epoch: 0,
            exit_epoch: 2,
            ..Validator::default()
        };
        let mut bs: BeaconState<MainnetConfig> = BeaconState::default();
        *bs.validators_mut() = VariableList::from(vec![v1]);

        assert_eq!(
            bs.get_validator_churn_limit(),
            Ok(MainnetConfig::min_per_epoch_churn_limit())
        )
    }

    #[test]
    fn test_get_randao_mix() {
        let mut bs: BeaconState<MainnetConfig> = BeaconState::default();
        *bs.randao_mixes_mut() = FixedVector::from(vec![
            H256::from([5; 32]),
            H256::from([5; 32]),
            H256::from([5; 32]),
        ]);

        assert_eq!(bs.get_randao_mix(2), Ok(H256::from([5; 32])))
    }
}
