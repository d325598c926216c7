use typenum::{
    U16, U32, U64, U128, U256, U512, U1024, U2, U2048, U4, U4096, U8192, U16777216, U65536,
    U1048576, U1073741824, U1099511627776,
};

use crate::consts::{
    DOMAIN_BEACON_ATTESTER, DOMAIN_BEACON_PROPOSER, DOMAIN_DEPOSIT, DOMAIN_RANDAO,
    DOMAIN_SYNC_COMMITTEE, DOMAIN_VOLUNTARY_EXIT, FAR_FUTURE_EPOCH,
};
use crate::primitives::{DomainType, Epoch, Gwei, Slot, Version};

/// The array-length side of a fork preset (`mainnet` or `minimal`): every `VariableList` /
/// `FixedVector` / `BitList` bound in `types::types` and `beacon_state` is parameterized by one
/// of these associated types.
pub trait Config: 'static + Default + Send + Sync + Clone + PartialEq + Eq + std::fmt::Debug {
    type SlotsPerHistoricalRoot: typenum::Unsigned + Clone + Send + Sync;
    type HistoricalRootsLimit: typenum::Unsigned + Clone + Send + Sync;
    type SlotsPerEth1VotingPeriod: typenum::Unsigned + Clone + Send + Sync;
    type ValidatorRegistryLimit: typenum::Unsigned + Clone + Send + Sync;
    type EpochsPerHistoricalVector: typenum::Unsigned + Clone + Send + Sync;
    type EpochsPerSlashingsVector: typenum::Unsigned + Clone + Send + Sync;
    type MaxValidatorsPerCommittee: typenum::Unsigned + Clone + Send + Sync;
    type MaxAttestationsPerEpoch: typenum::Unsigned + Clone + Send + Sync;
    type MaxProposerSlashings: typenum::Unsigned + Clone + Send + Sync;
    type MaxAttesterSlashings: typenum::Unsigned + Clone + Send + Sync;
    type MaxAttestations: typenum::Unsigned + Clone + Send + Sync;
    type MaxDeposits: typenum::Unsigned + Clone + Send + Sync;
    type MaxVoluntaryExits: typenum::Unsigned + Clone + Send + Sync;
    type SyncCommitteeSize: typenum::Unsigned + Clone + Send + Sync;
    type SyncCommitteeSubnetCount: typenum::Unsigned + Clone + Send + Sync;
    type MaxBytesPerTransaction: typenum::Unsigned + Clone + Send + Sync;
    type MaxTransactionsPerPayload: typenum::Unsigned + Clone + Send + Sync;
    type BytesPerLogsBloom: typenum::Unsigned + Clone + Send + Sync;
    type MaxExtraDataBytes: typenum::Unsigned + Clone + Send + Sync;

    const SLOTS_PER_EPOCH: u64;
    const EPOCHS_PER_SYNC_COMMITTEE_PERIOD: u64;

    fn slots_per_epoch() -> Slot {
        Self::SLOTS_PER_EPOCH
    }
}

/// Derived, non-typenum consensus constants, kept apart from `Config` so that a preset can
/// override a handful of plain numbers without having to restate every typenum bound.
pub trait ExpConst {
    fn far_future_epoch() -> Epoch {
        FAR_FUTURE_EPOCH
    }
    fn genesis_epoch() -> Epoch {
        0
    }
    fn min_seed_lookahead() -> u64 {
        1
    }
    fn max_seed_lookahead() -> u64 {
        4
    }
    fn shuffle_round_count() -> u64 {
        90
    }
    fn min_genesis_active_validator_count() -> u64 {
        16384
    }
    fn activation_exit_delay() -> u64 {
        4
    }
    fn churn_limit_quotient() -> u64 {
        65536
    }
    fn min_per_epoch_churn_limit() -> u64 {
        4
    }
    fn persistent_committee_period() -> u64 {
        2048
    }
    fn min_validator_withdrawability_delay() -> u64 {
        256
    }
    fn min_attestation_inclusion_delay() -> u64 {
        1
    }
    fn max_effective_balance() -> Gwei {
        32_000_000_000
    }
    fn ejection_balance() -> Gwei {
        16_000_000_000
    }
    fn effective_balance_increment() -> Gwei {
        1_000_000_000
    }
    fn base_reward_factor() -> u64 {
        64
    }
    fn min_epochs_to_inactivity_penalty() -> u64 {
        4
    }
    fn inactivity_penalty_quotient() -> u64 {
        1 << 26 // 67_108_864
    }
    fn inactivity_penalty_quotient_altair() -> u64 {
        3 * (1 << 24) // 50_331_648
    }
    fn proposer_reward_quotient() -> u64 {
        8
    }
    fn max_deposits() -> u64 {
        16
    }
    fn seconds_per_slot() -> u64 {
        12
    }
    fn target_committee_size() -> u64 {
        128
    }
    fn max_committees_per_slot() -> u64 {
        64
    }
    fn min_epochs_for_block_root_history() -> u64 {
        256
    }
    fn whistleblower_reward_quotient() -> u64 {
        512
    }
    fn min_slashing_penalty_quotient() -> u64 {
        128
    }

    fn domain_beacon_proposer() -> DomainType {
        DOMAIN_BEACON_PROPOSER
    }
    fn domain_beacon_attester() -> DomainType {
        DOMAIN_BEACON_ATTESTER
    }
    fn domain_randao() -> DomainType {
        DOMAIN_RANDAO
    }
    fn domain_deposit() -> DomainType {
        DOMAIN_DEPOSIT
    }
    fn domain_voluntary_exit() -> DomainType {
        DOMAIN_VOLUNTARY_EXIT
    }
    fn domain_sync_committee() -> DomainType {
        DOMAIN_SYNC_COMMITTEE
    }
}

/// Mainnet-sized preset. Array bounds match the mainnet consensus-spec preset.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Hash, serde::Serialize, serde::Deserialize)]
pub struct MainnetConfig;

impl Config for MainnetConfig {
    type SlotsPerHistoricalRoot = U8192;
    type HistoricalRootsLimit = U16777216;
    type SlotsPerEth1VotingPeriod = U65536;
    type ValidatorRegistryLimit = U1099511627776;
    type EpochsPerHistoricalVector = U65536;
    type EpochsPerSlashingsVector = U8192;
    type MaxValidatorsPerCommittee = U2048;
    type MaxAttestationsPerEpoch = U4096;
    type MaxProposerSlashings = U16;
    type MaxAttesterSlashings = U2;
    type MaxAttestations = U128;
    type MaxDeposits = U16;
    type MaxVoluntaryExits = U16;
    type SyncCommitteeSize = U512;
    type SyncCommitteeSubnetCount = U4;
    type MaxBytesPerTransaction = U1073741824;
    type MaxTransactionsPerPayload = U1048576;
    type BytesPerLogsBloom = U256;
    type MaxExtraDataBytes = U32;

    const SLOTS_PER_EPOCH: u64 = 32;
    const EPOCHS_PER_SYNC_COMMITTEE_PERIOD: u64 = 256;
}

impl ExpConst for MainnetConfig {}

/// A small preset used by spec tests and local devnets: shorter epochs, tiny committees.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Hash, serde::Serialize, serde::Deserialize)]
pub struct MinimalConfig;

impl Config for MinimalConfig {
    type SlotsPerHistoricalRoot = U64;
    type HistoricalRootsLimit = U16777216;
    type SlotsPerEth1VotingPeriod = U1024;
    type ValidatorRegistryLimit = U1099511627776;
    type EpochsPerHistoricalVector = U64;
    type EpochsPerSlashingsVector = U64;
    type MaxValidatorsPerCommittee = U2048;
    type MaxAttestationsPerEpoch = U1024;
    type MaxProposerSlashings = U16;
    type MaxAttesterSlashings = U2;
    type MaxAttestations = U128;
    type MaxDeposits = U16;
    type MaxVoluntaryExits = U16;
    type SyncCommitteeSize = U32;
    type SyncCommitteeSubnetCount = U4;
    type MaxBytesPerTransaction = U1073741824;
    type MaxTransactionsPerPayload = U1048576;
    type BytesPerLogsBloom = U256;
    type MaxExtraDataBytes = U32;

    const SLOTS_PER_EPOCH: u64 = 8;
    const EPOCHS_PER_SYNC_COMMITTEE_PERIOD: u64 = 8;
}

impl ExpConst for MinimalConfig {
    fn shuffle_round_count() -> u64 {
        10
    }
    fn min_genesis_active_validator_count() -> u64 {
        64
    }
}

/// Runtime, per-network configuration: the values that differ between mainnet, testnets, and
/// devnets without changing any SSZ container's maximum length — fork-epoch constants plus the
/// handful of genesis/versioning values needed to compute signature domains across upgrades.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainSpec {
    pub genesis_fork_version: Version,
    pub altair_fork_version: Version,
    pub altair_fork_epoch: Option<Epoch>,
    pub bellatrix_fork_version: Version,
    pub bellatrix_fork_epoch: Option<Epoch>,
    pub seconds_per_slot: u64,
    pub min_genesis_time: u64,
}

impl ChainSpec {
    /// The fork lookup block/epoch processing dispatches on.
    pub fn fork_name_at_epoch(&self, epoch: Epoch) -> crate::fork::ForkName {
        if self.bellatrix_fork_epoch.map_or(false, |fork_epoch| epoch >= fork_epoch) {
            crate::fork::ForkName::Bellatrix
        } else if self.altair_fork_epoch.map_or(false, |fork_epoch| epoch >= fork_epoch) {
            crate::fork::ForkName::Altair
        } else {
            crate::fork::ForkName::Phase0
        }
    }

    pub fn fork_name_at_slot<C: Config>(&self, slot: Slot) -> crate::fork::ForkName {
        self.fork_name_at_epoch(slot / C::SLOTS_PER_EPOCH)
    }

    /// `true` exactly at the first epoch of a fork, the one epoch boundary at which an upgrade
    /// must run immediately after the epoch transition completes.
    pub fn is_fork_boundary_epoch(&self, epoch: Epoch) -> bool {
        self.altair_fork_epoch == Some(epoch) || self.bellatrix_fork_epoch == Some(epoch)
    }

    pub fn mainnet() -> Self {
        Self {
            genesis_fork_version: Version::from([0, 0, 0, 0]),
            altair_fork_version: Version::from([1, 0, 0, 0]),
            altair_fork_epoch: Some(74_240),
            bellatrix_fork_version: Version::from([2, 0, 0, 0]),
            bellatrix_fork_epoch: Some(144_896),
            seconds_per_slot: 12,
            min_genesis_time: 1_606_824_000,
        }
    }

    /// A devnet-style config with every fork active from genesis, handy for tests that build a
    /// `BeaconState` directly in its final shape.
    pub fn minimal() -> Self {
        Self {
            genesis_fork_version: Version::from([0, 0, 0, 1]),
            altair_fork_version: Version::from([1, 0, 0, 1]),
            altair_fork_epoch: None,
            bellatrix_fork_version: Version::from([2, 0, 0, 1]),
            bellatrix_fork_epoch: None,
            seconds_per_slot: 6,
            min_genesis_time: 1_578_787_200,
        }
    }
}
