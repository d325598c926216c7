use crate::primitives::DomainType;

pub use crate::primitives::{Epoch, Gwei, Slot};

pub const BASE_REWARDS_PER_EPOCH: u64 = 4;
pub const GENESIS_EPOCH: Epoch = 0;
pub const GENESIS_SLOT: Slot = 0;
pub const JUSTIFICATION_BITS_LENGTH: usize = 4;
pub const SECONDS_PER_DAY: u64 = 86400;
pub const DEPOSIT_CONTRACT_TREE_DEPTH: u64 = 32;
pub const FAR_FUTURE_EPOCH: Epoch = Epoch::max_value();

pub type DepositContractTreeDepth = typenum::U32;
pub type JustificationBitsLength = typenum::U4;

// Domain types. Values match the consensus specs; deposits and voluntary exits are valid across
// forks, so their domain is computed directly from `compute_domain` rather than `get_domain`.
pub const DOMAIN_BEACON_PROPOSER: DomainType = 0x0000_0000;
pub const DOMAIN_BEACON_ATTESTER: DomainType = 0x0100_0000;
pub const DOMAIN_RANDAO: DomainType = 0x0200_0000;
pub const DOMAIN_DEPOSIT: DomainType = 0x0300_0000;
pub const DOMAIN_VOLUNTARY_EXIT: DomainType = 0x0400_0000;
pub const DOMAIN_SELECTION_PROOF: DomainType = 0x0500_0000;
pub const DOMAIN_AGGREGATE_AND_PROOF: DomainType = 0x0600_0000;
pub const DOMAIN_SYNC_COMMITTEE: DomainType = 0x0700_0000;
pub const DOMAIN_SYNC_COMMITTEE_SELECTION_PROOF: DomainType = 0x0800_0000;
pub const DOMAIN_CONTRIBUTION_AND_PROOF: DomainType = 0x0900_0000;
pub const DOMAIN_APPLICATION_MASK: DomainType = 0x0000_0001;

// Altair participation flag indices and their reward weights. `WEIGHT_DENOMINATOR` is the
// common denominator all four weights (the three flags plus the proposer's slice) are taken
// over.
pub const TIMELY_SOURCE_FLAG_INDEX: usize = 0;
pub const TIMELY_TARGET_FLAG_INDEX: usize = 1;
pub const TIMELY_HEAD_FLAG_INDEX: usize = 2;

pub const TIMELY_SOURCE_WEIGHT: u64 = 14;
pub const TIMELY_TARGET_WEIGHT: u64 = 26;
pub const TIMELY_HEAD_WEIGHT: u64 = 14;
pub const SYNC_REWARD_WEIGHT: u64 = 2;
pub const PROPOSER_WEIGHT: u64 = 8;
pub const WEIGHT_DENOMINATOR: u64 = 64;

pub const PARTICIPATION_FLAG_WEIGHTS: [u64; 3] =
    [TIMELY_SOURCE_WEIGHT, TIMELY_TARGET_WEIGHT, TIMELY_HEAD_WEIGHT];

pub const PROPOSER_REWARD_QUOTIENT: u64 = WEIGHT_DENOMINATOR / PROPOSER_WEIGHT;

pub const INACTIVITY_SCORE_BIAS: u64 = 4;
pub const INACTIVITY_SCORE_RECOVERY_RATE: u64 = 16;
