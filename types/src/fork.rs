use serde::{Deserialize, Serialize};
use ssz_new::{SszDecode, SszEncode};
use ssz_new_derive::{SszDecode, SszEncode};
use strum::{Display, EnumIter, EnumString};
use tree_hash_derive::TreeHash;

use crate::primitives::{Epoch, Version};

/// The tagged variant the driver dispatches block/epoch processing on, in ascending activation
/// order.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Display, EnumIter, EnumString,
)]
pub enum ForkName {
    Phase0,
    Altair,
    Bellatrix,
}

impl ForkName {
    /// All forks in ascending activation order.
    pub const ALL: [ForkName; 3] = [ForkName::Phase0, ForkName::Altair, ForkName::Bellatrix];

    pub fn next(self) -> Option<ForkName> {
        match self {
            ForkName::Phase0 => Some(ForkName::Altair),
            ForkName::Altair => Some(ForkName::Bellatrix),
            ForkName::Bellatrix => None,
        }
    }
}

#[derive(
    Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize, SszEncode, SszDecode, TreeHash,
)]
pub struct Fork {
    pub previous_version: Version,
    pub current_version: Version,
    pub epoch: Epoch,
}

/// The container `compute_fork_data_root` hashes: ties a signature domain to a specific fork
/// version and to the chain's genesis, so a signature valid on one chain can't replay on another.
#[derive(
    Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize, SszEncode, SszDecode, TreeHash,
)]
pub struct ForkData {
    pub current_version: Version,
    pub genesis_validators_root: crate::primitives::H256,
}
