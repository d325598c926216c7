use thiserror::Error;
use types::primitives::{Slot, ValidatorIndex};

/// Which BLS signature set a non-proposer verification failure came from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SignatureSetKind {
    Attestation,
    ProposerSlashing,
    AttesterSlashing,
    VoluntaryExit,
    SyncAggregate,
    Randao,
    Deposit,
}

impl std::fmt::Display for SignatureSetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Attestation => "attestation",
            Self::ProposerSlashing => "proposer slashing",
            Self::AttesterSlashing => "attester slashing",
            Self::VoluntaryExit => "voluntary exit",
            Self::SyncAggregate => "sync aggregate",
            Self::Randao => "randao reveal",
            Self::Deposit => "deposit",
        };
        write!(f, "{}", name)
    }
}

/// Which per-block operation list, or other block-level check, a validation failure came from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperationKind {
    BlockHeader,
    Randao,
    Eth1Data,
    ProposerSlashing,
    AttesterSlashing,
    Attestation,
    Deposit,
    VoluntaryExit,
    SyncAggregate,
    ExecutionPayload,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::BlockHeader => "block header",
            Self::Randao => "randao reveal",
            Self::Eth1Data => "eth1 data",
            Self::ProposerSlashing => "proposer slashings",
            Self::AttesterSlashing => "attester slashings",
            Self::Attestation => "attestations",
            Self::Deposit => "deposits",
            Self::VoluntaryExit => "voluntary exits",
            Self::SyncAggregate => "sync aggregate",
            Self::ExecutionPayload => "execution payload",
        };
        write!(f, "{}", name)
    }
}

/// Which representation a `CachedBeaconState` is carrying its validator-indexed fields in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StorageMode {
    Transient,
    Persistent,
}

/// The state transition function's own tagged error type. Every variant carries the payload a
/// caller needs to log or surface without re-deriving it from the failed state: the function
/// never mutates the caller's `pre` state, so any of these leaves it untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("target slot {target} is not later than the current slot {current}")]
    SlotInPast { current: Slot, target: Slot },

    #[error("block at slot {slot} has an invalid proposer signature (proposer index {proposer_index})")]
    InvalidBlockSignature {
        slot: Slot,
        proposer_index: ValidatorIndex,
    },

    #[error("{kind} signature at index {index} failed verification")]
    InvalidSignature {
        kind: SignatureSetKind,
        index: usize,
    },

    #[error("state root mismatch at slot {slot}: block claims {expected_hex}, computed {actual_hex}")]
    InvalidStateRoot {
        slot: Slot,
        expected_hex: String,
        actual_hex: String,
    },

    #[error("{kind} exceeds its limit of {limit} (got {got})")]
    OperationLimitExceeded {
        kind: OperationKind,
        limit: usize,
        got: usize,
    },

    #[error("invalid {kind} operation: {reason}")]
    InvalidOperation { kind: OperationKind, reason: String },

    #[error("expected cached beacon state in {expected:?} mode, found {actual:?}")]
    BadStateMode {
        expected: StorageMode,
        actual: StorageMode,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
