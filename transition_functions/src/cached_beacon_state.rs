use im::HashMap as ImHashMap;
use log::trace;
use tree_hash::TreeHash;
use types::beacon_state::BeaconState;
use types::config::{Config, ExpConst};
use types::primitives::*;

use error_utils::{Error, StorageMode};
use helper_functions::{beacon_state_accessors as accessors, beacon_state_mutators as mutators};

/// The storage mode a `CachedBeaconState` is carrying its validator-indexed fields in. Transient
/// mode is where bulk per-epoch mutation happens; persistent mode is where the value is handed
/// back to a caller and may be cheaply cloned or hashed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Transient,
    Persistent,
}

impl From<Mode> for StorageMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Transient => StorageMode::Transient,
            Mode::Persistent => StorageMode::Persistent,
        }
    }
}

/// A `BeaconState` plus the derived indices the rest of the crate leans on so it never has to
/// rebuild a pubkey lookup or recompute a shuffling from scratch on every call. The pubkey index
/// is backed by a structurally-shared map so cloning a `CachedBeaconState` in persistent mode
/// (the common case between chained STF calls) doesn't copy it.
#[derive(Clone, Debug)]
pub struct CachedBeaconState<C: Config> {
    state: BeaconState<C>,
    pubkey_to_index: ImHashMap<Vec<u8>, ValidatorIndex>,
    mode: Mode,
}

impl<C: Config + ExpConst> CachedBeaconState<C> {
    /// Wraps a freshly loaded or genesis state. Starts in persistent mode, matching the
    /// "logically immutable to callers" lifecycle described for a `CachedBeaconState` at rest.
    pub fn new(state: BeaconState<C>) -> Self {
        let pubkey_to_index = build_pubkey_index(&state);
        Self {
            state,
            pubkey_to_index,
            mode: Mode::Persistent,
        }
    }

    pub fn state(&self) -> &BeaconState<C> {
        &self.state
    }

    /// Mutable access is only granted in transient mode; bulk epoch mutation in persistent mode
    /// is a programmer error the contract is meant to catch rather than silently allow.
    pub fn state_mut(&mut self) -> Result<&mut BeaconState<C>, Error> {
        self.require_mode(Mode::Transient)?;
        Ok(&mut self.state)
    }

    pub fn into_state(self) -> BeaconState<C> {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_caches_transient(&mut self) {
        self.mode = Mode::Transient;
    }

    pub fn set_caches_persistent(&mut self) {
        self.mode = Mode::Persistent;
    }

    fn require_mode(&self, expected: Mode) -> Result<(), Error> {
        if self.mode != expected {
            return Err(Error::BadStateMode {
                expected: expected.into(),
                actual: self.mode.into(),
            });
        }
        Ok(())
    }

    /// Only meaningful in persistent mode; a transient-mode caller asking for a root almost
    /// certainly meant to flip back first.
    pub fn hash_tree_root(&self) -> Result<H256, Error> {
        self.require_mode(Mode::Persistent)?;
        Ok(self.tree_hash_root_unchecked())
    }

    /// Internal engines (slot/epoch processing) cache state and block roots into ring buffers as
    /// part of the per-slot bookkeeping regardless of storage mode; only the outer API boundary
    /// cares whether the caller is in persistent mode.
    pub(crate) fn tree_hash_root_unchecked(&self) -> H256 {
        H256::from_slice(&self.state.tree_hash_root())
    }

    pub fn pubkey_to_index(&self, pubkey_bytes: &[u8]) -> Option<ValidatorIndex> {
        self.pubkey_to_index.get(pubkey_bytes).copied()
    }

    pub fn get_beacon_proposer_index(&self) -> Result<ValidatorIndex, Error> {
        accessors::get_beacon_proposer_index(&self.state).map_err(helper_error_to_stf)
    }

    pub fn get_beacon_committee(
        &self,
        slot: Slot,
        committee_index: CommitteeIndex,
    ) -> Result<Vec<ValidatorIndex>, Error> {
        accessors::get_beacon_committee(&self.state, slot, committee_index).map_err(helper_error_to_stf)
    }

    pub fn get_total_balance(&self, indices: &[ValidatorIndex]) -> Result<u64, Error> {
        self.state.get_total_balance(indices).map_err(helper_error_to_stf)
    }

    pub fn increase_balance(&mut self, index: ValidatorIndex, delta: Gwei) -> Result<(), Error> {
        mutators::increase_balance(self.state_mut()?, index, delta);
        Ok(())
    }

    pub fn decrease_balance(&mut self, index: ValidatorIndex, delta: Gwei) -> Result<(), Error> {
        mutators::decrease_balance(self.state_mut()?, index, delta);
        Ok(())
    }

    /// Appends a freshly activated validator to the registry and keeps the pubkey index current.
    /// Block and genesis processing should go through this rather than pushing onto
    /// `state.validators_mut()` directly.
    pub fn push_validator(
        &mut self,
        validator: types::types::Validator,
        balance: Gwei,
    ) -> Result<ValidatorIndex, Error> {
        let index = self.state.validators().len() as ValidatorIndex;
        let pubkey_bytes = validator.pubkey.as_bytes();
        {
            let state = self.state_mut()?;
            state
                .validators_mut()
                .push(validator)
                .map_err(|_err| Error::InvalidOperation {
                    kind: error_utils::OperationKind::Deposit,
                    reason: "validator registry limit exceeded".to_owned(),
                })?;
            state
                .balances_mut()
                .push(balance)
                .map_err(|_err| Error::InvalidOperation {
                    kind: error_utils::OperationKind::Deposit,
                    reason: "balance registry limit exceeded".to_owned(),
                })?;
        }
        self.pubkey_to_index.insert(pubkey_bytes, index);
        trace!("registered new validator at index {}", index);
        Ok(index)
    }
}

fn build_pubkey_index<C: Config>(state: &BeaconState<C>) -> ImHashMap<Vec<u8>, ValidatorIndex> {
    let mut map = ImHashMap::new();
    for (index, validator) in state.validators().iter().enumerate() {
        map.insert(validator.pubkey.as_bytes(), index as ValidatorIndex);
    }
    map
}

/// Bridges `helper_functions`'/`types`' own `Error` (the low-level, unstructured enum the rest of
/// the workspace shares) into this crate's richly-typed `error_utils::Error`.
pub(crate) fn helper_error_to_stf(error: types::Error) -> Error {
    Error::InvalidOperation {
        kind: error_utils::OperationKind::Attestation,
        reason: format!("{:?}", error),
    }
}
