#![allow(clippy::default_trait_access)]

use bls::PublicKeyBytes;
use ethereum_types::H256 as Hash256;
use serde::{Deserialize, Serialize};
use ssz_new_derive::{SszDecode, SszEncode};
use ssz_types::{BitList, BitVector, FixedVector, VariableList};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;
use typenum::{Sum, U1};

use crate::config::*;
use crate::consts;
use crate::primitives::*;

pub use crate::fork::Fork;

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct Attestation<C: Config> {
    pub aggregation_bits: BitList<C::MaxValidatorsPerCommittee>,
    pub data: AttestationData,
    pub signature: AggregateSignatureBytes,
}

#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    Hash,
    Deserialize,
    Serialize,
    SszEncode,
    SszDecode,
    TreeHash,
    Default,
)]
pub struct AttestationData {
    pub slot: Slot,
    pub index: CommitteeIndex,
    pub beacon_block_root: H256,
    pub source: Checkpoint,
    pub target: Checkpoint,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct AttesterSlashing<C: Config> {
    pub attestation_1: IndexedAttestation<C>,
    pub attestation_2: IndexedAttestation<C>,
}

#[derive(
    Clone, PartialEq, Debug, Default, Deserialize, Serialize, SszEncode, SszDecode, TreeHash,
)]
pub struct BeaconBlock<C: Config> {
    pub slot: Slot,
    pub parent_root: H256,
    pub state_root: H256,
    pub body: BeaconBlockBody<C>,
}

/// The body of a block, one shape per fork. Decoding picks the shape based on the slot the
/// caller already knows the fork for; this type does not self-describe its own fork.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub enum BeaconBlockBody<C: Config> {
    Phase0(BeaconBlockBodyPhase0<C>),
    Altair(BeaconBlockBodyAltair<C>),
    Bellatrix(BeaconBlockBodyBellatrix<C>),
}

impl<C: Config> Default for BeaconBlockBody<C> {
    fn default() -> Self {
        BeaconBlockBody::Phase0(BeaconBlockBodyPhase0::default())
    }
}

impl<C: Config> BeaconBlockBody<C> {
    pub fn randao_reveal(&self) -> &SignatureBytes {
        match self {
            Self::Phase0(body) => &body.randao_reveal,
            Self::Altair(body) => &body.randao_reveal,
            Self::Bellatrix(body) => &body.randao_reveal,
        }
    }

    pub fn eth1_data(&self) -> &Eth1Data {
        match self {
            Self::Phase0(body) => &body.eth1_data,
            Self::Altair(body) => &body.eth1_data,
            Self::Bellatrix(body) => &body.eth1_data,
        }
    }

    pub fn graffiti(&self) -> &H256 {
        match self {
            Self::Phase0(body) => &body.graffiti,
            Self::Altair(body) => &body.graffiti,
            Self::Bellatrix(body) => &body.graffiti,
        }
    }

    pub fn proposer_slashings(&self) -> &VariableList<ProposerSlashing, C::MaxProposerSlashings> {
        match self {
            Self::Phase0(body) => &body.proposer_slashings,
            Self::Altair(body) => &body.proposer_slashings,
            Self::Bellatrix(body) => &body.proposer_slashings,
        }
    }

    pub fn attester_slashings(
        &self,
    ) -> &VariableList<AttesterSlashing<C>, C::MaxAttesterSlashings> {
        match self {
            Self::Phase0(body) => &body.attester_slashings,
            Self::Altair(body) => &body.attester_slashings,
            Self::Bellatrix(body) => &body.attester_slashings,
        }
    }

    pub fn attestations(&self) -> &VariableList<Attestation<C>, C::MaxAttestations> {
        match self {
            Self::Phase0(body) => &body.attestations,
            Self::Altair(body) => &body.attestations,
            Self::Bellatrix(body) => &body.attestations,
        }
    }

    pub fn deposits(&self) -> &VariableList<Deposit, C::MaxDeposits> {
        match self {
            Self::Phase0(body) => &body.deposits,
            Self::Altair(body) => &body.deposits,
            Self::Bellatrix(body) => &body.deposits,
        }
    }

    pub fn voluntary_exits(&self) -> &VariableList<SignedVoluntaryExit, C::MaxVoluntaryExits> {
        match self {
            Self::Phase0(body) => &body.voluntary_exits,
            Self::Altair(body) => &body.voluntary_exits,
            Self::Bellatrix(body) => &body.voluntary_exits,
        }
    }

    pub fn sync_aggregate(&self) -> Option<&SyncAggregate<C>> {
        match self {
            Self::Phase0(_) => None,
            Self::Altair(body) => Some(&body.sync_aggregate),
            Self::Bellatrix(body) => Some(&body.sync_aggregate),
        }
    }

    pub fn execution_payload(&self) -> Option<&ExecutionPayload<C>> {
        match self {
            Self::Phase0(_) | Self::Altair(_) => None,
            Self::Bellatrix(body) => Some(&body.execution_payload),
        }
    }
}

impl<C: Config> TreeHash for BeaconBlockBody<C> {
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
            Self::Phase0(body) => body.tree_hash_root(),
            Self::Altair(body) => body.tree_hash_root(),
            Self::Bellatrix(body) => body.tree_hash_root(),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct BeaconBlockBodyPhase0<C: Config> {
    pub randao_reveal: SignatureBytes,
    pub eth1_data: Eth1Data,
    pub graffiti: H256,
    pub proposer_slashings: VariableList<ProposerSlashing, C::MaxProposerSlashings>,
    pub attester_slashings: VariableList<AttesterSlashing<C>, C::MaxAttesterSlashings>,
    pub attestations: VariableList<Attestation<C>, C::MaxAttestations>,
    pub deposits: VariableList<Deposit, C::MaxDeposits>,
    pub voluntary_exits: VariableList<SignedVoluntaryExit, C::MaxVoluntaryExits>,
}

impl<C: Config> Default for BeaconBlockBodyPhase0<C> {
    fn default() -> Self {
        Self {
            randao_reveal: SignatureBytes::empty(),
            eth1_data: Default::default(),
            graffiti: Default::default(),
            proposer_slashings: Default::default(),
            attester_slashings: Default::default(),
            attestations: Default::default(),
            deposits: Default::default(),
            voluntary_exits: Default::default(),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct BeaconBlockBodyAltair<C: Config> {
    pub randao_reveal: SignatureBytes,
    pub eth1_data: Eth1Data,
    pub graffiti: H256,
    pub proposer_slashings: VariableList<ProposerSlashing, C::MaxProposerSlashings>,
    pub attester_slashings: VariableList<AttesterSlashing<C>, C::MaxAttesterSlashings>,
    pub attestations: VariableList<Attestation<C>, C::MaxAttestations>,
    pub deposits: VariableList<Deposit, C::MaxDeposits>,
    pub voluntary_exits: VariableList<SignedVoluntaryExit, C::MaxVoluntaryExits>,
    pub sync_aggregate: SyncAggregate<C>,
}

impl<C: Config> Default for BeaconBlockBodyAltair<C> {
    fn default() -> Self {
        Self {
            randao_reveal: SignatureBytes::empty(),
            eth1_data: Default::default(),
            graffiti: Default::default(),
            proposer_slashings: Default::default(),
            attester_slashings: Default::default(),
            attestations: Default::default(),
            deposits: Default::default(),
            voluntary_exits: Default::default(),
            sync_aggregate: Default::default(),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct BeaconBlockBodyBellatrix<C: Config> {
    pub randao_reveal: SignatureBytes,
    pub eth1_data: Eth1Data,
    pub graffiti: H256,
    pub proposer_slashings: VariableList<ProposerSlashing, C::MaxProposerSlashings>,
    pub attester_slashings: VariableList<AttesterSlashing<C>, C::MaxAttesterSlashings>,
    pub attestations: VariableList<Attestation<C>, C::MaxAttestations>,
    pub deposits: VariableList<Deposit, C::MaxDeposits>,
    pub voluntary_exits: VariableList<SignedVoluntaryExit, C::MaxVoluntaryExits>,
    pub sync_aggregate: SyncAggregate<C>,
    pub execution_payload: ExecutionPayload<C>,
}

impl<C: Config> Default for BeaconBlockBodyBellatrix<C> {
    fn default() -> Self {
        Self {
            randao_reveal: SignatureBytes::empty(),
            eth1_data: Default::default(),
            graffiti: Default::default(),
            proposer_slashings: Default::default(),
            attester_slashings: Default::default(),
            attestations: Default::default(),
            deposits: Default::default(),
            voluntary_exits: Default::default(),
            sync_aggregate: Default::default(),
            execution_payload: Default::default(),
        }
    }
}

#[derive(
    Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize, SszEncode, SszDecode, TreeHash,
)]
pub struct BeaconBlockHeader {
    pub slot: Slot,
    pub parent_root: H256,
    pub state_root: H256,
    pub body_root: H256,
}

impl BeaconBlockHeader {
    pub fn canonical_root(&self) -> Hash256 {
        Hash256::from_slice(&self.tree_hash_root()[..])
    }
}

#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Debug,
    Default,
    Hash,
    Deserialize,
    Serialize,
    SszEncode,
    SszDecode,
    TreeHash,
)]
pub struct Checkpoint {
    pub epoch: Epoch,
    pub root: H256,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct Deposit {
    pub proof: FixedVector<H256, Sum<consts::DepositContractTreeDepth, U1>>,
    pub data: DepositData,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct DepositData {
    pub pubkey: PublicKeyBytes,
    pub withdrawal_credentials: H256,
    pub amount: u64,
    pub signature: SignatureBytes,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct DepositMessage {
    pub pubkey: PublicKeyBytes,
    pub withdrawal_credentials: H256,
    pub amount: Gwei,
}

#[derive(
    Clone, PartialEq, Eq, Debug, Default, Deserialize, Serialize, SszEncode, SszDecode, TreeHash,
)]
pub struct Eth1Data {
    pub deposit_root: H256,
    pub deposit_count: u64,
    pub block_hash: H256,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct HistoricalBatch<C: Config> {
    pub block_roots: FixedVector<H256, C::SlotsPerHistoricalRoot>,
    pub state_roots: FixedVector<H256, C::SlotsPerHistoricalRoot>,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct IndexedAttestation<C: Config> {
    pub attesting_indices: VariableList<u64, C::MaxValidatorsPerCommittee>,
    pub data: AttestationData,
    pub signature: AggregateSignatureBytes,
}

impl<C: Config> Default for IndexedAttestation<C> {
    fn default() -> Self {
        Self {
            attesting_indices: Default::default(),
            data: Default::default(),
            signature: AggregateSignatureBytes::empty(),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct PendingAttestation<C: Config> {
    pub aggregation_bits: BitList<C::MaxValidatorsPerCommittee>,
    pub data: AttestationData,
    pub inclusion_delay: u64,
    pub proposer_index: u64,
}

impl<C> Default for PendingAttestation<C>
where
    C: Config,
{
    fn default() -> Self {
        #[allow(clippy::default_trait_access)]
        Self {
            aggregation_bits: BitList::with_capacity(2048).expect("Error initializing BitList"),
            data: Default::default(),
            inclusion_delay: Default::default(),
            proposer_index: Default::default(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct ProposerSlashing {
    pub proposer_index: u64,
    pub signed_header_1: SignedBeaconBlockHeader,
    pub signed_header_2: SignedBeaconBlockHeader,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct SignedBeaconBlock<C: Config> {
    pub message: BeaconBlock<C>,
    pub signature: SignatureBytes,
}

impl<C: Config> Default for SignedBeaconBlock<C> {
    fn default() -> Self {
        Self {
            message: Default::default(),
            signature: SignatureBytes::empty(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct SignedBeaconBlockHeader {
    pub message: BeaconBlockHeader,
    pub signature: SignatureBytes,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct SignedVoluntaryExit {
    pub message: VoluntaryExit,
    pub signature: SignatureBytes,
}

#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Debug,
    Default,
    Deserialize,
    Serialize,
    SszEncode,
    SszDecode,
    TreeHash,
)]
pub struct SigningRoot {
    pub object_root: H256,
    pub domain: Domain,
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct Validator {
    pub pubkey: PublicKeyBytes,
    pub withdrawal_credentials: H256,
    pub effective_balance: u64,
    pub slashed: bool,
    pub activation_eligibility_epoch: Epoch,
    pub activation_epoch: Epoch,
    pub exit_epoch: Epoch,
    pub withdrawable_epoch: Epoch,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            pubkey: PublicKeyBytes::empty(),
            withdrawal_credentials: Default::default(),
            effective_balance: Default::default(),
            slashed: Default::default(),
            activation_eligibility_epoch: Default::default(),
            activation_epoch: Default::default(),
            exit_epoch: Default::default(),
            withdrawable_epoch: Default::default(),
        }
    }
}

impl Validator {
    pub fn is_active_at(&self, epoch: Epoch) -> bool {
        self.activation_epoch <= epoch && epoch < self.exit_epoch
    }

    pub fn is_slashable_at(&self, epoch: Epoch) -> bool {
        !self.slashed && self.activation_eligibility_epoch <= epoch && epoch < self.withdrawable_epoch
    }

    pub fn is_eligible_for_activation_queue<C: Config + ExpConst>(&self) -> bool {
        self.activation_eligibility_epoch == crate::consts::FAR_FUTURE_EPOCH
            && self.effective_balance == C::max_effective_balance()
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct VoluntaryExit {
    pub epoch: Epoch,
    pub validator_index: u64,
}

// --- Altair ---

/// A validator's sync committee membership public keys, refreshed once per sync-committee
/// period.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct SyncCommittee<C: Config> {
    pub pubkeys: FixedVector<PublicKeyBytes, C::SyncCommitteeSize>,
    pub aggregate_pubkey: PublicKeyBytes,
}

impl<C: Config> Default for SyncCommittee<C> {
    fn default() -> Self {
        Self {
            pubkeys: FixedVector::from_elem(PublicKeyBytes::empty()),
            aggregate_pubkey: PublicKeyBytes::empty(),
        }
    }
}

/// The aggregate sync-committee signature carried in a block body, with a bit set per
/// participating committee member.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct SyncAggregate<C: Config> {
    pub sync_committee_bits: BitVector<C::SyncCommitteeSize>,
    pub sync_committee_signature: AggregateSignatureBytes,
}

impl<C: Config> Default for SyncAggregate<C> {
    fn default() -> Self {
        Self {
            sync_committee_bits: BitVector::new(),
            sync_committee_signature: AggregateSignatureBytes::empty(),
        }
    }
}

impl<C: Config> SyncAggregate<C> {
    /// A `SyncAggregate` whose bitfield has no participants set, used when a block body carries
    /// no real sync contribution (e.g. in tests).
    pub fn empty() -> Self {
        Self::default()
    }
}

// --- Bellatrix ---

/// An opaque execution-layer transaction, carried as raw encoded bytes — the consensus layer
/// never decodes them.
pub type Transaction<C> = VariableList<u8, <C as Config>::MaxBytesPerTransaction>;

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct ExecutionPayload<C: Config> {
    pub parent_hash: H256,
    pub fee_recipient: ethereum_types::H160,
    pub state_root: H256,
    pub receipts_root: H256,
    pub logs_bloom: FixedVector<u8, C::BytesPerLogsBloom>,
    pub prev_randao: H256,
    pub block_number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: VariableList<u8, C::MaxExtraDataBytes>,
    pub base_fee_per_gas: ethereum_types::U256,
    pub block_hash: H256,
    pub transactions: VariableList<Transaction<C>, C::MaxTransactionsPerPayload>,
}

impl<C: Config> Default for ExecutionPayload<C> {
    fn default() -> Self {
        Self {
            parent_hash: Default::default(),
            fee_recipient: Default::default(),
            state_root: Default::default(),
            receipts_root: Default::default(),
            logs_bloom: Default::default(),
            prev_randao: Default::default(),
            block_number: Default::default(),
            gas_limit: Default::default(),
            gas_used: Default::default(),
            timestamp: Default::default(),
            extra_data: Default::default(),
            base_fee_per_gas: Default::default(),
            block_hash: Default::default(),
            transactions: Default::default(),
        }
    }
}

/// The header counterpart stored in `BeaconState`, carrying a transaction-list root instead of
/// the full transaction bodies.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize, SszEncode, SszDecode, TreeHash)]
pub struct ExecutionPayloadHeader<C: Config> {
    pub parent_hash: H256,
    pub fee_recipient: ethereum_types::H160,
    pub state_root: H256,
    pub receipts_root: H256,
    pub logs_bloom: FixedVector<u8, C::BytesPerLogsBloom>,
    pub prev_randao: H256,
    pub block_number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
    pub extra_data: VariableList<u8, C::MaxExtraDataBytes>,
    pub base_fee_per_gas: ethereum_types::U256,
    pub block_hash: H256,
    pub transactions_root: H256,
}

impl<C: Config> Default for ExecutionPayloadHeader<C> {
    fn default() -> Self {
        Self {
            parent_hash: Default::default(),
            fee_recipient: Default::default(),
            state_root: Default::default(),
            receipts_root: Default::default(),
            logs_bloom: Default::default(),
            prev_randao: Default::default(),
            block_number: Default::default(),
            gas_limit: Default::default(),
            gas_used: Default::default(),
            timestamp: Default::default(),
            extra_data: Default::default(),
            base_fee_per_gas: Default::default(),
            block_hash: Default::default(),
            transactions_root: Default::default(),
        }
    }
}

impl<C: Config> ExecutionPayloadHeader<C> {
    pub fn from_payload(payload: &ExecutionPayload<C>) -> Self {
        Self {
            parent_hash: payload.parent_hash,
            fee_recipient: payload.fee_recipient,
            state_root: payload.state_root,
            receipts_root: payload.receipts_root,
            logs_bloom: payload.logs_bloom.clone(),
            prev_randao: payload.prev_randao,
            block_number: payload.block_number,
            gas_limit: payload.gas_limit,
            gas_used: payload.gas_used,
            timestamp: payload.timestamp,
            extra_data: payload.extra_data.clone(),
            base_fee_per_gas: payload.base_fee_per_gas,
            block_hash: payload.block_hash,
            transactions_root: Hash256::from_slice(&payload.transactions.tree_hash_root()[..]),
        }
    }
}
