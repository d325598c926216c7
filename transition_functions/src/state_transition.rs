use std::convert::TryInto;

use bls::{PublicKey, Signature};

use helper_functions::beacon_state_accessors::get_domain;
use types::config::{ChainSpec, Config, ExpConst};
use types::types::SignedBeaconBlock;

use error_utils::Error;
use metrics_core::MetricsSink;

use crate::blocks::process_block;
use crate::cached_beacon_state::CachedBeaconState;
use crate::process_slot::process_slots;
use crate::signature_sets::signing_message;

/// Which of the three independently toggleable checks a caller wants run. Spec test vectors and
/// fork-choice's own optimistic-import path both need to run the transition with one or more of
/// these switched off, so they're flags rather than something baked into `state_transition` itself.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub verify_state_root: bool,
    pub verify_proposer: bool,
    pub verify_signatures: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            verify_state_root: true,
            verify_proposer: true,
            verify_signatures: true,
        }
    }
}

/// Advances `pre` to the slot of `signed_block`, applies the block, and hands back the
/// resulting state — `pre` itself is never mutated; every intermediate step runs against a clone
/// taken into transient mode for the duration of this call.
pub fn state_transition<C: Config + ExpConst>(
    pre: &CachedBeaconState<C>,
    signed_block: &SignedBeaconBlock<C>,
    options: Options,
    spec: &ChainSpec,
    metrics: Option<&dyn MetricsSink>,
) -> Result<CachedBeaconState<C>, Error> {
    let mut cached = pre.clone();
    cached.set_caches_transient();

    process_slots(&mut cached, signed_block.message.slot, spec, metrics)?;

    if options.verify_proposer {
        verify_proposer_signature(&cached, signed_block)?;
    }

    process_block(&mut cached, &signed_block.message, spec, options.verify_signatures, metrics)?;

    cached.set_caches_persistent();

    if options.verify_state_root {
        let computed_root = cached.hash_tree_root()?;
        if computed_root != signed_block.message.state_root {
            return Err(Error::InvalidStateRoot {
                slot: signed_block.message.slot,
                expected_hex: format!("{:?}", signed_block.message.state_root),
                actual_hex: format!("{:?}", computed_root),
            });
        }
    }

    Ok(cached)
}

fn verify_proposer_signature<C: Config + ExpConst>(
    cached: &CachedBeaconState<C>,
    signed_block: &SignedBeaconBlock<C>,
) -> Result<(), Error> {
    let proposer_index = cached.get_beacon_proposer_index()?;
    let invalid = || Error::InvalidBlockSignature {
        slot: signed_block.message.slot,
        proposer_index,
    };

    let pubkey_bytes = cached.state().validators()[proposer_index as usize].pubkey.clone();
    let domain = get_domain(cached.state(), C::domain_beacon_proposer(), None);
    let message = signing_message(&signed_block.message);

    let pubkey: PublicKey = (&pubkey_bytes).try_into().map_err(|_err| invalid())?;
    let signature: Signature = (&signed_block.signature).try_into().map_err(|_err| invalid())?;

    if !signature.verify(message.as_bytes(), domain.to_integer(), &pubkey) {
        return Err(invalid());
    }

    Ok(())
}
