use std::time::{SystemTime, UNIX_EPOCH};

use hashbrown::HashSet;

use crate::pos_interface::{Slot, ValidatorId};

/// Bookkeeping record of one slot: who proposed it and who attested.
///
/// Attestations are only added during the slot the block was created in;
/// after it is appended to the chain the block is never touched again.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub slot: Slot,
    pub proposer: ValidatorId,
    attestations: HashSet<ValidatorId>,

    // milliseconds since the unix epoch, display only
    pub timestamp: u64,
}

impl Block {
    pub fn new(slot: Slot, proposer: ValidatorId) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            slot,
            proposer,
            attestations: HashSet::new(),
            timestamp,
        }
    }

    /// Record an attestation; repeated attestations from one validator count once
    pub fn add_attestation(&mut self, validator: ValidatorId) -> bool {
        self.attestations.insert(validator)
    }

    pub fn attestation_count(&self) -> usize {
        self.attestations.len()
    }

    pub fn has_attestation(&self, validator: &ValidatorId) -> bool {
        self.attestations.contains(validator)
    }

    pub fn attesters(&self) -> impl Iterator<Item = &ValidatorId> {
        self.attestations.iter()
    }
}
