use indexmap::IndexMap;

use crate::pos_block::Block;
use crate::pos_interface::{Epoch, Slot, Stake, ValidatorId};
use crate::pos_validator::{Validator, ValidatorSnapshot};

/// Validator registry and chain log of the simulated network.
///
/// The registry keeps insertion order, and every walk over validators
/// (selection, attestation, settlement) follows it; random draws are
/// therefore taken in the same order on every run with the same seed.
#[derive(Debug, Default, Clone)]
pub struct NetworkState {
    validators: IndexMap<ValidatorId, Validator>,
    chain: Vec<Block>,
    pub(crate) current_slot: Slot,
    pub(crate) current_epoch: Epoch,
}

impl NetworkState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator; returns false (and changes nothing) if the id is taken
    pub fn register(&mut self, validator: Validator) -> bool {
        if self.validators.contains_key(&validator.id()) {
            return false;
        }
        self.validators.insert(validator.id(), validator);
        true
    }

    pub fn validator(&self, id: &ValidatorId) -> Option<&Validator> {
        self.validators.get(id)
    }

    pub(crate) fn validator_mut(&mut self, id: &ValidatorId) -> Option<&mut Validator> {
        self.validators.get_mut(id)
    }

    pub fn validators(&self) -> impl Iterator<Item = &Validator> {
        self.validators.values()
    }

    pub fn active_validators(&self) -> Vec<&Validator> {
        self.validators.values().filter(|v| v.is_active()).collect()
    }

    pub(crate) fn active_validators_mut(&mut self) -> Vec<&mut Validator> {
        self.validators
            .values_mut()
            .filter(|v| v.is_active())
            .collect()
    }

    pub fn num_validators(&self) -> usize {
        self.validators.len()
    }

    pub fn num_active(&self) -> usize {
        self.validators.values().filter(|v| v.is_active()).count()
    }

    pub fn total_active_stake(&self) -> Stake {
        self.validators
            .values()
            .filter(|v| v.is_active())
            .map(|v| v.staked_amount())
            .sum()
    }

    pub(crate) fn append_block(&mut self, block: Block) {
        self.chain.push(block);
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn current_slot(&self) -> Slot {
        self.current_slot
    }

    pub fn current_epoch(&self) -> Epoch {
        self.current_epoch
    }

    /// Per-validator view in registration order
    pub fn snapshot(&self) -> Vec<ValidatorSnapshot> {
        self.validators.values().map(|v| v.snapshot()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos_config::NetworkParameters;

    fn validator(id: ValidatorId, stake: Stake) -> Validator {
        Validator::new(id, stake, &NetworkParameters::default()).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut state = NetworkState::new();
        assert!(state.register(validator(1, 40.0)));
        assert!(state.register(validator(2, 50.0)));

        assert_eq!(state.num_validators(), 2);
        assert_eq!(state.validator(&2).unwrap().staked_amount(), 50.0);
        assert_eq!(state.total_active_stake(), 90.0);
    }

    #[test]
    fn test_duplicate_registration_is_noop() {
        let mut state = NetworkState::new();
        assert!(state.register(validator(1, 40.0)));
        assert!(!state.register(validator(1, 99.0)));

        assert_eq!(state.num_validators(), 1);
        assert_eq!(state.validator(&1).unwrap().staked_amount(), 40.0);
    }

    #[test]
    fn test_slashed_validators_stay_registered() {
        let mut state = NetworkState::new();
        state.register(validator(1, 40.0));
        state.register(validator(2, 50.0));
        state.validator_mut(&1).unwrap().slash(0.05);

        assert_eq!(state.num_validators(), 2);
        assert_eq!(state.num_active(), 1);
        assert_eq!(state.active_validators()[0].id(), 2);
        assert_eq!(state.total_active_stake(), 50.0);
    }

    #[test]
    fn test_snapshot_keeps_registration_order() {
        let mut state = NetworkState::new();
        for id in [30, 10, 20] {
            state.register(validator(id, 40.0));
        }

        let ids: Vec<_> = state.snapshot().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }
}
