//! Epoch accounting
//!
//! At the end of every epoch the reward pool is derived from the total active
//! stake and split evenly into a base reward per validator. Each active
//! validator then receives, in this order:
//!
//! 1. an attestation reward of `base * slots_attested / (slots_attested + slots_missed)`
//! 2. a flat inactivity penalty of `base * inactivity_penalty_factor` if it missed any slot
//! 3. a proposer bonus of `base * proposer_bonus_factor * proposed_blocks`
//!
//! after which its epoch counters are reset. All three amounts use the same
//! base computed from pre-settlement stake, so validators are independent of
//! each other and a validator can be rewarded and penalized in one epoch.

use crate::pos_config::NetworkParameters;
use crate::pos_interface::{Stake, ValidatorId};
use crate::pos_validator::Validator;

/// What one validator received at epoch end (zero where not applicable)
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorSettlement {
    pub validator: ValidatorId,
    pub attestation_reward: Stake,
    pub inactivity_penalty: Stake,
    pub proposer_bonus: Stake,
}

impl ValidatorSettlement {
    /// Net change to stake from this settlement
    pub fn net(&self) -> Stake {
        self.attestation_reward - self.inactivity_penalty + self.proposer_bonus
    }
}

/// Result of settling one epoch
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSettlement {
    pub total_active_stake: Stake,
    pub reward_pool: Stake,
    pub base_reward: Stake,
    pub validators: Vec<ValidatorSettlement>,
}

pub struct EpochAccountant {
    params: NetworkParameters,
}

impl EpochAccountant {
    pub fn new(params: NetworkParameters) -> Self {
        Self { params }
    }

    /// Settle rewards and penalties for the given active validators.
    ///
    /// Returns `None` without touching anything when no validator is active.
    pub fn process_epoch_end(&self, active: &mut [&mut Validator]) -> Option<EpochSettlement> {
        if active.is_empty() {
            return None;
        }

        let total_active_stake: Stake = active.iter().map(|v| v.staked_amount()).sum();
        let reward_pool = total_active_stake * self.params.base_reward_per_epoch;
        let base_reward = reward_pool / active.len() as f64;

        let validators = active
            .iter_mut()
            .map(|validator| self.settle_validator(validator, base_reward))
            .collect();

        Some(EpochSettlement {
            total_active_stake,
            reward_pool,
            base_reward,
            validators,
        })
    }

    fn settle_validator(&self, validator: &mut Validator, base_reward: Stake) -> ValidatorSettlement {
        let mut settlement = ValidatorSettlement {
            validator: validator.id(),
            attestation_reward: 0.0,
            inactivity_penalty: 0.0,
            proposer_bonus: 0.0,
        };

        if validator.slots_attested > 0 {
            let participation_rate = validator.slots_attested as f64
                / (validator.slots_attested + validator.slots_missed) as f64;
            settlement.attestation_reward = base_reward * participation_rate;
            validator.apply_reward(settlement.attestation_reward, false);
        }

        // flat, independent of how many slots were missed
        if validator.slots_missed > 0 {
            settlement.inactivity_penalty = base_reward * self.params.inactivity_penalty_factor;
            validator.apply_penalty(settlement.inactivity_penalty);
        }

        if validator.proposed_blocks > 0 {
            settlement.proposer_bonus = base_reward
                * self.params.proposer_bonus_factor
                * validator.proposed_blocks as f64;
            validator.apply_reward(settlement.proposer_bonus, true);
        }

        validator.reset_epoch_counters();
        settlement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(id: ValidatorId, stake: Stake) -> Validator {
        Validator::new(id, stake, &NetworkParameters::default()).unwrap()
    }

    #[test]
    fn test_no_active_validators_is_noop() {
        let accountant = EpochAccountant::new(NetworkParameters::default());
        assert_eq!(accountant.process_epoch_end(&mut []), None);
    }

    #[test]
    fn test_mixed_participation_composition() {
        let params = NetworkParameters::default();
        let accountant = EpochAccountant::new(params.clone());

        let mut v = validator(1, 100.0);
        v.slots_attested = 16;
        v.slots_missed = 16;
        v.proposed_blocks = 1;

        let settlement = accountant.process_epoch_end(&mut [&mut v]).unwrap();
        let b = 100.0 * params.base_reward_per_epoch;
        assert_eq!(settlement.base_reward, b);

        let entry = &settlement.validators[0];
        assert_eq!(entry.attestation_reward, b * 0.5);
        assert_eq!(entry.inactivity_penalty, b * params.inactivity_penalty_factor);
        assert_eq!(entry.proposer_bonus, b * params.proposer_bonus_factor * 1.0);

        let expected = 100.0 + b * 0.5 - b * params.inactivity_penalty_factor
            + b * params.proposer_bonus_factor * 1.0;
        assert_eq!(v.staked_amount(), expected);
        let earned = b * 0.5 - b * params.inactivity_penalty_factor
            + b * params.proposer_bonus_factor * 1.0;
        assert_eq!(v.rewards_earned(), earned);

        assert_eq!(v.slots_attested(), 0);
        assert_eq!(v.slots_missed(), 0);
        assert_eq!(v.proposed_blocks(), 0);
    }

    #[test]
    fn test_base_reward_split_across_validators() {
        let params = NetworkParameters {
            base_reward_per_epoch: 0.01,
            ..Default::default()
        };
        let accountant = EpochAccountant::new(params);

        let mut a = validator(1, 100.0);
        let mut b = validator(2, 300.0);
        a.slots_attested = 32;
        b.slots_attested = 32;

        let settlement = accountant.process_epoch_end(&mut [&mut a, &mut b]).unwrap();
        assert_eq!(settlement.total_active_stake, 400.0);
        assert_eq!(settlement.reward_pool, 4.0);
        assert_eq!(settlement.base_reward, 2.0);

        // equal split regardless of stake
        assert_eq!(a.staked_amount(), 102.0);
        assert_eq!(b.staked_amount(), 302.0);
    }

    #[test]
    fn test_penalty_is_flat() {
        let params = NetworkParameters {
            base_reward_per_epoch: 0.01,
            inactivity_penalty_factor: 0.5,
            ..Default::default()
        };
        let accountant = EpochAccountant::new(params);

        let mut one_miss = validator(1, 100.0);
        one_miss.slots_missed = 1;
        let mut many_misses = validator(2, 100.0);
        many_misses.slots_missed = 32;

        let settlement = accountant
            .process_epoch_end(&mut [&mut one_miss, &mut many_misses])
            .unwrap();

        assert_eq!(settlement.validators[0].inactivity_penalty, 0.5);
        assert_eq!(settlement.validators[1].inactivity_penalty, 0.5);
        assert_eq!(one_miss.staked_amount(), many_misses.staked_amount());
        assert_eq!(one_miss.rewards_earned(), -0.5);
    }

    #[test]
    fn test_idle_validator_unchanged() {
        let accountant = EpochAccountant::new(NetworkParameters::default());
        let mut v = validator(1, 50.0);

        let settlement = accountant.process_epoch_end(&mut [&mut v]).unwrap();
        assert_eq!(settlement.validators[0].net(), 0.0);
        assert_eq!(v.staked_amount(), 50.0);
        assert_eq!(v.rewards_earned(), 0.0);
    }

    #[test]
    fn test_bonus_scales_with_proposals() {
        let params = NetworkParameters {
            base_reward_per_epoch: 0.01,
            proposer_bonus_factor: 0.25,
            ..Default::default()
        };
        let accountant = EpochAccountant::new(params);

        let mut v = validator(1, 100.0);
        v.proposed_blocks = 3;

        let settlement = accountant.process_epoch_end(&mut [&mut v]).unwrap();
        assert_eq!(settlement.validators[0].proposer_bonus, 0.75);
        assert_eq!(v.staked_amount(), 100.75);
    }
}
