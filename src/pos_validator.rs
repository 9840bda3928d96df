use std::fmt;

use log::trace;
use rand::Rng;

use crate::pos_block::Block;
use crate::pos_config::NetworkParameters;
use crate::pos_interface::{Slot, Stake, StakeError, ValidatorId};
use crate::pos_names::display_name;

/// Single Bernoulli trial with success probability `p`.
///
/// Always consumes exactly one `f64` from the rng, including for p = 0 and
/// p = 1, so the draw sequence does not depend on parameter values.
pub fn bernoulli_trial<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// A validator in the simulated network.
///
/// Stake may drop below the minimum (or below zero) through penalties and
/// slashing; the validator stays registered and only leaves the active set
/// when slashed.
#[derive(Clone, Debug, PartialEq)]
pub struct Validator {
    id: ValidatorId,
    name: String,
    staked_amount: Stake,
    rewards_earned: Stake,
    is_active: bool,

    // per-epoch counters, zeroed at every epoch boundary
    pub(crate) slots_attested: u32,
    pub(crate) slots_missed: u32,
    pub(crate) proposed_blocks: u32,
}

impl Validator {
    /// Create a validator, rejecting stakes below `params.min_stake_amount`
    pub fn new(
        id: ValidatorId,
        initial_stake: Stake,
        params: &NetworkParameters,
    ) -> Result<Self, StakeError> {
        Self::check_stake(initial_stake, params)?;

        Ok(Self {
            id,
            name: display_name(id),
            staked_amount: initial_stake,
            rewards_earned: 0.0,
            is_active: true,
            slots_attested: 0,
            slots_missed: 0,
            proposed_blocks: 0,
        })
    }

    /// Reject initial stakes below the minimum (NaN included)
    pub fn check_stake(initial_stake: Stake, params: &NetworkParameters) -> Result<(), StakeError> {
        if !(initial_stake >= params.min_stake_amount) {
            return Err(StakeError::InvalidStake {
                stake: initial_stake,
                minimum: params.min_stake_amount,
            });
        }
        Ok(())
    }

    pub fn id(&self) -> ValidatorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn staked_amount(&self) -> Stake {
        self.staked_amount
    }

    pub fn rewards_earned(&self) -> Stake {
        self.rewards_earned
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn slots_attested(&self) -> u32 {
        self.slots_attested
    }

    pub fn slots_missed(&self) -> u32 {
        self.slots_missed
    }

    pub fn proposed_blocks(&self) -> u32 {
        self.proposed_blocks
    }

    /// Propose the block for `slot`. Callers must only select active validators.
    pub fn propose(&mut self, slot: Slot) -> Block {
        self.proposed_blocks += 1;
        Block::new(slot, self.id)
    }

    /// Try to attest; failure models a validator that is offline for the slot
    pub fn attest<R: Rng + ?Sized>(&mut self, online_probability: f64, rng: &mut R) -> bool {
        if bernoulli_trial(rng, online_probability) {
            self.slots_attested += 1;
            true
        } else {
            self.slots_missed += 1;
            false
        }
    }

    /// Credit `amount` to stake and cumulative rewards; callers pass `amount >= 0`
    pub fn apply_reward(&mut self, amount: Stake, is_bonus: bool) {
        self.staked_amount += amount;
        self.rewards_earned += amount;
        trace!(
            "{} rewarded {:.6}{}",
            self.name,
            amount,
            if is_bonus { " (proposer bonus)" } else { "" }
        );
    }

    /// Debit `amount` from stake and cumulative rewards. Stake is not floored.
    pub fn apply_penalty(&mut self, amount: Stake) {
        self.staked_amount -= amount;
        self.rewards_earned -= amount;
        trace!("{} penalized {:.6} for inactivity", self.name, amount);
    }

    /// Remove `percentage` of the current stake and eject from the active set.
    /// Returns the amount removed.
    pub fn slash(&mut self, percentage: f64) -> Stake {
        let slashed_amount = self.staked_amount * percentage;
        self.staked_amount -= slashed_amount;
        self.is_active = false;
        slashed_amount
    }

    pub fn reset_epoch_counters(&mut self) {
        self.slots_attested = 0;
        self.slots_missed = 0;
        self.proposed_blocks = 0;
    }

    pub fn snapshot(&self) -> ValidatorSnapshot {
        ValidatorSnapshot {
            id: self.id,
            name: self.name.clone(),
            is_active: self.is_active,
            staked_amount: self.staked_amount,
            rewards_earned: self.rewards_earned,
        }
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validator(id={:016x}, stake={:.4}, active={})",
            self.id, self.staked_amount, self.is_active
        )
    }
}

/// Read-only view of a validator for reporting
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ValidatorSnapshot {
    pub id: ValidatorId,
    pub name: String,
    pub is_active: bool,
    pub staked_amount: Stake,
    pub rewards_earned: Stake,
}

impl ValidatorSnapshot {
    pub fn status(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else {
            "Slashed"
        }
    }
}
