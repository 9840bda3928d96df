use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::pos_interface::{Stake, StakeError};
use crate::pos_validator::Validator;

/// Stake-weighted proposer selection.
///
/// Stateless: every call re-weights over the stakes passed in, so rewards
/// earned in earlier epochs raise a validator's chance of proposing later.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProposerSelector;

impl ProposerSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick one proposer with probability `stake / total_active_stake`.
    ///
    /// Returns `Ok(None)` when `active` is empty, which halts the simulation.
    /// A validator whose stake was penalized below zero carries zero weight
    /// and does not count towards the total.
    /// Exactly one value is drawn from `rng` per successful selection.
    pub fn select_proposer<'a, R: Rng + ?Sized>(
        &self,
        active: &[&'a Validator],
        rng: &mut R,
    ) -> Result<Option<&'a Validator>, StakeError> {
        if active.is_empty() {
            return Ok(None);
        }

        let total: Stake = active.iter().map(|v| v.staked_amount().max(0.0)).sum();
        if !(total > 0.0) || !total.is_finite() {
            return Err(StakeError::DegenerateStakeDistribution { total });
        }

        let weights = active.iter().map(|v| v.staked_amount().max(0.0) / total);
        let dist = WeightedIndex::new(weights)
            .map_err(|_| StakeError::DegenerateStakeDistribution { total })?;

        Ok(Some(active[dist.sample(rng)]))
    }
}
