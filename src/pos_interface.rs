// all ids are random 64 bit values drawn from the simulation rng
pub type ValidatorId = u64;

pub type Slot = u64;
pub type Epoch = u64;

/// Stake denominated in the network's native unit (ETH-like, fractional)
pub type Stake = f64;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised by validator creation and proposer selection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StakeError {
    /// Initial stake below the configured minimum
    #[error("initial stake {stake} is below the minimum of {minimum}")]
    InvalidStake { stake: Stake, minimum: Stake },

    /// Active validators exist but their stakes give no usable weighting
    #[error("total active stake is {total}, proposer weighting is undefined")]
    DegenerateStakeDistribution { total: Stake },
}

// ============================================================================
// Event Logging System
// ============================================================================

/// Events emitted by the simulation engine for reporting and analysis
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Validator added to the registry
    ValidatorJoined { validator: ValidatorId, stake: Stake },
    /// Registration attempted with an id already in the registry
    DuplicateRegistration { validator: ValidatorId },
    /// Proposer selected and block created
    BlockProposed { proposer: ValidatorId },
    /// Proposer committed a slashable offense, block discarded
    ValidatorSlashed { validator: ValidatorId, amount: Stake },
    /// Block appended to the chain
    BlockAppended {
        proposer: ValidatorId,
        attestations: usize,
    },
    /// Reward credited at epoch end (bonus marks proposer bonuses)
    RewardApplied {
        validator: ValidatorId,
        amount: Stake,
        bonus: bool,
    },
    /// Inactivity penalty debited at epoch end
    PenaltyApplied { validator: ValidatorId, amount: Stake },
    /// Epoch accounting finished
    EpochSettled {
        active_validators: usize,
        reward_pool: Stake,
        base_reward: Stake,
    },
    /// No active validators left to propose
    Halted,
}

/// Trait for consuming events from the simulation engine
pub trait EventSink {
    fn log(&mut self, epoch: Epoch, slot: Slot, event: Event);
}

/// No-op event sink for headless runs (zero overhead)
pub struct NoOpSink;

impl EventSink for NoOpSink {
    #[inline(always)]
    fn log(&mut self, _epoch: Epoch, _slot: Slot, _event: Event) {}
}
