use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::pos_accountant::{EpochAccountant, EpochSettlement};
use crate::pos_config::{resolve_seed, ConfigError, NetworkParameters};
use crate::pos_interface::{
    Epoch, Event, EventSink, NoOpSink, Slot, Stake, StakeError, ValidatorId,
};
use crate::pos_selector::ProposerSelector;
use crate::pos_state::NetworkState;
use crate::pos_validator::{bernoulli_trial, Validator, ValidatorSnapshot};

/// Lifecycle of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum SimulationStatus {
    /// Validators may be registered, nothing has run yet
    Setup,
    /// At least one epoch has started
    Running,
    /// The requested number of epochs completed
    Finished,
    /// No active validator was left to propose; terminal
    Halted,
}

/// Counters collected while the simulation runs
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct SimStatistics {
    pub epochs_completed: u64,
    pub blocks_appended: usize,
    /// Slots whose block was discarded because the proposer was slashed
    pub slots_discarded: usize,
    pub attestations: usize,
    pub missed_attestations: usize,
    pub slashings: usize,
    pub total_slashed: Stake,
}

impl SimStatistics {
    /// Fraction of attestation attempts that succeeded
    pub fn participation_rate(&self) -> f64 {
        let attempts = self.attestations + self.missed_attestations;
        if attempts == 0 {
            0.0
        } else {
            self.attestations as f64 / attempts as f64
        }
    }
}

enum SlotOutcome {
    Appended,
    Discarded,
    Halted,
}

/// Drives the slot/epoch loop over an owned [`NetworkState`].
///
/// All randomness comes from one seeded `StdRng`. Per slot the draws are:
/// one weighted proposer draw, one slashing trial, then one attestation
/// trial per other active validator in registration order (skipped when the
/// proposer is slashed). Identical seeds and setup give identical traces.
pub struct NetworkSimulator {
    params: NetworkParameters,
    state: NetworkState,
    rng: StdRng,
    seed_used: [u8; 32],
    selector: ProposerSelector,
    accountant: EpochAccountant,
    event_sink: Box<dyn EventSink>,
    status: SimulationStatus,
    epochs_completed: Epoch,
    statistics: SimStatistics,
}

impl NetworkSimulator {
    pub fn new(params: NetworkParameters, seed: Option<[u8; 32]>) -> Result<Self, ConfigError> {
        Self::new_with_sink(params, seed, Box::new(NoOpSink))
    }

    pub fn new_with_sink(
        params: NetworkParameters,
        seed: Option<[u8; 32]>,
        event_sink: Box<dyn EventSink>,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        let seed_used = resolve_seed(seed);

        Ok(Self {
            accountant: EpochAccountant::new(params.clone()),
            params,
            state: NetworkState::new(),
            rng: StdRng::from_seed(seed_used),
            seed_used,
            selector: ProposerSelector::new(),
            event_sink,
            status: SimulationStatus::Setup,
            epochs_completed: 0,
            statistics: SimStatistics::default(),
        })
    }

    /// Create and register a validator with a fresh id drawn from the rng.
    ///
    /// Fails without touching the rng or the registry if the stake is below
    /// the minimum.
    pub fn add_validator(&mut self, initial_stake: Stake) -> Result<ValidatorId, StakeError> {
        Validator::check_stake(initial_stake, &self.params)?;

        let mut id = self.rng.next_u64();
        while self.state.validator(&id).is_some() {
            id = self.rng.next_u64();
        }

        let validator = Validator::new(id, initial_stake, &self.params)?;
        self.register(validator);
        Ok(id)
    }

    /// Register an externally built validator. A duplicate id is reported
    /// and ignored; returns whether the validator was added.
    pub fn register(&mut self, validator: Validator) -> bool {
        let id = validator.id();
        let stake = validator.staked_amount();
        let name = validator.name().to_string();

        if !self.state.register(validator) {
            warn!("Validator with id {:016x} already exists", id);
            self.emit(Event::DuplicateRegistration { validator: id });
            return false;
        }

        info!("Validator {} with {:.2} joined the network", name, stake);
        self.emit(Event::ValidatorJoined {
            validator: id,
            stake,
        });
        true
    }

    /// Run `num_epochs` epochs, stopping early if the network halts.
    pub fn run_simulation(&mut self, num_epochs: u64) -> Result<SimulationStatus, StakeError> {
        info!("Starting simulation for {} epochs", num_epochs);

        for _ in 0..num_epochs {
            if self.run_epoch()? == SimulationStatus::Halted {
                return Ok(SimulationStatus::Halted);
            }
        }

        self.status = SimulationStatus::Finished;
        info!("Simulation finished after {} epochs", self.epochs_completed);
        Ok(self.status)
    }

    /// Run one full epoch: every slot, then settlement.
    ///
    /// Once halted, further calls do nothing and return `Halted`.
    pub fn run_epoch(&mut self) -> Result<SimulationStatus, StakeError> {
        if self.status == SimulationStatus::Halted {
            return Ok(SimulationStatus::Halted);
        }

        self.status = SimulationStatus::Running;
        self.state.current_epoch = self.epochs_completed;
        info!("--- Starting epoch {} ---", self.state.current_epoch);

        for _ in 0..self.params.slots_per_epoch {
            if let SlotOutcome::Halted = self.run_slot()? {
                return Ok(SimulationStatus::Halted);
            }
        }

        self.settle_epoch();
        self.epochs_completed += 1;
        self.statistics.epochs_completed = self.epochs_completed;
        Ok(self.status)
    }

    fn run_slot(&mut self) -> Result<SlotOutcome, StakeError> {
        self.state.current_slot += 1;
        let slot = self.state.current_slot;

        let selected = {
            let active = self.state.active_validators();
            self.selector
                .select_proposer(&active, &mut self.rng)?
                .map(|proposer| proposer.id())
        };
        let Some(proposer_id) = selected else {
            warn!("No active validators to propose slot {}, halting", slot);
            self.status = SimulationStatus::Halted;
            self.emit(Event::Halted);
            return Ok(SlotOutcome::Halted);
        };

        let slashing_percentage = self.params.slashing_penalty_percentage;
        let offense_probability = self.params.slashable_offense_probability;

        let Some(proposer) = self.state.validator_mut(&proposer_id) else {
            unreachable!("selected proposer {:016x} is not registered", proposer_id);
        };
        debug!("{} is proposing a block for slot {}", proposer.name(), slot);
        let mut block = proposer.propose(slot);

        if bernoulli_trial(&mut self.rng, offense_probability) {
            let amount = proposer.slash(slashing_percentage);
            warn!(
                "Validator {} SLASHED in slot {}, lost {:.4} and ejected",
                proposer.name(),
                slot,
                amount
            );
            self.statistics.slashings += 1;
            self.statistics.slots_discarded += 1;
            self.statistics.total_slashed += amount;
            self.emit(Event::BlockProposed {
                proposer: proposer_id,
            });
            self.emit(Event::ValidatorSlashed {
                validator: proposer_id,
                amount,
            });
            return Ok(SlotOutcome::Discarded);
        }

        let online_probability = self.params.validator_online_probability;
        for attester in self.state.active_validators_mut() {
            if attester.id() == proposer_id {
                continue;
            }
            if attester.attest(online_probability, &mut self.rng) {
                block.add_attestation(attester.id());
                self.statistics.attestations += 1;
            } else {
                self.statistics.missed_attestations += 1;
            }
        }

        let attestations = block.attestation_count();
        self.state.append_block(block);
        self.statistics.blocks_appended += 1;

        self.emit(Event::BlockProposed {
            proposer: proposer_id,
        });
        self.emit(Event::BlockAppended {
            proposer: proposer_id,
            attestations,
        });
        Ok(SlotOutcome::Appended)
    }

    fn settle_epoch(&mut self) {
        let epoch = self.state.current_epoch;
        info!("Epoch {} finished, processing rewards and penalties", epoch);

        let settlement = {
            let mut active = self.state.active_validators_mut();
            self.accountant.process_epoch_end(&mut active)
        };

        match settlement {
            Some(settlement) => self.report_settlement(settlement),
            None => warn!("Epoch {} ended with no active validators", epoch),
        }
    }

    fn report_settlement(&mut self, settlement: EpochSettlement) {
        info!(
            "Epoch {} settled: {} active, pool {:.6}, base reward {:.6}",
            self.state.current_epoch,
            settlement.validators.len(),
            settlement.reward_pool,
            settlement.base_reward
        );

        for entry in &settlement.validators {
            if entry.attestation_reward > 0.0 {
                self.emit(Event::RewardApplied {
                    validator: entry.validator,
                    amount: entry.attestation_reward,
                    bonus: false,
                });
            }
            if entry.inactivity_penalty > 0.0 {
                self.emit(Event::PenaltyApplied {
                    validator: entry.validator,
                    amount: entry.inactivity_penalty,
                });
            }
            if entry.proposer_bonus > 0.0 {
                self.emit(Event::RewardApplied {
                    validator: entry.validator,
                    amount: entry.proposer_bonus,
                    bonus: true,
                });
            }
        }

        self.emit(Event::EpochSettled {
            active_validators: settlement.validators.len(),
            reward_pool: settlement.reward_pool,
            base_reward: settlement.base_reward,
        });
    }

    fn emit(&mut self, event: Event) {
        self.event_sink
            .log(self.state.current_epoch, self.state.current_slot, event);
    }

    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    pub fn snapshot(&self) -> Vec<ValidatorSnapshot> {
        self.state.snapshot()
    }

    pub fn params(&self) -> &NetworkParameters {
        &self.params
    }

    pub fn seed_used(&self) -> [u8; 32] {
        self.seed_used
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn epochs_completed(&self) -> Epoch {
        self.epochs_completed
    }

    pub fn current_slot(&self) -> Slot {
        self.state.current_slot()
    }

    pub fn statistics(&self) -> &SimStatistics {
        &self.statistics
    }
}
