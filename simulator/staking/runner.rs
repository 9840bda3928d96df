// Staking Simulation Runner

use std::thread;
use std::time::Duration;

use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pos_sim::pos_config::{derive_seed, resolve_seed};
use pos_sim::pos_report::render_status_table;
use pos_sim::{ConfigError, EventSink, NetworkSimulator, SimulationStatus, StakeError};

use super::config::{NetworkEvent, StakingSimConfig};
use super::event_sinks::{ConsoleEventSink, CsvEventSink, MultiEventSink};
use super::stats::SimResult;

/// Runs a configured population through the network simulator
pub struct StakingRunner {
    config: StakingSimConfig,
    simulator: NetworkSimulator,

    // population stakes only; the simulator owns its own rng
    setup_rng: StdRng,
    // scheduled joins only; the initial population is validated up front
    rejected_joins: usize,
}

impl StakingRunner {
    /// Build the simulator and register the initial population
    pub fn new(config: StakingSimConfig) -> Result<Self, ConfigError> {
        config.population.validate(&config.parameters)?;

        let seed = resolve_seed(config.seed);
        let sink = Self::build_sink(&config)?;
        let simulator = NetworkSimulator::new_with_sink(config.parameters.clone(), Some(seed), sink)?;
        let setup_rng = StdRng::from_seed(derive_seed("stake-sim population", &seed));

        let mut runner = Self {
            config,
            simulator,
            setup_rng,
            rejected_joins: 0,
        };

        let (low, high) = runner
            .config
            .population
            .resolve_stake_range(&runner.config.parameters);
        for _ in 0..runner.config.population.num_validators {
            let stake = if high > low {
                runner.setup_rng.gen_range(low..=high)
            } else {
                low
            };
            runner.join(stake);
        }

        Ok(runner)
    }

    fn build_sink(config: &StakingSimConfig) -> Result<Box<dyn EventSink>, ConfigError> {
        let console: Box<dyn EventSink> =
            Box::new(ConsoleEventSink::new(config.output.enable_event_logging));

        match &config.output.csv_output_path {
            Some(path) => {
                let mut multi = MultiEventSink::new();
                multi.add_sink(console);
                multi.add_sink(Box::new(CsvEventSink::new(path)?));
                Ok(Box::new(multi))
            }
            None => Ok(console),
        }
    }

    fn join(&mut self, stake: f64) {
        if let Err(e) = self.simulator.add_validator(stake) {
            error!("validator rejected: {}", e);
            self.rejected_joins += 1;
        }
    }

    fn apply_events(&mut self, epoch: u64) {
        let joins: Vec<NetworkEvent> = self.config.events.at_epoch(epoch).cloned().collect();
        for event in joins {
            match event {
                NetworkEvent::ValidatorJoin { count, stake } => {
                    info!("Epoch {}: {} validator(s) joining with {:.2}", epoch, count, stake);
                    for _ in 0..count {
                        self.join(stake);
                    }
                }
            }
        }
    }

    /// Run the configured number of epochs and collect results
    pub fn run(mut self) -> Result<SimResult, StakeError> {
        if self.config.output.print_epoch_tables {
            println!(
                "{}",
                render_status_table("Initial Network State", &self.simulator.snapshot())
            );
        }

        for epoch in 0..self.config.epochs {
            self.apply_events(epoch);

            if self.simulator.run_epoch()? == SimulationStatus::Halted {
                info!("No active validators left, halting in epoch {}", epoch);
                break;
            }

            if self.config.output.print_epoch_tables {
                let title = format!("Network Status at End of Epoch {}", epoch);
                println!("{}", render_status_table(&title, &self.simulator.snapshot()));
            }

            if self.config.epoch_pause_ms > 0 {
                thread::sleep(Duration::from_millis(self.config.epoch_pause_ms));
            }
        }

        Ok(self.build_result())
    }

    fn build_result(&self) -> SimResult {
        let state = self.simulator.state();
        let status = match self.simulator.status() {
            SimulationStatus::Halted => SimulationStatus::Halted,
            SimulationStatus::Setup => SimulationStatus::Setup,
            _ => SimulationStatus::Finished,
        };

        let mut result = SimResult::new(self.simulator.seed_used());
        result.status = status;
        result.final_slot = state.current_slot();
        result.chain_length = state.chain().len();
        result.statistics = self.simulator.statistics().clone();
        result.rejected_joins = self.rejected_joins;
        result.total_active_stake = state.total_active_stake();
        result.validators = state.snapshot();
        result
    }
}
