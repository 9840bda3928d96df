//! Results of a staking simulation run

use std::fs;
use std::path::Path;

use pos_sim::pos_config::format_seed_hex;
use pos_sim::pos_report::render_status_table;
use pos_sim::{SimStatistics, SimulationStatus, Slot, Stake, ValidatorSnapshot};

/// Simulation result
#[derive(Debug, serde::Serialize)]
pub struct SimResult {
    /// Seed used for the simulation (hex, replayable with --seed)
    pub seed: String,

    /// Final state of the run
    pub status: SimulationStatus,

    /// Last slot processed
    pub final_slot: Slot,

    /// Blocks in the chain
    pub chain_length: usize,

    /// Engine counters
    pub statistics: SimStatistics,

    /// Scheduled joins rejected for insufficient stake
    pub rejected_joins: usize,

    /// Stake still held by active validators
    pub total_active_stake: Stake,

    /// Final per-validator state
    pub validators: Vec<ValidatorSnapshot>,
}

impl SimResult {
    pub fn new(seed_used: [u8; 32]) -> Self {
        Self {
            seed: format_seed_hex(&seed_used),
            status: SimulationStatus::Setup,
            final_slot: 0,
            chain_length: 0,
            statistics: SimStatistics::default(),
            rejected_joins: 0,
            total_active_stake: 0.0,
            validators: Vec::new(),
        }
    }

    pub fn active_validators(&self) -> usize {
        self.validators.iter().filter(|v| v.is_active).count()
    }

    /// Print a summary of the simulation results
    pub fn print_summary(&self) {
        println!("\n╔════════════════════════════════════════════════════════╗");
        println!("║        Staking Simulation Results                     ║");
        println!("╚════════════════════════════════════════════════════════╝\n");

        println!("Configuration:");
        println!("  Seed: {}", self.seed);
        println!("  Status: {:?}", self.status);
        println!("  Epochs completed: {}", self.statistics.epochs_completed);
        println!("  Final slot: {}\n", self.final_slot);

        println!("Chain:");
        println!("  Blocks appended: {}", self.statistics.blocks_appended);
        println!("  Slots discarded: {}", self.statistics.slots_discarded);
        println!(
            "  Attestations: {} made, {} missed ({:.2}% participation)",
            self.statistics.attestations,
            self.statistics.missed_attestations,
            self.statistics.participation_rate() * 100.0
        );
        println!();

        println!("Validators:");
        println!(
            "  Active: {} of {}",
            self.active_validators(),
            self.validators.len()
        );
        println!(
            "  Slashings: {} (total {:.4})",
            self.statistics.slashings, self.statistics.total_slashed
        );
        if self.rejected_joins > 0 {
            println!("  Rejected joins: {}", self.rejected_joins);
        }
        println!("  Total active stake: {:.4}", self.total_active_stake);
        println!();

        println!("{}", render_status_table("Final Network State", &self.validators));
    }

    /// Write the result as YAML
    pub fn write_report<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }
}
