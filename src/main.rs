use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simple_logger::SimpleLogger;

use pos_sim::pos_config::{derive_seed, format_seed_hex};
use pos_sim::pos_report::render_status_table;
use pos_sim::{NetworkParameters, NetworkSimulator, SimulationStatus};

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .unwrap();

    info!("starting");

    let num_validators = 10;
    let epochs = 5;
    let params = NetworkParameters::default();

    let mut sim = match NetworkSimulator::new(params.clone(), None) {
        Ok(sim) => sim,
        Err(e) => {
            error!("invalid network parameters: {}", e);
            std::process::exit(1);
        }
    };

    // stakes come from their own rng so they don't shift the simulation draws
    let mut stake_rng = StdRng::from_seed(derive_seed("stake-sim population", &sim.seed_used()));
    for _ in 0..num_validators {
        let stake = stake_rng.gen_range(params.min_stake_amount..=params.min_stake_amount * 3.0);
        if let Err(e) = sim.add_validator(stake) {
            error!("{}", e);
        }
    }

    println!("{}", render_status_table("Initial Network State", &sim.snapshot()));

    for epoch in 0..epochs {
        match sim.run_epoch() {
            Ok(SimulationStatus::Halted) => {
                info!("network halted during epoch {}", epoch);
                break;
            }
            Ok(_) => {
                let title = format!("Network Status at End of Epoch {}", epoch);
                println!("{}", render_status_table(&title, &sim.snapshot()));
            }
            Err(e) => {
                error!("simulation aborted: {}", e);
                std::process::exit(1);
            }
        }
    }

    let stats = sim.statistics();
    info!(
        "done. blocks: {}, discarded: {}, slashings: {}, participation: {:.2}%",
        stats.blocks_appended,
        stats.slots_discarded,
        stats.slashings,
        stats.participation_rate() * 100.0
    );
    info!("seed: {}", format_seed_hex(&sim.seed_used()));
}
