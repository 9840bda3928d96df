// Fixed Seed Staking Simulation Example
//
// Runs the same small network twice from one seed and checks that both
// runs end in an identical state.

mod staking;

use log::LevelFilter;
use simple_logger::SimpleLogger;
use staking::{PopulationConfig, StakingRunner, StakingSimConfig};

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .init()
        .unwrap();

    println!("╔════════════════════════════════════════════════════════╗");
    println!("║    Fixed Seed Staking Simulation                       ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    let mut config = StakingSimConfig::default();
    config.epochs = 10;
    config.seed = Some([42u8; 32]);
    config.population = PopulationConfig {
        num_validators: 16,
        stake_range: Some((32.0, 128.0)),
    };

    // Harsher than default so slashing shows up within ten epochs
    config.parameters.slashable_offense_probability = 0.01;
    config.parameters.validator_online_probability = 0.95;

    let first = StakingRunner::new(config.clone()).unwrap().run().unwrap();
    let second = StakingRunner::new(config).unwrap().run().unwrap();

    first.print_summary();

    if first.validators == second.validators && first.statistics == second.statistics {
        println!("\n✓ Replay with seed {} matched exactly", first.seed);
    } else {
        println!("\n✗ Replay diverged!");
        std::process::exit(1);
    }
}
