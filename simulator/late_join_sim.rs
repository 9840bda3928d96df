// Late Join Staking Simulation Example
//
// Starts a small validator set and lets new validators join in later
// epochs, one batch of them below the minimum stake.

mod staking;

use log::LevelFilter;
use simple_logger::SimpleLogger;
use staking::{
    EventSchedule, NetworkEvent, PopulationConfig, ScheduledEvent, StakingRunner,
    StakingSimConfig,
};

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();

    println!("╔════════════════════════════════════════════════════════╗");
    println!("║    Late Join Staking Simulation                        ║");
    println!("╚════════════════════════════════════════════════════════╝\n");

    let mut config = StakingSimConfig::default();
    config.epochs = 8;
    config.population = PopulationConfig {
        num_validators: 4,
        stake_range: None,
    };
    config.output.print_epoch_tables = true;

    let min_stake = config.parameters.min_stake_amount;
    config.events = EventSchedule {
        events: vec![
            ScheduledEvent {
                epoch: 2,
                event: NetworkEvent::ValidatorJoin {
                    count: 4,
                    stake: min_stake * 2.0,
                },
            },
            ScheduledEvent {
                epoch: 4,
                event: NetworkEvent::ValidatorJoin {
                    count: 2,
                    stake: min_stake / 2.0,
                },
            },
            ScheduledEvent {
                epoch: 5,
                event: NetworkEvent::ValidatorJoin {
                    count: 1,
                    stake: min_stake * 10.0,
                },
            },
        ],
    };

    let runner = match StakingRunner::new(config) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Failed to set up simulation: {}", e);
            std::process::exit(1);
        }
    };

    match runner.run() {
        Ok(result) => {
            result.print_summary();
            println!("\n✓ Simulation complete!\n");
        }
        Err(e) => {
            eprintln!("Simulation aborted: {}", e);
            std::process::exit(1);
        }
    }
}
