// Scenario Runner - Load and execute staking scenario YAML files
//
// Usage:
//   cargo run --bin scenario_runner scenarios/default.yaml
//   cargo run --bin scenario_runner scenarios/  (runs all .yaml files in directory)
//   cargo run --bin scenario_runner scenarios/default.yaml --seed 0x1234...
//   cargo run --bin scenario_runner scenarios/default.yaml --csv events.csv --report result.yaml

mod staking;

use std::env;
use std::fs;
use std::path::Path;

use log::LevelFilter;
use pos_sim::pos_config::parse_seed_hex;
use pos_sim::{NetworkParameters, Stake};
use simple_logger::SimpleLogger;
use staking::{EventSchedule, PopulationConfig, StakingRunner, StakingSimConfig};

/// Scenario file format
#[derive(Debug, serde::Deserialize)]
struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    meta: ScenarioMeta,

    /// Configuration overrides
    config: ScenarioConfig,

    /// Event schedule
    #[serde(default)]
    events: EventSchedule,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioMeta {
    name: Option<String>,
    description: Option<String>,
    hypothesis: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ScenarioConfig {
    epochs: u64,

    num_validators: usize,

    #[serde(default)]
    stake_range: Option<(Stake, Stake)>,

    #[serde(default)]
    epoch_pause_ms: u64,

    #[serde(default)]
    print_epoch_tables: bool,

    #[serde(default)]
    enable_event_logging: bool,

    // Network economics; missing fields keep their defaults
    #[serde(default)]
    parameters: NetworkParameters,
}

/// Command line options shared by every scenario of a run
#[derive(Debug, Default)]
struct CliOptions {
    seed: Option<[u8; 32]>,
    csv_path: Option<String>,
    report_path: Option<String>,
}

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage: {} <scenario.yaml | directory/> [--seed SEED_HEX] [--csv PATH] [--report PATH]",
            args[0]
        );
        eprintln!("\nExamples:");
        eprintln!("  {} scenarios/default.yaml", args[0]);
        eprintln!("  {} scenarios/", args[0]);
        eprintln!("  {} scenarios/default.yaml --seed 0x123456...", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let options = parse_options(&args[2..]).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if path.is_file() {
        run_scenario_file(path, &options);
    } else if path.is_dir() {
        run_scenario_directory(path, &options);
    } else {
        eprintln!("Error: Path does not exist: {}", path.display());
        std::process::exit(1);
    }
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| format!("missing value for {}", flag))?;
        match flag.as_str() {
            "--seed" => options.seed = Some(parse_seed_hex(value).map_err(|e| e.to_string())?),
            "--csv" => options.csv_path = Some(value.clone()),
            "--report" => options.report_path = Some(value.clone()),
            other => return Err(format!("unknown option {}", other)),
        }
    }

    Ok(options)
}

fn run_scenario_directory(dir: &Path, options: &CliOptions) {
    let mut scenarios = Vec::new();

    // Find all .yaml files
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("yaml")
                || path.extension().and_then(|s| s.to_str()) == Some("yml")
            {
                scenarios.push(path);
            }
        }
    }

    scenarios.sort();

    if scenarios.is_empty() {
        eprintln!("No .yaml files found in {}", dir.display());
        std::process::exit(1);
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  SCENARIO RUNNER - Multiple Scenarios                 ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
    println!("Found {} scenario(s) to run\n", scenarios.len());

    for (i, scenario_path) in scenarios.iter().enumerate() {
        println!("\n{}/{} Running: {}\n", i + 1, scenarios.len(), scenario_path.display());
        run_scenario_file(scenario_path, options);
    }

    println!("\n╔════════════════════════════════════════════════════════╗");
    println!("║  All scenarios complete!                               ║");
    println!("╚════════════════════════════════════════════════════════╝\n");
}

fn run_scenario_file(path: &Path, options: &CliOptions) {
    println!("Loading scenario from: {}", path.display());

    let yaml_content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path.display(), e);
        std::process::exit(1);
    });

    let scenario: ScenarioFile = serde_yaml::from_str(&yaml_content).unwrap_or_else(|e| {
        eprintln!("Failed to parse {}: {}", path.display(), e);
        std::process::exit(1);
    });

    println!("\n╔════════════════════════════════════════════════════════╗");
    match scenario.meta.name {
        Some(ref name) => println!("║  {}", name),
        None => println!(
            "║  Scenario: {}",
            path.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed")
        ),
    }
    println!("╚════════════════════════════════════════════════════════╝\n");

    if let Some(ref desc) = scenario.meta.description {
        println!("{}\n", desc);
    }

    if let Some(ref hypothesis) = scenario.meta.hypothesis {
        println!("Hypothesis:");
        println!("  {}\n", hypothesis);
    }

    let config = build_config(scenario, options).unwrap_or_else(|e| {
        eprintln!("Invalid scenario {}: {}", path.display(), e);
        std::process::exit(1);
    });

    let (low, high) = config.population.resolve_stake_range(&config.parameters);
    println!("Configuration:");
    println!("  Epochs: {}", config.epochs);
    println!("  Slots per epoch: {}", config.parameters.slots_per_epoch);
    println!("  Initial validators: {}", config.population.num_validators);
    println!("  Stake range: {:.2} - {:.2}", low, high);
    println!(
        "  Online probability: {:.3}",
        config.parameters.validator_online_probability
    );
    println!(
        "  Slashable offense probability: {:.4}",
        config.parameters.slashable_offense_probability
    );
    println!("  Scheduled events: {}", config.events.events.len());
    println!("\nStarting simulation...\n");

    let report_path = config.output.report_path.clone();
    let runner = StakingRunner::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to set up simulation: {}", e);
        std::process::exit(1);
    });

    let result = runner.run().unwrap_or_else(|e| {
        eprintln!("Simulation aborted: {}", e);
        std::process::exit(1);
    });

    result.print_summary();

    if let Some(path) = report_path {
        match result.write_report(&path) {
            Ok(()) => println!("Report written to {}", path),
            Err(e) => eprintln!("Failed to write report {}: {}", path, e),
        }
    }

    println!("\n✓ Scenario complete!\n");
}

fn build_config(scenario: ScenarioFile, options: &CliOptions) -> Result<StakingSimConfig, String> {
    scenario
        .config
        .parameters
        .validate()
        .map_err(|e| e.to_string())?;

    let population = PopulationConfig {
        num_validators: scenario.config.num_validators,
        stake_range: scenario.config.stake_range,
    };
    population
        .validate(&scenario.config.parameters)
        .map_err(|e| e.to_string())?;

    let mut config = StakingSimConfig::default();
    config.epochs = scenario.config.epochs;
    config.seed = options.seed;
    config.parameters = scenario.config.parameters;
    config.population = population;
    config.events = scenario.events;
    config.epoch_pause_ms = scenario.config.epoch_pause_ms;
    config.output.print_epoch_tables = scenario.config.print_epoch_tables;
    config.output.enable_event_logging = scenario.config.enable_event_logging;
    config.output.csv_output_path = options.csv_path.clone();
    config.output.report_path = options.report_path.clone();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use staking::NetworkEvent;

    const SCENARIO: &str = r#"
meta:
  name: "Late joins"
config:
  epochs: 6
  num_validators: 4
  stake_range: [32.0, 64.0]
  parameters:
    slots_per_epoch: 8
    validator_online_probability: 0.9
events:
  - epoch: 2
    event:
      type: validator_join
      count: 3
      stake: 40.0
  - epoch: 4
    event:
      type: validator_join
      count: 1
      stake: 10.0
"#;

    fn parse(yaml: &str) -> ScenarioFile {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_scenario_parses_with_defaults() {
        let scenario = parse(SCENARIO);
        assert_eq!(scenario.meta.name.as_deref(), Some("Late joins"));
        assert_eq!(scenario.config.parameters.slots_per_epoch, 8);
        assert_eq!(scenario.config.parameters.min_stake_amount, 32.0);

        let config = build_config(scenario, &CliOptions::default()).unwrap();
        assert_eq!(config.epochs, 6);
        assert_eq!(config.population.num_validators, 4);
        assert_eq!(config.population.stake_range, Some((32.0, 64.0)));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_events_grouped_by_epoch() {
        let scenario = parse(SCENARIO);
        let at_two: Vec<_> = scenario.events.at_epoch(2).collect();
        assert_eq!(at_two.len(), 1);
        assert!(matches!(
            at_two[0],
            NetworkEvent::ValidatorJoin { count: 3, .. }
        ));
        assert_eq!(scenario.events.at_epoch(3).count(), 0);
    }

    #[test]
    fn test_missing_events_section() {
        let scenario = parse("config:\n  epochs: 1\n  num_validators: 2\n");
        assert!(scenario.events.events.is_empty());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let yaml = "config:\n  epochs: 1\n  num_validators: 2\n  parameters:\n    validator_online_probability: 2.0\n";
        assert!(build_config(parse(yaml), &CliOptions::default()).is_err());
    }

    #[test]
    fn test_empty_stake_range_rejected() {
        let yaml = "config:\n  epochs: 1\n  num_validators: 2\n  stake_range: [64.0, 32.0]\n";
        assert!(build_config(parse(yaml), &CliOptions::default()).is_err());
    }

    #[test]
    fn test_infinite_stake_range_rejected() {
        let yaml = "config:\n  epochs: 1\n  num_validators: 2\n  stake_range: [32.0, .inf]\n";
        assert!(build_config(parse(yaml), &CliOptions::default()).is_err());
    }

    #[test]
    fn test_stake_range_below_minimum_rejected() {
        let yaml = "config:\n  epochs: 1\n  num_validators: 2\n  stake_range: [16.0, 64.0]\n";
        assert!(build_config(parse(yaml), &CliOptions::default()).is_err());
    }

    #[test]
    fn test_shipped_scenarios_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios");
        let mut loaded = 0;

        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.extension().and_then(|s| s.to_str()) != Some("yaml") {
                continue;
            }
            let content = fs::read_to_string(&path).unwrap();
            let scenario: ScenarioFile = serde_yaml::from_str(&content)
                .unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
            let config = build_config(scenario, &CliOptions::default())
                .unwrap_or_else(|e| panic!("{}: {}", path.display(), e));
            assert!(config.epochs > 0);
            loaded += 1;
        }

        assert!(loaded >= 4);
    }

    #[test]
    fn test_cli_options() {
        let args: Vec<String> = ["--seed", "0x0a0b", "--report", "out.yaml"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let options = parse_options(&args).unwrap();

        let seed = options.seed.unwrap();
        assert_eq!(&seed[..3], &[0x0a, 0x0b, 0x00]);
        assert_eq!(options.report_path.as_deref(), Some("out.yaml"));
        assert!(options.csv_path.is_none());

        assert!(parse_options(&["--seed".to_string()]).is_err());
        assert!(parse_options(&["--bogus".to_string(), "x".to_string()]).is_err());
    }
}
