// Staking Simulator Configuration

use pos_sim::{ConfigError, NetworkParameters, Stake};

// ============================================================================
// Main Configuration
// ============================================================================

/// Main configuration for a staking simulation run
#[derive(Debug, Clone)]
pub struct StakingSimConfig {
    /// Number of epochs to run
    pub epochs: u64,

    /// Random seed for reproducibility (None = generate random)
    pub seed: Option<[u8; 32]>,

    /// Network economics
    pub parameters: NetworkParameters,

    /// Initial validator population
    pub population: PopulationConfig,

    /// Scheduled network events
    pub events: EventSchedule,

    /// Pause between epochs for readability (0 = none)
    pub epoch_pause_ms: u64,

    /// Output configuration
    pub output: OutputConfig,
}

impl Default for StakingSimConfig {
    fn default() -> Self {
        Self {
            epochs: 5,
            seed: None,
            parameters: NetworkParameters::default(),
            population: PopulationConfig::default(),
            events: EventSchedule::default(),
            epoch_pause_ms: 0,
            output: OutputConfig::default(),
        }
    }
}

// ============================================================================
// Initial Population
// ============================================================================

/// Validators created before the first epoch
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PopulationConfig {
    pub num_validators: usize,

    /// Initial stakes are drawn uniformly from this range; defaults to
    /// [min_stake, 3 * min_stake]
    #[serde(default)]
    pub stake_range: Option<(Stake, Stake)>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            num_validators: 10,
            stake_range: None,
        }
    }
}

impl PopulationConfig {
    pub fn resolve_stake_range(&self, params: &NetworkParameters) -> (Stake, Stake) {
        self.stake_range.unwrap_or((
            params.min_stake_amount,
            params.min_stake_amount * 3.0,
        ))
    }

    /// Stake range must be finite, non-empty and start at or above the
    /// minimum stake, so every initial validator can register
    pub fn validate(&self, params: &NetworkParameters) -> Result<(), ConfigError> {
        let (low, high) = self.resolve_stake_range(params);

        for (name, value) in [("stake_range.low", low), ("stake_range.high", high)] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite",
                });
            }
        }
        if low > high {
            return Err(ConfigError::InvalidParameter {
                name: "stake_range.high",
                value: high,
                reason: "must not be below the lower bound",
            });
        }
        if low < params.min_stake_amount {
            return Err(ConfigError::InvalidParameter {
                name: "stake_range.low",
                value: low,
                reason: "must be at least min_stake_amount",
            });
        }

        Ok(())
    }
}

// ============================================================================
// Event Schedule
// ============================================================================

/// Schedule of network events
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(transparent)]
pub struct EventSchedule {
    pub events: Vec<ScheduledEvent>,
}

impl EventSchedule {
    /// Events that fire before `epoch` starts
    pub fn at_epoch(&self, epoch: u64) -> impl Iterator<Item = &NetworkEvent> {
        self.events
            .iter()
            .filter(move |e| e.epoch == epoch)
            .map(|e| &e.event)
    }
}

/// A single scheduled event
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ScheduledEvent {
    /// Epoch before which the event triggers
    pub epoch: u64,

    /// The event to trigger
    pub event: NetworkEvent,
}

/// Types of network events
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NetworkEvent {
    /// Register new validators, each with the given stake
    ValidatorJoin { count: usize, stake: Stake },
}

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Log every engine event to the console
    pub enable_event_logging: bool,

    /// Print the validator table after every epoch
    pub print_epoch_tables: bool,

    /// Export all engine events as CSV
    pub csv_output_path: Option<String>,

    /// Write the final result as YAML
    pub report_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population(range: (Stake, Stake)) -> PopulationConfig {
        PopulationConfig {
            num_validators: 4,
            stake_range: Some(range),
        }
    }

    #[test]
    fn test_default_range_is_valid() {
        let params = NetworkParameters::default();
        let population = PopulationConfig::default();

        assert!(population.validate(&params).is_ok());
        assert_eq!(population.resolve_stake_range(&params), (32.0, 96.0));
    }

    #[test]
    fn test_infinite_range_rejected() {
        let params = NetworkParameters::default();
        assert!(population((32.0, f64::INFINITY)).validate(&params).is_err());
        assert!(population((f64::NAN, 64.0)).validate(&params).is_err());
    }

    #[test]
    fn test_empty_range_rejected() {
        let params = NetworkParameters::default();
        assert!(population((64.0, 32.0)).validate(&params).is_err());
    }

    #[test]
    fn test_range_below_minimum_rejected() {
        let params = NetworkParameters::default();
        match population((16.0, 64.0)).validate(&params) {
            Err(ConfigError::InvalidParameter { name, .. }) => assert_eq!(name, "stake_range.low"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
