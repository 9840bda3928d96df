//! Network parameters and seed handling
//!
//! All economic constants of the simulated network live in [`NetworkParameters`].
//! They are supplied once when the simulator is built and never change afterwards.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::pos_interface::Stake;

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid parameter {name}: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid seed: {0}")]
    InvalidSeed(String),
}

/// Tunable constants of the simulated Proof-of-Stake network
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NetworkParameters {
    /// Slots processed before rewards and penalties are settled
    pub slots_per_epoch: u64,

    /// Minimum stake required to register a validator
    pub min_stake_amount: Stake,

    /// Fraction of the total active stake paid out each epoch
    pub base_reward_per_epoch: f64,

    /// Inactivity penalty as a fraction of the base reward
    pub inactivity_penalty_factor: f64,

    /// Fraction of stake removed on slashing
    pub slashing_penalty_percentage: f64,

    /// Proposer bonus per proposed block as a fraction of the base reward
    pub proposer_bonus_factor: f64,

    /// Chance a validator is online to attest in a slot
    pub validator_online_probability: f64,

    /// Chance the slot proposer commits a slashable offense
    pub slashable_offense_probability: f64,
}

impl Default for NetworkParameters {
    fn default() -> Self {
        Self {
            slots_per_epoch: 32,
            min_stake_amount: 32.0,
            base_reward_per_epoch: 0.0001,
            inactivity_penalty_factor: 0.5,
            slashing_penalty_percentage: 0.05,
            proposer_bonus_factor: 0.1,
            validator_online_probability: 0.98,
            slashable_offense_probability: 0.001,
        }
    }
}

impl NetworkParameters {
    /// Parse parameters from YAML; missing fields keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let params: NetworkParameters = serde_yaml::from_str(yaml)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Check that probabilities are in [0, 1] and factors are non-negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots_per_epoch == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "slots_per_epoch",
                value: 0.0,
                reason: "must be at least 1",
            });
        }

        let probabilities = [
            ("slashing_penalty_percentage", self.slashing_penalty_percentage),
            ("validator_online_probability", self.validator_online_probability),
            ("slashable_offense_probability", self.slashable_offense_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value,
                    reason: "must be within [0, 1]",
                });
            }
        }

        let factors = [
            ("min_stake_amount", self.min_stake_amount),
            ("base_reward_per_epoch", self.base_reward_per_epoch),
            ("inactivity_penalty_factor", self.inactivity_penalty_factor),
            ("proposer_bonus_factor", self.proposer_bonus_factor),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite and non-negative",
                });
            }
        }

        Ok(())
    }
}

/// Use the given seed or draw a fresh one from OS entropy
pub fn resolve_seed(seed: Option<[u8; 32]>) -> [u8; 32] {
    seed.unwrap_or_else(|| {
        let mut temp_rng = StdRng::from_entropy();
        let mut seed = [0u8; 32];
        temp_rng.fill_bytes(&mut seed);
        seed
    })
}

/// Derive an independent seed for a secondary rng (e.g. population setup)
/// so it never shares a stream with the simulation rng
pub fn derive_seed(context: &str, seed: &[u8; 32]) -> [u8; 32] {
    blake3::derive_key(context, seed)
}

/// Parse a hex seed (optional `0x` prefix); short input is zero padded
pub fn parse_seed_hex(hex: &str) -> Result<[u8; 32], ConfigError> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    if hex.is_empty() || hex.len() > 64 || hex.len() % 2 != 0 {
        return Err(ConfigError::InvalidSeed(format!(
            "expected an even number of up to 64 hex digits, got {}",
            hex.len()
        )));
    }

    let mut seed = [0u8; 32];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let byte_str =
            std::str::from_utf8(chunk).map_err(|e| ConfigError::InvalidSeed(e.to_string()))?;
        seed[i] = u8::from_str_radix(byte_str, 16)
            .map_err(|e| ConfigError::InvalidSeed(format!("{}: {}", byte_str, e)))?;
    }

    Ok(seed)
}

/// Hex form of a seed, accepted back by [`parse_seed_hex`]
pub fn format_seed_hex(seed: &[u8; 32]) -> String {
    let digits: String = seed.iter().map(|b| format!("{:02x}", b)).collect();
    format!("0x{}", digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = NetworkParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.slots_per_epoch, 32);
        assert_eq!(params.min_stake_amount, 32.0);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "slots_per_epoch: 8\nslashable_offense_probability: 0.25\n";
        let params = NetworkParameters::from_yaml_str(yaml).unwrap();

        assert_eq!(params.slots_per_epoch, 8);
        assert_eq!(params.slashable_offense_probability, 0.25);
        assert_eq!(params.validator_online_probability, 0.98);
        assert_eq!(params.proposer_bonus_factor, 0.1);
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let params = NetworkParameters {
            validator_online_probability: 1.5,
            ..Default::default()
        };
        match params.validate() {
            Err(ConfigError::InvalidParameter { name, .. }) => {
                assert_eq!(name, "validator_online_probability")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_negative_factor_rejected() {
        let yaml = "inactivity_penalty_factor: -0.5\n";
        assert!(matches!(
            NetworkParameters::from_yaml_str(yaml),
            Err(ConfigError::InvalidParameter {
                name: "inactivity_penalty_factor",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_slots_rejected() {
        let params = NetworkParameters {
            slots_per_epoch: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_unknown_yaml_type_is_parse_error() {
        let yaml = "slots_per_epoch: many\n";
        assert!(matches!(
            NetworkParameters::from_yaml_str(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_parameters_from_file() {
        let path = std::env::temp_dir().join(format!("stake_sim_params_{}.yaml", std::process::id()));
        fs::write(&path, "slots_per_epoch: 16\nproposer_bonus_factor: 0.2\n").unwrap();

        let params = NetworkParameters::from_yaml_file(&path);
        let _ = fs::remove_file(&path);
        let params = params.unwrap();

        assert_eq!(params.slots_per_epoch, 16);
        assert_eq!(params.proposer_bonus_factor, 0.2);
        assert_eq!(params.min_stake_amount, 32.0);
    }

    #[test]
    fn test_missing_parameter_file_is_io_error() {
        let path = std::env::temp_dir().join("stake_sim_params_does_not_exist.yaml");
        assert!(matches!(
            NetworkParameters::from_yaml_file(&path),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_seed_hex_parsing() {
        let seed = parse_seed_hex("0x0102ff").unwrap();
        assert_eq!(seed[0], 0x01);
        assert_eq!(seed[1], 0x02);
        assert_eq!(seed[2], 0xff);
        assert_eq!(seed[3], 0x00);

        let full = [42u8; 32];
        assert_eq!(parse_seed_hex(&format_seed_hex(&full)).unwrap(), full);
    }

    #[test]
    fn test_seed_hex_rejects_garbage() {
        assert!(parse_seed_hex("0xzz").is_err());
        assert!(parse_seed_hex("abc").is_err());
        assert!(parse_seed_hex("").is_err());
    }

    #[test]
    fn test_derived_seed_is_stable_and_distinct() {
        let seed = [5u8; 32];
        let a = derive_seed("population", &seed);
        assert_eq!(a, derive_seed("population", &seed));
        assert_ne!(a, seed);
        assert_ne!(a, derive_seed("other", &seed));
    }

    #[test]
    fn test_resolve_seed_prefers_given() {
        assert_eq!(resolve_seed(Some([7u8; 32])), [7u8; 32]);
    }
}
