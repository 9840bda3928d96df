//! Staking simulator module
//!
//! Drives the `pos_sim` engine from a scenario: initial validator
//! population, scheduled late joins, output sinks and result reporting.

pub mod config;
pub mod event_sinks;
pub mod runner;
pub mod stats;

pub use config::{
    EventSchedule, NetworkEvent, OutputConfig, PopulationConfig, ScheduledEvent, StakingSimConfig,
};
pub use runner::StakingRunner;
pub use stats::SimResult;
