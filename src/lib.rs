//! # pos_sim - Proof-of-Stake Network Economics Simulator
//!
//! Models the economic and participation dynamics of a Proof-of-Stake network
//! at the validator-set level: stake-weighted block proposal, attestation,
//! epoch reward distribution, inactivity penalties and slashing. There is no
//! networking, cryptography or fork choice; blocks are bookkeeping records.
//!
//! ## Core Components
//!
//! - **NetworkSimulator**: slot/epoch state machine driving everything below
//! - **NetworkState**: validator registry and chain log
//! - **Validator / Block**: per-validator stake and counters, per-slot records
//! - **ProposerSelector**: stake-weighted proposer draw
//! - **EpochAccountant**: end-of-epoch rewards, penalties and bonuses
//!
//! ```no_run
//! use pos_sim::{NetworkParameters, NetworkSimulator};
//!
//! let mut sim = NetworkSimulator::new(NetworkParameters::default(), Some([42u8; 32])).unwrap();
//! for stake in [32.0, 48.0, 64.0] {
//!     sim.add_validator(stake).unwrap();
//! }
//!
//! let status = sim.run_simulation(5).unwrap();
//! for v in sim.snapshot() {
//!     println!("{} {} {:.4} {:.6}", v.name, v.status(), v.staked_amount, v.rewards_earned);
//! }
//! ```
//!
//! Randomness comes from a single seeded rng owned by the simulator, so a
//! run is fully reproducible from its seed (`NetworkSimulator::seed_used`).
//! Console output is left to observers: implement [`EventSink`] or render
//! snapshots with [`pos_report::render_status_table`].

// Engine
pub mod pos_accountant;
pub mod pos_block;
pub mod pos_interface;
pub mod pos_selector;
pub mod pos_simulator;
pub mod pos_state;
pub mod pos_validator;

// Configuration and presentation
pub mod pos_config;
pub mod pos_names;
pub mod pos_report;

// Re-export commonly used types
pub use pos_accountant::{EpochAccountant, EpochSettlement, ValidatorSettlement};
pub use pos_block::Block;
pub use pos_config::{ConfigError, NetworkParameters};
pub use pos_interface::{Epoch, Event, EventSink, NoOpSink, Slot, Stake, StakeError, ValidatorId};
pub use pos_selector::ProposerSelector;
pub use pos_simulator::{NetworkSimulator, SimStatistics, SimulationStatus};
pub use pos_state::NetworkState;
pub use pos_validator::{Validator, ValidatorSnapshot};
