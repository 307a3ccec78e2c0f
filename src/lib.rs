//! smartcab - tabular Q-learning agent for a simulated driving world
//!
//! The agent perceives a discretized intersection snapshot, chooses a
//! driving action under an epsilon-greedy policy, and learns per-step from
//! the reward via a single-step, undiscounted value update. Exploration and
//! learning rates follow independently configurable per-trial decay
//! schedules; the world simulation and route planning live behind the
//! [`env::Environment`] and [`env::RoutePlanner`] traits.

pub mod agent;
pub mod config;
pub mod decay;
pub mod env;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod qtable;
pub mod types;

pub use agent::LearningAgent;
pub use config::AgentConfig;
pub use decay::{AlphaDecay, EpsilonDecay};
pub use env::{Environment, RoutePlanner};
pub use error::ConfigError;
pub use metrics::{SimulationLog, TrialStats};
pub use qtable::{MaxQ, QTable};
pub use types::{Action, LightColor, Perception, State};
