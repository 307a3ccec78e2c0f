//! Construction-time configuration for the learning agent.

use crate::decay::{AlphaDecay, EpsilonDecay};
use crate::error::ConfigError;

/// Configuration for a [`LearningAgent`](crate::agent::LearningAgent).
///
/// Fixed at construction; nothing here is re-read or re-parsed once the
/// trial loop is running.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentConfig {
    /// Whether the agent learns. When `false` the Q-table is never
    /// populated and every action is drawn uniformly at random.
    pub learning: bool,
    /// Initial exploration rate.
    pub epsilon: f64,
    /// Initial learning rate.
    pub alpha: f64,
    /// Per-trial schedule for epsilon.
    pub epsilon_decay: EpsilonDecay,
    /// Per-trial schedule for alpha.
    pub alpha_decay: AlphaDecay,
    /// Value every action starts at when a state is first seeded.
    pub initial_q: f64,
}

impl AgentConfig {
    /// Builds a configuration from the legacy string descriptors.
    ///
    /// `adecay`/`edecay` of `None` mean no decay. Unrecognized or malformed
    /// descriptors fail here, before any agent exists.
    pub fn from_descriptors(
        learning: bool,
        epsilon: f64,
        alpha: f64,
        adecay: Option<&str>,
        edecay: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            learning,
            epsilon,
            alpha,
            alpha_decay: match adecay {
                Some(s) => s.parse()?,
                None => AlphaDecay::None,
            },
            epsilon_decay: match edecay {
                Some(s) => s.parse()?,
                None => EpsilonDecay::None,
            },
            initial_q: 0.0,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the initial rates are usable as probabilities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(ConfigError::ParameterOutOfRange {
                name: "epsilon",
                value: self.epsilon,
            });
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::ParameterOutOfRange {
                name: "alpha",
                value: self.alpha,
            });
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning: false,
            epsilon: 1.0,
            alpha: 0.5,
            epsilon_decay: EpsilonDecay::None,
            alpha_decay: AlphaDecay::None,
            initial_q: 0.0,
        }
    }
}
