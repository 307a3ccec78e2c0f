//! Per-trial statistics and run-level aggregation.
//!
//! The agent exposes its progress as data; whoever drives the trial loop
//! decides how to render it. [`SimulationLog`] accumulates one
//! [`TrialStats`] per trial and answers the two questions the orchestrator
//! asks: how reliable is the policy lately, and has exploration decayed far
//! enough to stop training.

use std::fmt;

/// Outcome of a single trial.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialStats {
    /// 1-based trial index.
    pub trial: u32,
    /// Whether this was a testing trial (frozen policy).
    pub testing: bool,
    /// Time steps taken.
    pub steps: u32,
    /// Reward accumulated over the trial.
    pub total_reward: f64,
    /// Learning rate in effect during the trial.
    pub alpha: f64,
    /// Exploration rate in effect during the trial.
    pub epsilon: f64,
    /// Whether the destination was reached before the deadline
    /// (decided by the orchestrator).
    pub success: bool,
}

impl fmt::Display for TrialStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trial {:>4} [{}] steps={:<3} reward={:>8.2} alpha={:.4} epsilon={:.4} {}",
            self.trial,
            if self.testing { "test " } else { "train" },
            self.steps,
            self.total_reward,
            self.alpha,
            self.epsilon,
            if self.success { "reached" } else { "failed" },
        )
    }
}

/// Accumulates trial outcomes across a run.
#[derive(Debug, Clone, Default)]
pub struct SimulationLog {
    trials: Vec<TrialStats>,
}

impl SimulationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed trial.
    pub fn record(&mut self, stats: TrialStats) {
        self.trials.push(stats);
    }

    /// All recorded trials, in order.
    pub fn trials(&self) -> &[TrialStats] {
        &self.trials
    }

    /// Number of recorded trials.
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// Returns whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Fraction of successful trials among the last `window` recorded
    /// (all of them if fewer). Returns 0 for an empty log.
    pub fn success_rate(&self, window: usize) -> f64 {
        let tail = self.tail(window);
        if tail.is_empty() {
            return 0.0;
        }
        tail.iter().filter(|s| s.success).count() as f64 / tail.len() as f64
    }

    /// Mean total reward over the last `window` trials.
    pub fn mean_reward(&self, window: usize) -> f64 {
        let tail = self.tail(window);
        if tail.is_empty() {
            return 0.0;
        }
        tail.iter().map(|s| s.total_reward).sum::<f64>() / tail.len() as f64
    }

    /// Whether exploration has decayed below `tolerance`, i.e. training
    /// trials can stop and testing trials begin. Based on the most recent
    /// recorded trial's epsilon.
    pub fn training_complete(&self, tolerance: f64) -> bool {
        self.trials
            .last()
            .is_some_and(|s| s.epsilon < tolerance)
    }

    fn tail(&self, window: usize) -> &[TrialStats] {
        let start = self.trials.len().saturating_sub(window);
        &self.trials[start..]
    }
}

impl fmt::Display for SimulationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation log ({} trials) ===", self.len())?;
        writeln!(
            f,
            "  Success rate (last 10):  {:.1}%",
            self.success_rate(10) * 100.0
        )?;
        writeln!(
            f,
            "  Mean reward (last 10):   {:.2}",
            self.mean_reward(10)
        )
    }
}
