//! The learning agent: Q-table, schedule scalars, and the trial/step loop.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::AgentConfig;
use crate::decay::{AlphaDecay, EpsilonDecay};
use crate::env::{Environment, RoutePlanner};
use crate::error::ConfigError;
use crate::metrics::TrialStats;
use crate::policy;
use crate::qtable::{MaxQ, QTable};
use crate::types::{Action, State};

/// Tabular Q-learning agent driving in a grid world.
///
/// The agent owns its environment and route planner handles, its Q-table,
/// and the `(alpha, epsilon, trial)` schedule scalars, all for the lifetime
/// of one simulation run. The orchestrator drives it through exactly two
/// entry points:
///
/// 1. [`LearningAgent::reset`] at each trial boundary — advances the trial
///    counter and applies the decay schedules (or zeroes both rates for a
///    testing trial);
/// 2. [`LearningAgent::update`] once per time step — builds the state, seeds
///    its Q-table row, chooses an action, acts, and applies the value update.
///
/// The RNG behind exploration and tie-breaking is owned and seeded
/// explicitly, so runs are reproducible.
#[derive(Debug)]
pub struct LearningAgent<E: Environment, P: RoutePlanner> {
    env: E,
    planner: P,
    valid_actions: Vec<Action>,

    learning: bool,
    alpha: f64,
    epsilon: f64,
    alpha_decay: AlphaDecay,
    epsilon_decay: EpsilonDecay,
    initial_q: f64,

    trial: u32,
    testing: bool,
    table: QTable,
    state: Option<State>,
    deadline: i32,
    trial_reward: f64,
    trial_steps: u32,

    rng: StdRng,
}

impl<E: Environment, P: RoutePlanner> LearningAgent<E, P> {
    /// Creates an agent from a validated configuration and an RNG seed.
    ///
    /// The valid-action set is captured from the environment here and
    /// treated as fixed afterwards. Fails fast on any configuration
    /// problem; no partially constructed agent ever exists.
    pub fn new(env: E, planner: P, config: AgentConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let valid_actions = env.valid_actions();
        if valid_actions.is_empty() {
            return Err(ConfigError::EmptyActionSet);
        }
        Ok(Self {
            env,
            planner,
            valid_actions,
            learning: config.learning,
            alpha: config.alpha,
            epsilon: config.epsilon,
            alpha_decay: config.alpha_decay,
            epsilon_decay: config.epsilon_decay,
            initial_q: config.initial_q,
            trial: 0,
            testing: false,
            table: QTable::new(),
            state: None,
            deadline: 0,
            trial_reward: 0.0,
            trial_steps: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Starts a new trial.
    ///
    /// Routes the planner to `destination`, increments the trial counter,
    /// then either zeroes alpha and epsilon (`testing = true`, freezing both
    /// learning and exploration for this trial) or advances the decay
    /// schedules. Alpha is updated before epsilon so alpha-coupled epsilon
    /// modes observe the new alpha.
    pub fn reset(&mut self, destination: Option<P::Destination>, testing: bool) {
        self.planner.route_to(destination);
        self.trial += 1;
        self.testing = testing;

        if testing {
            self.alpha = 0.0;
            self.epsilon = 0.0;
        } else {
            self.alpha = self.alpha_decay.apply(self.alpha, self.trial);
            self.epsilon = self.epsilon_decay.apply(self.epsilon, self.alpha, self.trial);
        }

        let state = self.build_state();
        self.state = Some(state);
        self.trial_reward = 0.0;
        self.trial_steps = 0;
    }

    /// Runs one time step: build state, seed its row, choose an action,
    /// act, and learn from the reward. Returns the chosen action.
    ///
    /// With learning disabled the table is never touched and the action is
    /// a uniform random draw from the valid set.
    pub fn update(&mut self) -> Action {
        let state = self.build_state();
        if self.learning {
            self.table
                .ensure_entry(state, &self.valid_actions, self.initial_q);
        }
        let action = policy::choose_action(
            &state,
            self.learning,
            self.epsilon,
            &self.table,
            &self.valid_actions,
            &mut self.rng,
        );
        let reward = self.env.act(action);
        if self.learning {
            self.table.update(&state, action, reward, self.alpha);
        }

        self.state = Some(state);
        self.trial_reward += reward;
        self.trial_steps += 1;
        action
    }

    /// Discretizes the current surroundings into a Q-table key.
    ///
    /// Reads the planner's next waypoint and the environment's perception;
    /// the remaining deadline is read alongside them for diagnostics but is
    /// deliberately excluded from the state tuple.
    fn build_state(&mut self) -> State {
        let waypoint = self.planner.next_waypoint();
        let perception = self.env.sense();
        self.deadline = self.env.remaining_deadline();
        State::new(perception, waypoint)
    }

    /// Snapshot of the current trial's progress for logging.
    ///
    /// `success` is the orchestrator's verdict (destination reached before
    /// the deadline); the agent itself has no notion of trial outcome.
    pub fn trial_stats(&self, success: bool) -> TrialStats {
        TrialStats {
            trial: self.trial,
            testing: self.testing,
            steps: self.trial_steps,
            total_reward: self.trial_reward,
            alpha: self.alpha,
            epsilon: self.epsilon,
            success,
        }
    }

    /// Diagnostic: maximum Q-value recorded for `state`.
    pub fn max_q(&mut self, state: &State) -> MaxQ {
        self.table.max_q(state, &self.valid_actions, &mut self.rng)
    }

    /// Current learning rate.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of trials started so far.
    pub fn trial(&self) -> u32 {
        self.trial
    }

    /// Whether the current trial is a testing trial.
    pub fn is_testing(&self) -> bool {
        self.testing
    }

    /// Whether learning is enabled for this agent.
    pub fn is_learning(&self) -> bool {
        self.learning
    }

    /// State observed at the most recent reset or time step.
    pub fn current_state(&self) -> Option<State> {
        self.state
    }

    /// Deadline read at the most recent state build.
    pub fn remaining_deadline(&self) -> i32 {
        self.deadline
    }

    /// Read-only view of the Q-table.
    pub fn q_table(&self) -> &QTable {
        &self.table
    }

    /// The fixed valid-action set captured at construction.
    pub fn valid_actions(&self) -> &[Action] {
        &self.valid_actions
    }
}
