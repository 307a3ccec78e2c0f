//! Sparse Q-value table keyed by discretized states.

use std::collections::HashMap;

use rand::Rng;

use crate::types::{Action, State};

/// Result of the diagnostic [`QTable::max_q`] accessor.
///
/// The legacy accessor answered "what is the best value here?" for unseeded
/// states by picking a random valid action instead of a value. That behavior
/// is preserved, made explicit in the type: callers of the diagnostic path
/// must handle the unseeded case, while the action-selection path never hits
/// it because entries are seeded before every choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxQ {
    /// Maximum stored value for a seeded state.
    Value(f64),
    /// The state has no entry; a uniformly random valid action is returned
    /// instead. Repeated calls may differ.
    Unseeded(Action),
}

/// Sparse mapping from [`State`] to per-action value estimates.
///
/// Rows are created lazily, exactly once per state, with every valid action
/// starting at the same initial value. When learning is disabled no row is
/// ever created.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    entries: HashMap<State, HashMap<Action, f64>>,
}

impl QTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a row for `state` if absent, mapping each valid action to
    /// `initial`. Idempotent: an existing row is left untouched.
    pub fn ensure_entry(&mut self, state: State, valid_actions: &[Action], initial: f64) {
        self.entries
            .entry(state)
            .or_insert_with(|| valid_actions.iter().map(|&a| (a, initial)).collect());
    }

    /// Returns whether `state` has a row.
    pub fn contains(&self, state: &State) -> bool {
        self.entries.contains_key(state)
    }

    /// Returns the stored value for `(state, action)`, if the row exists.
    pub fn value(&self, state: &State, action: Action) -> Option<f64> {
        self.entries.get(state)?.get(&action).copied()
    }

    /// Returns the per-action values for `state`, if the row exists.
    pub fn row(&self, state: &State) -> Option<&HashMap<Action, f64>> {
        self.entries.get(state)
    }

    /// Number of seeded states.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no state has been seeded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies the single-step, undiscounted update
    /// `q ← q + alpha·(reward − q)`.
    ///
    /// # Panics
    ///
    /// Panics if `state` (or `action` within it) was never seeded: updating
    /// an unseeded entry is a contract violation of the decision loop, which
    /// always calls [`QTable::ensure_entry`] first.
    pub fn update(&mut self, state: &State, action: Action, reward: f64, alpha: f64) {
        let q = self
            .entries
            .get_mut(state)
            .and_then(|row| row.get_mut(&action));
        match q {
            Some(q) => *q += alpha * (reward - *q),
            None => panic!("Q-table update for unseeded state {state} / action {action}"),
        }
    }

    /// Diagnostic accessor: the maximum value stored for `state`.
    ///
    /// For an unseeded state this falls back to a uniformly random valid
    /// action (see [`MaxQ`]); it is not used by action selection.
    pub fn max_q<R: Rng>(&self, state: &State, valid_actions: &[Action], rng: &mut R) -> MaxQ {
        match self.entries.get(state) {
            Some(row) => {
                let max = row.values().copied().fold(f64::NEG_INFINITY, f64::max);
                MaxQ::Value(max)
            }
            None => MaxQ::Unseeded(valid_actions[rng.gen_range(0..valid_actions.len())]),
        }
    }
}
