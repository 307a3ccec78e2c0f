//! Epsilon-greedy action selection.

use rand::Rng;

use crate::qtable::QTable;
use crate::types::{Action, State};

/// Draws a uniformly random action from the valid set.
pub fn random_action<R: Rng>(valid_actions: &[Action], rng: &mut R) -> Action {
    valid_actions[rng.gen_range(0..valid_actions.len())]
}

/// Chooses an action for `state`.
///
/// - learning disabled: uniform random over the valid set;
/// - with probability `epsilon`: uniform random (exploration);
/// - otherwise: the maximum-value action for `state`, breaking exact-value
///   ties by a uniform draw among the tied maximizers, so the choice carries
///   no bias from the action set's iteration order.
///
/// # Panics
///
/// Panics if learning is enabled and `state` has no Q-table row. The
/// decision loop seeds the row before every choice; reaching the
/// exploitation branch unseeded is a contract violation.
pub fn choose_action<R: Rng>(
    state: &State,
    learning: bool,
    epsilon: f64,
    table: &QTable,
    valid_actions: &[Action],
    rng: &mut R,
) -> Action {
    if !learning || rng.gen::<f64>() < epsilon {
        return random_action(valid_actions, rng);
    }

    let row = match table.row(state) {
        Some(row) => row,
        None => panic!("exploitation on unseeded state {state}"),
    };
    let max = row.values().copied().fold(f64::NEG_INFINITY, f64::max);
    // Collect maximizers in valid-action order, not map-iteration order,
    // so the seeded RNG is the only source of randomness in the draw.
    let maximizers: Vec<Action> = valid_actions
        .iter()
        .copied()
        .filter(|action| row.get(action).copied() == Some(max))
        .collect();
    maximizers[rng.gen_range(0..maximizers.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LightColor, Perception};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn some_state() -> State {
        State::new(
            Perception {
                light: LightColor::Red,
                oncoming: Action::Forward,
                left: Action::Idle,
            },
            Action::Left,
        )
    }

    #[test]
    fn learning_disabled_stays_in_valid_set() {
        let table = QTable::new();
        let mut rng = StdRng::seed_from_u64(1);
        let valid = [Action::Idle, Action::Forward];
        for _ in 0..100 {
            let action = choose_action(&some_state(), false, 0.0, &table, &valid, &mut rng);
            assert!(valid.contains(&action));
        }
    }

    #[test]
    fn exploitation_picks_the_maximizer() {
        let mut table = QTable::new();
        table.ensure_entry(some_state(), &Action::ALL, 0.0);
        table.update(&some_state(), Action::Right, 5.0, 1.0);

        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let action = choose_action(&some_state(), true, 0.0, &table, &Action::ALL, &mut rng);
            assert_eq!(action, Action::Right);
        }
    }

    #[test]
    fn tied_maximizers_each_get_chosen() {
        let mut table = QTable::new();
        table.ensure_entry(some_state(), &Action::ALL, 0.0);
        table.update(&some_state(), Action::Forward, 3.0, 1.0);
        table.update(&some_state(), Action::Left, 3.0, 1.0);
        table.update(&some_state(), Action::Idle, -1.0, 1.0);
        table.update(&some_state(), Action::Right, 2.9, 1.0);

        let mut rng = StdRng::seed_from_u64(3);
        let mut forward = 0;
        let mut left = 0;
        for _ in 0..200 {
            match choose_action(&some_state(), true, 0.0, &table, &Action::ALL, &mut rng) {
                Action::Forward => forward += 1,
                Action::Left => left += 1,
                other => panic!("non-maximal action {other} chosen"),
            }
        }
        assert!(forward > 0);
        assert!(left > 0);
    }

    #[test]
    fn full_exploration_ignores_the_table() {
        let mut table = QTable::new();
        table.ensure_entry(some_state(), &Action::ALL, 0.0);
        table.update(&some_state(), Action::Right, 100.0, 1.0);

        // epsilon = 1: every draw explores, so non-maximal actions appear
        let mut rng = StdRng::seed_from_u64(4);
        let mut non_maximal = 0;
        for _ in 0..100 {
            if choose_action(&some_state(), true, 1.0, &table, &Action::ALL, &mut rng)
                != Action::Right
            {
                non_maximal += 1;
            }
        }
        assert!(non_maximal > 0);
    }

    #[test]
    fn tie_break_depends_only_on_the_rng() {
        // Two tables built independently hold the same values but their
        // inner maps iterate in different orders; with equal seeds the
        // tie-break sequences must still match exactly.
        let build = || {
            let mut table = QTable::new();
            table.ensure_entry(some_state(), &Action::ALL, 0.0);
            table.update(&some_state(), Action::Forward, 3.0, 1.0);
            table.update(&some_state(), Action::Left, 3.0, 1.0);
            table
        };
        let (a, b) = (build(), build());
        let mut rng_a = StdRng::seed_from_u64(11);
        let mut rng_b = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            assert_eq!(
                choose_action(&some_state(), true, 0.0, &a, &Action::ALL, &mut rng_a),
                choose_action(&some_state(), true, 0.0, &b, &Action::ALL, &mut rng_b),
            );
        }
    }

    #[test]
    #[should_panic(expected = "unseeded state")]
    fn exploitation_on_unseeded_state_panics() {
        let table = QTable::new();
        let mut rng = StdRng::seed_from_u64(5);
        choose_action(&some_state(), true, 0.0, &table, &Action::ALL, &mut rng);
    }
}
