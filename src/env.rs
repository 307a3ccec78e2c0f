//! Boundary traits for the agent's external collaborators.
//!
//! The grid world, traffic simulation, and route planner live outside this
//! crate; the agent consumes them only through these two traits.

use crate::types::{Action, Perception};

/// The simulated world the agent drives in.
pub trait Environment {
    /// Returns the perception snapshot at the agent's current intersection.
    fn sense(&self) -> Perception;

    /// Remaining time steps before the current trial's deadline.
    fn remaining_deadline(&self) -> i32;

    /// Executes `action` and returns the resulting reward.
    fn act(&mut self, action: Action) -> f64;

    /// The set of actions the agent may take.
    ///
    /// Captured once at agent construction and treated as fixed for the
    /// agent's lifetime.
    fn valid_actions(&self) -> Vec<Action>;
}

/// Computes waypoints toward the current destination.
pub trait RoutePlanner {
    /// Destination representation; opaque to the agent, which only forwards
    /// it from [`reset`](crate::agent::LearningAgent::reset).
    type Destination;

    /// Starts routing toward a new destination (`None` = pick one).
    fn route_to(&mut self, destination: Option<Self::Destination>);

    /// Direction of the next waypoint; `Action::Idle` once the destination
    /// has been reached.
    fn next_waypoint(&mut self) -> Action;
}
