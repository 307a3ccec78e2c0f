//! Core value types for the driving agent.
//!
//! Defines the closed action set, traffic-light colors, the perception
//! snapshot delivered by the environment, and the discretized [`State`]
//! used as the Q-table lookup key.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A driving decision at an intersection.
///
/// The same closed domain describes three things in a [`State`]:
/// the agent's own decision, the observed maneuver of another vehicle
/// (`Idle` meaning no vehicle from that direction), and the planner's
/// next waypoint (`Idle` meaning the destination has been reached).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    Idle,
    Forward,
    Left,
    Right,
}

impl Action {
    /// All actions in a fixed order.
    pub const ALL: [Action; 4] = [Action::Idle, Action::Forward, Action::Left, Action::Right];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Idle => write!(f, "idle"),
            Action::Forward => write!(f, "forward"),
            Action::Left => write!(f, "left"),
            Action::Right => write!(f, "right"),
        }
    }
}

/// Traffic-light color at the agent's intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LightColor {
    Red,
    Green,
}

impl fmt::Display for LightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightColor::Red => write!(f, "red"),
            LightColor::Green => write!(f, "green"),
        }
    }
}

/// One sensing snapshot from the environment: the light at the agent's
/// intersection and the maneuvers of oncoming and left-approaching traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Perception {
    pub light: LightColor,
    /// Maneuver of oncoming traffic (`Idle` = no oncoming vehicle).
    pub oncoming: Action,
    /// Maneuver of traffic approaching from the left (`Idle` = none).
    pub left: Action,
}

/// Discretized state used as the Q-table key.
///
/// Two states built from identical feature values are the same table entry:
/// `State` is a plain value type with derived equality and hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct State {
    pub light: LightColor,
    pub oncoming: Action,
    pub left: Action,
    /// Direction of the next waypoint toward the destination.
    pub waypoint: Action,
}

impl State {
    /// Builds a state from a perception snapshot and the planner's waypoint.
    pub fn new(perception: Perception, waypoint: Action) -> Self {
        Self {
            light: perception.light,
            oncoming: perception.oncoming,
            left: perception.left,
            waypoint,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.light, self.oncoming, self.left, self.waypoint
        )
    }
}
