//! Possession-chain event records.

use serde::{Deserialize, Serialize};

/// Action descriptions that transfer the ball to a new location.
///
/// Only these participate in the transition model. Marks, stoppages,
/// spoils and the like describe context around the ball, not a live
/// transfer, and carry no destination worth modelling.
pub const DISPOSAL_ACTIONS: [&str; 6] = [
    "Kick",
    "Handball",
    "Ground Kick",
    "Kickin short",
    "Kickin long",
    "Kickin play on",
];

/// One action in a possession chain, rescaled to the reference venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainEvent {
    /// Start location of the action in meters, centre-origin.
    pub x: f64,
    pub y: f64,
    /// Where the ball ends up (the start of the next chain state).
    /// Absent on the final event of a chain.
    pub x_next: Option<f64>,
    pub y_next: Option<f64>,
    /// Raw action classification from the feed, e.g. "Kick" or "Handball".
    pub description: String,
    pub shot_at_goal: bool,
    /// Points from an immediately scoring shot (goal 6, behind 1), else 0.
    pub points: u32,
}

impl ChainEvent {
    /// Whether this event is a disposal, i.e. participates in the
    /// transition model.
    pub fn is_disposal(&self) -> bool {
        DISPOSAL_ACTIONS.contains(&self.description.as_str())
    }

    /// Destination coordinates, if the chain continued past this event.
    pub fn end_position(&self) -> Option<(f64, f64)> {
        match (self.x_next, self.y_next) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }
}
