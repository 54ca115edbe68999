//! Joins the solved value surface back onto the event table.
//!
//! Each disposal event picks up the surface value at its origin cell and,
//! when the chain continued, at its destination cell. The difference is the
//! marginal value the disposal added. Left-join semantics: every retained
//! event gets exactly one `value_start` and at most one `value_end`; the
//! join itself neither duplicates nor drops events.

use serde::{Deserialize, Serialize};

use crate::event::ChainEvent;
use crate::grid::GridSpec;
use crate::solver::ValueSurface;

/// A disposal event with the solved surface values attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedEvent {
    pub event: ChainEvent,
    /// Surface value at the event's origin cell.
    pub value_start: f64,
    /// Surface value at the destination cell; absent on chain-terminal
    /// events rather than fabricated.
    pub value_end: Option<f64>,
    /// `value_end - value_start` when a destination exists.
    pub delta_value: Option<f64>,
}

/// Annotate every disposal event with its start/end surface values.
///
/// Non-disposal events are excluded from the output.
pub fn annotate(events: &[ChainEvent], surface: &ValueSurface, grid: &GridSpec) -> Vec<AnnotatedEvent> {
    events
        .iter()
        .filter(|event| event.is_disposal())
        .map(|event| {
            let value_start = surface.value(grid.cell_of(event.x, event.y));
            let value_end = event.end_position().map(|(x, y)| surface.value(grid.cell_of(x, y)));
            let delta_value = value_end.map(|end| end - value_start);
            AnnotatedEvent { event: event.clone(), value_start, value_end, delta_value }
        })
        .collect()
}
