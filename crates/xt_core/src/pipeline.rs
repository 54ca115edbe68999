//! End-to-end computation: model estimation, value iteration, annotation.
//!
//! Data flows strictly forward: events -> transition model -> solved
//! surface -> annotated events. No stage reaches backward.

use serde::{Deserialize, Serialize};

use crate::annotate::{annotate, AnnotatedEvent};
use crate::error::Result;
use crate::event::ChainEvent;
use crate::grid::GridSpec;
use crate::model::TransitionModel;
use crate::solver::{solve, Solution, SolverConfig};

/// Output of a full expected-threat run.
///
/// The solution's surface is exposed standalone so consumers can re-annotate
/// other event sets without re-running the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedThreat {
    pub model: TransitionModel,
    pub solution: Solution,
    pub annotated: Vec<AnnotatedEvent>,
}

/// Estimate the transition model, solve the value surface, and annotate the
/// input events with it.
pub fn compute_expected_threat(
    events: &[ChainEvent],
    grid: &GridSpec,
    config: &SolverConfig,
) -> Result<ExpectedThreat> {
    let model = TransitionModel::build(events, grid);
    let solution = solve(&model, config)?;
    let annotated = annotate(events, &solution.surface, grid);
    Ok(ExpectedThreat { model, solution, annotated })
}
