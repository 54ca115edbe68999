//! # xt_core - Expected Threat Surface Engine
//!
//! Computes an expected threat (xT) value surface for Australian rules
//! football possession chains. The playing surface is discretized into a
//! grid, transition and scoring probabilities between cells are estimated
//! from observed possession sequences, and a fixed-point iteration solves
//! the expected scoring value of possessing the ball in each cell.
//!
//! ## Features
//! - Deterministic: same events and config produce a bit-identical surface
//! - Total binning: every finite coordinate maps to a valid cell
//! - NaN-free: every ratio is guarded, so empty cells resolve to zero
//!
//! The engine consumes a table of possession events and produces a value
//! lookup table plus per-event annotations. It does not read files, plot,
//! or know about teams and scoreboards; those belong to the surrounding
//! I/O and reporting layers.

pub mod annotate;
pub mod error;
pub mod event;
pub mod field;
pub mod grid;
pub mod model;
pub mod pipeline;
pub mod solver;

pub use annotate::{annotate, AnnotatedEvent};
pub use error::{Result, XtError};
pub use event::{ChainEvent, DISPOSAL_ACTIONS};
pub use field::{normalize_to_reference, FieldExtent};
pub use grid::{CellIndex, GridSpec, DEFAULT_BINS};
pub use model::{CellStats, TransitionModel, MIN_CELL_SAMPLE};
pub use pipeline::{compute_expected_threat, ExpectedThreat};
pub use solver::{solve, Solution, SolverConfig, ValueSurface, DEFAULT_ITERATIONS};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
