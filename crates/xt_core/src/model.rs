//! Transition and scoring model estimated from observed possession chains.
//!
//! One linear scan over the disposal-filtered events accumulates, per origin
//! cell, event/shot/points counts, and a joint origin-to-destination count
//! table. Per-cell probabilities are derived once at the end of the scan.
//!
//! Every ratio goes through [`safe_div`], so a cell with no events yields
//! all-zero statistics rather than a NaN that would poison the value
//! iteration for every cell that can reach it.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::event::ChainEvent;
use crate::grid::{CellIndex, GridSpec};

/// Minimum events a cell needs before its per-shot scoring estimate is
/// trusted; below this the estimate is forced to zero.
pub const MIN_CELL_SAMPLE: u32 = 10;

/// Division that resolves an empty denominator to zero instead of NaN/inf.
#[inline]
pub(crate) fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Aggregated statistics for one origin cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CellStats {
    /// Disposal events originating in this cell.
    pub total_events: u32,
    /// How many of those were shots at goal.
    pub total_shots: u32,
    /// Points scored by those shots.
    pub total_points: u32,
    /// Probability the ball moves on rather than being shot.
    pub move_probability: f64,
    /// Probability a disposal from here is a shot.
    pub shot_probability: f64,
    /// Average points per shot, zeroed for under-sampled cells.
    pub expected_points_per_shot: f64,
    /// Immediate expected scoring contribution of the cell:
    /// `shot_probability * expected_points_per_shot`.
    pub shot_value: f64,
}

impl CellStats {
    fn finalize(&mut self) {
        let events = self.total_events as f64;
        self.move_probability = safe_div((self.total_events - self.total_shots) as f64, events);
        self.shot_probability = safe_div(self.total_shots as f64, events);
        self.expected_points_per_shot = if self.total_events < MIN_CELL_SAMPLE {
            // Too few observations for the per-shot average to mean anything.
            0.0
        } else {
            safe_div(self.total_points as f64, self.total_shots as f64)
        };
        self.shot_value = self.shot_probability * self.expected_points_per_shot;
    }
}

/// Estimated transition model over the grid cell address space.
///
/// Per-origin statistics are stored dense (row-major over the grid);
/// origin-to-destination counts are sparse, sorted by destination so that
/// iteration order is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionModel {
    grid: GridSpec,
    stats: Vec<CellStats>,
    /// Per origin cell id: (destination cell id, event count), ascending.
    transitions: Vec<Vec<(usize, u32)>>,
}

impl TransitionModel {
    /// Build the model from a table of possession events.
    ///
    /// Non-disposal events are ignored. Events without a destination
    /// (chain-terminal rows) still count toward their origin cell's
    /// statistics but add no transition mass, so a cell's outgoing
    /// transition probabilities may sum to less than one.
    pub fn build(events: &[ChainEvent], grid: &GridSpec) -> Self {
        let bins = grid.bins();
        let mut stats = vec![CellStats::default(); grid.cell_count()];
        let mut joint: FxHashMap<(usize, usize), u32> = FxHashMap::default();

        for event in events.iter().filter(|e| e.is_disposal()) {
            let origin = grid.cell_of(event.x, event.y).id(bins);
            let cell = &mut stats[origin];
            cell.total_events += 1;
            if event.shot_at_goal {
                cell.total_shots += 1;
                cell.total_points += event.points;
            }
            if let Some((x_next, y_next)) = event.end_position() {
                let dest = grid.cell_of(x_next, y_next).id(bins);
                *joint.entry((origin, dest)).or_insert(0) += 1;
            }
        }

        for cell in &mut stats {
            cell.finalize();
        }

        let mut transitions = vec![Vec::new(); grid.cell_count()];
        for ((origin, dest), count) in joint {
            transitions[origin].push((dest, count));
        }
        for outgoing in &mut transitions {
            outgoing.sort_unstable_by_key(|&(dest, _)| dest);
        }

        Self { grid: *grid, stats, transitions }
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Statistics for an origin cell.
    pub fn stats(&self, cell: CellIndex) -> &CellStats {
        &self.stats[cell.id(self.grid.bins())]
    }

    #[inline]
    pub(crate) fn stats_by_id(&self, id: usize) -> &CellStats {
        &self.stats[id]
    }

    /// Outgoing (destination id, count) pairs for an origin cell id.
    #[inline]
    pub(crate) fn transitions_from(&self, origin_id: usize) -> &[(usize, u32)] {
        &self.transitions[origin_id]
    }

    /// Probability that a disposal from `origin` lands in `dest`.
    ///
    /// Zero when the origin has no events or the pair was never observed.
    pub fn transition_probability(&self, origin: CellIndex, dest: CellIndex) -> f64 {
        let bins = self.grid.bins();
        let origin_id = origin.id(bins);
        let dest_id = dest.id(bins);
        let outgoing = &self.transitions[origin_id];
        let count = match outgoing.binary_search_by_key(&dest_id, |&(d, _)| d) {
            Ok(pos) => outgoing[pos].1,
            Err(_) => return 0.0,
        };
        safe_div(count as f64, self.stats[origin_id].total_events as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSpec;

    fn event(x: f64, y: f64, dest: Option<(f64, f64)>, shot: bool, points: u32) -> ChainEvent {
        ChainEvent {
            x,
            y,
            x_next: dest.map(|d| d.0),
            y_next: dest.map(|d| d.1),
            description: "Kick".to_string(),
            shot_at_goal: shot,
            points,
        }
    }

    #[test]
    fn test_empty_cell_yields_all_zero_stats() {
        let grid = GridSpec::reference();
        let model = TransitionModel::build(&[], &grid);

        let stats = model.stats(CellIndex { ix: 12, iy: 12 });
        assert_eq!(stats.total_events, 0);
        assert_eq!(stats.move_probability, 0.0);
        assert_eq!(stats.shot_probability, 0.0);
        assert_eq!(stats.expected_points_per_shot, 0.0);
        assert_eq!(stats.shot_value, 0.0);
        assert!(!stats.move_probability.is_nan());
    }

    #[test]
    fn test_probabilities_are_well_formed() {
        let grid = GridSpec::reference();
        let mut events = Vec::new();
        // 3 disposals from one cell, 1 of them a shot: odd counts exercise
        // the rounding of both ratios.
        events.push(event(10.0, 10.0, Some((20.0, 10.0)), false, 0));
        events.push(event(10.0, 10.0, Some((30.0, 10.0)), false, 0));
        events.push(event(10.0, 10.0, None, true, 6));

        let model = TransitionModel::build(&events, &grid);
        let stats = model.stats(grid.cell_of(10.0, 10.0));

        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.total_shots, 1);
        assert!(
            (stats.move_probability + stats.shot_probability - 1.0).abs() < 1e-12,
            "move + shot should partition the disposals, got {} + {}",
            stats.move_probability,
            stats.shot_probability
        );
    }

    #[test]
    fn test_low_sample_regularization_at_nine_events() {
        let grid = GridSpec::reference();
        // 9 events, all scoring shots: still not enough to trust the cell.
        let events: Vec<_> = (0..9).map(|_| event(70.0, 0.0, None, true, 6)).collect();

        let model = TransitionModel::build(&events, &grid);
        let stats = model.stats(grid.cell_of(70.0, 0.0));

        assert_eq!(stats.total_events, 9);
        assert_eq!(stats.expected_points_per_shot, 0.0);
        assert_eq!(stats.shot_value, 0.0);
    }

    #[test]
    fn test_low_sample_threshold_at_ten_events() {
        let grid = GridSpec::reference();
        // 10 events, 2 shots worth 12 points: estimate becomes trustworthy.
        let mut events: Vec<_> = (0..8).map(|_| event(70.0, 0.0, Some((75.0, 0.0)), false, 0)).collect();
        events.push(event(70.0, 0.0, None, true, 6));
        events.push(event(70.0, 0.0, None, true, 6));

        let model = TransitionModel::build(&events, &grid);
        let stats = model.stats(grid.cell_of(70.0, 0.0));

        assert_eq!(stats.total_events, 10);
        assert_eq!(stats.total_shots, 2);
        assert_eq!(stats.total_points, 12);
        assert_eq!(stats.expected_points_per_shot, 6.0);
        assert_eq!(stats.shot_probability, 0.2);
        assert!((stats.shot_value - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_zero_shots_yields_zero_expected_points() {
        let grid = GridSpec::reference();
        let events: Vec<_> = (0..12).map(|_| event(0.0, 0.0, Some((10.0, 0.0)), false, 0)).collect();

        let model = TransitionModel::build(&events, &grid);
        let stats = model.stats(grid.cell_of(0.0, 0.0));

        assert_eq!(stats.total_events, 12);
        assert_eq!(stats.total_shots, 0);
        assert_eq!(stats.expected_points_per_shot, 0.0);
        assert_eq!(stats.move_probability, 1.0);
    }

    #[test]
    fn test_transition_probabilities() {
        let grid = GridSpec::reference();
        let mut events = Vec::new();
        // 4 disposals from the same origin: 2 to one cell, 1 to another,
        // 1 chain-terminal.
        events.push(event(-40.0, 0.0, Some((0.0, 0.0)), false, 0));
        events.push(event(-40.0, 0.0, Some((0.0, 0.0)), false, 0));
        events.push(event(-40.0, 0.0, Some((40.0, 0.0)), false, 0));
        events.push(event(-40.0, 0.0, None, false, 0));

        let model = TransitionModel::build(&events, &grid);
        let origin = grid.cell_of(-40.0, 0.0);

        assert_eq!(model.stats(origin).total_events, 4);
        assert_eq!(model.transition_probability(origin, grid.cell_of(0.0, 0.0)), 0.5);
        assert_eq!(model.transition_probability(origin, grid.cell_of(40.0, 0.0)), 0.25);
        // Unobserved pair.
        assert_eq!(model.transition_probability(origin, grid.cell_of(-70.0, -60.0)), 0.0);
        // Terminal row contributed to the origin count but no transition:
        // outgoing mass sums to 0.75.
        let outgoing: f64 = model
            .transitions_from(origin.id(grid.bins()))
            .iter()
            .map(|&(_, count)| count as f64 / 4.0)
            .sum();
        assert!((outgoing - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_non_disposals_are_excluded() {
        let grid = GridSpec::reference();
        let mut mark = event(10.0, 10.0, Some((20.0, 10.0)), false, 0);
        mark.description = "Mark".to_string();
        let events = vec![mark, event(10.0, 10.0, Some((20.0, 10.0)), false, 0)];

        let model = TransitionModel::build(&events, &grid);
        assert_eq!(model.stats(grid.cell_of(10.0, 10.0)).total_events, 1);
    }

    #[test]
    fn test_points_only_counted_on_shots() {
        let grid = GridSpec::reference();
        let events: Vec<_> = (0..10).map(|i| event(50.0, 20.0, None, i % 2 == 0, 6)).collect();

        let model = TransitionModel::build(&events, &grid);
        let stats = model.stats(grid.cell_of(50.0, 20.0));
        // 5 shots at 6 points each; the non-shot rows' points fields are
        // not scoring outcomes and must not leak in.
        assert_eq!(stats.total_shots, 5);
        assert_eq!(stats.total_points, 30);
    }
}
