//! Field grid discretization.
//!
//! The playing surface is partitioned into `bins x bins` equal-width cells
//! per axis. Out-of-bounds coordinates are pulled 0.1m inside the nearest
//! boundary before binning, so the coordinate-to-cell mapping is total:
//! every finite coordinate lands in a valid cell, and exact-boundary values
//! fall in the outermost interval instead of being dropped.
//!
//! The transition model and solver rely on this mapping being a stable,
//! deterministic address space.

use serde::{Deserialize, Serialize};

use crate::error::{Result, XtError};
use crate::field::FieldExtent;

/// Bins per axis in the reference configuration (25 x 25 = 625 cells).
pub const DEFAULT_BINS: usize = 25;

/// Margin pulled inside the boundary when clamping out-of-bounds values.
const BOUNDARY_MARGIN_M: f64 = 0.1;

/// A cell address in (ix, iy). Both are 0-based interval indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex {
    pub ix: u16,
    pub iy: u16,
}

impl CellIndex {
    /// Row-major linear index into a `bins x bins` layout.
    #[inline]
    pub fn id(self, bins: usize) -> usize {
        (self.iy as usize) * bins + (self.ix as usize)
    }
}

/// Grid configuration: bins per axis over a field extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    bins: usize,
    extent: FieldExtent,
}

impl GridSpec {
    pub fn new(bins: usize, extent: FieldExtent) -> Result<Self> {
        if bins == 0 {
            return Err(XtError::InvalidGrid("bins must be at least 1".into()));
        }
        if bins > u16::MAX as usize + 1 {
            return Err(XtError::InvalidGrid(format!("bins {} exceeds cell address space", bins)));
        }
        if !(extent.half_length_m > 0.0) || !(extent.half_width_m > 0.0) {
            return Err(XtError::InvalidGrid(format!(
                "field extent must be positive, got {}m x {}m halves",
                extent.half_length_m, extent.half_width_m
            )));
        }
        Ok(Self { bins, extent })
    }

    /// The reference configuration: 25 bins per axis over the MCG extent.
    pub fn reference() -> Self {
        Self { bins: DEFAULT_BINS, extent: FieldExtent::reference() }
    }

    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.bins * self.bins
    }

    pub fn extent(&self) -> &FieldExtent {
        &self.extent
    }

    /// Map a coordinate pair to its cell. Total over finite inputs: values
    /// beyond the extent are clamped into the outermost interval.
    #[inline]
    pub fn cell_of(&self, x: f64, y: f64) -> CellIndex {
        CellIndex {
            ix: bin_axis(x, self.extent.half_length_m, self.bins) as u16,
            iy: bin_axis(y, self.extent.half_width_m, self.bins) as u16,
        }
    }

    /// Cell midpoint in meters, centre-origin.
    pub fn cell_center(&self, cell: CellIndex) -> (f64, f64) {
        let cell_w = 2.0 * self.extent.half_length_m / self.bins as f64;
        let cell_h = 2.0 * self.extent.half_width_m / self.bins as f64;
        (
            -self.extent.half_length_m + (cell.ix as f64 + 0.5) * cell_w,
            -self.extent.half_width_m + (cell.iy as f64 + 0.5) * cell_h,
        )
    }
}

/// Index of the interval containing `value` on an axis spanning
/// `[-half_extent, half_extent]` split into `bins` equal widths.
///
/// Values above the upper bound are mapped to `half_extent - 0.1`, values
/// below the lower bound to `-half_extent + 0.1`, before binning. The exact
/// upper boundary folds into the last interval.
#[inline]
pub fn bin_axis(value: f64, half_extent: f64, bins: usize) -> usize {
    let start = -half_extent;
    let end = half_extent;
    let v = if value > end {
        end - BOUNDARY_MARGIN_M
    } else if value < start {
        start + BOUNDARY_MARGIN_M
    } else {
        value
    };
    let width = (end - start) / bins as f64;
    let idx = ((v - start) / width).floor() as usize;
    idx.min(bins - 1)
}
