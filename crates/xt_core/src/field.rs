//! Reference-venue geometry and coordinate normalization.
//!
//! Event coordinates are venue-centric: the origin is the centre of the
//! ground, x runs goal to goal and y boundary to boundary, in meters.
//! AFL venues differ in size, so upstream feeds record each event against
//! its own venue's dimensions; everything in this crate works on coordinates
//! rescaled onto a single reference venue (the MCG, 160m x 141m).

use serde::{Deserialize, Serialize};

/// Reference venue half-length in meters (MCG: 160m goal to goal).
pub const HALF_LENGTH_M: f64 = 80.0;

/// Reference venue half-width in meters (MCG: 141m boundary to boundary).
pub const HALF_WIDTH_M: f64 = 70.5;

/// Rectangular playing-surface extent, centre-origin.
///
/// Covers `[-half_length_m, half_length_m] x [-half_width_m, half_width_m]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldExtent {
    pub half_length_m: f64,
    pub half_width_m: f64,
}

impl FieldExtent {
    /// The reference venue extent (MCG dimensions).
    pub fn reference() -> Self {
        Self { half_length_m: HALF_LENGTH_M, half_width_m: HALF_WIDTH_M }
    }

    /// Whether a coordinate pair lies on the playing surface.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= -self.half_length_m
            && x <= self.half_length_m
            && y >= -self.half_width_m
            && y <= self.half_width_m
    }

    /// Clamp a coordinate pair onto the playing surface.
    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x.clamp(-self.half_length_m, self.half_length_m),
            y.clamp(-self.half_width_m, self.half_width_m),
        )
    }
}

impl Default for FieldExtent {
    fn default() -> Self {
        Self::reference()
    }
}

/// Rescale a coordinate recorded on an arbitrary venue onto the reference
/// venue's axis.
///
/// The raw value is expressed as a fraction of the source venue's
/// half-extent, bounded to `[-1, 1]`, then stretched to the reference
/// half-extent. Feeds occasionally report positions slightly beyond the
/// recorded venue dimensions; bounding first keeps those on the surface.
///
/// Returns 0.0 for a non-positive venue extent or a non-finite input.
pub fn normalize_to_reference(value: f64, venue_half_extent: f64, reference_half_extent: f64) -> f64 {
    if venue_half_extent <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / venue_half_extent).clamp(-1.0, 1.0) * reference_half_extent
}
