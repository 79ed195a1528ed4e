//! Viewport-derived level geometry: path waypoints and placement slots.

use rampart_defence_core::{RangeScale, Viewport, WorldPoint};

/// Fractional path anchors traced by enemies, expressed in viewport units.
const PATH_ANCHORS: [(f32, f32); 8] = [
    (0.00, 0.18),
    (0.22, 0.18),
    (0.22, 0.62),
    (0.50, 0.62),
    (0.50, 0.30),
    (0.78, 0.30),
    (0.78, 0.72),
    (1.00, 0.72),
];

/// Fractional anchors of tower placement slots, expressed in viewport units.
const SLOT_ANCHORS: [(f32, f32); 10] = [
    (0.12, 0.34),
    (0.30, 0.10),
    (0.36, 0.45),
    (0.14, 0.74),
    (0.42, 0.76),
    (0.60, 0.46),
    (0.64, 0.16),
    (0.86, 0.50),
    (0.68, 0.86),
    (0.90, 0.88),
];

/// Level geometry derived from the active viewport.
///
/// Recomputed wholesale on every resize; slot occupancy is preserved by index
/// because the anchor table never changes shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    viewport: Viewport,
    scale: RangeScale,
    waypoints: Vec<WorldPoint>,
    slot_positions: Vec<WorldPoint>,
}

impl Layout {
    /// Derives the layout for the provided viewport.
    #[must_use]
    pub(crate) fn for_viewport(viewport: Viewport) -> Self {
        let waypoints = PATH_ANCHORS
            .iter()
            .map(|&(x, y)| WorldPoint::new(x * viewport.width(), y * viewport.height()))
            .collect();
        let slot_positions = SLOT_ANCHORS
            .iter()
            .map(|&(x, y)| WorldPoint::new(x * viewport.width(), y * viewport.height()))
            .collect();
        Self {
            viewport,
            scale: RangeScale::from_viewport(viewport),
            waypoints,
            slot_positions,
        }
    }

    /// Viewport the layout currently matches.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Range-scale factor applied to spatial tower statistics.
    #[must_use]
    pub const fn scale(&self) -> RangeScale {
        self.scale
    }

    /// Waypoints enemies travel through, in path order.
    #[must_use]
    pub fn waypoints(&self) -> &[WorldPoint] {
        &self.waypoints
    }

    /// Position of every placement slot, indexed by slot identifier.
    #[must_use]
    pub fn slot_positions(&self) -> &[WorldPoint] {
        &self.slot_positions
    }

    /// Number of placement slots the level defines.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slot_positions.len()
    }

    /// Point at which wave enemies enter the path.
    #[must_use]
    pub fn spawn_point(&self) -> WorldPoint {
        self.waypoints[0]
    }
}
