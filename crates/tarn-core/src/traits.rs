//! Capability traits a mesh implements to be driven by the hydrology core.
//!
//! [`Terrain`] is the read side: elevation, adjacency, lake membership and
//! ocean/border/coast flags, all addressed by arena handle. [`HydrologySink`]
//! is the mutation side: the core never writes to the mesh except through
//! these requests.

use crate::id::{CenterId, CornerId, LakeId};

/// Read-only access to a corner/center/lake graph.
///
/// Handles passed to these methods must be valid for the implementing mesh;
/// implementations may panic on stale handles, exactly like slice indexing.
///
/// All reads must reflect every mutation previously requested through
/// [`HydrologySink`] on the same object: an elevation raised during a pass
/// is observed by the next `elevation()` or `downslope()` call.
pub trait Terrain {
    // ── corners ────────────────────────────────────────────────

    /// Elevation of a corner.
    fn elevation(&self, corner: CornerId) -> f32;

    /// Downhill neighbour of a corner, or the corner itself when it has
    /// no strictly lower neighbour.
    fn downslope(&self, corner: CornerId) -> CornerId;

    /// Corners sharing an edge with `corner`. The relation is symmetric.
    fn adjacent(&self, corner: CornerId) -> &[CornerId];

    /// Centers bounded by `corner`.
    fn touches(&self, corner: CornerId) -> &[CenterId];

    /// Lake the corner belongs to, if any.
    fn corner_lake(&self, corner: CornerId) -> Option<LakeId>;

    /// Whether the corner lies in the ocean.
    fn is_ocean(&self, corner: CornerId) -> bool;

    /// Whether the corner lies on the map border.
    fn is_border(&self, corner: CornerId) -> bool;

    /// `true` when the corner has no strictly lower neighbour.
    fn is_local_minimum(&self, corner: CornerId) -> bool {
        self.downslope(corner) == corner
    }

    // ── centers ────────────────────────────────────────────────

    /// Elevation of a center.
    fn center_elevation(&self, center: CenterId) -> f32;

    /// Centers sharing an edge with `center`.
    fn neighbors(&self, center: CenterId) -> &[CenterId];

    /// Corners bounding `center`.
    fn center_corners(&self, center: CenterId) -> &[CornerId];

    /// Lake the center is a section of, if any.
    fn center_lake(&self, center: CenterId) -> Option<LakeId>;

    /// Whether the center is coastal land.
    fn is_coast(&self, center: CenterId) -> bool;

    // ── lakes ──────────────────────────────────────────────────

    /// Corner the lake drains through, once discovered.
    fn lake_outflow(&self, lake: LakeId) -> Option<CornerId>;

    /// Every corner of the lake body.
    fn lake_corners(&self, lake: LakeId) -> &[CornerId];

    /// Corners on the lake's shore.
    fn lake_border_corners(&self, lake: LakeId) -> &[CornerId];

    /// Centers making up the lake.
    fn lake_sections(&self, lake: LakeId) -> &[CenterId];

    /// Water level of the lake.
    fn lake_elevation(&self, lake: LakeId) -> f32;
}

/// Mutation requests issued by the hydrology core.
///
/// Bound once per pass and passed explicitly as `&mut S`. Requests are
/// synchronous: their effect must be visible to the next [`Terrain`] read.
pub trait HydrologySink: Terrain {
    /// Set a corner's elevation.
    fn set_elevation(&mut self, corner: CornerId, elevation: f32);

    /// Record the corner through which a lake drains.
    fn set_outflow(&mut self, lake: LakeId, corner: CornerId);

    /// Allocate a new lake over `centers` at `elevation` and return its
    /// handle. The new lake has no outflow.
    fn create_lake(&mut self, centers: &[CenterId], elevation: f32) -> LakeId;

    /// Delete a lake that no longer has any sections.
    fn remove_lake(&mut self, lake: LakeId);

    /// Add centers that belong to no lake to `lake`.
    fn add_sections(&mut self, centers: &[CenterId], lake: LakeId);

    /// Transfer centers from whichever lakes currently own them to `lake`.
    fn move_sections(&mut self, centers: &[CenterId], lake: LakeId);
}
