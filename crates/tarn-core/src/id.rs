//! Strongly-typed arena handles and the [`CornerList`] type alias.
//!
//! The mesh owns every corner, center and lake. The hydrology core only
//! ever receives, stores and compares these handles; it never frees the
//! entities behind them.

use smallvec::SmallVec;
use std::fmt;

/// Identifies a corner (mesh vertex) within a terrain.
///
/// `CornerId(n)` is an index into the owning mesh's corner arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CornerId(pub u32);

impl CornerId {
    /// Arena index of this corner.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CornerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corner#{}", self.0)
    }
}

impl From<u32> for CornerId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a center (polygonal cell) within a terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CenterId(pub u32);

impl CenterId {
    /// Arena index of this center.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CenterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "center#{}", self.0)
    }
}

impl From<u32> for CenterId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a lake within a terrain.
///
/// Lake handles may be retired by the mesh when a lake is merged away
/// (see [`HydrologySink::remove_lake`](crate::HydrologySink::remove_lake)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LakeId(pub u32);

impl fmt::Display for LakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lake#{}", self.0)
    }
}

impl From<u32> for LakeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// A short list of corners.
///
/// Uses `SmallVec<[CornerId; 8]>` so that neighbourhood snapshots of
/// typical Voronoi corners (three neighbours) and grid corners (four)
/// stay on the stack.
pub type CornerList = SmallVec<[CornerId; 8]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind() {
        assert_eq!(CornerId(3).to_string(), "corner#3");
        assert_eq!(CenterId(7).to_string(), "center#7");
        assert_eq!(LakeId(0).to_string(), "lake#0");
    }

    #[test]
    fn index_roundtrips_through_from() {
        let c = CornerId::from(42);
        assert_eq!(c.index(), 42);
        assert_eq!(CenterId::from(5).index(), 5);
    }

    #[test]
    fn ordering_follows_arena_index() {
        let mut ids = vec![CornerId(9), CornerId(1), CornerId(4)];
        ids.sort();
        assert_eq!(ids, vec![CornerId(1), CornerId(4), CornerId(9)]);
    }
}
