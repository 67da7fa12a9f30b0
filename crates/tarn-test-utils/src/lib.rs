//! Test utilities and fixtures for Tarn development.
//!
//! Provides [`TestMesh`], an in-memory arena implementing both
//! [`Terrain`] and [`HydrologySink`], which records every mutation request
//! it receives as a [`SinkCall`]. Ready-made terrains live in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use indexmap::IndexSet;
use smallvec::SmallVec;
use tarn_core::{CenterId, CornerId, CornerList, HydrologySink, LakeId, Terrain};

/// One mutation request received by a [`TestMesh`].
#[derive(Clone, Debug, PartialEq)]
pub enum SinkCall {
    SetElevation {
        corner: CornerId,
        elevation: f32,
    },
    SetOutflow {
        lake: LakeId,
        corner: CornerId,
    },
    CreateLake {
        centers: Vec<CenterId>,
        elevation: f32,
        lake: LakeId,
    },
    RemoveLake {
        lake: LakeId,
    },
    AddSections {
        centers: Vec<CenterId>,
        lake: LakeId,
    },
    MoveSections {
        centers: Vec<CenterId>,
        lake: LakeId,
    },
}

#[derive(Clone, Debug)]
struct CornerData {
    elevation: f32,
    adjacent: CornerList,
    touches: SmallVec<[CenterId; 4]>,
    lake: Option<LakeId>,
    ocean: bool,
    border: bool,
}

#[derive(Clone, Debug)]
struct CenterData {
    neighbors: SmallVec<[CenterId; 6]>,
    corners: CornerList,
    lake: Option<LakeId>,
    coast: bool,
}

#[derive(Clone, Debug)]
struct LakeData {
    elevation: f32,
    outflow: Option<CornerId>,
    sections: Vec<CenterId>,
    corners: Vec<CornerId>,
    border: Vec<CornerId>,
}

/// In-memory corner/center/lake arena.
///
/// Downslope is derived on every read: the lowest strictly lower neighbour,
/// earliest in adjacency order on ties. A center's elevation is the mean of
/// its corners. A lake's body is the union of its sections' corners; its
/// shore is the body corners that also touch a center outside the lake.
/// Setting the elevation of a lake corner sets the lake's water level.
///
/// Stale handles panic.
#[derive(Clone, Debug, Default)]
pub struct TestMesh {
    corners: Vec<CornerData>,
    centers: Vec<CenterData>,
    lakes: Vec<Option<LakeData>>,
    log: Vec<SinkCall>,
}

impl TestMesh {
    pub fn new() -> Self {
        Self::default()
    }

    // ── building ───────────────────────────────────────────────

    /// Add an isolated land corner.
    pub fn add_corner(&mut self, elevation: f32) -> CornerId {
        let id = CornerId(self.corners.len() as u32);
        self.corners.push(CornerData {
            elevation,
            adjacent: CornerList::new(),
            touches: SmallVec::new(),
            lake: None,
            ocean: false,
            border: false,
        });
        id
    }

    /// Make two corners adjacent. Idempotent.
    pub fn connect(&mut self, a: CornerId, b: CornerId) {
        if a == b || self.corners[a.index()].adjacent.contains(&b) {
            return;
        }
        self.corners[a.index()].adjacent.push(b);
        self.corners[b.index()].adjacent.push(a);
    }

    /// Add a center bounded by `corners`.
    pub fn add_center(&mut self, corners: &[CornerId]) -> CenterId {
        let id = CenterId(self.centers.len() as u32);
        for &c in corners {
            self.corners[c.index()].touches.push(id);
        }
        self.centers.push(CenterData {
            neighbors: SmallVec::new(),
            corners: corners.iter().copied().collect(),
            lake: None,
            coast: false,
        });
        id
    }

    /// Make two centers neighbours. Idempotent.
    pub fn connect_centers(&mut self, a: CenterId, b: CenterId) {
        if a == b || self.centers[a.index()].neighbors.contains(&b) {
            return;
        }
        self.centers[a.index()].neighbors.push(b);
        self.centers[b.index()].neighbors.push(a);
    }

    pub fn set_ocean(&mut self, corner: CornerId, ocean: bool) {
        self.corners[corner.index()].ocean = ocean;
    }

    pub fn set_border(&mut self, corner: CornerId, border: bool) {
        self.corners[corner.index()].border = border;
    }

    pub fn set_coast(&mut self, center: CenterId, coast: bool) {
        self.centers[center.index()].coast = coast;
    }

    // ── inspection ─────────────────────────────────────────────

    /// Every corner handle, in creation order.
    pub fn corners(&self) -> impl Iterator<Item = CornerId> {
        (0..self.corners.len() as u32).map(CornerId)
    }

    /// Every center handle, in creation order.
    pub fn centers(&self) -> impl Iterator<Item = CenterId> {
        (0..self.centers.len() as u32).map(CenterId)
    }

    /// Handles of lakes that have not been removed.
    pub fn lakes(&self) -> impl Iterator<Item = LakeId> + '_ {
        self.lakes
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_some())
            .map(|(i, _)| LakeId(i as u32))
    }

    pub fn corner_count(&self) -> usize {
        self.corners.len()
    }

    pub fn center_count(&self) -> usize {
        self.centers.len()
    }

    /// Mutation requests received so far, oldest first.
    pub fn log(&self) -> &[SinkCall] {
        &self.log
    }

    /// Drain the request log.
    pub fn take_log(&mut self) -> Vec<SinkCall> {
        std::mem::take(&mut self.log)
    }

    // ── lakes ──────────────────────────────────────────────────

    fn lake(&self, lake: LakeId) -> &LakeData {
        self.lakes[lake.0 as usize]
            .as_ref()
            .unwrap_or_else(|| panic!("{lake} was removed"))
    }

    fn lake_mut(&mut self, lake: LakeId) -> &mut LakeData {
        self.lakes[lake.0 as usize]
            .as_mut()
            .unwrap_or_else(|| panic!("{lake} was removed"))
    }

    /// Detach `center` from whatever lake owns it.
    fn release(&mut self, center: CenterId) -> Option<LakeId> {
        let owner = self.centers[center.index()].lake.take()?;
        self.lake_mut(owner).sections.retain(|&s| s != center);
        Some(owner)
    }

    fn claim(&mut self, center: CenterId, lake: LakeId) {
        self.centers[center.index()].lake = Some(lake);
        let sections = &mut self.lake_mut(lake).sections;
        if !sections.contains(&center) {
            sections.push(center);
        }
    }

    /// Recompute a lake's body and shore from its sections.
    fn refresh(&mut self, lake: LakeId) {
        let old = std::mem::take(&mut self.lake_mut(lake).corners);
        for c in old {
            if self.corners[c.index()].lake == Some(lake) {
                self.corners[c.index()].lake = None;
            }
        }

        let body: IndexSet<CornerId> = self
            .lake(lake)
            .sections
            .iter()
            .flat_map(|&s| self.centers[s.index()].corners.iter().copied())
            .collect();
        for &c in &body {
            self.corners[c.index()].lake = Some(lake);
        }
        let shore: Vec<CornerId> = body
            .iter()
            .copied()
            .filter(|&c| {
                self.corners[c.index()]
                    .touches
                    .iter()
                    .any(|&t| self.centers[t.index()].lake != Some(lake))
            })
            .collect();

        let data = self.lake_mut(lake);
        data.corners = body.into_iter().collect();
        data.border = shore;
    }
}

impl Terrain for TestMesh {
    fn elevation(&self, corner: CornerId) -> f32 {
        self.corners[corner.index()].elevation
    }

    fn downslope(&self, corner: CornerId) -> CornerId {
        let mut best = corner;
        let mut lowest = self.elevation(corner);
        for &n in self.adjacent(corner) {
            let e = self.elevation(n);
            if e < lowest {
                best = n;
                lowest = e;
            }
        }
        best
    }

    fn adjacent(&self, corner: CornerId) -> &[CornerId] {
        &self.corners[corner.index()].adjacent
    }

    fn touches(&self, corner: CornerId) -> &[CenterId] {
        &self.corners[corner.index()].touches
    }

    fn corner_lake(&self, corner: CornerId) -> Option<LakeId> {
        self.corners[corner.index()].lake
    }

    fn is_ocean(&self, corner: CornerId) -> bool {
        self.corners[corner.index()].ocean
    }

    fn is_border(&self, corner: CornerId) -> bool {
        self.corners[corner.index()].border
    }

    fn center_elevation(&self, center: CenterId) -> f32 {
        let corners = &self.centers[center.index()].corners;
        if corners.is_empty() {
            return 0.0;
        }
        corners.iter().map(|&c| self.elevation(c)).sum::<f32>() / corners.len() as f32
    }

    fn neighbors(&self, center: CenterId) -> &[CenterId] {
        &self.centers[center.index()].neighbors
    }

    fn center_corners(&self, center: CenterId) -> &[CornerId] {
        &self.centers[center.index()].corners
    }

    fn center_lake(&self, center: CenterId) -> Option<LakeId> {
        self.centers[center.index()].lake
    }

    fn is_coast(&self, center: CenterId) -> bool {
        self.centers[center.index()].coast
    }

    fn lake_outflow(&self, lake: LakeId) -> Option<CornerId> {
        self.lake(lake).outflow
    }

    fn lake_corners(&self, lake: LakeId) -> &[CornerId] {
        &self.lake(lake).corners
    }

    fn lake_border_corners(&self, lake: LakeId) -> &[CornerId] {
        &self.lake(lake).border
    }

    fn lake_sections(&self, lake: LakeId) -> &[CenterId] {
        &self.lake(lake).sections
    }

    fn lake_elevation(&self, lake: LakeId) -> f32 {
        self.lake(lake).elevation
    }
}

impl HydrologySink for TestMesh {
    fn set_elevation(&mut self, corner: CornerId, elevation: f32) {
        self.corners[corner.index()].elevation = elevation;
        if let Some(lake) = self.corners[corner.index()].lake {
            self.lake_mut(lake).elevation = elevation;
        }
        self.log.push(SinkCall::SetElevation { corner, elevation });
    }

    fn set_outflow(&mut self, lake: LakeId, corner: CornerId) {
        self.lake_mut(lake).outflow = Some(corner);
        self.log.push(SinkCall::SetOutflow { lake, corner });
    }

    fn create_lake(&mut self, centers: &[CenterId], elevation: f32) -> LakeId {
        let lake = LakeId(self.lakes.len() as u32);
        self.lakes.push(Some(LakeData {
            elevation,
            outflow: None,
            sections: Vec::new(),
            corners: Vec::new(),
            border: Vec::new(),
        }));
        for &c in centers {
            self.claim(c, lake);
        }
        self.refresh(lake);
        self.log.push(SinkCall::CreateLake {
            centers: centers.to_vec(),
            elevation,
            lake,
        });
        lake
    }

    fn remove_lake(&mut self, lake: LakeId) {
        let sections = self.lake(lake).sections.clone();
        for c in sections {
            self.release(c);
        }
        self.refresh(lake);
        self.lakes[lake.0 as usize] = None;
        self.log.push(SinkCall::RemoveLake { lake });
    }

    fn add_sections(&mut self, centers: &[CenterId], lake: LakeId) {
        for &c in centers {
            self.claim(c, lake);
        }
        self.refresh(lake);
        self.log.push(SinkCall::AddSections {
            centers: centers.to_vec(),
            lake,
        });
    }

    fn move_sections(&mut self, centers: &[CenterId], lake: LakeId) {
        let mut donors: IndexSet<LakeId> = IndexSet::new();
        for &c in centers {
            if let Some(old) = self.release(c) {
                donors.insert(old);
            }
            self.claim(c, lake);
        }
        for donor in donors {
            if donor != lake {
                self.refresh(donor);
            }
        }
        self.refresh(lake);
        self.log.push(SinkCall::MoveSections {
            centers: centers.to_vec(),
            lake,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two unit squares side by side: corners 0..6, centers 0 and 1.
    fn two_cells() -> (TestMesh, [CornerId; 6], [CenterId; 2]) {
        let mut m = TestMesh::new();
        let c: Vec<CornerId> = [1.0, 2.0, 3.0, 1.0, 2.0, 3.0]
            .into_iter()
            .map(|e| m.add_corner(e))
            .collect();
        for (a, b) in [(0, 1), (1, 2), (3, 4), (4, 5), (0, 3), (1, 4), (2, 5)] {
            m.connect(c[a], c[b]);
        }
        let left = m.add_center(&[c[0], c[1], c[4], c[3]]);
        let right = m.add_center(&[c[1], c[2], c[5], c[4]]);
        m.connect_centers(left, right);
        (m, [c[0], c[1], c[2], c[3], c[4], c[5]], [left, right])
    }

    #[test]
    fn downslope_is_lowest_strictly_lower_neighbour() {
        let (m, c, _) = two_cells();
        assert_eq!(m.downslope(c[1]), c[0]);
        assert_eq!(m.downslope(c[0]), c[0]);
        assert!(m.is_local_minimum(c[3]));
    }

    #[test]
    fn center_elevation_is_corner_mean() {
        let (m, _, [left, right]) = two_cells();
        assert_eq!(m.center_elevation(left), 1.5);
        assert_eq!(m.center_elevation(right), 2.5);
    }

    #[test]
    fn lake_body_and_shore_follow_sections() {
        let (mut m, c, [left, right]) = two_cells();
        let lake = m.create_lake(&[left], 1.0);
        assert_eq!(m.lake_corners(lake).len(), 4);
        let mut shore = m.lake_border_corners(lake).to_vec();
        shore.sort();
        assert_eq!(shore, vec![c[1], c[4]]);

        m.add_sections(&[right], lake);
        assert_eq!(m.lake_corners(lake).len(), 6);
        assert!(m.lake_border_corners(lake).is_empty());
    }

    #[test]
    fn lake_corner_elevation_sets_water_level() {
        let (mut m, c, [left, _]) = two_cells();
        let lake = m.create_lake(&[left], 5.0);
        m.set_elevation(c[0], 0.5);
        assert_eq!(m.lake_elevation(lake), 0.5);
    }

    #[test]
    fn move_then_remove_keeps_moved_sections() {
        let (mut m, c, [left, right]) = two_cells();
        let host = m.create_lake(&[left], 1.0);
        let donor = m.create_lake(&[right], 2.0);
        m.move_sections(&[right], host);
        assert!(m.lake_sections(donor).is_empty());
        m.remove_lake(donor);

        assert_eq!(m.center_lake(right), Some(host));
        assert_eq!(m.corner_lake(c[5]), Some(host));
        assert_eq!(m.lakes().collect::<Vec<_>>(), vec![host]);
        assert_eq!(m.log().len(), 4);
    }
}
