//! Channel selection for draining a local minimum.
//!
//! Both strategies start from the route the priority flood recorded from
//! the minimum back to its seed, and decide how much of it to erode and
//! how low the channel ends. [`CarvePath`] only carves towards a corner
//! that is already lower and can carry water onward. [`ForceCarvePath`]
//! is the fallback: it cuts a fixed fraction below the minimum along any
//! land it finds.

use tarn_core::{CornerId, DrainageError, Terrain};

/// An eroded channel: which corners to lower and by how much.
///
/// The path starts at the minimum. Executing a plan walks it outward,
/// lowering each corner by [`step_elevation`](Self::step_elevation) from
/// [`minima_elevation`](Self::minima_elevation) so the last corner lands on
/// [`target_elevation`](Self::target_elevation).
pub trait CarvePlan {
    /// Corners to carve, minimum first.
    fn path(&self) -> &[CornerId];

    /// Elevation of the minimum being drained.
    fn minima_elevation(&self) -> f32;

    /// Elevation the channel ends at.
    fn target_elevation(&self) -> f32;

    /// Number of drops along the path.
    fn steps(&self) -> usize {
        self.path().len().saturating_sub(1)
    }

    /// Elevation lost per corner.
    fn step_elevation(&self) -> f32 {
        match self.steps() {
            0 => 0.0,
            n => (self.minima_elevation() - self.target_elevation()) / n as f32,
        }
    }

    /// Last corner of the path.
    fn destination(&self) -> Option<CornerId> {
        self.path().last().copied()
    }
}

// ── CarvePath ──────────────────────────────────────────────────────

/// Channel ending at the first lower corner that can carry water onward.
#[derive(Clone, Debug, PartialEq)]
pub struct CarvePath {
    path: Vec<CornerId>,
    minima_elevation: f32,
    target_elevation: f32,
}

impl CarvePath {
    /// Select a channel along `path`, which must start at `minimum`.
    ///
    /// The channel stops at the first corner strictly below the minimum
    /// that drains somewhere: it has a lower neighbour, is ocean, lies on
    /// the border, or belongs to a lake. Returns `None` when no such
    /// corner exists or the channel would be shorter than two corners.
    pub fn new<T>(terrain: &T, minimum: CornerId, path: &[CornerId]) -> Option<Self>
    where
        T: Terrain + ?Sized,
    {
        let minima_elevation = terrain.elevation(minimum);
        let end = path
            .iter()
            .position(|&c| {
                terrain.elevation(c) < minima_elevation && drains_onward(terrain, c)
            })
            .map_or(path.len(), |i| i + 1);
        let path = &path[..end];

        let &last = path.last()?;
        let target_elevation = terrain.elevation(last);
        if path.len() < 2 || target_elevation >= minima_elevation {
            return None;
        }

        Some(Self {
            path: path.to_vec(),
            minima_elevation,
            target_elevation,
        })
    }
}

impl CarvePlan for CarvePath {
    fn path(&self) -> &[CornerId] {
        &self.path
    }

    fn minima_elevation(&self) -> f32 {
        self.minima_elevation
    }

    fn target_elevation(&self) -> f32 {
        self.target_elevation
    }
}

fn drains_onward<T>(terrain: &T, corner: CornerId) -> bool
where
    T: Terrain + ?Sized,
{
    !terrain.is_local_minimum(corner)
        || terrain.is_ocean(corner)
        || terrain.is_border(corner)
        || terrain.corner_lake(corner).is_some()
}

// ── ForceCarvePath ─────────────────────────────────────────────────

/// Channel cut a fixed fraction below the minimum, regardless of what
/// lies along the route.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceCarvePath {
    path: Vec<CornerId>,
    minima_elevation: f32,
    target_elevation: f32,
}

impl ForceCarvePath {
    /// Cut along `path`, which must start at `minimum`, ending at
    /// `factor` times the minimum's elevation.
    ///
    /// The channel covers the route up to the first open-ocean corner.
    /// Lake and border corners count as land here even when flagged ocean.
    pub fn new<T>(
        terrain: &T,
        minimum: CornerId,
        path: &[CornerId],
        factor: f32,
    ) -> Result<Self, DrainageError>
    where
        T: Terrain + ?Sized,
    {
        let end = path
            .iter()
            .position(|&c| {
                terrain.is_ocean(c)
                    && !terrain.is_border(c)
                    && terrain.corner_lake(c).is_none()
            })
            .unwrap_or(path.len());
        if end < 2 {
            return Err(DrainageError::FailedToForceCarveLocalMinima { corner: minimum });
        }

        let minima_elevation = terrain.elevation(minimum);
        Ok(Self {
            path: path[..end].to_vec(),
            minima_elevation,
            target_elevation: minima_elevation * factor,
        })
    }
}

impl CarvePlan for ForceCarvePath {
    fn path(&self) -> &[CornerId] {
        &self.path
    }

    fn minima_elevation(&self) -> f32 {
        self.minima_elevation
    }

    fn target_elevation(&self) -> f32 {
        self.target_elevation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_core::HydrologySink;
    use tarn_test_utils::TestMesh;

    /// A chain of corners, each adjacent to the next.
    fn chain(elevations: &[f32]) -> (TestMesh, Vec<CornerId>) {
        let mut mesh = TestMesh::new();
        let corners: Vec<CornerId> = elevations.iter().map(|&e| mesh.add_corner(e)).collect();
        for pair in corners.windows(2) {
            mesh.connect(pair[0], pair[1]);
        }
        (mesh, corners)
    }

    #[test]
    fn stops_at_first_lower_draining_corner() {
        let (mesh, c) = chain(&[5.0, 6.0, 4.0, 3.0, 7.0]);
        let plan = CarvePath::new(&mesh, c[0], &c).unwrap();
        assert_eq!(plan.path(), &c[..3]);
        assert_eq!(plan.target_elevation(), 4.0);
        assert_eq!(plan.steps(), 2);
        assert_eq!(plan.step_elevation(), 0.5);
        assert_eq!(plan.destination(), Some(c[2]));
    }

    #[test]
    fn skips_lower_corner_that_is_itself_a_pit() {
        let (mut mesh, c) = chain(&[5.0, 6.0, 4.0, 8.0, 3.0]);
        mesh.set_border(c[4], true);
        let plan = CarvePath::new(&mesh, c[0], &c).unwrap();
        assert_eq!(plan.path(), &c[..]);
        assert_eq!(plan.target_elevation(), 3.0);
    }

    #[test]
    fn lake_corner_is_a_valid_target() {
        let (mut mesh, c) = chain(&[5.0, 6.0, 2.0, 8.0]);
        let basin = mesh.add_center(&[c[2], c[3]]);
        mesh.create_lake(&[basin], 2.0);
        // c[2] is a pit but sits in a lake.
        let plan = CarvePath::new(&mesh, c[0], &c).unwrap();
        assert_eq!(plan.destination(), Some(c[2]));
    }

    #[test]
    fn no_lower_corner_yields_none() {
        let (mesh, c) = chain(&[5.0, 6.0, 7.0]);
        assert!(CarvePath::new(&mesh, c[0], &c).is_none());
    }

    #[test]
    fn single_corner_path_yields_none() {
        let (mesh, c) = chain(&[5.0, 1.0]);
        assert!(CarvePath::new(&mesh, c[0], &c[..1]).is_none());
        assert!(CarvePath::new(&mesh, c[0], &[]).is_none());
    }

    #[test]
    fn force_target_is_fraction_of_minimum() {
        let (mut mesh, c) = chain(&[5.0, 6.0, 7.0, 0.0]);
        mesh.set_ocean(c[3], true);
        let plan = ForceCarvePath::new(&mesh, c[0], &c, 0.9).unwrap();
        assert_eq!(plan.path(), &c[..3]);
        assert_eq!(plan.target_elevation(), 5.0 * 0.9);
        assert_eq!(plan.steps(), 2);
    }

    #[test]
    fn force_includes_border_ocean() {
        let (mut mesh, c) = chain(&[5.0, 6.0, 0.0]);
        mesh.set_ocean(c[2], true);
        mesh.set_border(c[2], true);
        let plan = ForceCarvePath::new(&mesh, c[0], &c, 0.9).unwrap();
        assert_eq!(plan.path(), &c[..]);
    }

    #[test]
    fn force_fails_when_ocean_is_adjacent() {
        let (mut mesh, c) = chain(&[5.0, 0.0]);
        mesh.set_ocean(c[1], true);
        assert_eq!(
            ForceCarvePath::new(&mesh, c[0], &c, 0.9),
            Err(DrainageError::FailedToForceCarveLocalMinima { corner: c[0] })
        );
    }

    #[test]
    fn zero_step_plan_has_no_drop() {
        struct Stub(Vec<CornerId>);
        impl CarvePlan for Stub {
            fn path(&self) -> &[CornerId] {
                &self.0
            }
            fn minima_elevation(&self) -> f32 {
                1.0
            }
            fn target_elevation(&self) -> f32 {
                0.0
            }
        }
        let plan = Stub(vec![CornerId(0)]);
        assert_eq!(plan.steps(), 0);
        assert_eq!(plan.step_elevation(), 0.0);
    }
}
