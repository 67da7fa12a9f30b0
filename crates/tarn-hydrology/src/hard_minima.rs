//! Resolution of zero-elevation local minima.
//!
//! A land corner at elevation zero with no lower neighbour cannot be carved
//! (there is nothing below zero to carve towards), so it is raised before
//! the priority flood runs. Isolated pits are raised to their lowest
//! neighbour. Connected zero-elevation clusters are resolved leaf by leaf
//! from a discovery tree, each leaf landing a fixed fraction below its
//! lowest already-positive neighbour, so the cluster keeps a consistent
//! downhill ordering towards its root.

use indexmap::IndexSet;
use tarn_core::{CornerId, HardMinimaError, Terrain};
use tarn_graph::Lineage;

use crate::config::HydrologyConfig;

/// A resolution directive: raise `corner` to `elevation`.
///
/// Consumed once by the caller, which applies it to the mesh before asking
/// the resolver for the next solution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[must_use]
pub struct HardMinimaSolution {
    corner: CornerId,
    elevation: f32,
}

impl HardMinimaSolution {
    /// The corner to raise.
    pub fn corner(&self) -> CornerId {
        self.corner
    }

    /// The elevation to raise it to.
    pub fn elevation(&self) -> f32 {
        self.elevation
    }
}

/// Incremental resolver for zero-elevation minima.
///
/// Call [`process`](Self::process) repeatedly, applying each returned
/// solution to the terrain before the next call, until it returns
/// `Ok(None)`.
#[derive(Debug)]
pub struct HardMinimaResolver {
    lineage: Option<Lineage<CornerId>>,
    unprocessed: IndexSet<CornerId>,
    epsilon: f32,
}

impl HardMinimaResolver {
    /// Create a resolver over the zero-elevation corners among `corners`.
    ///
    /// Corners with any other elevation are ignored.
    pub fn new<T>(terrain: &T, corners: impl IntoIterator<Item = CornerId>) -> Self
    where
        T: Terrain + ?Sized,
    {
        let mut resolver = Self {
            lineage: None,
            unprocessed: IndexSet::new(),
            epsilon: HydrologyConfig::default().hard_minima_epsilon,
        };
        resolver.add_corners(terrain, corners);
        resolver
    }

    /// Use `epsilon` instead of the default leaf safety margin.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Queue more corners, again keeping only those at elevation zero.
    pub fn add_corners<T>(&mut self, terrain: &T, corners: impl IntoIterator<Item = CornerId>)
    where
        T: Terrain + ?Sized,
    {
        self.unprocessed
            .extend(corners.into_iter().filter(|&c| terrain.elevation(c) == 0.0));
    }

    /// Whether nothing is left to resolve.
    pub fn is_empty(&self) -> bool {
        self.unprocessed.is_empty() && self.lineage.as_ref().map_or(true, Lineage::is_empty)
    }

    /// Produce the next solution, or `None` when every queued minimum has
    /// been resolved.
    ///
    /// Leaves of an active cluster tree are drained first. Otherwise the
    /// next queued corner is either resolved directly (when it has a
    /// positive neighbour) or becomes the root of a new cluster tree.
    pub fn process<T>(&mut self, terrain: &T) -> Result<Option<HardMinimaSolution>, HardMinimaError>
    where
        T: Terrain + ?Sized,
    {
        if let Some(solution) = self.resolve_leaf(terrain)? {
            return Ok(Some(solution));
        }

        let Some(&corner) = self.unprocessed.first() else {
            return Ok(None);
        };

        let bound = min_adjacent_elevation(terrain, corner, |_| true)?;
        if bound > 0.0 {
            if terrain.is_ocean(corner) {
                return Err(HardMinimaError::MinimaIsOcean { corner });
            }
            self.unprocessed.swap_remove(&corner);
            tracing::trace!(
                target: "tarn::hard_minima",
                %corner,
                elevation = bound,
                "raised isolated zero minimum"
            );
            return Ok(Some(HardMinimaSolution {
                corner,
                elevation: bound,
            }));
        }

        let lineage = zero_cluster(terrain, corner);
        tracing::debug!(
            target: "tarn::hard_minima",
            root = %corner,
            size = lineage.len(),
            "resolving zero-elevation cluster"
        );
        self.lineage = Some(lineage);
        self.resolve_leaf(terrain)
    }

    fn resolve_leaf<T>(&mut self, terrain: &T) -> Result<Option<HardMinimaSolution>, HardMinimaError>
    where
        T: Terrain + ?Sized,
    {
        let Some(lineage) = self.lineage.as_mut() else {
            return Ok(None);
        };
        let Some(leaf) = lineage.first_leaf().copied() else {
            self.lineage = None;
            return Ok(None);
        };
        if terrain.is_ocean(leaf) {
            return Err(HardMinimaError::MinimaIsOcean { corner: leaf });
        }

        let bound = min_adjacent_elevation(terrain, leaf, |e| e > 0.0)?;

        lineage.prune(&leaf);
        if lineage.is_empty() {
            self.lineage = None;
        }
        self.unprocessed.swap_remove(&leaf);

        Ok(Some(HardMinimaSolution {
            corner: leaf,
            elevation: bound * self.epsilon,
        }))
    }
}

/// Lowest elevation among the neighbours of `corner` accepted by `keep`.
fn min_adjacent_elevation<T>(
    terrain: &T,
    corner: CornerId,
    keep: impl Fn(f32) -> bool,
) -> Result<f32, HardMinimaError>
where
    T: Terrain + ?Sized,
{
    terrain
        .adjacent(corner)
        .iter()
        .map(|&c| terrain.elevation(c))
        .filter(|&e| keep(e))
        .reduce(f32::min)
        .ok_or(HardMinimaError::NoSolutionPossibleFor { corner })
}

/// Discovery tree over the connected zero-elevation land around `root`.
///
/// Ocean corners are never expanded into: they must stay at zero.
fn zero_cluster<T>(terrain: &T, root: CornerId) -> Lineage<CornerId>
where
    T: Terrain + ?Sized,
{
    let mut lineage = Lineage::new(root);
    let mut stack = vec![root];
    while let Some(corner) = stack.pop() {
        for &next in terrain.adjacent(corner) {
            if terrain.elevation(next) == 0.0
                && !terrain.is_ocean(next)
                && lineage.link(&corner, next)
            {
                stack.push(next);
            }
        }
    }
    lineage
}
