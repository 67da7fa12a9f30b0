//! Budgeted growth of a flood region.

use indexmap::IndexSet;
use tarn_core::{CenterId, FloodError, Terrain};

/// Grows a set of flooded centers outward from a flood source until its
/// watermass runs out.
///
/// Filling a center costs its corners' total distance from the target
/// water level. Each step floods the cheapest candidate if the remaining
/// watermass covers it, and adds that center's dry neighbours as new
/// candidates. Centers already in a lake, or on the coast, are never
/// candidates.
#[derive(Clone, Debug)]
pub struct PoolTracker {
    pool: IndexSet<CenterId>,
    flooded: IndexSet<CenterId>,
    watermass: f32,
    target_elevation: f32,
}

impl PoolTracker {
    /// Start a region from the candidate `centers` around a source.
    ///
    /// The water level is the elevation of the flattest candidate (the one
    /// whose corners deviate least from its own elevation). Fails with
    /// [`FloodError::NoValidInitialNode`] when no candidate is dry inland.
    pub fn new<T>(terrain: &T, watermass: f32, centers: &[CenterId]) -> Result<Self, FloodError>
    where
        T: Terrain + ?Sized,
    {
        let pool: IndexSet<CenterId> = centers
            .iter()
            .copied()
            .filter(|&c| floodable(terrain, c))
            .collect();

        let flattest = pool
            .iter()
            .map(|&c| {
                let level = terrain.center_elevation(c);
                (level, fill_cost(terrain, c, level))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((target_elevation, _)) = flattest else {
            return Err(FloodError::NoValidInitialNode {
                centers: centers.to_vec(),
            });
        };

        Ok(Self {
            pool,
            flooded: IndexSet::new(),
            watermass,
            target_elevation,
        })
    }

    /// Flood the cheapest candidate, or exhaust the watermass if none is
    /// affordable.
    pub fn process_next<T>(&mut self, terrain: &T)
    where
        T: Terrain + ?Sized,
    {
        let cheapest = self
            .pool
            .iter()
            .enumerate()
            .map(|(i, &c)| (i, fill_cost(terrain, c, self.target_elevation)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some((index, cost)) = cheapest else {
            self.watermass = 0.0;
            return;
        };
        if cost > self.watermass {
            self.watermass = 0.0;
            return;
        }

        self.watermass -= cost;
        let Some(center) = self.pool.shift_remove_index(index) else {
            return;
        };
        self.flooded.insert(center);
        for &n in terrain.neighbors(center) {
            if floodable(terrain, n) && !self.flooded.contains(&n) {
                self.pool.insert(n);
            }
        }
    }

    /// Run [`process_next`](Self::process_next) until the watermass is
    /// spent.
    pub fn fill<T>(&mut self, terrain: &T)
    where
        T: Terrain + ?Sized,
    {
        while self.watermass > 0.0 {
            self.process_next(terrain);
        }
    }

    /// Watermass left to spend.
    pub fn watermass(&self) -> f32 {
        self.watermass
    }

    /// Water level the region is filled to.
    pub fn target_elevation(&self) -> f32 {
        self.target_elevation
    }

    /// Centers flooded so far, in flooding order.
    pub fn flooded(&self) -> impl ExactSizeIterator<Item = CenterId> + '_ {
        self.flooded.iter().copied()
    }

    /// Candidates not yet flooded.
    pub fn pool(&self) -> impl ExactSizeIterator<Item = CenterId> + '_ {
        self.pool.iter().copied()
    }
}

fn floodable<T>(terrain: &T, center: CenterId) -> bool
where
    T: Terrain + ?Sized,
{
    terrain.center_lake(center).is_none() && !terrain.is_coast(center)
}

/// Total distance of the center's corners from `level`.
fn fill_cost<T>(terrain: &T, center: CenterId, level: f32) -> f32
where
    T: Terrain + ?Sized,
{
    terrain
        .center_corners(center)
        .iter()
        .map(|&c| (terrain.elevation(c) - level).abs())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_core::HydrologySink;
    use tarn_test_utils::fixtures::grid;

    #[test]
    fn no_dry_inland_candidate_is_an_error() {
        let mut g = grid(3, 3, |_, _| 1.0);
        let a = g.center(0, 0);
        let b = g.center(0, 1);
        g.mesh.set_coast(a, true);
        g.mesh.create_lake(&[b], 1.0);
        assert_eq!(
            PoolTracker::new(&g.mesh, 10.0, &[a, b]).unwrap_err(),
            FloodError::NoValidInitialNode {
                centers: vec![a, b]
            }
        );
    }

    #[test]
    fn target_is_flattest_candidate_elevation() {
        // Center (0,0) spans 1,1,1,3; center (0,1) spans 1,1,1,1.
        let g = grid(2, 3, |r, c| if (r, c) == (1, 0) { 3.0 } else { 1.0 });
        let tilted = g.center(0, 0);
        let flat = g.center(0, 1);
        let t = PoolTracker::new(&g.mesh, 1.0, &[tilted, flat]).unwrap();
        assert_eq!(t.target_elevation(), g.mesh.center_elevation(flat));
        assert_eq!(t.target_elevation(), 1.0);
    }

    #[test]
    fn floods_until_watermass_is_spent() {
        // A flat plain: every center costs nothing at its own level, so the
        // whole plain floods and the pool runs dry.
        let g = grid(4, 4, |_, _| 2.0);
        let mut t = PoolTracker::new(&g.mesh, 1.0, &[g.center(1, 1)]).unwrap();
        t.fill(&g.mesh);
        assert_eq!(t.flooded().len(), 9);
        assert_eq!(t.pool().len(), 0);
        assert_eq!(t.watermass(), 0.0);
    }

    #[test]
    fn unaffordable_center_stops_growth() {
        // Centre cell is flat at 1; everything else climbs steeply.
        let g = grid(4, 4, |r, c| {
            if (1..=2).contains(&r) && (1..=2).contains(&c) {
                1.0
            } else {
                10.0
            }
        });
        let start = g.center(1, 1);
        let mut t = PoolTracker::new(&g.mesh, 5.0, &[start]).unwrap();
        t.process_next(&g.mesh);
        assert_eq!(t.flooded().collect::<Vec<_>>(), vec![start]);
        assert_eq!(t.watermass(), 5.0);

        t.process_next(&g.mesh);
        assert_eq!(t.flooded().len(), 1);
        assert_eq!(t.watermass(), 0.0);
    }

    #[test]
    fn lake_and_coast_neighbours_are_not_added() {
        let mut g = grid(3, 4, |_, _| 1.0);
        let (a, b, c) = (g.center(0, 0), g.center(0, 1), g.center(0, 2));
        g.mesh.create_lake(&[b], 1.0);
        g.mesh.set_coast(c, true);
        let mut t = PoolTracker::new(&g.mesh, 1.0, &[a]).unwrap();
        t.fill(&g.mesh);
        let flooded: Vec<_> = t.flooded().collect();
        assert!(!flooded.contains(&b));
        assert!(!flooded.contains(&c));
        assert!(flooded.contains(&a));
    }
}
