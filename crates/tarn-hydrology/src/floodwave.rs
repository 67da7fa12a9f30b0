//! Lake generation from a watermass-flow estimate.
//!
//! [`Floodwave::flood`] visits corners from the highest flow down. Each
//! one seeds a [`PoolTracker`] whose budget is that corner's flow; the
//! centers it floods become a new lake, or join the lowest neighbouring
//! lake (absorbing any other neighbouring lakes on the way). Flooding stops
//! once the coverage target is met.

use std::time::Instant;

use indexmap::{IndexMap, IndexSet};
use tarn_core::{CenterId, CornerId, FloodError, HydrologySink, LakeId};
use tarn_graph::InvalidatableQueue;

use crate::config::{ConfigError, HydrologyConfig};
use crate::metrics::FloodMetrics;
use crate::pool::PoolTracker;

/// Flood wave pass driver.
#[derive(Debug)]
pub struct Floodwave {
    config: HydrologyConfig,
    last_metrics: FloodMetrics,
}

impl Floodwave {
    /// Create a driver, validating `config`.
    pub fn new(config: HydrologyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            last_metrics: FloodMetrics::default(),
        })
    }

    /// The configuration this driver was built with.
    pub fn config(&self) -> &HydrologyConfig {
        &self.config
    }

    /// Metrics from the most recent successful pass.
    pub fn last_metrics(&self) -> &FloodMetrics {
        &self.last_metrics
    }

    /// Flood lakes until `threshold` of the configured coverage is
    /// reached.
    ///
    /// `threshold` is in `[0, 1]`: 0 creates no lakes, 1 aims to cover
    /// [`lake_coverage_fraction`](HydrologyConfig::lake_coverage_fraction)
    /// of the land corners in `flow` with lake sections. Sources with
    /// equal flow keep their order in `flow`.
    pub fn flood<S>(
        &mut self,
        sink: &mut S,
        flow: &IndexMap<CornerId, f32>,
        threshold: f32,
    ) -> Result<FloodMetrics, FloodError>
    where
        S: HydrologySink + ?Sized,
    {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(FloodError::InvalidThreshold { value: threshold });
        }
        let start = Instant::now();

        let mut sources: Vec<CornerId> = flow.keys().copied().collect();
        sources.sort_by(|a, b| flow[b].total_cmp(&flow[a]));

        let land = sources.iter().filter(|&&c| !sink.is_ocean(c)).count();
        let mut remaining =
            (threshold * self.config.lake_coverage_fraction * land as f32) as i64;

        let mut metrics = FloodMetrics {
            target_centers: remaining,
            ..Default::default()
        };
        let mut queue: InvalidatableQueue<CornerId> = sources.into_iter().collect();

        while remaining > 0 {
            let Some(corner) = queue.pop() else {
                break;
            };
            let watermass = *flow
                .get(&corner)
                .ok_or(FloodError::NoWatermassFlowForCorner { corner })?;
            metrics.sources_processed += 1;

            let mut tracker = PoolTracker::new(&*sink, watermass, sink.touches(corner))?;
            tracker.fill(&*sink);
            let flooded: Vec<CenterId> = tracker.flooded().collect();
            if flooded.is_empty() {
                continue;
            }

            let outcome = materialize(sink, &flooded, tracker.target_elevation());
            if outcome.absorbed.is_some() {
                metrics.lakes_merged += 1;
            } else {
                metrics.lakes_created += 1;
            }
            metrics.lakes_removed += outcome.absorbed.unwrap_or(0);
            metrics.centers_flooded += flooded.len() as u32;
            tracing::trace!(
                target: "tarn::floodwave",
                %corner,
                watermass,
                lake = %outcome.lake,
                centers = flooded.len(),
                "flooded around source"
            );

            for &center in &flooded {
                for corner in sink.center_corners(center) {
                    queue.invalidate(corner);
                }
            }
            remaining -= flooded.len() as i64;
        }

        metrics.total_us = start.elapsed().as_micros() as u64;
        tracing::info!(
            target: "tarn::floodwave",
            threshold,
            created = metrics.lakes_created,
            merged = metrics.lakes_merged,
            centers = metrics.centers_flooded,
            elapsed_us = metrics.total_us,
            "flood wave complete"
        );
        self.last_metrics = metrics.clone();
        Ok(metrics)
    }
}

/// Turn `centers` into lake water at (at most) `proposed` elevation.
///
/// With no lake next to `centers`, a new lake is created at `proposed`.
/// Otherwise the lowest neighbouring lake hosts the centers, absorbs every
/// other neighbouring lake, and is levelled to the lower of its own and
/// the proposed elevation. Returns the lake now holding `centers`; it has
/// no outflow if it was just created.
///
/// `centers` must not already belong to a lake.
pub fn flood_centers<S>(sink: &mut S, centers: &[CenterId], proposed: f32) -> LakeId
where
    S: HydrologySink + ?Sized,
{
    materialize(sink, centers, proposed).lake
}

struct Outcome {
    lake: LakeId,
    /// Number of lakes absorbed, or `None` when `lake` is new.
    absorbed: Option<u32>,
}

fn materialize<S>(sink: &mut S, centers: &[CenterId], proposed: f32) -> Outcome
where
    S: HydrologySink + ?Sized,
{
    let own: IndexSet<CenterId> = centers.iter().copied().collect();
    let neighbor_lakes: IndexSet<LakeId> = centers
        .iter()
        .flat_map(|&c| sink.neighbors(c).iter().copied())
        .filter(|n| !own.contains(n))
        .filter_map(|n| sink.center_lake(n))
        .collect();

    let host = neighbor_lakes
        .iter()
        .copied()
        .min_by(|a, b| sink.lake_elevation(*a).total_cmp(&sink.lake_elevation(*b)));
    let Some(host) = host else {
        let lake = sink.create_lake(centers, proposed);
        tracing::debug!(target: "tarn::floodwave", %lake, elevation = proposed, "lake created");
        return Outcome {
            lake,
            absorbed: None,
        };
    };

    let elevation = proposed.min(sink.lake_elevation(host));
    sink.add_sections(centers, host);

    let others: Vec<LakeId> = neighbor_lakes.into_iter().filter(|&l| l != host).collect();
    let moved: IndexSet<CenterId> = others
        .iter()
        .flat_map(|&l| sink.lake_sections(l).iter().copied())
        .collect();
    let moved: Vec<CenterId> = moved.into_iter().collect();
    if !moved.is_empty() {
        sink.move_sections(&moved, host);
    }

    let body: IndexSet<CornerId> = sink
        .lake_sections(host)
        .iter()
        .flat_map(|&s| sink.center_corners(s).iter().copied())
        .collect();
    for corner in body {
        sink.set_elevation(corner, elevation);
    }

    for &lake in &others {
        sink.remove_lake(lake);
    }

    tracing::debug!(
        target: "tarn::floodwave",
        lake = %host,
        elevation,
        absorbed = others.len(),
        "lake extended"
    );
    Outcome {
        lake: host,
        absorbed: Some(others.len() as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_core::Terrain;
    use tarn_test_utils::fixtures::grid;
    use tarn_test_utils::SinkCall;

    fn driver() -> Floodwave {
        Floodwave::new(HydrologyConfig::default()).unwrap()
    }

    #[test]
    fn isolated_centers_become_a_new_lake() {
        let mut g = grid(4, 4, |_, _| 1.0);
        let c = g.center(1, 1);
        let lake = flood_centers(&mut g.mesh, &[c], 0.8);
        assert_eq!(g.mesh.center_lake(c), Some(lake));
        assert_eq!(g.mesh.lake_elevation(lake), 0.8);
        assert_eq!(g.mesh.lake_outflow(lake), None);
        assert_eq!(
            g.mesh.log(),
            &[SinkCall::CreateLake {
                centers: vec![c],
                elevation: 0.8,
                lake
            }]
        );
    }

    #[test]
    fn touching_lakes_merge_into_the_lowest() {
        let mut g = grid(3, 5, |_, _| 4.0);
        let (west, mid, east) = (g.center(0, 0), g.center(0, 1), g.center(0, 2));
        let low = g.mesh.create_lake(&[west], 2.0);
        let high = g.mesh.create_lake(&[east], 3.0);
        g.mesh.take_log();

        let lake = flood_centers(&mut g.mesh, &[mid], 2.5);
        assert_eq!(lake, low);
        assert_eq!(g.mesh.lake_elevation(low), 2.0);
        assert!(!g.mesh.lakes().any(|l| l == high));
        for center in [west, mid, east] {
            assert_eq!(g.mesh.center_lake(center), Some(low));
            for &corner in g.mesh.center_corners(center) {
                assert_eq!(g.mesh.elevation(corner), 2.0);
            }
        }
        assert!(g.mesh.log().contains(&SinkCall::RemoveLake { lake: high }));
    }

    #[test]
    fn proposed_level_below_host_lowers_the_lake() {
        let mut g = grid(3, 4, |_, _| 4.0);
        let (west, east) = (g.center(0, 0), g.center(0, 1));
        let host = g.mesh.create_lake(&[west], 3.0);
        let lake = flood_centers(&mut g.mesh, &[east], 1.5);
        assert_eq!(lake, host);
        assert_eq!(g.mesh.lake_elevation(host), 1.5);
    }

    #[test]
    fn zero_threshold_creates_no_lakes() {
        let mut g = grid(5, 5, |_, _| 1.0);
        let flow: IndexMap<CornerId, f32> = g.mesh.corners().map(|c| (c, 100.0)).collect();
        let m = driver().flood(&mut g.mesh, &flow, 0.0).unwrap();
        assert_eq!(m.target_centers, 0);
        assert_eq!(m.lakes_created, 0);
        assert_eq!(g.mesh.lakes().count(), 0);
        assert!(g.mesh.log().is_empty());
    }

    #[test]
    fn threshold_outside_unit_range_is_rejected() {
        let mut g = grid(3, 3, |_, _| 1.0);
        let flow = IndexMap::new();
        for value in [-0.1, 1.5, f32::NAN] {
            assert!(matches!(
                driver().flood(&mut g.mesh, &flow, value),
                Err(FloodError::InvalidThreshold { .. })
            ));
        }
    }

    #[test]
    fn highest_flow_floods_first() {
        let mut g = grid(5, 5, |_, _| 1.0);
        let wet = g.corner(2, 2);
        let mut flow: IndexMap<CornerId, f32> = g.mesh.corners().map(|c| (c, 0.0)).collect();
        flow.insert(wet, 50.0);

        let mut fw = driver();
        let m = fw.flood(&mut g.mesh, &flow, 1.0).unwrap();
        assert_eq!(m.target_centers, 5);
        assert_eq!(m.lakes_created, 1);
        assert_eq!(m.sources_processed, 1);
        assert_eq!(m.centers_flooded, 16);
        assert_eq!(fw.last_metrics(), &m);
        for &center in g.mesh.touches(wet) {
            assert!(g.mesh.center_lake(center).is_some());
        }
    }

    #[test]
    fn source_surrounded_by_coast_is_fatal() {
        let mut g = grid(5, 5, |_, _| 1.0);
        for r in 0..4 {
            for c in 0..4 {
                let center = g.center(r, c);
                g.mesh.set_coast(center, true);
            }
        }
        let source = g.corner(2, 2);
        let mut flow: IndexMap<CornerId, f32> = g.mesh.corners().map(|c| (c, 1.0)).collect();
        flow.insert(source, 10.0);
        let err = driver().flood(&mut g.mesh, &flow, 1.0).unwrap_err();
        assert_eq!(
            err,
            FloodError::NoValidInitialNode {
                centers: g.mesh.touches(source).to_vec()
            }
        );
    }
}
