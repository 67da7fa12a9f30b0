//! Priority-flood drainage over a corner network.
//!
//! [`DrainageBasin::run`] makes every corner of a network drain to the map
//! edge, the ocean, or a lake outflow:
//!
//! 1. Record local minima (land corners off the border with no lower
//!    neighbour).
//! 2. Raise zero-elevation minima with [`HardMinimaResolver`], then record
//!    the local minima again.
//! 3. Seed the horizon with land border corners and coastal ocean corners.
//! 4. Expand the horizon lowest-first. Each newly reached corner is linked
//!    under the corner that reached it; reaching a lake reports its outflow
//!    and re-seeds from its shore; reaching a recorded minimum carves a
//!    channel back along the recorded route.
//! 5. Fail if any corner was never reached or any minimum never drained.

use std::time::Instant;

use indexmap::IndexSet;
use tarn_core::{CornerId, CornerList, DrainageError, HydrologySink, LakeId};
use tarn_graph::Heap;

use crate::carve::{CarvePath, CarvePlan, ForceCarvePath};
use crate::config::{ConfigError, HydrologyConfig};
use crate::hard_minima::HardMinimaResolver;
use crate::metrics::DrainageMetrics;
use crate::path_tracker::PathTracker;

/// Drainage pass driver.
///
/// Holds validated configuration and the metrics of the most recent
/// successful run. All per-run state lives inside [`run`](Self::run).
#[derive(Debug)]
pub struct DrainageBasin {
    config: HydrologyConfig,
    last_metrics: DrainageMetrics,
}

impl DrainageBasin {
    /// Create a driver, validating `config`.
    pub fn new(config: HydrologyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            last_metrics: DrainageMetrics::default(),
        })
    }

    /// The configuration this driver was built with.
    pub fn config(&self) -> &HydrologyConfig {
        &self.config
    }

    /// Metrics from the most recent successful run.
    pub fn last_metrics(&self) -> &DrainageMetrics {
        &self.last_metrics
    }

    /// Drain every corner in `network`, issuing all elevation and outflow
    /// changes through `sink`.
    ///
    /// Mutations already issued when an error is returned are not rolled
    /// back; the mesh should be discarded or regenerated.
    pub fn run<S>(
        &mut self,
        sink: &mut S,
        network: &[CornerId],
    ) -> Result<DrainageMetrics, DrainageError>
    where
        S: HydrologySink + ?Sized,
    {
        let start = Instant::now();
        let mut pass = Pass::new(sink, &self.config, network);

        pass.resolve_hard_minima()?;
        pass.seed_horizon(network);
        pass.flood()?;
        pass.finish()?;

        let mut metrics = pass.metrics;
        metrics.total_us = start.elapsed().as_micros() as u64;
        tracing::info!(
            target: "tarn::drainage",
            corners = network.len(),
            minima = metrics.local_minima_found,
            carved = metrics.minima_carved,
            forced = metrics.force_carves,
            outflows = metrics.lake_outflows,
            elapsed_us = metrics.total_us,
            "drainage pass complete"
        );
        self.last_metrics = metrics.clone();
        Ok(metrics)
    }
}

/// Working state of one drainage run.
struct Pass<'a, S: ?Sized> {
    sink: &'a mut S,
    config: &'a HydrologyConfig,
    unprocessed: IndexSet<CornerId>,
    minima: IndexSet<CornerId>,
    tracker: PathTracker,
    heap: Heap<CornerId>,
    metrics: DrainageMetrics,
}

impl<'a, S> Pass<'a, S>
where
    S: HydrologySink + ?Sized,
{
    fn new(sink: &'a mut S, config: &'a HydrologyConfig, network: &[CornerId]) -> Self {
        let unprocessed: IndexSet<CornerId> = network.iter().copied().collect();
        let mut pass = Self {
            sink,
            config,
            unprocessed,
            minima: IndexSet::new(),
            tracker: PathTracker::new(),
            heap: Heap::min(),
            metrics: DrainageMetrics::default(),
        };
        pass.record_minima();
        pass
    }

    /// Collect the interior land corners of the network with no lower
    /// neighbour.
    fn record_minima(&mut self) {
        let sink = &*self.sink;
        self.minima = self
            .unprocessed
            .iter()
            .copied()
            .filter(|&c| !sink.is_border(c) && !sink.is_ocean(c) && sink.is_local_minimum(c))
            .collect();
        self.metrics.local_minima_found = self.minima.len() as u32;
    }

    // ── phases ─────────────────────────────────────────────────

    fn resolve_hard_minima(&mut self) -> Result<(), DrainageError> {
        let start = Instant::now();
        let mut resolver = HardMinimaResolver::new(&*self.sink, self.minima.iter().copied())
            .with_epsilon(self.config.hard_minima_epsilon);
        while let Some(solution) = resolver.process(&*self.sink)? {
            self.sink.set_elevation(solution.corner(), solution.elevation());
            self.metrics.hard_minima_resolved += 1;
        }
        // A pit raised to its lowest neighbour can leave that neighbour flat.
        if self.metrics.hard_minima_resolved > 0 {
            self.record_minima();
        }
        self.metrics.hard_minima_us = start.elapsed().as_micros() as u64;
        tracing::debug!(
            target: "tarn::drainage",
            resolved = self.metrics.hard_minima_resolved,
            "hard minima resolved"
        );
        Ok(())
    }

    fn seed_horizon(&mut self, network: &[CornerId]) {
        for &corner in network {
            if !self.unprocessed.contains(&corner) {
                continue;
            }
            let seed = if self.sink.is_ocean(corner) {
                self.sink
                    .adjacent(corner)
                    .iter()
                    .any(|&n| !self.sink.is_ocean(n))
            } else {
                self.sink.is_border(corner)
            };
            if seed {
                self.tracker.add_root(corner);
                self.heap.push(corner, self.sink.elevation(corner));
                self.unprocessed.swap_remove(&corner);
                self.metrics.horizon_seeds += 1;
            }
        }
        tracing::debug!(
            target: "tarn::drainage",
            seeds = self.metrics.horizon_seeds,
            "horizon seeded"
        );
    }

    fn flood(&mut self) -> Result<(), DrainageError> {
        while let Some(current) = self.heap.pop() {
            let adjacent: CornerList = self.sink.adjacent(current).iter().copied().collect();
            for next in adjacent {
                // A lake reached earlier in this loop may have claimed it.
                if self.unprocessed.contains(&next) {
                    self.visit(current, next)?;
                }
            }
        }
        Ok(())
    }

    fn finish(&self) -> Result<(), DrainageError> {
        if !self.unprocessed.is_empty() {
            return Err(DrainageError::UnprocessedCornersInNetwork {
                corners: self.unprocessed.iter().copied().collect(),
            });
        }
        if !self.minima.is_empty() {
            return Err(DrainageError::FailedToHandleLocalMinima {
                minima: self.minima.iter().copied().collect(),
            });
        }
        Ok(())
    }

    // ── expansion ──────────────────────────────────────────────

    fn visit(&mut self, current: CornerId, next: CornerId) -> Result<(), DrainageError> {
        self.tracker.link(next, current);
        if let Some(lake) = self.sink.corner_lake(next) {
            self.drain_lake(lake, next);
        } else if self.has_unprocessed_neighbor(next) {
            self.heap.push(next, self.sink.elevation(next));
        }
        self.mark_processed(next)
    }

    /// `outflow` is the first corner of `lake` reached: the lake drains
    /// through it, and its whole body counts as reached.
    fn drain_lake(&mut self, lake: LakeId, outflow: CornerId) {
        self.sink.set_outflow(lake, outflow);
        self.metrics.lake_outflows += 1;

        let shore: Vec<CornerId> = self
            .sink
            .lake_border_corners(lake)
            .iter()
            .copied()
            .filter(|&c| c != outflow && self.unprocessed.contains(&c))
            .collect();
        for &corner in &shore {
            self.tracker.add_root(corner);
        }

        let body: Vec<CornerId> = self.sink.lake_corners(lake).to_vec();
        for &corner in &body {
            if self.unprocessed.swap_remove(&corner) {
                self.metrics.corners_processed += 1;
            }
            if corner != outflow {
                self.minima.swap_remove(&corner);
            }
        }

        for corner in shore {
            if self.has_unprocessed_neighbor(corner) {
                self.heap.push(corner, self.sink.elevation(corner));
            }
        }

        tracing::trace!(
            target: "tarn::drainage",
            %lake,
            %outflow,
            corners = body.len(),
            "lake outflow found"
        );
    }

    fn mark_processed(&mut self, corner: CornerId) -> Result<(), DrainageError> {
        if self.minima.contains(&corner) {
            self.drain_minimum(corner)?;
        }
        if self.unprocessed.swap_remove(&corner) {
            self.metrics.corners_processed += 1;
        }
        Ok(())
    }

    fn has_unprocessed_neighbor(&self, corner: CornerId) -> bool {
        self.sink
            .adjacent(corner)
            .iter()
            .any(|n| self.unprocessed.contains(n))
    }

    // ── carving ────────────────────────────────────────────────

    fn drain_minimum(&mut self, corner: CornerId) -> Result<(), DrainageError> {
        let elevation = self.sink.elevation(corner);
        if elevation == 0.0 {
            return Err(DrainageError::LocalMinimaAtZeroElevation { corner });
        }
        let path = self.tracker.path_to_root(corner);
        if path.is_empty() {
            return Err(DrainageError::LocalMinimaWithoutRootPath { corner });
        }

        if let Some(plan) = CarvePath::new(&*self.sink, corner, &path) {
            self.metrics.minima_carved += 1;
            tracing::debug!(
                target: "tarn::drainage",
                %corner,
                elevation,
                target = plan.target_elevation(),
                length = plan.path().len(),
                "carving minimum"
            );
            self.execute(&plan)?;
        } else {
            let plan =
                ForceCarvePath::new(&*self.sink, corner, &path, self.config.force_carve_factor)?;
            self.metrics.force_carves += 1;
            tracing::debug!(
                target: "tarn::drainage",
                %corner,
                elevation,
                target = plan.target_elevation(),
                length = plan.path().len(),
                "force carving minimum"
            );
            self.execute(&plan)?;
        }

        self.minima.swap_remove(&corner);
        Ok(())
    }

    fn execute<P: CarvePlan>(&mut self, plan: &P) -> Result<(), DrainageError> {
        let step = plan.step_elevation();
        let destination = plan.destination();
        let mut current = plan.minima_elevation();

        for &corner in plan.path() {
            let is_destination = Some(corner) == destination;
            if let Some(lake) = self.sink.corner_lake(corner) {
                if is_destination && current != self.sink.lake_elevation(lake) {
                    self.level_lake(lake, current)?;
                }
            } else {
                if is_destination && self.sink.is_ocean(corner) && current > 0.0 {
                    current = 0.0;
                }
                self.sink.set_elevation(corner, current);
            }
            current -= step;
        }
        Ok(())
    }

    /// Set the whole lake body to `elevation`. If that leaves the lake's
    /// outflow without a lower neighbour, drain it again.
    fn level_lake(&mut self, lake: LakeId, elevation: f32) -> Result<(), DrainageError> {
        let body: Vec<CornerId> = self.sink.lake_corners(lake).to_vec();
        for corner in body {
            self.sink.set_elevation(corner, elevation);
        }

        let Some(outflow) = self.sink.lake_outflow(lake) else {
            return Ok(());
        };
        if self.sink.is_local_minimum(outflow) {
            tracing::debug!(
                target: "tarn::drainage",
                %lake,
                %outflow,
                elevation,
                "lake outflow became a minimum"
            );
            self.minima.insert(outflow);
            self.metrics.outflow_recarves += 1;
            self.mark_processed(outflow)?;
        }
        Ok(())
    }
}
