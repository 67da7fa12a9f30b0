//! Per-pass metrics for the hydrology passes.
//!
//! [`DrainageMetrics`] and [`FloodMetrics`] capture timing and event
//! counts for a single pass, for telemetry and for tests asserting how a
//! pass resolved its input.

/// Timing and event counts collected during one drainage pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrainageMetrics {
    /// Wall-clock time for the entire pass, in microseconds.
    pub total_us: u64,
    /// Time spent in the hard-minima phase, in microseconds.
    pub hard_minima_us: u64,
    /// Number of hard-minima solutions applied.
    pub hard_minima_resolved: u32,
    /// Local minima recorded before the priority flood started.
    pub local_minima_found: u32,
    /// Local minima drained by a regular carve path.
    pub minima_carved: u32,
    /// Local minima drained by a forced carve path.
    pub force_carves: u32,
    /// Lake outflows reported through the sink.
    pub lake_outflows: u32,
    /// Lake outflows that became minima after a carve lowered their lake
    /// and were carved again.
    pub outflow_recarves: u32,
    /// Corners seeded onto the initial horizon.
    pub horizon_seeds: u32,
    /// Corners marked processed by the priority flood, seeds excluded.
    pub corners_processed: u32,
}

/// Timing and event counts collected during one flood wave pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FloodMetrics {
    /// Wall-clock time for the entire pass, in microseconds.
    pub total_us: u64,
    /// Lake coverage target, in centers, at the start of the pass.
    pub target_centers: i64,
    /// Flood sources popped from the queue.
    pub sources_processed: u32,
    /// Lakes created from scratch.
    pub lakes_created: u32,
    /// Flooded regions merged into an existing lake.
    pub lakes_merged: u32,
    /// Lakes removed after their sections were moved into a host.
    pub lakes_removed: u32,
    /// Centers added to lakes.
    pub centers_flooded: u32,
}
