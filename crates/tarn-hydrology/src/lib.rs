//! Drainage, channel carving and lake flooding over a Tarn terrain.
//!
//! # Pass order
//!
//! 1. [`DrainageBasin`]: raises zero-elevation pits ([`HardMinimaResolver`]),
//!    then priority-floods the network from its edges, carving a channel
//!    ([`CarvePath`] or [`ForceCarvePath`]) out of every local minimum and
//!    reporting each lake's outflow.
//! 2. [`Floodwave`]: turns a per-corner watermass-flow estimate into lakes,
//!    growing each with a [`PoolTracker`] and merging into neighbouring
//!    lakes.
//!
//! Every mutation goes through the [`HydrologySink`](tarn_core::HydrologySink)
//! passed to the pass.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod carve;
pub mod config;
pub mod drainage;
pub mod floodwave;
pub mod hard_minima;
pub mod metrics;
pub mod path_tracker;
pub mod pool;

pub use carve::{CarvePath, CarvePlan, ForceCarvePath};
pub use config::{ConfigError, HydrologyConfig};
pub use drainage::DrainageBasin;
pub use floodwave::{flood_centers, Floodwave};
pub use hard_minima::{HardMinimaResolver, HardMinimaSolution};
pub use metrics::{DrainageMetrics, FloodMetrics};
pub use path_tracker::PathTracker;
pub use pool::PoolTracker;
