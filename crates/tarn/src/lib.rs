//! Tarn: surface hydrology for procedurally generated terrain.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Tarn sub-crates. The mesh itself stays yours: implement
//! [`Terrain`](prelude::Terrain) and [`HydrologySink`](prelude::HydrologySink)
//! for it and hand it to the passes.
//!
//! # Quick start
//!
//! ```rust
//! use indexmap::IndexMap;
//! use tarn::prelude::*;
//! use tarn_test_utils::fixtures::grid;
//!
//! // A 6x6 bowl that drains out of one low border corner.
//! let mut g = grid(6, 6, |r, c| {
//!     if (r, c) == (0, 3) { 0.5 } else { 1.0 + ((r as f32 - 2.5).abs() + (c as f32 - 2.5).abs()) }
//! });
//! let network: Vec<CornerId> = g.mesh.corners().collect();
//!
//! let mut drainage = DrainageBasin::new(HydrologyConfig::default()).unwrap();
//! let metrics = drainage.run(&mut g.mesh, &network).unwrap();
//! assert_eq!(metrics.horizon_seeds + metrics.corners_processed, 36);
//!
//! let flow: IndexMap<CornerId, f32> = network.iter().map(|&c| (c, 1.0)).collect();
//! let mut wave = Floodwave::new(HydrologyConfig::default()).unwrap();
//! wave.flood(&mut g.mesh, &flow, 0.0).unwrap();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tarn-core` | Handles, capability traits, error types |
//! | [`graph`] | `tarn-graph` | Heap, invalidatable queue, discovery tree |
//! | [`hydrology`] | `tarn-hydrology` | Drainage and flood wave passes |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Handles, capability traits and errors (`tarn-core`).
///
/// A mesh is driven through [`types::Terrain`] (reads) and
/// [`types::HydrologySink`] (mutation requests).
pub use tarn_core as types;

/// Worklist collections used by the passes (`tarn-graph`).
pub use tarn_graph as graph;

/// Drainage, carving and flooding passes (`tarn-hydrology`).
///
/// [`hydrology::DrainageBasin`] runs first; [`hydrology::Floodwave`]
/// consumes a watermass-flow estimate afterwards.
pub use tarn_hydrology as hydrology;

/// Common imports for typical Tarn usage.
///
/// ```rust
/// use tarn::prelude::*;
/// ```
pub mod prelude {
    // Handles and traits
    pub use tarn_core::{CenterId, CornerId, HydrologySink, LakeId, Terrain};

    // Errors
    pub use tarn_core::{DrainageError, FloodError, HardMinimaError};

    // Passes
    pub use tarn_hydrology::{
        flood_centers, ConfigError, DrainageBasin, DrainageMetrics, FloodMetrics, Floodwave,
        HydrologyConfig,
    };
}
