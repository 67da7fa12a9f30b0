//! Benchmark profiles for the Tarn hydrology passes.
//!
//! - [`reference_profile`]: 100x100 corner grid (10K corners), drained-ready
//! - [`stress_profile`]: 316x316 corner grid (~100K corners)
//! - [`drained_profile`]: a profile already drained, with its land flow estimate

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use indexmap::IndexMap;
use tarn_core::{CornerId, DrainageError, Terrain};
use tarn_hydrology::{DrainageBasin, HydrologyConfig};
use tarn_test_utils::fixtures::{accumulate_flow, random_terrain, GridMesh};

/// Seeded 100x100 random terrain with an ocean edge.
pub fn reference_profile(seed: u64) -> GridMesh {
    random_terrain(seed, 100, 100)
}

/// Same terrain generator as [`reference_profile`] at 10x the corner count.
pub fn stress_profile(seed: u64) -> GridMesh {
    random_terrain(seed, 316, 316)
}

/// Every corner of the profile, in creation order.
pub fn network(profile: &GridMesh) -> Vec<CornerId> {
    profile.mesh.corners().collect()
}

/// Drain `profile` and estimate watermass flow over its land corners.
pub fn drained_profile(
    mut profile: GridMesh,
) -> Result<(GridMesh, IndexMap<CornerId, f32>), DrainageError> {
    let corners = network(&profile);
    let mut basin =
        DrainageBasin::new(HydrologyConfig::default()).expect("default config is valid");
    basin.run(&mut profile.mesh, &corners)?;
    let flow = accumulate_flow(&profile.mesh)
        .into_iter()
        .filter(|(c, _)| !profile.mesh.is_ocean(*c))
        .collect();
    Ok((profile, flow))
}
