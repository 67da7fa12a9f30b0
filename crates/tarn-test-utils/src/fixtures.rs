//! Reusable terrain fixtures.
//!
//! - [`hard_minima_fan`]: a zero-elevation hub ringed by five raised corners.
//! - [`grid`]: a rectangular lattice of corners and square centers.
//! - [`random_terrain`]: a seeded grid with an ocean edge and scattered
//!   zero-elevation pits.
//! - [`accumulate_flow`]: a simple downslope watermass-flow estimate.

use indexmap::IndexMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tarn_core::{CenterId, CornerId, Terrain};

use crate::TestMesh;

// ── fan ────────────────────────────────────────────────────────────

/// A hub corner adjacent to every corner of a five-corner ring.
pub struct Fan {
    pub mesh: TestMesh,
    pub hub: CornerId,
    pub ring: [CornerId; 5],
}

/// Hub at 0.0; ring at 1.0, 1.3, 1.6, 1.5 and 2.0, each ring corner also
/// adjacent to its two ring neighbours.
pub fn hard_minima_fan() -> Fan {
    let mut mesh = TestMesh::new();
    let hub = mesh.add_corner(0.0);
    let ring = [1.0, 1.3, 1.6, 1.5, 2.0].map(|e| mesh.add_corner(e));
    for (i, &c) in ring.iter().enumerate() {
        mesh.connect(hub, c);
        mesh.connect(c, ring[(i + 1) % ring.len()]);
    }
    Fan { mesh, hub, ring }
}

// ── grid ───────────────────────────────────────────────────────────

/// A `rows x cols` lattice of corners with `(rows-1) x (cols-1)` square
/// centers between them.
///
/// Corners are 4-connected and flagged as border along the outer edge.
/// Centers are 4-connected.
pub struct GridMesh {
    pub mesh: TestMesh,
    rows: usize,
    cols: usize,
}

impl GridMesh {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Corner at row `r`, column `c`.
    pub fn corner(&self, r: usize, c: usize) -> CornerId {
        assert!(r < self.rows && c < self.cols, "corner ({r}, {c}) out of range");
        CornerId((r * self.cols + c) as u32)
    }

    /// Center whose top-left corner is `(r, c)`.
    pub fn center(&self, r: usize, c: usize) -> CenterId {
        assert!(
            r + 1 < self.rows && c + 1 < self.cols,
            "center ({r}, {c}) out of range"
        );
        CenterId((r * (self.cols - 1) + c) as u32)
    }
}

/// Build a grid with corner elevations from `elevation(row, col)`.
pub fn grid(rows: usize, cols: usize, elevation: impl Fn(usize, usize) -> f32) -> GridMesh {
    assert!(rows >= 2 && cols >= 2, "grid needs at least 2x2 corners");
    let corner = |r: usize, c: usize| CornerId((r * cols + c) as u32);
    let center = |r: usize, c: usize| CenterId((r * (cols - 1) + c) as u32);

    let mut mesh = TestMesh::new();
    for r in 0..rows {
        for c in 0..cols {
            let id = mesh.add_corner(elevation(r, c));
            mesh.set_border(id, r == 0 || c == 0 || r == rows - 1 || c == cols - 1);
        }
    }
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                mesh.connect(corner(r, c), corner(r, c + 1));
            }
            if r + 1 < rows {
                mesh.connect(corner(r, c), corner(r + 1, c));
            }
        }
    }

    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            mesh.add_center(&[
                corner(r, c),
                corner(r, c + 1),
                corner(r + 1, c + 1),
                corner(r + 1, c),
            ]);
        }
    }
    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            if c + 2 < cols {
                mesh.connect_centers(center(r, c), center(r, c + 1));
            }
            if r + 2 < rows {
                mesh.connect_centers(center(r, c), center(r + 1, c));
            }
        }
    }
    GridMesh { mesh, rows, cols }
}

/// A seeded grid whose left column is ocean at elevation zero.
///
/// Land sits in `[0.05, 1.0)`, except for a sprinkling of zero-elevation
/// pits. Pits are interior, at least two columns from the ocean, and never
/// adjacent to each other. Centers touching the ocean are coastal.
pub fn random_terrain(seed: u64, rows: usize, cols: usize) -> GridMesh {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut heights = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let interior = r > 0 && r + 1 < rows && c >= 2 && c + 1 < cols;
            let h = if c == 0 {
                0.0
            } else if interior && (r + c) % 2 == 0 && rng.gen_bool(0.1) {
                0.0
            } else {
                rng.gen_range(0.05f32..1.0)
            };
            heights.push(h);
        }
    }

    let mut g = grid(rows, cols, |r, c| heights[r * cols + c]);
    for r in 0..rows {
        let corner = g.corner(r, 0);
        g.mesh.set_ocean(corner, true);
    }
    for r in 0..rows - 1 {
        let center = g.center(r, 0);
        g.mesh.set_coast(center, true);
    }
    g
}

/// Route one unit of water from every land corner downslope, accumulating
/// what passes through each corner.
pub fn accumulate_flow(mesh: &TestMesh) -> IndexMap<CornerId, f32> {
    let mut order: Vec<CornerId> = mesh.corners().collect();
    order.sort_by(|a, b| mesh.elevation(*b).total_cmp(&mesh.elevation(*a)));

    let mut flow: IndexMap<CornerId, f32> = mesh
        .corners()
        .map(|c| (c, if mesh.is_ocean(c) { 0.0 } else { 1.0 }))
        .collect();
    for corner in order {
        let down = mesh.downslope(corner);
        if down != corner {
            let passed = flow[&corner];
            flow[&down] += passed;
        }
    }
    flow
}
