use proptest::prelude::*;
use tarn_core::{CornerId, HydrologySink, Terrain};
use tarn_hydrology::{DrainageBasin, HydrologyConfig};
use tarn_test_utils::fixtures::{grid, random_terrain};
use tarn_test_utils::{SinkCall, TestMesh};

fn basin() -> DrainageBasin {
    DrainageBasin::new(HydrologyConfig::default()).unwrap()
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn reaching_a_lake_reports_its_outflow_and_reseeds_the_shore() {
    // A flat four-corner lake in the middle of a 5x5 grid, draining left
    // through a low notch in the border.
    let mut g = grid(5, 5, |r, c| match (r, c) {
        (1..=2, 1..=2) => 2.0,
        (2, 0) => 1.0,
        (0, _) | (4, _) | (_, 0) | (_, 4) => 5.0,
        _ => 3.0 + c as f32 * 0.1 + (r as f32 - 2.0).abs() * 0.05,
    });
    let basin_center = g.center(1, 1);
    let lake = g.mesh.create_lake(&[basin_center], 2.0);
    g.mesh.take_log();

    let network: Vec<CornerId> = g.mesh.corners().collect();
    let m = basin().run(&mut g.mesh, &network).unwrap();

    let outflow = g.corner(2, 1);
    assert_eq!(g.mesh.lake_outflow(lake), Some(outflow));
    assert_eq!(m.lake_outflows, 1);
    assert_eq!(m.local_minima_found, 3);
    assert_eq!(m.minima_carved + m.force_carves, 0);
    assert_eq!(m.horizon_seeds + m.corners_processed, 25);
    assert_eq!(g.mesh.log(), &[SinkCall::SetOutflow { lake, corner: outflow }]);
}

/// Chain `S - A - B - R - M - H` with a lake over `A, B` and a dry
/// center over `B, R`. `S` and `H` are border corners.
fn lake_chain(s: f32) -> (TestMesh, [CornerId; 6]) {
    let mut mesh = TestMesh::new();
    let c = [s, 2.5, 2.5, 3.0, 2.0, 9.0].map(|e| mesh.add_corner(e));
    for pair in c.windows(2) {
        mesh.connect(pair[0], pair[1]);
    }
    mesh.set_border(c[0], true);
    mesh.set_border(c[5], true);
    let water = mesh.add_center(&[c[1], c[2]]);
    let dry = mesh.add_center(&[c[2], c[3]]);
    mesh.connect_centers(water, dry);
    mesh.create_lake(&[water], 2.5);
    mesh.take_log();
    (mesh, c)
}

#[test]
fn carving_into_a_lake_redrains_its_outflow() {
    let (mut mesh, [s, a, b, r, m, _]) = lake_chain(1.9);
    let lake = mesh.corner_lake(a).unwrap();
    let network: Vec<CornerId> = mesh.corners().collect();

    let metrics = basin().run(&mut mesh, &network).unwrap();

    assert_eq!(metrics.local_minima_found, 2);
    assert_eq!(metrics.lake_outflows, 1);
    assert_eq!(metrics.force_carves, 2);
    assert_eq!(metrics.outflow_recarves, 1);
    assert_eq!(metrics.horizon_seeds + metrics.corners_processed, 6);

    assert_eq!(mesh.lake_outflow(lake), Some(a));
    // The pit's forced channel lowered the lake to 0.9 of the pit.
    assert!(close(mesh.lake_elevation(lake), 1.8));
    assert!(close(mesh.elevation(b), 1.8));
    assert!(close(mesh.elevation(r), 1.9));
    assert_eq!(mesh.elevation(m), 2.0);
    // The now-trapped outflow was cut down through the seed.
    assert!(close(mesh.elevation(s), 1.8 * 0.9));
    assert_eq!(mesh.downslope(a), s);
    assert_ne!(mesh.downslope(m), m);
}

#[test]
fn lake_destination_at_its_own_level_is_left_alone() {
    let (mut mesh, [_, a, b, _, m, _]) = lake_chain(1.0);
    // Make the lake a proper carve target below the pit.
    mesh.set_elevation(a, 1.5);
    mesh.set_elevation(b, 1.5);
    mesh.take_log();
    let lake = mesh.corner_lake(a).unwrap();
    let network: Vec<CornerId> = mesh.corners().collect();

    let metrics = basin().run(&mut mesh, &network).unwrap();
    assert_eq!(metrics.minima_carved, 1);
    assert_eq!(metrics.outflow_recarves, 0);
    assert_eq!(mesh.lake_elevation(lake), 1.5);
    assert!(!mesh.log().iter().any(|call| matches!(
        call,
        SinkCall::SetElevation { corner, .. } if *corner == a
    )));
    assert_ne!(mesh.downslope(m), m);
}

#[test]
fn same_input_gives_same_mutations() {
    let run = || {
        let mut g = random_terrain(11, 9, 9);
        let network: Vec<CornerId> = g.mesh.corners().collect();
        basin().run(&mut g.mesh, &network).unwrap();
        g.mesh.take_log()
    };
    assert_eq!(run(), run());
}

proptest! {
    #[test]
    fn random_terrain_drains_completely(
        seed in any::<u64>(),
        rows in 4usize..12,
        cols in 4usize..12,
    ) {
        let mut g = random_terrain(seed, rows, cols);
        let network: Vec<CornerId> = g.mesh.corners().collect();
        let pits: Vec<CornerId> = network
            .iter()
            .copied()
            .filter(|&c| !g.mesh.is_ocean(c) && g.mesh.elevation(c) == 0.0)
            .collect();

        let m = basin().run(&mut g.mesh, &network).unwrap();

        prop_assert_eq!((m.horizon_seeds + m.corners_processed) as usize, network.len());
        prop_assert_eq!(m.local_minima_found, m.minima_carved + m.force_carves);
        prop_assert_eq!(m.hard_minima_resolved as usize, pits.len());
        for &pit in &pits {
            prop_assert!(g.mesh.elevation(pit) > 0.0);
        }
        for &corner in &network {
            let e = g.mesh.elevation(corner);
            prop_assert!(e.is_finite());
            if g.mesh.is_ocean(corner) {
                prop_assert!(e.abs() < 1e-4);
            } else {
                prop_assert!(e > 0.0);
                if !g.mesh.is_border(corner) {
                    prop_assert!(!g.mesh.is_local_minimum(corner), "{} left undrained", corner);
                }
            }
        }
    }
}
