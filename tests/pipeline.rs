#![allow(clippy::unwrap_used)]

use std::f64::consts::{FRAC_PI_2, PI, SQRT_2, TAU};

use tracing_subscriber::EnvFilter;
use unfurl::flatten::{
    AssembleLoop, AssemblyParams, Axis, FlattenFace, FlattenParams, LoopSnapshot,
    PolylineCollector, PresentLoops,
};
use unfurl::math::ode23::StepControl;
use unfurl::math::polygon_2d::signed_area_2d;
use unfurl::math::{Point2, Point3, Vector3};
use unfurl::operations::creation::{MakeConePatch, MakeCylinderPatch};
use unfurl::tessellation::TessellationParams;
use unfurl::topology::{FaceId, TopologyStore};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fine() -> FlattenParams {
    FlattenParams {
        strokes: TessellationParams::with_tolerance(1e-4),
        ..FlattenParams::default()
    }
}

fn frustum(store: &mut TopologyStore) -> FaceId {
    // 45 degree frustum with its apex at z = -1, half a turn.
    MakeConePatch::new(Point3::origin(), 1.0, 2.0, Vector3::z(), 1.0, PI)
        .execute(store)
        .unwrap()
}

#[test]
fn cylinder_sector_unrolls_to_rectangle() {
    init_tracing();
    let mut store = TopologyStore::new();
    let face = MakeCylinderPatch::new(Point3::origin(), 2.0, Vector3::z(), 3.0, FRAC_PI_2)
        .execute(&mut store)
        .unwrap();

    let mut loops = FlattenFace::new(face, FlattenParams::default())
        .execute(&store)
        .unwrap();
    assert_eq!(loops.len(), 1);
    for angle in loops[0].rel_angles() {
        assert!((angle - FRAC_PI_2).abs() < 1e-9, "corner {angle}");
    }

    let report = AssembleLoop::new(AssemblyParams::default()).execute(&mut loops[0]);
    assert!(report.closure_error < 1e-9);
    assert!((report.bounds.width() - 3.0).abs() < 1e-6);
    assert!((report.bounds.height() - PI).abs() < 1e-6);
    assert!(report.bounds.min.coords.norm() < 1e-12);
}

#[test]
fn full_cylinder_unrolls_through_its_seam() {
    init_tracing();
    let mut store = TopologyStore::new();
    let face = MakeCylinderPatch::new(Point3::new(1.0, 2.0, 3.0), 1.0, Vector3::x(), 1.0, TAU)
        .execute(&mut store)
        .unwrap();
    let params = FlattenParams {
        step_control: StepControl::Fixed,
        ..FlattenParams::default()
    };
    let mut loops = FlattenFace::new(face, params).execute(&store).unwrap();
    let report = AssembleLoop::new(params.assembly).execute(&mut loops[0]);
    assert!(report.closure_error < 1e-9);
    assert!((report.bounds.width() - 1.0).abs() < 1e-6);
    assert!((report.bounds.height() - TAU).abs() < 1e-6);
}

#[test]
fn frustum_unrolls_to_annular_sector() {
    init_tracing();
    let mut store = TopologyStore::new();
    let face = frustum(&mut store);
    let mut loops = FlattenFace::new(face, fine()).execute(&store).unwrap();
    let report = AssembleLoop::new(AssemblyParams::default())
        .execute(&mut loops[0])
        .strict()
        .unwrap();
    assert!(report.closure_error < 5e-4);

    // Generators keep their slant length.
    let generator = &loops[0].edges()[1];
    assert!((generator.length_2d() - SQRT_2).abs() < 1e-9);

    // Area of the sector between slant radii sqrt(2) and 2 sqrt(2),
    // opening angle pi * sin(45 deg).
    let points: Vec<Point2> = loops[0].points().copied().collect();
    let expected = 0.5 * (PI / SQRT_2) * (8.0 - 2.0);
    assert!((signed_area_2d(&points) - expected).abs() < 5e-3);
}

#[test]
fn snapshot_replays_assembly() {
    init_tracing();
    let mut store = TopologyStore::new();
    let face = frustum(&mut store);
    let raw = FlattenFace::new(face, fine()).execute(&store).unwrap();

    let mut json = Vec::new();
    LoopSnapshot::capture(&raw).to_writer(&mut json).unwrap();

    let params = AssemblyParams {
        orient_vertical: false,
        ..AssemblyParams::default()
    };
    let mut direct = raw;
    let mut replayed = LoopSnapshot::from_reader(json.as_slice())
        .unwrap()
        .restore()
        .unwrap();
    let expected = AssembleLoop::new(params).execute_all(&mut direct);
    let actual = AssembleLoop::new(params).execute_all(&mut replayed);

    assert!((expected[0].closure_error - actual[0].closure_error).abs() < 1e-12);
    for (a, b) in direct[0].points().zip(replayed[0].points()) {
        assert!((a - b).norm() < 1e-12);
    }
}

#[test]
fn presentation_lays_out_every_face() {
    init_tracing();
    let mut store = TopologyStore::new();
    let cone = frustum(&mut store);
    let cylinder = MakeCylinderPatch::new(Point3::origin(), 1.0, Vector3::z(), 2.0, 1.0)
        .execute(&mut store)
        .unwrap();

    let params = fine();
    let mut loops = Vec::new();
    for face in [cone, cylinder] {
        loops.extend(FlattenFace::new(face, params).execute(&store).unwrap());
    }
    let reports = AssembleLoop::new(params.assembly).execute_all(&mut loops);
    assert!(reports.iter().all(|r| r.closure_mismatch.is_none()));

    let mut sink = PolylineCollector::default();
    PresentLoops::new(0.5, Axis::X).execute(&loops, &mut sink);
    assert_eq!(sink.polylines.len(), 8);

    let first_max = sink
        .polylines
        .iter()
        .filter(|p| p.loop_index == 0)
        .flat_map(|p| p.points.iter().map(|q| q.x))
        .fold(f64::NEG_INFINITY, f64::max);
    let second_min = sink
        .polylines
        .iter()
        .filter(|p| p.loop_index == 1)
        .flat_map(|p| p.points.iter().map(|q| q.x))
        .fold(f64::INFINITY, f64::min);
    assert!((second_min - first_max - 0.5).abs() < 1e-9);
}
