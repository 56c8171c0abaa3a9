use heightfield::{HeightGrid, MeshBuilder, PointCloud, TerrainParams, noise_field};
use heightfield_export::{
    ExportTarget, OutputTargets, StlEncoding, export_all, ply::load_ply, stl::read_stl_triangle_count,
    xyz::load_xyz,
};

fn scenario() -> TerrainParams {
    TerrainParams {
        width_units: 4,
        depth_units: 4,
        samples_per_unit: 2,
        seed: 2,
        frequency: 0.2,
        z_height: 10.0,
        cutoff: false,
        ..Default::default()
    }
}

#[test]
fn test_end_to_end_scenario() {
    let params = scenario();
    let field = noise_field(&params);
    let grid = HeightGrid::build(&field, &params).expect("grid");
    assert_eq!((grid.width(), grid.height()), (8, 8));

    let surface = MeshBuilder::new(&grid).expect("builder");
    assert_eq!(surface.face_count(), 98);

    let dir = tempfile::tempdir().expect("temp dir");
    let targets = OutputTargets {
        image: Some(dir.path().join("terrain.png")),
        point_cloud: Some(dir.path().join("terrain.xyz")),
        triangle_soup: Some(dir.path().join("terrain.stl")),
        indexed_mesh: Some(dir.path().join("terrain.ply")),
        ..Default::default()
    };
    let report = export_all(&grid, &params, &targets);
    assert!(report.is_success(), "{:?}", report.outcomes);
    assert_eq!(report.outcomes.len(), 4);

    let text = std::fs::read_to_string(dir.path().join("terrain.ply")).expect("ply text");
    assert!(text.contains("element vertex 64\n"));
    assert!(text.contains("element face 98\n"));

    let mesh = load_ply(&dir.path().join("terrain.ply")).expect("ply");
    assert_eq!(mesh.vertex_count(), 64);
    assert_eq!(mesh.face_count(), 98);
    assert!(mesh.faces.iter().flatten().all(|&i| (i as usize) < 64));

    // Closed solid by default: top + walls + bottom
    let solid = surface.extrude(true);
    let expected_faces = 98 + 2 * 2 * 7 + 2 * 2 * 7 + 98;
    assert_eq!(solid.face_count(), expected_faces);
    let stl_count = read_stl_triangle_count(&dir.path().join("terrain.stl")).expect("stl");
    assert_eq!(stl_count as usize, expected_faces);

    let cloud = PointCloud::new(&grid).extrude(true);
    let points = load_xyz(&dir.path().join("terrain.xyz")).expect("xyz");
    assert_eq!(points, cloud.collect());

    let img = image::open(dir.path().join("terrain.png")).expect("png");
    assert_eq!((img.width(), img.height()), (8, 8));
}

#[test]
fn test_surface_only_outputs() {
    let params = TerrainParams {
        surface_only: true,
        cutoff: true,
        ..scenario()
    };
    let grid = HeightGrid::build(&noise_field(&params), &params).expect("grid");
    assert!(grid.max() <= 0.0);

    let dir = tempfile::tempdir().expect("temp dir");
    let targets = OutputTargets {
        point_cloud: Some(dir.path().join("surface.xyz")),
        triangle_soup: Some(dir.path().join("surface.stl")),
        stl_encoding: StlEncoding::Ascii,
        ..Default::default()
    };
    let report = export_all(&grid, &params, &targets);
    assert!(report.is_success());

    assert_eq!(load_xyz(&dir.path().join("surface.xyz")).expect("xyz").len(), 64);
    assert_eq!(read_stl_triangle_count(&dir.path().join("surface.stl")).expect("stl"), 98);
}

#[test]
fn test_same_seed_same_files() {
    let params = scenario();
    let dir = tempfile::tempdir().expect("temp dir");
    let mut contents = Vec::new();
    for run in 0..2 {
        let grid = HeightGrid::build(&noise_field(&params), &params).expect("grid");
        let path = dir.path().join(format!("run{run}.ply"));
        let targets = OutputTargets {
            indexed_mesh: Some(path.clone()),
            ..Default::default()
        };
        assert!(export_all(&grid, &params, &targets).is_success());
        contents.push(std::fs::read(path).expect("read"));
    }
    assert_eq!(contents[0], contents[1]);
}

#[test]
fn test_too_small_grid_fails_triangle_targets_only() {
    let params = TerrainParams {
        width_units: 1,
        depth_units: 3,
        samples_per_unit: 1,
        ..scenario()
    };
    let grid = HeightGrid::build(&noise_field(&params), &params).expect("grid");
    let dir = tempfile::tempdir().expect("temp dir");
    let targets = OutputTargets {
        image: Some(dir.path().join("thin.png")),
        point_cloud: Some(dir.path().join("thin.xyz")),
        triangle_soup: Some(dir.path().join("thin.stl")),
        indexed_mesh: Some(dir.path().join("thin.ply")),
        ..Default::default()
    };
    let report = export_all(&grid, &params, &targets);
    let failed: Vec<_> = report.failures().map(|(t, _, _)| t).collect();
    assert_eq!(failed, vec![ExportTarget::TriangleSoup, ExportTarget::IndexedMesh]);
    assert!(dir.path().join("thin.png").exists());
    // Surface is 1 x 3, walls add 2 * 3 * 20 + 2 * 1 * 20 points at base depth -20
    assert_eq!(load_xyz(&dir.path().join("thin.xyz")).expect("xyz").len(), 3 + 120 + 40);
}
