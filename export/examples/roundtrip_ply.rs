use std::path::Path;

use heightfield::{HeightGrid, TerrainParams, noise_field};
use heightfield_export::ply::{load_ply, save_ply};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 8×8 samples over a 4×4 unit patch
    let params = TerrainParams {
        width_units: 4,
        depth_units: 4,
        samples_per_unit: 2,
        ..Default::default()
    };
    let grid = HeightGrid::build(&noise_field(&params), &params)?;

    let path = Path::new("roundtrip.ply");
    let (vertices, faces) = save_ply(&grid, path)?;
    let mesh = load_ply(path)?;
    println!(
        "wrote {vertices} vertices / {faces} faces, read back {} / {}",
        mesh.vertex_count(),
        mesh.face_count()
    );

    // Print the top-left corner of the grid
    for row in grid.rows().take(4) {
        for h in &row[..4] {
            print!("{h:>8.3} ");
        }
        println!();
    }
    Ok(())
}
