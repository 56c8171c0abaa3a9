// ASCII point cloud, one `x y z` line per point and no header

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use heightfield::{Point3, PointCloud};
use tracing::info;

use crate::error::{ExportError, ExportResult};
use crate::{ExportTarget, write_target};

pub fn write_xyz<W: Write>(cloud: &PointCloud<'_>, writer: &mut W) -> std::io::Result<usize> {
    let mut count = 0;
    for [x, y, z] in cloud.points() {
        writeln!(writer, "{x} {y} {z}")?;
        count += 1;
    }
    Ok(count)
}

// Returns the number of points written
pub fn save_xyz(cloud: &PointCloud<'_>, path: &Path) -> ExportResult<usize> {
    let mut count = 0;
    write_target(ExportTarget::PointCloud, path, |w| {
        count = write_xyz(cloud, w)?;
        Ok(())
    })?;
    info!(points = count, extrude = cloud.is_extruded(), "wrote point cloud");
    Ok(count)
}

// Blank lines and `#` comments are skipped, every other line holds exactly
// three numbers
pub fn load_xyz(path: &Path) -> ExportResult<Vec<Point3>> {
    let file = File::open(path).map_err(|e| ExportError::io(ExportTarget::PointCloud, path, e))?;
    let reader = BufReader::new(file);

    let mut points = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| ExportError::io(ExportTarget::PointCloud, path, e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let wrong_arity = || ExportError::invalid_content("xyz", format!("line {}: expected 3 values", n + 1));
        let mut coords = [0.0f32; 3];
        let mut parts = line.split_whitespace();
        for slot in coords.iter_mut() {
            let part = parts.next().ok_or_else(wrong_arity)?;
            *slot = part.parse().map_err(|_| {
                ExportError::invalid_content("xyz", format!("line {}: bad number {part:?}", n + 1))
            })?;
        }
        if parts.next().is_some() {
            return Err(wrong_arity());
        }
        points.push(coords);
    }
    Ok(points)
}
