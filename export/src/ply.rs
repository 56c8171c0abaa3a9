// ASCII PLY output for the coloured surface mesh.
//
// Vertices are the grid samples in row-major order (`row * width + col`),
// faces are the surface triangulation only. Both counts are known from the
// grid size, so the header is written first and the body is streamed.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use heightfield::{ColorRamp, HeightGrid, IndexedMesh, MeshBuilder};
use palette::Srgb;
use tracing::{info, warn};

use crate::error::{ExportError, ExportResult};
use crate::{ExportTarget, write_target};

const FORMAT: &str = "ply";

// Header counts are untrusted; reserve at most this many entries up front
const PREALLOC_LIMIT: usize = 1 << 16;

pub fn write_header<W: Write>(writer: &mut W, vertices: usize, faces: usize) -> std::io::Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment generated by heightfield")?;
    writeln!(writer, "element vertex {vertices}")?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property uchar red")?;
    writeln!(writer, "property uchar green")?;
    writeln!(writer, "property uchar blue")?;
    writeln!(writer, "element face {faces}")?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")
}

// Returns (vertex count, face count)
pub fn write_ply<W: Write>(builder: &MeshBuilder<'_>, ramp: &ColorRamp, writer: &mut W) -> std::io::Result<(usize, usize)> {
    let grid = builder.grid();
    let vertices = grid.len();
    let faces = builder.surface_face_count();
    write_header(writer, vertices, faces)?;

    let (min, max) = (grid.min(), grid.max());
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let [x, y, z] = grid.position(row, col);
            let c = ramp.for_height(z, min, max);
            writeln!(writer, "{x} {y} {z} {} {} {}", c.red, c.green, c.blue)?;
        }
    }
    // Surface faces come first from the builder regardless of extrusion
    for [a, b, c] in builder.faces().take(faces) {
        writeln!(writer, "3 {a} {b} {c}")?;
    }
    Ok((vertices, faces))
}

pub fn save_ply(grid: &HeightGrid, path: &Path) -> ExportResult<(usize, usize)> {
    let builder = MeshBuilder::new(grid)?;
    if grid.unit_height(grid.max()).is_none() {
        warn!(height = grid.min(), "flat height field, every vertex gets the same colour");
    }
    let mut counts = (0, 0);
    write_target(ExportTarget::IndexedMesh, path, |w| {
        counts = write_ply(&builder, ColorRamp::perceptual(), w)?;
        Ok(())
    })?;
    info!(vertices = counts.0, faces = counts.1, "wrote PLY");
    Ok(counts)
}

fn invalid(message: impl Into<String>) -> ExportError {
    ExportError::invalid_content(FORMAT, message)
}

// Parse a file written by `save_ply`. Counts must match the header and every
// face index must point at a declared vertex.
pub fn load_ply(path: &Path) -> ExportResult<IndexedMesh> {
    let file = File::open(path).map_err(|e| ExportError::io(ExportTarget::IndexedMesh, path, e))?;
    let mut lines = BufReader::new(file).lines();
    let mut next_line = move || -> ExportResult<Option<String>> {
        lines
            .next()
            .transpose()
            .map_err(|e| ExportError::io(ExportTarget::IndexedMesh, path, e))
    };

    if next_line()?.as_deref().map(str::trim) != Some("ply") {
        return Err(invalid("missing magic line"));
    }

    let mut vertex_count = None;
    let mut face_count = None;
    loop {
        let line = next_line()?.ok_or_else(|| invalid("header not terminated"))?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["end_header"] => break,
            ["format", fmt, _] if *fmt != "ascii" => {
                return Err(invalid(format!("unsupported encoding {fmt}")));
            }
            ["element", "vertex", n] => vertex_count = Some(parse_count(n)?),
            ["element", "face", n] => face_count = Some(parse_count(n)?),
            _ => {}
        }
    }
    let vertex_count = vertex_count.ok_or_else(|| invalid("no vertex element"))?;
    let face_count = face_count.ok_or_else(|| invalid("no face element"))?;

    let mut mesh = IndexedMesh {
        vertices: Vec::with_capacity(vertex_count.min(PREALLOC_LIMIT)),
        faces: Vec::with_capacity(face_count.min(PREALLOC_LIMIT)),
        colors: Some(Vec::with_capacity(vertex_count.min(PREALLOC_LIMIT))),
    };

    for i in 0..vertex_count {
        let line = next_line()?.ok_or_else(|| invalid(format!("expected {vertex_count} vertices, got {i}")))?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [x, y, z, r, g, b] = parts.as_slice() else {
            return Err(invalid(format!("vertex {i}: expected 6 values")));
        };
        mesh.vertices.push([parse(x)?, parse(y)?, parse(z)?]);
        if let Some(colors) = mesh.colors.as_mut() {
            colors.push(Srgb::new(parse(r)?, parse(g)?, parse(b)?));
        }
    }

    for i in 0..face_count {
        let line = next_line()?.ok_or_else(|| invalid(format!("expected {face_count} faces, got {i}")))?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let ["3", a, b, c] = parts.as_slice() else {
            return Err(invalid(format!("face {i}: expected a triangle")));
        };
        let face: [u32; 3] = [parse(a)?, parse(b)?, parse(c)?];
        if let Some(bad) = face.iter().find(|&&idx| idx as usize >= vertex_count) {
            return Err(invalid(format!("face {i}: index {bad} out of range")));
        }
        mesh.faces.push(face);
    }

    if let Some(extra) = next_line()? {
        if !extra.trim().is_empty() {
            return Err(invalid("trailing data after last face"));
        }
    }
    Ok(mesh)
}

fn parse<T: std::str::FromStr>(s: &str) -> ExportResult<T> {
    s.parse().map_err(|_| invalid(format!("bad number {s:?}")))
}

fn parse_count(s: &str) -> ExportResult<usize> {
    parse(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heightfield::{NoiseGenerator, Perlin2D, TerrainParams};

    struct Flat;

    impl NoiseGenerator for Flat {
        fn get2(&self, _x: f64, _y: f64) -> f64 {
            -0.3
        }
    }

    fn params(w: u32, h: u32) -> TerrainParams {
        TerrainParams {
            width_units: w,
            depth_units: h,
            samples_per_unit: 1,
            frequency: 0.45,
            ..Default::default()
        }
    }

    fn to_string(grid: &HeightGrid) -> String {
        let builder = MeshBuilder::new(grid).unwrap();
        let mut buf = Vec::new();
        write_ply(&builder, ColorRamp::perceptual(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_declares_analytic_counts() {
        let grid = HeightGrid::build(&Perlin2D::new(2), &params(5, 4)).unwrap();
        let text = to_string(&grid);
        assert!(text.contains("element vertex 20\n"));
        assert!(text.contains("element face 24\n"));
        let body: Vec<&str> = text.split("end_header\n").nth(1).unwrap().lines().collect();
        assert_eq!(body.len(), 20 + 24);
        assert_eq!(body[20], "3 0 1 5");
    }

    #[test]
    fn extrusion_never_reaches_ply() {
        let grid = HeightGrid::build(&Perlin2D::new(2), &params(3, 3)).unwrap();
        let builder = MeshBuilder::new(&grid).unwrap().extrude(true);
        let mut buf = Vec::new();
        let (v, f) = write_ply(&builder, ColorRamp::perceptual(), &mut buf).unwrap();
        assert_eq!((v, f), (9, 8));
    }

    #[test]
    fn colours_span_the_ramp() {
        let grid = HeightGrid::build(&Perlin2D::new(2), &params(6, 6)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surface.ply");
        save_ply(&grid, &path).unwrap();
        let mesh = load_ply(&path).unwrap();
        let ramp = ColorRamp::perceptual();
        let colors = mesh.colors.unwrap();
        assert!(colors.contains(&ramp.lookup(0.0)));
        assert!(colors.contains(&ramp.lookup(1.0)));
    }

    #[test]
    fn flat_field_gets_single_colour() {
        let grid = HeightGrid::build(&Flat, &params(3, 3)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.ply");
        save_ply(&grid, &path).unwrap();
        let mesh = load_ply(&path).unwrap();
        let expected = ColorRamp::perceptual().lookup(heightfield::colormap::FLAT_RAMP_POSITION);
        assert!(mesh.colors.unwrap().iter().all(|c| *c == expected));
    }

    #[test]
    fn round_trip_counts_and_indices() {
        let grid = HeightGrid::build(&Perlin2D::new(7), &params(5, 4)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.ply");
        let (v, f) = save_ply(&grid, &path).unwrap();
        let mesh = load_ply(&path).unwrap();
        assert_eq!(mesh.vertex_count(), v);
        assert_eq!(mesh.face_count(), f);
        assert!(mesh.faces.iter().flatten().all(|&i| (i as usize) < v));
        assert_eq!(mesh.vertices[7], grid.position(1, 2));
    }

    #[test]
    fn out_of_range_index_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ply");
        let mut buf = Vec::new();
        write_header(&mut buf, 3, 1).unwrap();
        buf.extend_from_slice(b"0 0 0 1 2 3\n1 0 0 1 2 3\n0 1 0 1 2 3\n3 0 1 3\n");
        std::fs::write(&path, buf).unwrap();
        let err = load_ply(&path).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn short_body_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.ply");
        let mut buf = Vec::new();
        write_header(&mut buf, 2, 0).unwrap();
        buf.extend_from_slice(b"0 0 0 1 2 3\n");
        std::fs::write(&path, buf).unwrap();
        assert!(matches!(load_ply(&path), Err(ExportError::InvalidContent { .. })));
    }

    #[test]
    fn huge_declared_count_is_invalid_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.ply");
        let mut buf = Vec::new();
        write_header(&mut buf, usize::MAX / 2, usize::MAX / 2).unwrap();
        buf.extend_from_slice(b"0 0 0 1 2 3\n");
        std::fs::write(&path, buf).unwrap();
        let err = load_ply(&path).unwrap_err();
        assert!(matches!(err, ExportError::InvalidContent { format: "ply", .. }));
        assert!(err.to_string().contains("got 1"));
    }
}
