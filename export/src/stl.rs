// STL output for the triangle soup.
//
// Binary layout:
//
// UINT8[80]    – header
// UINT32       – number of triangles
// foreach triangle
//     REAL32[3] – normal
//     REAL32[3] – vertex 1
//     REAL32[3] – vertex 2
//     REAL32[3] – vertex 3
//     UINT16    – attribute byte count (0)
// end
//
// The ASCII variant uses `solid` / `facet normal` / `outer loop` blocks.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use heightfield::{MeshBuilder, Triangle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ExportError, ExportResult};
use crate::{ExportTarget, write_target};

const HEADER_SIZE: usize = 80;

// Normal, three vertices and the attribute count
const TRIANGLE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StlEncoding {
    #[default]
    Binary,
    Ascii,
}

// The face count goes out first, so it comes from the builder's formula
pub fn write_stl_binary<W: Write>(builder: &MeshBuilder<'_>, writer: &mut W) -> std::io::Result<u32> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"binary STL generated by heightfield";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    let face_count = u32::try_from(builder.face_count())
        .map_err(|_| std::io::Error::other("too many faces for binary STL"))?;
    writer.write_all(&face_count.to_le_bytes())?;

    for tri in builder.triangles() {
        write_vec3(writer, tri.normal())?;
        for v in tri.vertices {
            write_vec3(writer, v)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(face_count)
}

fn write_vec3<W: Write>(writer: &mut W, v: [f32; 3]) -> std::io::Result<()> {
    for c in v {
        writer.write_all(&c.to_le_bytes())?;
    }
    Ok(())
}

pub fn write_stl_ascii<W: Write>(builder: &MeshBuilder<'_>, writer: &mut W) -> std::io::Result<u32> {
    writeln!(writer, "solid heightfield")?;
    let mut count = 0u32;
    for tri in builder.triangles() {
        write_facet_ascii(writer, &tri)?;
        count += 1;
    }
    writeln!(writer, "endsolid heightfield")?;
    Ok(count)
}

fn write_facet_ascii<W: Write>(writer: &mut W, tri: &Triangle) -> std::io::Result<()> {
    let [nx, ny, nz] = tri.normal();
    writeln!(writer, "  facet normal {nx:.6e} {ny:.6e} {nz:.6e}")?;
    writeln!(writer, "    outer loop")?;
    for [x, y, z] in tri.vertices {
        writeln!(writer, "      vertex {x:.6e} {y:.6e} {z:.6e}")?;
    }
    writeln!(writer, "    endloop")?;
    writeln!(writer, "  endfacet")
}

// Returns the number of triangles written
pub fn save_stl(builder: &MeshBuilder<'_>, path: &Path, encoding: StlEncoding) -> ExportResult<u32> {
    let mut count = 0;
    write_target(ExportTarget::TriangleSoup, path, |w| {
        count = match encoding {
            StlEncoding::Binary => write_stl_binary(builder, w)?,
            StlEncoding::Ascii => write_stl_ascii(builder, w)?,
        };
        Ok(())
    })?;
    info!(triangles = count, ?encoding, extrude = builder.is_extruded(), "wrote STL");
    Ok(count)
}

// Triangle count of an STL file, checked against the file size for binary files
pub fn read_stl_triangle_count(path: &Path) -> ExportResult<u32> {
    let io_err = |e| ExportError::io(ExportTarget::TriangleSoup, path, e);
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(io_err)?;

    if bytes.trim_ascii_start().starts_with(b"solid") && !bytes[..bytes.len().min(HEADER_SIZE)].contains(&0) {
        let reader = BufReader::new(bytes.as_slice());
        let mut count = 0;
        for line in reader.lines() {
            if line.map_err(io_err)?.trim_start().starts_with("facet") {
                count += 1;
            }
        }
        return Ok(count);
    }

    if bytes.len() < HEADER_SIZE + 4 {
        return Err(ExportError::invalid_content("stl", "file shorter than the binary header"));
    }
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[HEADER_SIZE..HEADER_SIZE + 4]);
    let count = u32::from_le_bytes(raw);
    let expected_len = HEADER_SIZE + 4 + count as usize * TRIANGLE_SIZE;
    if bytes.len() != expected_len {
        return Err(ExportError::invalid_content(
            "stl",
            format!("{count} triangles need {expected_len} bytes, file has {}", bytes.len()),
        ));
    }
    Ok(count)
}
