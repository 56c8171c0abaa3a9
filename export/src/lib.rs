// export turns a height grid and its meshes into files on disk
pub mod error;
pub mod ply;
pub mod raster;
pub mod stl;
pub mod xyz;

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use heightfield::{HeightGrid, MeshBuilder, PointCloud, TerrainParams};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use error::{ExportError, ExportResult};
pub use raster::ImageStyle;
pub use stl::StlEncoding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportTarget {
    Image,
    PointCloud,
    TriangleSoup,
    IndexedMesh,
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportTarget::Image => "image",
            ExportTarget::PointCloud => "point cloud",
            ExportTarget::TriangleSoup => "triangle soup mesh",
            ExportTarget::IndexedMesh => "indexed colored mesh",
        };
        f.write_str(name)
    }
}

// Which files one run should produce; unset paths are skipped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputTargets {
    pub image: Option<PathBuf>,
    pub point_cloud: Option<PathBuf>,
    pub triangle_soup: Option<PathBuf>,
    pub indexed_mesh: Option<PathBuf>,
    pub image_style: ImageStyle,
    pub stl_encoding: StlEncoding,
}

impl OutputTargets {
    pub fn requested(&self) -> impl Iterator<Item = (ExportTarget, &Path)> {
        [
            (ExportTarget::Image, &self.image),
            (ExportTarget::PointCloud, &self.point_cloud),
            (ExportTarget::TriangleSoup, &self.triangle_soup),
            (ExportTarget::IndexedMesh, &self.indexed_mesh),
        ]
        .into_iter()
        .filter_map(|(target, path)| path.as_deref().map(|p| (target, p)))
    }

    pub fn is_empty(&self) -> bool {
        self.requested().next().is_none()
    }
}

// Result of every requested target, in request order
#[derive(Debug, Default)]
pub struct ExportReport {
    pub outcomes: Vec<(ExportTarget, PathBuf, ExportResult<()>)>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|(_, _, r)| r.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (ExportTarget, &Path, &ExportError)> {
        self.outcomes
            .iter()
            .filter_map(|(t, p, r)| r.as_ref().err().map(|e| (*t, p.as_path(), e)))
    }
}

// Write every requested target. A failing target does not stop the others.
pub fn export_all(grid: &HeightGrid, params: &TerrainParams, targets: &OutputTargets) -> ExportReport {
    let mut report = ExportReport::default();
    for (target, path) in targets.requested() {
        let outcome = export_one(grid, params, targets, target, path);
        match &outcome {
            Ok(()) => info!(%target, path = %path.display(), "export finished"),
            Err(err) => warn!(%target, path = %path.display(), error = %err, "export failed"),
        }
        report.outcomes.push((target, path.to_path_buf(), outcome));
    }
    report
}

fn export_one(
    grid: &HeightGrid,
    params: &TerrainParams,
    targets: &OutputTargets,
    target: ExportTarget,
    path: &Path,
) -> ExportResult<()> {
    match target {
        ExportTarget::Image => raster::save_image(grid, path, targets.image_style),
        ExportTarget::PointCloud => {
            let cloud = PointCloud::new(grid)
                .extrude(params.extrude())
                .base_depth(params.resolved_base_depth());
            xyz::save_xyz(&cloud, path).map(drop)
        }
        ExportTarget::TriangleSoup => {
            let builder = solid_builder(grid, params)?;
            stl::save_stl(&builder, path, targets.stl_encoding).map(drop)
        }
        ExportTarget::IndexedMesh => ply::save_ply(grid, path).map(drop),
    }
}

fn solid_builder<'a>(grid: &'a HeightGrid, params: &TerrainParams) -> ExportResult<MeshBuilder<'a>> {
    Ok(MeshBuilder::new(grid)?
        .extrude(params.extrude())
        .base_depth(params.resolved_base_depth()))
}

// What a target body can fail with
#[derive(Debug)]
pub(crate) enum WriteFailure {
    Io(std::io::Error),
    Image(image::ImageError),
}

impl From<std::io::Error> for WriteFailure {
    fn from(err: std::io::Error) -> Self {
        WriteFailure::Io(err)
    }
}

impl From<image::ImageError> for WriteFailure {
    fn from(err: image::ImageError) -> Self {
        WriteFailure::Image(err)
    }
}

// Run `body` against a buffered handle on a fresh file at `path`.
// If writing fails midway the file is cut back to zero bytes.
pub(crate) fn write_target<F>(target: ExportTarget, path: &Path, body: F) -> ExportResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), WriteFailure>,
{
    let file = File::create(path).map_err(|e| ExportError::io(target, path, e))?;
    let mut writer = BufWriter::new(file);
    let outcome = body(&mut writer).and_then(|()| writer.flush().map_err(WriteFailure::from));
    let Err(failure) = outcome else {
        return Ok(());
    };
    // Discard whatever is still buffered rather than flushing it on drop
    let (file, _unwritten) = writer.into_parts();
    if let Err(err) = file.set_len(0) {
        warn!(%target, path = %path.display(), error = %err, "could not truncate partial output");
    }
    Err(match failure {
        WriteFailure::Io(source) => ExportError::io(target, path, source),
        WriteFailure::Image(source) => ExportError::image(target, path, source),
    })
}
