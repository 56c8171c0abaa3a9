use tracing::debug;

use crate::grid::{HeightGrid, Point3};

// Unconnected points for offline surface reconstruction.
//
// Unlike `MeshBuilder` this needs no quads, so any grid of at least one
// sample works, a single row or column included.
#[derive(Debug, Clone, Copy)]
pub struct PointCloud<'a> {
    grid: &'a HeightGrid,
    extrude: bool,
    base_depth: f32,
}

impl<'a> PointCloud<'a> {
    pub fn new(grid: &'a HeightGrid) -> Self {
        Self {
            grid,
            extrude: false,
            base_depth: (-2.0 * grid.z_height()) as f32,
        }
    }

    pub fn extrude(mut self, extrude: bool) -> Self {
        self.extrude = extrude;
        self
    }

    pub fn base_depth(mut self, depth: f32) -> Self {
        self.base_depth = depth;
        self
    }

    pub fn is_extruded(&self) -> bool {
        self.extrude
    }

    pub fn grid(&self) -> &'a HeightGrid {
        self.grid
    }

    // Points in each wall column, the base included, the surface point excluded
    pub fn column_samples(&self) -> usize {
        let spu = self.grid.samples_per_unit() as f32;
        ((-self.base_depth) * spu).round().max(1.0) as usize
    }

    pub fn len(&self) -> usize {
        let (w, h) = (self.grid.width(), self.grid.height());
        if !self.extrude {
            return w * h;
        }
        let n = self.column_samples();
        w * h + 2 * h * n + 2 * w * n + (w - 1) * (h - 1)
    }

    pub fn is_empty(&self) -> bool {
        self.grid.len() == 0
    }

    // Surface row-major, then east/west wall columns, north/south wall columns,
    // then the base plane
    pub fn points(&self) -> impl Iterator<Item = Point3> + '_ {
        let grid = self.grid;
        let (w, h) = (grid.width(), grid.height());
        let surface = (0..h).flat_map(move |row| (0..w).map(move |col| grid.position(row, col)));
        let closure = self.extrude.then(move || {
            let side_lr = (0..h).flat_map(move |row| [0, w - 1].map(|col| (row, col)));
            let side_tb = [0, h - 1]
                .into_iter()
                .flat_map(move |row| (0..w).map(move |col| (row, col)));
            let columns = side_lr
                .chain(side_tb)
                .flat_map(move |(row, col)| self.column(row, col));
            let spu = grid.samples_per_unit() as f32;
            let base = self.base_depth;
            let bottom = (1..w).flat_map(move |col| {
                (1..h).map(move |row| [col as f32 / spu, row as f32 / spu, base])
            });
            columns.chain(bottom)
        });
        surface.chain(closure.into_iter().flatten())
    }

    pub fn collect(&self) -> Vec<Point3> {
        let points: Vec<Point3> = self.points().collect();
        debug!(points = points.len(), extrude = self.extrude, "built point cloud");
        points
    }

    // Evenly spaced points from the base up to just below the surface
    fn column(&self, row: usize, col: usize) -> impl Iterator<Item = Point3> + use<> {
        let [x, y, top] = self.grid.position(row, col);
        let base = self.base_depth;
        let n = self.column_samples();
        let step = (top - base) / n as f32;
        (0..n).map(move |k| [x, y, base + k as f32 * step])
    }
}
