use tracing::debug;

use crate::NoiseGenerator;
use crate::config::TerrainParams;
use crate::error::TerrainResult;

// World-space point (x, y, z)
pub type Point3 = [f32; 3];

// Dense row-major height field sampled from a noise function.
// `values[row * width + col]`, row runs along y (depth), col along x (width).
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    width: usize,  // samples per row
    height: usize, // number of rows
    values: Vec<f32>,
    width_units: u32,
    depth_units: u32,
    samples_per_unit: u32,
    z_height: f64,
    cutoff: bool,
    // Extremes of the stored values, i.e. after the cutoff clip
    min: f32,
    max: f32,
}

impl HeightGrid {
    // Sample `field` on the lattice described by `params`.
    // Cell (row, col) takes `field(col / spu * frequency, row / spu * frequency) * z_height`
    pub fn build(field: &dyn NoiseGenerator, params: &TerrainParams) -> TerrainResult<Self> {
        params.validate()?;

        let width = params.width_samples();
        let height = params.height_samples();
        let spu = params.samples_per_unit as f64;

        let mut values = Vec::with_capacity(width * height);
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;

        for row in 0..height {
            let ny = row as f64 / spu * params.frequency;
            for col in 0..width {
                let nx = col as f64 / spu * params.frequency;
                let mut h = (field.get2(nx, ny) * params.z_height) as f32;
                // One-sided clip: keep valleys, flatten hills
                if params.cutoff && h > 0.0 {
                    h = 0.0;
                }
                min = min.min(h);
                max = max.max(h);
                values.push(h);
            }
        }

        debug!(width, height, min, max, cutoff = params.cutoff, "sampled height grid");

        Ok(Self {
            width,
            height,
            values,
            width_units: params.width_units,
            depth_units: params.depth_units,
            samples_per_unit: params.samples_per_unit,
            z_height: params.z_height,
            cutoff: params.cutoff,
            min,
            max,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn width_units(&self) -> u32 {
        self.width_units
    }

    pub fn depth_units(&self) -> u32 {
        self.depth_units
    }

    pub fn samples_per_unit(&self) -> u32 {
        self.samples_per_unit
    }

    pub fn z_height(&self) -> f64 {
        self.z_height
    }

    pub fn cutoff(&self) -> bool {
        self.cutoff
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.values[self.index(row, col)]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(self.width)
    }

    // Height divided back by `z_height`, the raw noise value in about [-1, 1]
    pub fn normalized(&self, row: usize, col: usize) -> f32 {
        (self.get(row, col) as f64 / self.z_height) as f32
    }

    // World coordinates of a sample: grid indices divided by the sampling density
    #[inline]
    pub fn position(&self, row: usize, col: usize) -> Point3 {
        let spu = self.samples_per_unit as f32;
        [col as f32 / spu, row as f32 / spu, self.get(row, col)]
    }

    // Height mapped to [0, 1] between min and max; `None` when the grid is flat
    pub fn unit_height(&self, h: f32) -> Option<f32> {
        let range = self.max - self.min;
        if range.abs() < f32::EPSILON {
            None
        } else {
            Some((h - self.min) / range)
        }
    }
}
