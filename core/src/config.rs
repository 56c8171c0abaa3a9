use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};
use crate::perlin2::GradientSet;

// Parameters of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub seed: u64,
    pub width_units: u32,        // world size along x
    pub depth_units: u32,        // world size along y
    pub samples_per_unit: u32,   // grid density, independent of `frequency`
    pub frequency: f64,          // noise periods per world unit
    pub z_height: f64,           // vertical scale applied to every sample
    pub cutoff: bool,            // clip every positive height to zero
    pub surface_only: bool,      // skip walls and base plane
    pub base_depth: Option<f32>, // defaults to -2 * z_height
    pub gradients: GradientSet,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 2,
            width_units: 60,
            depth_units: 110,
            samples_per_unit: 10,
            frequency: 0.2,
            z_height: 10.0,
            cutoff: false,
            surface_only: false,
            base_depth: None,
            gradients: GradientSet::Diagonal,
        }
    }
}

impl TerrainParams {
    // Reject anything that would make the grid empty or the geometry degenerate
    pub fn validate(&self) -> TerrainResult<()> {
        if self.width_units == 0 || self.depth_units == 0 {
            return Err(TerrainError::configuration(format!(
                "dimensions must be positive, got {}x{} units",
                self.width_units, self.depth_units
            )));
        }
        if self.samples_per_unit == 0 {
            return Err(TerrainError::configuration(
                "samples_per_unit must be at least 1",
            ));
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(TerrainError::configuration(format!(
                "frequency must be a positive number, got {}",
                self.frequency
            )));
        }
        if !(self.z_height.is_finite() && self.z_height > 0.0) {
            return Err(TerrainError::configuration(format!(
                "z_height must be a positive number, got {}",
                self.z_height
            )));
        }
        if let Some(depth) = self.base_depth {
            if !(depth.is_finite() && depth < 0.0) {
                return Err(TerrainError::configuration(format!(
                    "base_depth must be below zero, got {depth}"
                )));
            }
        }
        let samples = (self.width_samples() as u64) * (self.height_samples() as u64);
        if samples.saturating_mul(2) > u32::MAX as u64 {
            return Err(TerrainError::configuration(format!(
                "{samples} samples exceed what a mesh can index"
            )));
        }
        Ok(())
    }

    pub fn width_samples(&self) -> usize {
        self.width_units as usize * self.samples_per_unit as usize
    }

    pub fn height_samples(&self) -> usize {
        self.depth_units as usize * self.samples_per_unit as usize
    }

    pub fn resolved_base_depth(&self) -> f32 {
        self.base_depth
            .unwrap_or_else(|| (-2.0 * self.z_height) as f32)
    }

    // Output of the solid is closed unless only the surface was asked for
    pub fn extrude(&self) -> bool {
        !self.surface_only
    }
}
