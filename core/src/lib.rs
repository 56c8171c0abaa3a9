// core holds the noise field, the sampled height grid, the mesh builder and the point cloud
pub mod cloud;
pub mod colormap;
pub mod config;
pub mod error;
pub mod grid;
pub mod mesh;
pub mod perlin2;

pub use cloud::PointCloud;
pub use colormap::ColorRamp;
pub use config::TerrainParams;
pub use error::{TerrainError, TerrainResult};
pub use grid::{HeightGrid, Point3};
pub use mesh::{Face, IndexedMesh, MeshBuilder, Triangle, TriangleSoup};
pub use perlin2::{GradientSet, PermutationTable, Perlin2D};

// Anything that can be sampled at a 2D point
pub trait NoiseGenerator {
    fn get2(&self, x: f64, y: f64) -> f64;
}

// Noise field configured by `params`
pub fn noise_field(params: &TerrainParams) -> Perlin2D {
    Perlin2D::with_gradients(params.seed, params.gradients)
}
