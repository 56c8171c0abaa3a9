use std::path::Path;

use anyhow::Context;
use heightfield::TerrainParams;
use heightfield_export::OutputTargets;
use serde::{Deserialize, Serialize};

// Contents of a run file, e.g.
//
// (
//     terrain: (width_units: 60, depth_units: 110, cutoff: true),
//     outputs: (image: Some("test.png"), point_cloud: Some("p.xyz")),
// )
//
// A missing section takes that section's own defaults, so a file without
// `outputs` writes nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub terrain: TerrainParams,
    #[serde(default)]
    pub outputs: OutputTargets,
}

impl RunConfig {
    // Used when no run file is given: default terrain, every target next to
    // the working directory
    pub fn without_file() -> Self {
        Self {
            terrain: TerrainParams::default(),
            outputs: OutputTargets {
                image: Some("terrain.png".into()),
                point_cloud: Some("terrain.xyz".into()),
                triangle_soup: Some("terrain.stl".into()),
                indexed_mesh: Some("terrain.ply".into()),
                ..Default::default()
            },
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading run config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing run config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: RunConfig = ron::from_str(text)?;
        config.terrain.validate()?;
        Ok(config)
    }
}
