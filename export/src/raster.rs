use std::path::Path;

use heightfield::{ColorRamp, HeightGrid};
use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::{ExportTarget, write_target};

// Values outside this range saturate the preview
pub const PREVIEW_RANGE: (f32, f32) = (-1.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageStyle {
    #[default]
    Colormap,
    Grayscale,
}

// Position of a noise value inside the fixed preview range, unclamped
fn preview_position(v: f32) -> f32 {
    let (lo, hi) = PREVIEW_RANGE;
    (v - lo) / (hi - lo)
}

// One pixel per grid cell, row 0 at the top
pub fn render_rgb(grid: &HeightGrid, ramp: &ColorRamp) -> RgbImage {
    let mut img = RgbImage::new(grid.width() as u32, grid.height() as u32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let c = ramp.lookup(preview_position(grid.normalized(y as usize, x as usize)));
        *pixel = Rgb([c.red, c.green, c.blue]);
    }
    img
}

pub fn render_gray(grid: &HeightGrid) -> GrayImage {
    let mut img = GrayImage::new(grid.width() as u32, grid.height() as u32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let t = preview_position(grid.normalized(y as usize, x as usize)).clamp(0.0, 1.0);
        *pixel = Luma([(t * 255.0).round() as u8]);
    }
    img
}

// Encoding follows the file extension
pub fn save_image(grid: &HeightGrid, path: &Path, style: ImageStyle) -> ExportResult<()> {
    let format = ImageFormat::from_path(path).map_err(|e| ExportError::image(ExportTarget::Image, path, e))?;
    write_target(ExportTarget::Image, path, |w| {
        match style {
            ImageStyle::Colormap => render_rgb(grid, ColorRamp::perceptual()).write_to(w, format)?,
            ImageStyle::Grayscale => render_gray(grid).write_to(w, format)?,
        }
        Ok(())
    })?;
    debug!(width = grid.width(), height = grid.height(), ?style, "wrote preview image");
    Ok(())
}
