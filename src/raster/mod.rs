//! Stroke-to-bitmap rendering.
//!
//! The pipeline is a single pass with two early exits:
//!
//! 1. extent of all drawable points (fewer than two -> blank output)
//! 2. padded, clamped render region (collapsed -> blank output)
//! 3. strokes drawn into a canvas the size of the region
//! 4. canvas centered on a square background
//! 5. bilinear resize to the output size

mod canvas;
pub mod region;

use crate::config::RasterConfig;
use crate::foundation::core::{GrayImage, blank_image};
use crate::foundation::error::RasterResult;
use crate::raster::region::{BoundingExtent, RenderRegion};
use crate::sketch::model::Sketch;

/// Renders sketches into fixed-size grayscale images.
///
/// Holds only immutable configuration, so one instance can be shared across threads.
#[derive(Clone, Debug)]
pub struct Rasterizer {
    config: RasterConfig,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            config: RasterConfig::default(),
        }
    }
}

impl Rasterizer {
    /// Create a rasterizer after validating `config`.
    pub fn new(config: RasterConfig) -> RasterResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// All-background image of the output size.
    pub fn blank(&self) -> GrayImage {
        blank_image(self.config.output_size, self.config.output_size)
    }

    /// Padded, clamped window `sketch` is cropped to, or `None` when rendering falls back to
    /// a blank image.
    pub fn region_for(&self, sketch: &Sketch) -> Option<RenderRegion> {
        let extent = BoundingExtent::of(sketch)?;
        RenderRegion::derive(extent, self.config.padding, self.config.canvas_limit)
    }

    /// Render `sketch`. Never fails: degenerate input yields [`Rasterizer::blank`].
    ///
    /// The working canvas is strictly black and white; grays in the output come from the
    /// resize only. Stroke edges follow sub-pixel coverage, so pixels along a stroke boundary
    /// can differ from a rasterizer that snaps to the integer grid.
    pub fn render(&self, sketch: &Sketch) -> GrayImage {
        let Some(region) = self.region_for(sketch) else {
            return self.blank();
        };

        let drawn = canvas::draw_strokes(sketch, &region, self.config.line_width);
        let square = canvas::square_up(drawn);
        canvas::resize_square(square, self.config.output_size)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/rasterizer.rs"]
mod tests;
