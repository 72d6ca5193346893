//! Extent and crop-window geometry.

use crate::sketch::model::{GridPoint, Sketch};

/// Minimal axis-aligned rectangle covering every point of every drawable stroke.
///
/// Bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingExtent {
    /// Smallest x.
    pub min_x: i32,
    /// Smallest y.
    pub min_y: i32,
    /// Largest x.
    pub max_x: i32,
    /// Largest y.
    pub max_y: i32,
}

impl BoundingExtent {
    /// Extent of `sketch`, or `None` when fewer than two usable points exist.
    pub fn of(sketch: &Sketch) -> Option<Self> {
        let mut points = sketch
            .drawable_strokes()
            .flat_map(|s| s.points().iter().copied());
        let first = points.next()?;

        let mut extent = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        let mut count = 1usize;
        for p in points {
            extent.include(p);
            count += 1;
        }
        (count >= 2).then_some(extent)
    }

    fn include(&mut self, p: GridPoint) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }
}

/// Padded, clamped extent used as the crop and render window.
///
/// Bounds are inclusive and always satisfy `0 <= min < max <= canvas_limit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderRegion {
    /// Left edge.
    pub min_x: i32,
    /// Top edge.
    pub min_y: i32,
    /// Right edge.
    pub max_x: i32,
    /// Bottom edge.
    pub max_y: i32,
}

impl RenderRegion {
    /// Grow `extent` by `padding` on every side and clamp to `[0, canvas_limit]`.
    ///
    /// Returns `None` when clamping collapses either axis.
    pub fn derive(extent: BoundingExtent, padding: i32, canvas_limit: i32) -> Option<Self> {
        let min_x = extent.min_x.saturating_sub(padding).max(0);
        let min_y = extent.min_y.saturating_sub(padding).max(0);
        let max_x = extent.max_x.saturating_add(padding).min(canvas_limit);
        let max_y = extent.max_y.saturating_add(padding).min(canvas_limit);

        if max_x <= min_x || max_y <= min_y {
            return None;
        }
        Some(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Top-left corner; strokes are translated by its negation.
    pub fn origin(&self) -> GridPoint {
        GridPoint::new(self.min_x, self.min_y)
    }

    /// Canvas width in pixels (inclusive bounds).
    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x + 1).unsigned_abs()
    }

    /// Canvas height in pixels (inclusive bounds).
    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y + 1).unsigned_abs()
    }
}

/// Offset that centers a `width x height` canvas in a `side x side` square.
///
/// Floor division per axis, so odd slack biases content up and left by half a pixel.
pub fn center_offset(side: u32, width: u32, height: u32) -> (u32, u32) {
    (
        side.saturating_sub(width) / 2,
        side.saturating_sub(height) / 2,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/raster/region.rs"]
mod tests;
