use image::imageops::{self, FilterType};

use crate::foundation::core::{BACKGROUND, FOREGROUND, GrayImage, blank_image};
use crate::raster::region::{RenderRegion, center_offset};
use crate::sketch::model::Sketch;

const COVERAGE_THRESHOLD: u8 = 128;

/// Draw every drawable stroke of `sketch` into a canvas covering exactly `region`.
///
/// Strokes are stroked as polylines with round caps and joins, then flattened onto the white
/// background as a two-level canvas: a pixel is foreground when the stroke covers at least half
/// of it.
pub(crate) fn draw_strokes(sketch: &Sketch, region: &RenderRegion, line_width: f64) -> GrayImage {
    let width = dim_u16(region.width());
    let height = dim_u16(region.height());
    let origin = region.origin();

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        BACKGROUND, BACKGROUND, BACKGROUND, 255,
    ));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(width),
        f64::from(height),
    ));

    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        FOREGROUND, FOREGROUND, FOREGROUND, 255,
    ));
    ctx.set_stroke(
        vello_cpu::kurbo::Stroke::new(line_width)
            .with_caps(vello_cpu::kurbo::Cap::Round)
            .with_join(vello_cpu::kurbo::Join::Round),
    );
    for stroke in sketch.drawable_strokes() {
        let mut path = vello_cpu::kurbo::BezPath::new();
        let mut points = stroke.points().iter().map(|&p| {
            let c = p.to_pixel_center(origin);
            vello_cpu::kurbo::Point::new(c.x, c.y)
        });
        if let Some(first) = points.next() {
            path.move_to(first);
        }
        for p in points {
            path.line_to(p);
        }
        ctx.stroke_path(&path);
    }

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    premul_rgba_to_gray(pixmap.data_as_u8_slice(), u32::from(width), u32::from(height))
}

/// Paste `canvas` centered on a background square whose side is its longer edge.
pub(crate) fn square_up(canvas: GrayImage) -> GrayImage {
    let (width, height) = canvas.dimensions();
    if width == height {
        return canvas;
    }
    let side = width.max(height);
    let (ox, oy) = center_offset(side, width, height);
    let mut square = blank_image(side, side);
    imageops::replace(&mut square, &canvas, i64::from(ox), i64::from(oy));
    square
}

/// Bilinear resample to `size x size`. The triangle filter widens its support when
/// downscaling, so every source pixel contributes.
pub(crate) fn resize_square(square: GrayImage, size: u32) -> GrayImage {
    if square.width() == size && square.height() == size {
        return square;
    }
    imageops::resize(&square, size, size, FilterType::Triangle)
}

/// Composite premultiplied RGBA over white, then threshold to [`FOREGROUND`] / [`BACKGROUND`].
/// Strokes are achromatic, so the red channel carries the intensity.
fn premul_rgba_to_gray(rgba: &[u8], width: u32, height: u32) -> GrayImage {
    let luma = rgba
        .chunks_exact(4)
        .map(|px| {
            if px[0].saturating_add(255 - px[3]) < COVERAGE_THRESHOLD {
                FOREGROUND
            } else {
                BACKGROUND
            }
        })
        .collect::<Vec<u8>>();
    GrayImage::from_raw(width, height, luma).unwrap_or_else(|| blank_image(width, height))
}

// Region dimensions are bounded by `MAX_CANVAS_LIMIT + 1`, well inside u16.
fn dim_u16(v: u32) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/canvas.rs"]
mod tests;
