pub use kurbo::Point;

/// Single-channel 8-bit raster used for every canvas and output image.
pub type GrayImage = image::GrayImage;

/// Background intensity (white).
pub const BACKGROUND: u8 = 255;

/// Stroke intensity (black).
pub const FOREGROUND: u8 = 0;

/// Allocate a `width x height` image filled with [`BACKGROUND`].
pub fn blank_image(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, image::Luma([BACKGROUND]))
}

/// Return `true` when every pixel of `img` is [`BACKGROUND`].
pub fn is_blank(img: &GrayImage) -> bool {
    img.as_raw().iter().all(|&v| v == BACKGROUND)
}
