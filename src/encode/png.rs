//! PNG files on disk.

use std::path::{Path, PathBuf};

use crate::encode::sink::ImageSink;
use crate::foundation::core::GrayImage;
use crate::foundation::error::{RasterError, RasterResult};

/// File name of image `index` of `class`: `cat_00042.png`.
pub fn image_file_name(class: &str, index: usize) -> String {
    format!("{class}_{index:05}.png")
}

/// Write `image` as an 8-bit grayscale PNG.
pub fn save_gray_png(path: &Path, image: &GrayImage) -> RasterResult<()> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| match e {
            image::ImageError::IoError(io) => RasterError::io(path, io),
            other => RasterError::encode(format!("write png '{}': {other}", path.display())),
        })
}

/// Writes each class into `<root>/<class>/<class>_<index:05>.png`.
#[derive(Debug)]
pub struct PngDirSink {
    root: PathBuf,
    current: Option<(String, PathBuf)>,
    written: usize,
}

impl PngDirSink {
    /// Create a sink rooted at `root`. Directories are created lazily in `begin`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            current: None,
            written: 0,
        }
    }

    /// Directory for `class` under this sink's root.
    pub fn class_dir(&self, class: &str) -> PathBuf {
        self.root.join(class)
    }

    /// Number of files written since the last `begin`.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl ImageSink for PngDirSink {
    fn begin(&mut self, class: &str) -> RasterResult<()> {
        let dir = self.class_dir(class);
        std::fs::create_dir_all(&dir).map_err(|e| RasterError::io(&dir, e))?;
        self.current = Some((class.to_string(), dir));
        self.written = 0;
        Ok(())
    }

    fn push_image(&mut self, index: usize, image: &GrayImage) -> RasterResult<()> {
        let (class, dir) = self
            .current
            .as_ref()
            .ok_or_else(|| RasterError::validation("PngDirSink::push_image before begin"))?;
        save_gray_png(&dir.join(image_file_name(class, index)), image)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> RasterResult<()> {
        self.current = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
