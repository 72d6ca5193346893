//! Destinations for rendered images.

use crate::foundation::core::GrayImage;
use crate::foundation::error::RasterResult;

/// Consumer of the images rendered from one source.
///
/// Ordering contract: `begin` once, then `push_image` in strictly increasing `index` order, then
/// `end`. Indices are unique within one `begin`/`end` pair.
pub trait ImageSink: Send {
    /// Called once before any image of `class` is pushed.
    fn begin(&mut self, class: &str) -> RasterResult<()>;
    /// Store one rendered image.
    fn push_image(&mut self, index: usize, image: &GrayImage) -> RasterResult<()>;
    /// Called once after the last image is pushed.
    fn end(&mut self) -> RasterResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    class: Option<String>,
    pub(crate) images: Vec<(usize, GrayImage)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Class passed to `begin`, if any.
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Captured images with their indices, in push order.
    pub fn images(&self) -> &[(usize, GrayImage)] {
        &self.images
    }

    /// Captured indices, in push order.
    pub fn indices(&self) -> Vec<usize> {
        self.images.iter().map(|(i, _)| *i).collect()
    }

    /// Return `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ImageSink for InMemorySink {
    fn begin(&mut self, class: &str) -> RasterResult<()> {
        self.class = Some(class.to_string());
        self.images.clear();
        self.finished = false;
        Ok(())
    }

    fn push_image(&mut self, index: usize, image: &GrayImage) -> RasterResult<()> {
        self.images.push((index, image.clone()));
        Ok(())
    }

    fn end(&mut self) -> RasterResult<()> {
        self.finished = true;
        Ok(())
    }
}
