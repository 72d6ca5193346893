//! doodle-raster turns pen-stroke sketch records into fixed-size grayscale training images.
//!
//! Each NDJSON record holds a list of strokes (`[[xs, ys], ...]`). The crate:
//!
//! - parses a record into a [`Sketch`] ([`RecordParser`])
//! - renders it, cropped to its padded extent and centered on a square, into an
//!   `output_size x output_size` [`GrayImage`] ([`Rasterizer`])
//! - converts whole sources and directories of sources into a per-class PNG corpus
//!   ([`convert_lines`], [`convert_corpus`])
//!
//! Malformed records are skipped per record; I/O failures are reported per source.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod batch;
/// Raster and batch configuration.
pub mod config;
pub mod corpus;
/// Image sinks and PNG output.
pub mod encode;
pub mod raster;
/// Sketch model and record parsing.
pub mod sketch;

pub use crate::foundation::core::{BACKGROUND, FOREGROUND, GrayImage, blank_image, is_blank};
pub use crate::foundation::error::{RasterError, RasterResult};

pub use crate::batch::{
    Pipeline, RenderedRecord, SkipReason, Source, SourceReport, SourceStatus, convert_lines,
    convert_source, render_batch,
};
pub use crate::config::{BatchConfig, IndexMode, PipelineConfig, RasterConfig};
pub use crate::corpus::{CorpusReport, SourceOutcome, convert_corpus, discover_sources};
pub use crate::encode::png::{PngDirSink, image_file_name, save_gray_png};
pub use crate::encode::sink::{ImageSink, InMemorySink};
pub use crate::raster::Rasterizer;
pub use crate::raster::region::{BoundingExtent, RenderRegion};
pub use crate::sketch::model::{GridPoint, Sketch, Stroke};
pub use crate::sketch::parse::RecordParser;
